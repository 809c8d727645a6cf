// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not find `{0}` on the PATH")]
    ToolNotFound(&'static str),
    #[error("`{tool}` failed ({status}): {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: ExitStatus,
        stderr: String,
    },
    #[error("`{tool}` did not finish within {timeout:?}")]
    ToolTimedOut {
        tool: &'static str,
        timeout: Duration,
    },
    #[error("`{0}` was cancelled")]
    ToolCancelled(&'static str),
    #[error("Input file {0} does not exist")]
    MissingInput(PathBuf),
    #[error("Directory {0} does not exist")]
    MissingDirectory(PathBuf),
    #[error("Invalid namespace {0:?}")]
    InvalidNamespace(String),
    #[error("{path}: {count} problem(s) found while parsing in strict mode")]
    Diagnostics { path: PathBuf, count: usize },
    #[error("Could not read settings from {path}: {source}")]
    Settings {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Error rendering translations template: {0}")]
    Template(#[from] tera::Error),
    #[error("Could not process catalog {path}: {message}")]
    Catalog { path: PathBuf, message: String },
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not run `{tool}` ({path}): {source}")]
    Process {
        tool: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
