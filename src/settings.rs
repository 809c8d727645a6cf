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

use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::table::FallbackPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the template written by `xgettext` inside the PO directory.
pub const TEMPLATE_FILE: &str = "messages.pot";

/// Extension of the generated translation modules.
pub const GENERATED_EXTENSION: &str = "cljs";

/// Parameters for extraction and deployment.
///
/// They can be read from a JSON file, where the keys are written in
/// kebab-case. Missing keys take their default values.
///
/// ## Example
///
/// ```json
/// {
///   "src": "src/main",
///   "namespace": "app.translations",
///   "po-dir": "i18n",
///   "fallback": "omit"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Root of the ClojureScript sources.
    pub src: PathBuf,
    /// Namespace under which the generated modules are created.
    pub namespace: String,
    /// Directory holding the PO files and the template.
    pub po_dir: PathBuf,
    /// Namespace of the runtime which owns `*loaded-translations*`.
    pub runtime_namespace: String,
    pub fallback: FallbackPolicy,
    /// Treat parse diagnostics as fatal.
    pub strict: bool,
    /// Time limit for each external tool, `None` to wait forever.
    pub tool_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            src: PathBuf::from("src"),
            namespace: String::from("translations"),
            po_dir: PathBuf::from("i18n"),
            runtime_namespace: String::from("fulcro.i18n"),
            fallback: FallbackPolicy::default(),
            strict: false,
            tool_timeout_secs: Some(300),
        }
    }
}

/// Paths derived from [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Where the generated modules are written.
    pub output_dir: PathBuf,
    /// The `messages.pot` template.
    pub template: PathBuf,
}

impl Settings {
    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        serde_json::from_str(&content).map_err(|source| Error::Settings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Compute the output directory and template path.
    ///
    /// Dots in the namespace become directories and hyphens become
    /// underscores, so `app.i18n-data` maps to `<src>/app/i18n_data`.
    pub fn expand(&self) -> Result<Paths> {
        let mut output_dir = self.src.clone();
        for segment in namespace_segments(&self.namespace)? {
            output_dir.push(segment.replace('-', "_"));
        }
        Ok(Paths {
            output_dir,
            template: self.po_dir.join(TEMPLATE_FILE),
        })
    }

    /// The namespace of the generated module for `locale`.
    pub fn module_name(&self, locale: &Locale) -> String {
        format!("{}.{}", self.namespace, locale)
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_secs.map(Duration::from_secs)
    }
}

fn namespace_segments(namespace: &str) -> Result<Vec<&str>> {
    let segments = namespace.split('.').collect::<Vec<_>>();
    let valid = segments.iter().all(|segment| {
        !segment.is_empty()
            && !segment.contains(['/', '\\'])
            && !segment.chars().any(char::is_whitespace)
    });
    if valid {
        Ok(segments)
    } else {
        Err(Error::InvalidNamespace(namespace.to_string()))
    }
}
