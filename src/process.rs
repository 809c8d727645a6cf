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

//! Running the external Gettext tools.
//!
//! Tools are found on the `PATH` up front and started with an
//! argument vector, never through a shell. Their output is captured
//! and the wait can be bounded by a timeout or a [`CancelToken`].

use crate::error::{Error, Result};
use log::debug;
use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A cloneable flag which asks running tools to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How long to wait for a tool.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

/// The captured result of a finished tool.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// An external program located on the `PATH`.
#[derive(Debug, Clone)]
pub struct Tool {
    name: &'static str,
    path: PathBuf,
}

impl Tool {
    /// Find `name` on the `PATH`.
    pub fn locate(name: &'static str) -> Result<Self> {
        let path = which::which(name).map_err(|_| Error::ToolNotFound(name))?;
        debug!("Found {name} at {}", path.display());
        Ok(Tool { name, path })
    }

    /// Use the program at `path` under the given name.
    pub fn at(name: &'static str, path: impl Into<PathBuf>) -> Self {
        Tool {
            name,
            path: path.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the tool and wait for it to finish.
    ///
    /// A non-zero exit status is returned as [`Error::ToolFailed`]. If the
    /// timeout expires or the cancel token fires, the child is killed.
    pub fn run<I, S>(&self, args: I, options: &RunOptions) -> Result<ToolOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.path);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!("Running {command:?}");

        let mut child = command.spawn().map_err(|err| self.process_error(err))?;
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let started = Instant::now();
        let status = loop {
            if options.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::ToolCancelled(self.name));
            }
            let mut wait_for = POLL_INTERVAL;
            if let Some(timeout) = options.timeout {
                let elapsed = started.elapsed();
                if elapsed >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::ToolTimedOut {
                        tool: self.name,
                        timeout,
                    });
                }
                wait_for = wait_for.min(timeout - elapsed);
            }
            if let Some(status) = child
                .wait_timeout(wait_for)
                .map_err(|err| self.process_error(err))?
            {
                break status;
            }
        };

        let output = ToolOutput {
            status,
            stdout: collect(stdout),
            stderr: collect(stderr),
        };
        if !output.status.success() {
            return Err(Error::ToolFailed {
                tool: self.name,
                status: output.status,
                stderr: output.stderr.trim_end().to_string(),
            });
        }
        Ok(output)
    }

    fn process_error(&self, source: std::io::Error) -> Error {
        Error::Process {
            tool: self.name,
            path: self.path.clone(),
            source,
        }
    }
}

/// Read a pipe to the end on a helper thread so the child never blocks
/// on a full pipe buffer.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        buffer
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    let bytes = handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh() -> Tool {
        Tool::at("sh", "/bin/sh")
    }

    #[test]
    fn test_locate_missing_tool() {
        assert!(matches!(
            Tool::locate("surely-no-such-gettext-tool"),
            Err(Error::ToolNotFound("surely-no-such-gettext-tool"))
        ));
    }

    #[test]
    fn test_captures_output() {
        let output = sh()
            .run(["-c", "echo out; echo err >&2"], &RunOptions::default())
            .unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[test]
    fn test_arguments_are_not_interpreted_by_a_shell() {
        let output = sh()
            .run(
                ["-c", "printf '%s' \"$1\"", "sh", "$(echo injected); ls"],
                &RunOptions::default(),
            )
            .unwrap();
        assert_eq!(output.stdout, "$(echo injected); ls");
    }

    #[test]
    fn test_failure_carries_stderr() {
        let err = sh()
            .run(["-c", "echo broken >&2; exit 3"], &RunOptions::default())
            .unwrap_err();
        match err {
            Error::ToolFailed {
                tool,
                status,
                stderr,
            } => {
                assert_eq!(tool, "sh");
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_timeout_kills_child() {
        let options = RunOptions {
            timeout: Some(Duration::from_millis(200)),
            cancel: None,
        };
        let started = Instant::now();
        let err = sh().run(["-c", "exec sleep 10"], &options).unwrap_err();
        assert!(matches!(err, Error::ToolTimedOut { tool: "sh", .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(err.to_string(), "`sh` did not finish within 200ms");
    }

    #[test]
    fn test_spawn_failure_names_the_tool() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("xgettext");
        let err = Tool::at("xgettext", &missing)
            .run(["--version"], &RunOptions::default())
            .unwrap_err();
        match err {
            Error::Process { tool, path, .. } => {
                assert_eq!(tool, "xgettext");
                assert_eq!(path, missing);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cancel() {
        let token = CancelToken::new();
        let options = RunOptions {
            timeout: None,
            cancel: Some(token.clone()),
        };
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            token.cancel();
        });
        let err = sh().run(["-c", "exec sleep 10"], &options).unwrap_err();
        canceller.join().unwrap();
        assert!(matches!(err, Error::ToolCancelled("sh")));
    }
}
