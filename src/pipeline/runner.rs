//! External tool invocation

use crate::error::ExternalToolError;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run to completion; a non-zero exit is an error carrying the child's code
    async fn run(&self, invocation: &Invocation) -> Result<(), ExternalToolError>;
}

/// Spawns real child processes, inheriting stdio
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<(), ExternalToolError> {
        info!("Running: {} (in {})", invocation, invocation.cwd.display());

        let spawn_error = |e: std::io::Error| ExternalToolError::Spawn {
            program: invocation.program.clone(),
            message: e.to_string(),
        };
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status.map_err(spawn_error)?,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(ExternalToolError::TimedOut {
                        program: invocation.program.clone(),
                        seconds: limit.as_secs(),
                    });
                }
            },
            None => child.wait().await.map_err(spawn_error)?,
        };

        debug!("{} exited with {}", invocation.program, status);
        if status.success() {
            Ok(())
        } else {
            Err(ExternalToolError::NonZeroExit {
                program: invocation.program.clone(),
                code: status.code().unwrap_or(1),
            })
        }
    }
}

/// Records invocations instead of running them
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    exit_code: i32,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call fails with `code`
    pub fn failing_with(code: i32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            exit_code: code,
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<(), ExternalToolError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }
        if self.exit_code == 0 {
            Ok(())
        } else {
            Err(ExternalToolError::NonZeroExit {
                program: invocation.program.clone(),
                code: self.exit_code,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_spaced_args() {
        let invocation = Invocation::new("vivado", "/build")
            .args(["-mode", "batch"])
            .arg("G_WIDTH=4 G_DEPTH=8")
            .arg("");
        assert_eq!(
            invocation.to_string(),
            "vivado -mode batch \"G_WIDTH=4 G_DEPTH=8\" \"\""
        );
    }

    #[tokio::test]
    async fn test_recording_runner() {
        let runner = RecordingRunner::failing_with(3);
        let err = runner
            .run(&Invocation::new("vivado", "/build"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(runner.calls().len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_propagates_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::default();
        let invocation = Invocation::new("sh", dir.path()).args(["-c", "exit 7"]);

        let err = runner.run(&invocation).await.unwrap_err();
        assert!(matches!(err, ExternalToolError::NonZeroExit { code: 7, .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new(Some(Duration::from_millis(100)));
        let invocation = Invocation::new("sleep", dir.path()).arg("5");

        let err = runner.run(&invocation).await.unwrap_err();
        assert!(matches!(err, ExternalToolError::TimedOut { .. }));
        assert_eq!(err.exit_code(), 124);
    }

    #[tokio::test]
    async fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::default();
        let invocation = Invocation::new("hdlforge-no-such-tool", dir.path());

        let err = runner.run(&invocation).await.unwrap_err();
        assert_eq!(err.exit_code(), 127);
    }
}
