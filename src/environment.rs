//! Snapshot of the process environment handed to every resolution call

use crate::error::PathError;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overrides the invocation directory, set by wrapper scripts that `cd` before
/// starting the binary
pub const ORIG_PATH_VAR: &str = "HDLFORGE_ORIG_PATH";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
    cwd: PathBuf,
}

impl Environment {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            vars: BTreeMap::new(),
            cwd: cwd.into(),
        }
    }

    /// Capture variables and the invocation directory of the running process
    pub fn from_process() -> std::io::Result<Self> {
        let mut vars = BTreeMap::new();
        for (key, value) in env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => {
                    vars.insert(key, value);
                }
                (key, _) => debug!(
                    var = %key.unwrap_or_else(|k| k.to_string_lossy().into_owned()),
                    "skipping environment variable that is not valid UTF-8"
                ),
            }
        }
        let cwd = match vars.get(ORIG_PATH_VAR) {
            Some(orig) => PathBuf::from(orig),
            None => env::current_dir()?,
        };
        Ok(Self { vars, cwd })
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Look up a variable that must be set
    pub fn require(&self, key: &str) -> Result<&str, PathError> {
        self.get(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| PathError::EnvNotSet(key.to_string()))
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}
