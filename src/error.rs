//! Error taxonomy for manifest resolution, generation and step execution
//!
//! Each component owns its error enum; [`ForgeError`] aggregates them for the
//! pipeline and the binary.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read manifest {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("Failed to parse manifest {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Missing required key '{key}' in [{section}]")]
    MissingKey { section: String, key: String },

    #[error("{} {reason} {}", .path.display(), .root.display())]
    InvalidPath {
        path: PathBuf,
        root: PathBuf,
        reason: &'static str,
    },

    #[error("Invalid manifest: {0}")]
    Invalid(String),

    #[error("Project '{name}' not found in registry. Available projects: {}", .available.join(", "))]
    ProjectNotFound { name: String, available: Vec<String> },

    #[error("No registered project has its root at {}", .0.display())]
    NoProjectForPath(PathBuf),

    #[error(transparent)]
    Path(#[from] PathError),
}

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Environment variable '{0}' is not set")]
    EnvNotSet(String),

    #[error("Unresolved variable '${var}' in path '{raw}'")]
    UnresolvedVariable { var: String, raw: String },

    #[error("{} is outside of {}", .path.display(), .root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("{} is or contains {}", .path.display(), .inner.display())]
    Encloses { path: PathBuf, inner: PathBuf },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source file missing for tool '{tool}': {}", .path.display())]
    SourceFileMissing { tool: String, path: PathBuf },

    #[error("No sources are active for tool '{0}'")]
    EmptySourceSet(String),

    #[error("Failed to resolve source '{raw}': {source}")]
    Path {
        raw: String,
        #[source]
        source: PathError,
    },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Failed to write {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum ExternalToolError {
    #[error("Failed to spawn '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("'{program}' exited with status {code}")]
    NonZeroExit { program: String, code: i32 },

    #[error("'{program}' timed out after {seconds}s")]
    TimedOut { program: String, seconds: u64 },
}

impl ExternalToolError {
    /// Exit code to hand back to the caller; the child's own code when it has one
    pub fn exit_code(&self) -> i32 {
        match self {
            ExternalToolError::NonZeroExit { code, .. } => *code,
            ExternalToolError::TimedOut { .. } => 124,
            ExternalToolError::Spawn { .. } => 127,
        }
    }
}

/// Top-level error for a pipeline invocation
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("Aborted by user during step '{0}'")]
    UserAbort(String),

    #[error("Step '{step}' requires a run flow (--flow). Available flows: {}", .available.join(", "))]
    FlowNotSelected { step: String, available: Vec<String> },

    #[error("Run flow '{name}' not found. Available flows: {}", .available.join(", "))]
    UnknownFlow { name: String, available: Vec<String> },

    #[error("Unknown step '{0}'")]
    UnknownStep(String),

    #[error("Step '{step}' is not valid in state '{state}'")]
    InvalidTransition { step: String, state: String },

    #[error("Steps '{0}' and '{1}' cannot run in the same invocation")]
    IncompatibleSteps(String, String),

    #[error("Step '{step}' is not supported for tool '{tool}'")]
    UnsupportedStep { step: String, tool: String },

    #[error("Filesystem error: {0}")]
    Filesystem(String),

    #[error("Invalid project file {}: {message}", .path.display())]
    ProjectFile { path: PathBuf, message: String },

    #[error("Failed to format output: {0}")]
    Output(String),
}

impl ForgeError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ForgeError::ExternalTool(e) => e.exit_code(),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_exit_code_is_propagated() {
        let err = ForgeError::from(ExternalToolError::NonZeroExit {
            program: "vivado".to_string(),
            code: 3,
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_other_errors_exit_with_one() {
        let err = ForgeError::UnknownStep("bogus".to_string());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_unknown_flow_lists_available() {
        let err = ForgeError::UnknownFlow {
            name: "turbo".to_string(),
            available: vec!["fast".to_string(), "slow".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Run flow 'turbo' not found. Available flows: fast, slow"
        );
    }
}
