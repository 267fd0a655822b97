use serde::Serialize;
use std::fmt;

/// Where a tool's build directory stands between steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineState {
    Idle,
    Created,
    SourcesConfigured,
    StrategySelected,
    Executed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Created => "created",
            PipelineState::SourcesConfigured => "sources-configured",
            PipelineState::StrategySelected => "strategy-selected",
            PipelineState::Executed => "executed",
        }
    }

    /// A project exists that flow steps can run against
    pub fn has_project(&self) -> bool {
        *self >= PipelineState::SourcesConfigured
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_project() {
        assert!(!PipelineState::Idle.has_project());
        assert!(!PipelineState::Created.has_project());
        assert!(PipelineState::SourcesConfigured.has_project());
        assert!(PipelineState::Executed.has_project());
    }
}
