use crate::paths::UnresolvedVarPolicy;

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub flow: Option<String>,
    pub strict_steps: bool,
    pub unresolved_vars: UnresolvedVarPolicy,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flow(mut self, flow: Option<String>) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_strict_steps(mut self, strict: bool) -> Self {
        self.strict_steps = strict;
        self
    }

    pub fn with_unresolved_vars(mut self, policy: UnresolvedVarPolicy) -> Self {
        self.unresolved_vars = policy;
        self
    }
}
