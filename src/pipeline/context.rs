//! State shared by the steps of one invocation

use super::runner::{Invocation, ProcessRunner};
use super::state::PipelineState;
use super::terminal::Terminal;
use crate::environment::Environment;
use crate::error::ForgeError;
use crate::fs::FileSystem;
use crate::manifest::{ProjectManifest, RunFlow, ToolSettings};
use crate::paths::UnresolvedVarPolicy;
use tracing::info;

pub struct StepContext<'a> {
    pub manifest: &'a ProjectManifest,
    pub tool: &'a ToolSettings,
    pub env: &'a Environment,
    pub fs: &'a dyn FileSystem,
    pub runner: &'a dyn ProcessRunner,
    pub terminal: &'a dyn Terminal,
    pub policy: UnresolvedVarPolicy,
    pub state: PipelineState,
    /// Run flow selected for this invocation, checked before any step ran
    pub flow: Option<(String, RunFlow)>,
}

impl StepContext<'_> {
    pub fn transition(&mut self, next: PipelineState) {
        if self.state != next {
            info!("State: {} -> {}", self.state, next);
            self.state = next;
        }
    }

    pub async fn invoke(&self, invocation: Invocation) -> Result<(), ForgeError> {
        self.runner.run(&invocation).await?;
        Ok(())
    }
}
