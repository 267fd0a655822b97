use super::context::StepContext;
use super::state::PipelineState;
use crate::error::ForgeError;
use async_trait::async_trait;

#[async_trait]
pub trait StepHandler: Send + Sync {
    /// Whether the step may start from `state`
    fn allowed_in(&self, state: PipelineState) -> bool;

    async fn execute(&self, context: &mut StepContext<'_>) -> Result<(), ForgeError>;
}
