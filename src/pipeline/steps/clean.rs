use super::reset_build_dir;
use crate::error::ForgeError;
use crate::pipeline::context::StepContext;
use crate::pipeline::state::PipelineState;
use crate::pipeline::step::Step;
use crate::pipeline::step_trait::StepHandler;
use async_trait::async_trait;

pub struct CleanStep;

#[async_trait]
impl StepHandler for CleanStep {
    fn allowed_in(&self, _state: PipelineState) -> bool {
        true
    }

    async fn execute(&self, context: &mut StepContext<'_>) -> Result<(), ForgeError> {
        reset_build_dir(context, Step::Clean)?;
        context.transition(PipelineState::Idle);
        Ok(())
    }
}
