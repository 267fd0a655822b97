use super::reset_build_dir;
use crate::error::ForgeError;
use crate::generate;
use crate::manifest::FamilySettings;
use crate::pipeline::context::StepContext;
use crate::pipeline::runner::Invocation;
use crate::pipeline::state::PipelineState;
use crate::pipeline::step::Step;
use crate::pipeline::step_trait::StepHandler;
use crate::sources::SourceResolver;
use async_trait::async_trait;

/// Fresh build directory, generated artifact and, for Vivado, the project itself
pub struct CreateStep;

#[async_trait]
impl StepHandler for CreateStep {
    fn allowed_in(&self, _state: PipelineState) -> bool {
        true
    }

    async fn execute(&self, context: &mut StepContext<'_>) -> Result<(), ForgeError> {
        // Sources are checked before anything on disk changes
        let sources = SourceResolver::new(context.env, context.fs)
            .with_policy(context.policy)
            .resolve_for_tool(context.manifest, &context.tool.name)?;
        let artifact = generate::render(context.manifest, context.tool, &sources);

        reset_build_dir(context, Step::Create)?;
        context.transition(PipelineState::Created);

        generate::write_artifact(context.fs, &artifact)?;

        if let FamilySettings::Vivado(settings) = &context.tool.family {
            let invocation = Invocation::new(&settings.executable, &context.tool.build_dir)
                .args(["-mode", "batch", "-source"])
                .arg(artifact.path.display().to_string());
            context.invoke(invocation).await?;
        }

        context.transition(PipelineState::SourcesConfigured);
        Ok(())
    }
}
