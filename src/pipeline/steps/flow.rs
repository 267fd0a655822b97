use crate::error::ForgeError;
use crate::manifest::VivadoSettings;
use crate::pipeline::context::StepContext;
use crate::pipeline::runner::Invocation;
use crate::pipeline::state::PipelineState;
use crate::pipeline::step::Step;
use crate::pipeline::step_trait::StepHandler;
use async_trait::async_trait;

/// `synth`, `impl`, `bit` or `all` with the selected run flow
pub struct FlowStep(pub Step);

#[async_trait]
impl StepHandler for FlowStep {
    fn allowed_in(&self, state: PipelineState) -> bool {
        state.has_project()
    }

    async fn execute(&self, context: &mut StepContext<'_>) -> Result<(), ForgeError> {
        let settings = vivado(context, self.0)?;
        let (_, flow) = context
            .flow
            .clone()
            .ok_or_else(|| ForgeError::FlowNotSelected {
                step: self.0.to_string(),
                available: settings.runs_flow.keys().cloned().collect(),
            })?;
        context.transition(PipelineState::StrategySelected);

        let invocation = compile_script(context, settings)
            .arg(self.0.as_str())
            .arg(flow.synth_strategy.as_str())
            .args(flow.impl_strategies.iter().cloned())
            .arg(flow.parameters.join(" "))
            .arg(flow.defines.join(" "));
        context.invoke(invocation).await?;

        context.transition(PipelineState::Executed);
        Ok(())
    }
}

/// Compile script run without building anything
pub struct DryRunStep;

#[async_trait]
impl StepHandler for DryRunStep {
    fn allowed_in(&self, state: PipelineState) -> bool {
        state.has_project()
    }

    async fn execute(&self, context: &mut StepContext<'_>) -> Result<(), ForgeError> {
        let settings = vivado(context, Step::DryRun)?;
        let invocation = compile_script(context, settings).arg(Step::DryRun.as_str());
        context.invoke(invocation).await
    }
}

fn vivado<'a>(context: &StepContext<'a>, step: Step) -> Result<&'a VivadoSettings, ForgeError> {
    context.tool.vivado().ok_or_else(|| ForgeError::UnsupportedStep {
        step: step.to_string(),
        tool: context.tool.name.clone(),
    })
}

/// `<executable> -mode batch -source <compile_tcl> -notrace -tclargs <project>.xpr`
fn compile_script(context: &StepContext<'_>, settings: &VivadoSettings) -> Invocation {
    Invocation::new(&settings.executable, &context.tool.build_dir)
        .args(["-mode", "batch", "-source"])
        .arg(settings.compile_tcl.display().to_string())
        .args(["-notrace", "-tclargs"])
        .arg(format!("{}.xpr", settings.project_name))
}
