use crate::error::ForgeError;
use crate::generate::tcl::describe_flows;
use crate::manifest::FamilySettings;
use crate::pipeline::context::StepContext;
use crate::pipeline::state::PipelineState;
use crate::pipeline::step_trait::StepHandler;
use crate::strategies::{IMPL_STRATEGIES, SYNTH_STRATEGIES};
use async_trait::async_trait;

pub struct ListStrategiesStep;

#[async_trait]
impl StepHandler for ListStrategiesStep {
    fn allowed_in(&self, state: PipelineState) -> bool {
        state != PipelineState::Idle
    }

    async fn execute(&self, context: &mut StepContext<'_>) -> Result<(), ForgeError> {
        context.terminal.print("Synthesis strategies:");
        for strategy in SYNTH_STRATEGIES {
            context.terminal.print(&format!("  {}", strategy));
        }
        context.terminal.print("Implementation strategies:");
        for strategy in IMPL_STRATEGIES {
            context.terminal.print(&format!("  {}", strategy));
        }
        Ok(())
    }
}

/// Run flows for Vivado, simulation targets for source-list tools
pub struct ListRunsStep;

#[async_trait]
impl StepHandler for ListRunsStep {
    fn allowed_in(&self, state: PipelineState) -> bool {
        state != PipelineState::Idle
    }

    async fn execute(&self, context: &mut StepContext<'_>) -> Result<(), ForgeError> {
        let lines = match &context.tool.family {
            FamilySettings::Vivado(settings) => describe_flows(&settings.runs_flow),
            FamilySettings::SourceList(settings) => settings
                .sim_targets
                .iter()
                .map(|(name, target)| match &target.python_file {
                    Some(python) => format!("{}: {} ({})", name, target.top_module, python),
                    None => format!("{}: {}", name, target.top_module),
                })
                .collect(),
        };

        if lines.is_empty() {
            context
                .terminal
                .print(&format!("No runs configured for {}", context.tool.name));
        }
        for line in lines {
            context.terminal.print(&line);
        }
        Ok(())
    }
}
