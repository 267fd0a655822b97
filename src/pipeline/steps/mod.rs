pub mod clean;
pub mod create;
pub mod flow;
pub mod listing;

use super::context::StepContext;
use super::step::Step;
use super::step_trait::StepHandler;
use crate::error::ForgeError;
use crate::generate;
use crate::paths::{ensure_disposable, with_repo_var};
use tracing::info;

pub use clean::CleanStep;
pub use create::CreateStep;
pub use flow::{DryRunStep, FlowStep};
pub use listing::{ListRunsStep, ListStrategiesStep};

pub fn handler_for(step: Step) -> Box<dyn StepHandler> {
    match step {
        Step::Create => Box::new(CreateStep),
        Step::Clean => Box::new(CleanStep),
        Step::ListStrategies => Box::new(ListStrategiesStep),
        Step::ListRuns => Box::new(ListRunsStep),
        Step::Synth | Step::Impl | Step::Bit | Step::All => Box::new(FlowStep(step)),
        Step::DryRun => Box::new(DryRunStep),
    }
}

/// Empty the build directory, asking first when it has contents
pub(crate) fn reset_build_dir(context: &StepContext<'_>, step: Step) -> Result<(), ForgeError> {
    let dir = &context.tool.build_dir;
    ensure_disposable(dir, &context.manifest.repo_root, &context.manifest.project_root)?;

    if context.fs.has_entries(dir) {
        let shown = with_repo_var(dir, &context.manifest.repo_root, &context.manifest.repo_env);
        let question = format!("Build directory {} is not empty. Delete its contents?", shown);
        if !context.terminal.confirm(&question) {
            return Err(ForgeError::UserAbort(step.to_string()));
        }
    }

    generate::reset_dir(context.fs, dir)?;
    info!("Reset build directory {}", dir.display());
    Ok(())
}
