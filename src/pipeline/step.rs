//! Step names and invocation planning

use crate::error::ForgeError;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Create,
    Clean,
    ListStrategies,
    ListRuns,
    Synth,
    Impl,
    Bit,
    All,
    DryRun,
}

impl Step {
    pub const ALL: &'static [Step] = &[
        Step::Create,
        Step::Clean,
        Step::ListStrategies,
        Step::ListRuns,
        Step::Synth,
        Step::Impl,
        Step::Bit,
        Step::All,
        Step::DryRun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Create => "create",
            Step::Clean => "clean",
            Step::ListStrategies => "list-strategies",
            Step::ListRuns => "list-runs",
            Step::Synth => "synth",
            Step::Impl => "impl",
            Step::Bit => "bit",
            Step::All => "all",
            Step::DryRun => "dry-run",
        }
    }

    /// Steps that run a named flow through the compile script
    pub fn is_flow(&self) -> bool {
        matches!(self, Step::Synth | Step::Impl | Step::Bit | Step::All)
    }

    /// Steps that only exist for project-mode tools
    pub fn needs_project_tool(&self) -> bool {
        self.is_flow() || *self == Step::DryRun
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Step::ALL
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| ForgeError::UnknownStep(s.to_string()))
    }
}

/// Parse and validate the requested steps before any of them runs
pub fn plan<S: AsRef<str>>(names: &[S], strict: bool) -> Result<Vec<Step>, ForgeError> {
    let mut steps = Vec::with_capacity(names.len());
    for name in names {
        match name.as_ref().parse::<Step>() {
            Ok(step) => steps.push(step),
            Err(e) if strict => return Err(e),
            Err(_) => warn!("Ignoring unknown step '{}'", name.as_ref()),
        }
    }

    if steps.contains(&Step::DryRun) {
        if let Some(flow) = steps.iter().find(|s| s.is_flow()) {
            return Err(ForgeError::IncompatibleSteps(
                Step::DryRun.to_string(),
                flow.to_string(),
            ));
        }
    }

    Ok(steps)
}
