use super::config::PipelineConfig;
use super::context::StepContext;
use super::runner::ProcessRunner;
use super::state::PipelineState;
use super::step::{plan, Step};
use super::steps::handler_for;
use super::terminal::Terminal;
use crate::environment::Environment;
use crate::error::ForgeError;
use crate::fs::FileSystem;
use crate::generate::tcl::describe_flows;
use crate::manifest::{ProjectManifest, RunFlow, ToolSettings};
use crate::paths::with_repo_var;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What an invocation did; only returned when no step was declined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub final_state: PipelineState,
    pub completed: Vec<Step>,
    pub skipped: Vec<Step>,
}

/// Runs the requested steps for one tool, one after another
pub struct PipelineOrchestrator<'a> {
    manifest: &'a ProjectManifest,
    tool: &'a ToolSettings,
    env: &'a Environment,
    fs: &'a dyn FileSystem,
    runner: &'a dyn ProcessRunner,
    terminal: &'a dyn Terminal,
    config: PipelineConfig,
}

impl<'a> PipelineOrchestrator<'a> {
    pub fn new(
        manifest: &'a ProjectManifest,
        tool: &str,
        env: &'a Environment,
        fs: &'a dyn FileSystem,
        runner: &'a dyn ProcessRunner,
        terminal: &'a dyn Terminal,
        config: PipelineConfig,
    ) -> Result<Self, ForgeError> {
        Ok(Self {
            manifest,
            tool: manifest.tool(tool)?,
            env,
            fs,
            runner,
            terminal,
            config,
        })
    }

    /// State implied by what is already on disk
    pub fn initial_state(&self) -> PipelineState {
        let artifact = self
            .tool
            .project_file()
            .unwrap_or_else(|| self.tool.output_path().to_path_buf());
        if self.fs.is_file(&artifact) {
            PipelineState::SourcesConfigured
        } else {
            PipelineState::Idle
        }
    }

    pub async fn execute<S: AsRef<str>>(&self, names: &[S]) -> Result<PipelineReport, ForgeError> {
        let start = Instant::now();
        let steps = plan(names, self.config.strict_steps)?;
        let flow = self.select_flow(&steps)?;
        self.log_summary(&steps);

        let mut context = StepContext {
            manifest: self.manifest,
            tool: self.tool,
            env: self.env,
            fs: self.fs,
            runner: self.runner,
            terminal: self.terminal,
            policy: self.config.unresolved_vars,
            state: self.initial_state(),
            flow,
        };
        let mut report = PipelineReport {
            final_state: context.state,
            completed: Vec::new(),
            skipped: Vec::new(),
        };
        let mut declined: Option<Step> = None;

        for step in steps {
            let handler = handler_for(step);
            if !handler.allowed_in(context.state) {
                if declined.is_some() {
                    warn!("Skipping step '{}': not possible in state '{}'", step, context.state);
                    report.skipped.push(step);
                    continue;
                }
                return Err(ForgeError::InvalidTransition {
                    step: step.to_string(),
                    state: context.state.to_string(),
                });
            }

            info!("Step: {}", step);
            match handler.execute(&mut context).await {
                Ok(()) => {
                    debug!("Step {} complete", step);
                    report.completed.push(step);
                }
                Err(ForgeError::UserAbort(_)) => {
                    warn!("Step '{}' aborted by user", step);
                    declined.get_or_insert(step);
                    report.skipped.push(step);
                }
                Err(e) => return Err(e),
            }
        }

        report.final_state = context.state;
        info!(
            "Pipeline finished in state '{}' after {:.1?}",
            report.final_state,
            start.elapsed()
        );

        match declined {
            Some(step) => Err(ForgeError::UserAbort(step.to_string())),
            None => Ok(report),
        }
    }

    /// Resolve `--flow` up front so a bad name fails before any step has run
    fn select_flow(&self, steps: &[Step]) -> Result<Option<(String, RunFlow)>, ForgeError> {
        if let Some(step) = steps.iter().find(|s| s.needs_project_tool()) {
            if self.tool.vivado().is_none() {
                return Err(ForgeError::UnsupportedStep {
                    step: step.to_string(),
                    tool: self.tool.name.clone(),
                });
            }
        }
        let (Some(step), Some(settings)) =
            (steps.iter().find(|s| s.is_flow()), self.tool.vivado())
        else {
            return Ok(None);
        };
        let available: Vec<String> = settings.runs_flow.keys().cloned().collect();

        let Some(name) = self.config.flow.as_deref() else {
            self.terminal.print("Available run flows:");
            for line in describe_flows(&settings.runs_flow) {
                self.terminal.print(&line);
            }
            return Err(ForgeError::FlowNotSelected {
                step: step.to_string(),
                available,
            });
        };

        match settings.runs_flow.get(name) {
            Some(flow) => Ok(Some((name.to_string(), flow.clone()))),
            None => {
                self.terminal.print("Available run flows:");
                for known in &available {
                    self.terminal.print(&format!("  {}", known));
                }
                Err(ForgeError::UnknownFlow {
                    name: name.to_string(),
                    available,
                })
            }
        }
    }

    fn log_summary(&self, steps: &[Step]) {
        let root = &self.manifest.repo_root;
        let shown = |path: &std::path::Path| with_repo_var(path, root, &self.manifest.repo_env);
        let names: Vec<&str> = steps.iter().map(Step::as_str).collect();

        info!("Tool: {} ({})", self.tool.name, self.tool.family_kind().as_str());
        info!("Steps: {}", names.join(" "));
        info!("Manifest: {}", shown(&self.manifest.path));
        info!("Build directory: {}", shown(&self.tool.build_dir));
        info!("Output: {}", shown(self.tool.output_path()));
        if let Some(settings) = self.tool.vivado() {
            info!("Part: {}, top: {}", settings.part, settings.top_module);
            info!("Compile script: {}", shown(&settings.compile_tcl));
        }
        if let Some(flow) = &self.config.flow {
            info!("Run flow: {}", flow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::manifest::tests::{blinky_fs, env};
    use crate::pipeline::runner::RecordingRunner;
    use crate::pipeline::terminal::ScriptedTerminal;
    use std::path::Path;

    const BUILD: &str = "/repo/designs/blinky/build/vivado";

    struct Fixture {
        fs: MockFileSystem,
        env: Environment,
        manifest: ProjectManifest,
        runner: RecordingRunner,
        terminal: ScriptedTerminal,
    }

    impl Fixture {
        fn new(answers: &[bool]) -> Self {
            let fs = blinky_fs();
            let env = env();
            let manifest =
                ProjectManifest::load(Path::new("/repo/designs/blinky/project.toml"), &env, &fs)
                    .unwrap();
            Self {
                fs,
                env,
                manifest,
                runner: RecordingRunner::new(),
                terminal: ScriptedTerminal::new(answers.iter().copied()),
            }
        }

        fn with_project(self) -> Self {
            self.fs.add_file(format!("{}/blinky.xpr", BUILD), "<Project/>");
            self
        }

        fn orchestrator(&self, tool: &str, config: PipelineConfig) -> PipelineOrchestrator<'_> {
            PipelineOrchestrator::new(
                &self.manifest,
                tool,
                &self.env,
                &self.fs,
                &self.runner,
                &self.terminal,
                config,
            )
            .unwrap()
        }
    }

    fn flow(name: &str) -> PipelineConfig {
        PipelineConfig::new().with_flow(Some(name.to_string()))
    }

    #[tokio::test]
    async fn test_create_generates_and_invokes_vivado() {
        let f = Fixture::new(&[]);
        let report = f
            .orchestrator("vivado", PipelineConfig::new())
            .execute(&["create"])
            .await
            .unwrap();

        assert_eq!(report.final_state, PipelineState::SourcesConfigured);
        assert!(f.fs.is_file(Path::new(
            "/repo/designs/blinky/build/vivado/create_project.tcl"
        )));

        let calls = f.runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "vivado");
        assert_eq!(calls[0].cwd, Path::new(BUILD));
        assert_eq!(
            calls[0].args,
            vec![
                "-mode",
                "batch",
                "-source",
                "/repo/designs/blinky/build/vivado/create_project.tcl"
            ]
        );
        assert!(f.terminal.questions().is_empty());
    }

    #[tokio::test]
    async fn test_declined_create_leaves_build_dir_untouched() {
        let f = Fixture::new(&[false]);
        f.fs.add_file(format!("{}/keep.log", BUILD), "previous run");

        let err = f
            .orchestrator("vivado", PipelineConfig::new())
            .execute(&["create"])
            .await
            .unwrap_err();

        assert!(matches!(err, ForgeError::UserAbort(step) if step == "create"));
        assert_eq!(
            f.fs.read_to_string(Path::new(&format!("{}/keep.log", BUILD))).unwrap(),
            "previous run"
        );
        assert!(f.runner.calls().is_empty());
        assert_eq!(f.terminal.questions().len(), 1);
    }

    #[tokio::test]
    async fn test_confirmed_create_clears_old_contents() {
        let f = Fixture::new(&[true]);
        f.fs.add_file(format!("{}/stale.log", BUILD), "");

        f.orchestrator("vivado", PipelineConfig::new())
            .execute(&["create"])
            .await
            .unwrap();
        assert!(!f.fs.exists(Path::new(&format!("{}/stale.log", BUILD))));
    }

    #[tokio::test]
    async fn test_clean_refuses_build_dir_enclosing_project() {
        let mut f = Fixture::new(&[true]);
        f.manifest.project_root = Path::new(BUILD).join("nested");
        f.fs.add_file(format!("{}/nested/top.vhd", BUILD), "");

        let err = f
            .orchestrator("vivado", PipelineConfig::new())
            .execute(&["clean"])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ForgeError::Path(crate::error::PathError::Encloses { .. })
        ));
        assert!(f.fs.exists(Path::new(&format!("{}/nested/top.vhd", BUILD))));
        assert!(f.terminal.questions().is_empty());
    }

    #[tokio::test]
    async fn test_missing_source_fails_before_any_write() {
        let f = Fixture::new(&[true]);
        f.fs.add_file(format!("{}/keep.log", BUILD), "");
        f.fs.remove_dir_all(Path::new("/repo/designs/blinky/rtl")).unwrap();

        let err = f
            .orchestrator("vivado", PipelineConfig::new())
            .execute(&["create"])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ForgeError::Source(crate::error::SourceError::SourceFileMissing { .. })
        ));
        assert!(f.fs.exists(Path::new(&format!("{}/keep.log", BUILD))));
        assert!(f.terminal.questions().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_flow_lists_names_and_runs_nothing() {
        let f = Fixture::new(&[]).with_project();
        let err = f
            .orchestrator("vivado", flow("turbo"))
            .execute(&["create", "synth"])
            .await
            .unwrap_err();

        assert_ne!(err.exit_code(), 0);
        match err {
            ForgeError::UnknownFlow { name, available } => {
                assert_eq!(name, "turbo");
                assert_eq!(available, vec!["fast", "timing"]);
            }
            other => panic!("Expected UnknownFlow, got {:?}", other),
        }
        assert!(f.runner.calls().is_empty());
        assert!(f.terminal.printed().contains(&"  fast".to_string()));
    }

    #[tokio::test]
    async fn test_missing_flow_prints_every_flow() {
        let f = Fixture::new(&[]).with_project();
        let err = f
            .orchestrator("vivado", PipelineConfig::new())
            .execute(&["impl"])
            .await
            .unwrap_err();

        assert!(matches!(err, ForgeError::FlowNotSelected { ref step, .. } if step == "impl"));
        let printed = f.terminal.printed();
        assert!(printed.contains(&"fast:".to_string()));
        assert!(printed.contains(&"timing:".to_string()));
        assert!(printed.contains(&"  synth_strategy: Flow_PerfOptimized_high".to_string()));
    }

    #[tokio::test]
    async fn test_flow_step_arguments() {
        let f = Fixture::new(&[]).with_project();
        let report = f
            .orchestrator("vivado", flow("timing"))
            .execute(&["synth"])
            .await
            .unwrap();

        assert_eq!(report.final_state, PipelineState::Executed);
        let calls = f.runner.calls();
        assert_eq!(
            calls[0].args,
            vec![
                "-mode",
                "batch",
                "-source",
                "/repo/tools/project_setup/compile.tcl",
                "-notrace",
                "-tclargs",
                "blinky.xpr",
                "synth",
                "Flow_PerfOptimized_high",
                "Performance_Explore",
                "Performance_ExtraTimingOpt",
                "G_WIDTH=16",
                "",
            ]
        );
    }

    #[tokio::test]
    async fn test_flow_step_needs_project() {
        let f = Fixture::new(&[]);
        let err = f
            .orchestrator("vivado", flow("fast"))
            .execute(&["bit"])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ForgeError::InvalidTransition { ref step, ref state } if step == "bit" && state == "idle"
        ));
    }

    #[tokio::test]
    async fn test_create_then_run_flow() {
        let f = Fixture::new(&[]);
        let report = f
            .orchestrator("vivado", flow("fast"))
            .execute(&["create", "all"])
            .await
            .unwrap();
        assert_eq!(report.completed, vec![Step::Create, Step::All]);
        assert_eq!(f.runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_declined_create_skips_dependent_steps() {
        let f = Fixture::new(&[false]);
        f.fs.add_file(format!("{}/keep.log", BUILD), "");

        let err = f
            .orchestrator("vivado", flow("fast"))
            .execute(&["create", "synth"])
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::UserAbort(_)));
        assert!(f.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_declined_clean_still_runs_later_steps() {
        let f = Fixture::new(&[false]).with_project();
        let err = f
            .orchestrator("vivado", flow("fast"))
            .execute(&["clean", "synth"])
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::UserAbort(step) if step == "clean"));
        assert_eq!(f.runner.calls().len(), 1);
        assert!(f.fs.exists(Path::new(&format!("{}/blinky.xpr", BUILD))));
    }

    #[tokio::test]
    async fn test_tool_failure_exit_code() {
        let mut f = Fixture::new(&[]).with_project();
        f.runner = RecordingRunner::failing_with(2);
        let err = f
            .orchestrator("vivado", flow("fast"))
            .execute(&["synth"])
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_rejected_with_flow_step() {
        let f = Fixture::new(&[]).with_project();
        let err = f
            .orchestrator("vivado", flow("fast"))
            .execute(&["dry-run", "synth"])
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::IncompatibleSteps(_, _)));
        assert!(f.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_arguments() {
        let f = Fixture::new(&[]).with_project();
        f.orchestrator("vivado", PipelineConfig::new())
            .execute(&["dry-run"])
            .await
            .unwrap();
        let args = &f.runner.calls()[0].args;
        assert_eq!(args[args.len() - 2..], ["blinky.xpr", "dry-run"]);
    }

    #[tokio::test]
    async fn test_strict_unknown_step() {
        let f = Fixture::new(&[]);
        let config = PipelineConfig::new().with_strict_steps(true);
        let err = f
            .orchestrator("vivado", config)
            .execute(&["create", "upload"])
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::UnknownStep(_)));
        assert!(f.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_listing_from_idle_is_invalid() {
        let f = Fixture::new(&[]);
        let err = f
            .orchestrator("vivado", PipelineConfig::new())
            .execute(&["list-strategies"])
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_list_runs() {
        let f = Fixture::new(&[]).with_project();
        let report = f
            .orchestrator("vivado", PipelineConfig::new())
            .execute(&["list-runs", "list-strategies"])
            .await
            .unwrap();
        assert_eq!(report.final_state, PipelineState::SourcesConfigured);
        let printed = f.terminal.printed();
        assert_eq!(printed[0], "fast:");
        assert!(printed.contains(&"  Performance_Explore".to_string()));
    }

    #[tokio::test]
    async fn test_source_list_tool() {
        let f = Fixture::new(&[]);
        let orchestrator = f.orchestrator("ghdl", PipelineConfig::new());
        orchestrator.execute(&["create"]).await.unwrap();

        assert!(f.runner.calls().is_empty());
        assert_eq!(orchestrator.initial_state(), PipelineState::SourcesConfigured);

        let err = orchestrator.execute(&["synth"]).await.unwrap_err();
        assert!(matches!(
            err,
            ForgeError::UnsupportedStep { ref tool, .. } if tool == "ghdl"
        ));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let f = Fixture::new(&[]);
        let result = PipelineOrchestrator::new(
            &f.manifest,
            "quartus",
            &f.env,
            &f.fs,
            &f.runner,
            &f.terminal,
            PipelineConfig::new(),
        );
        assert!(matches!(result, Err(ForgeError::Manifest(_))));
    }

    #[test]
    fn test_initial_state_follows_project_file() {
        let f = Fixture::new(&[]);
        assert_eq!(
            f.orchestrator("vivado", PipelineConfig::new()).initial_state(),
            PipelineState::Idle
        );
        let f = f.with_project();
        assert_eq!(
            f.orchestrator("vivado", PipelineConfig::new()).initial_state(),
            PipelineState::SourcesConfigured
        );
    }
}
