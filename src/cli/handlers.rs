//! Subcommand handlers
//!
//! Each handler returns the process exit code on success. User-facing output
//! goes through [`Terminal`] so handlers run unchanged against scripted
//! terminals and in-memory filesystems.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::commands::{
    AddSourceArgs, ConfigArgs, GenerateArgs, ProjectSelection, ProjectsArgs, RunArgs, SourcesArgs,
    XprFilesArgs,
};
use super::output::{OutputFormatter, ProjectSummary};
use crate::config::HdlforgeConfig;
use crate::environment::Environment;
use crate::error::ForgeError;
use crate::fs::FileSystem;
use crate::generate;
use crate::manifest::edit::{add_source, AddOutcome};
use crate::manifest::registry::ProjectRegistry;
use crate::manifest::{ManifestLoader, ProjectManifest};
use crate::paths::{normalize, UnresolvedVarPolicy};
use crate::pipeline::{PipelineConfig, PipelineOrchestrator, ProcessRunner, Terminal};
use crate::sources::SourceResolver;
use crate::xpr;

/// Everything a handler needs besides its own arguments
pub struct Session<'a> {
    pub config: HdlforgeConfig,
    pub env: Environment,
    pub fs: &'a dyn FileSystem,
    policy: UnresolvedVarPolicy,
}

impl<'a> Session<'a> {
    /// Validates the configuration; `registry` overrides the configured one
    pub fn new(
        mut config: HdlforgeConfig,
        registry: Option<&str>,
        env: Environment,
        fs: &'a dyn FileSystem,
    ) -> Result<Self, ForgeError> {
        if let Some(registry) = registry {
            config.registry = registry.to_string();
        }
        config.validate()?;
        let policy = config.unresolved_policy()?;

        Ok(Self {
            config,
            env,
            fs,
            policy,
        })
    }

    fn loader(&self) -> ManifestLoader<'_> {
        ManifestLoader::new(&self.env, self.fs).with_policy(self.policy)
    }

    fn registry(&self) -> Result<ProjectRegistry, ForgeError> {
        let path = ProjectRegistry::locate(&self.config.registry, &self.env)?;
        debug!("Using registry {}", path.display());
        Ok(ProjectRegistry::load(&path, self.fs)?)
    }

    /// `--manifest` wins; otherwise the registry picks by name or invocation directory
    pub fn load_manifest(&self, selection: &ProjectSelection) -> Result<ProjectManifest, ForgeError> {
        if let Some(ref manifest) = selection.manifest {
            let path = self.absolute(manifest);
            return Ok(self.loader().load(&path)?);
        }

        let registry = self.registry()?;
        Ok(registry.select(
            selection.project.as_deref(),
            &self.loader(),
            &self.env,
            self.fs,
        )?)
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&self.env.cwd().join(path))
        }
    }
}

pub async fn handle_run(
    args: &RunArgs,
    session: &Session<'_>,
    runner: &dyn ProcessRunner,
    terminal: &dyn Terminal,
) -> Result<i32, ForgeError> {
    let manifest = session.load_manifest(&args.selection)?;
    let config = PipelineConfig::new()
        .with_flow(args.flow.clone())
        .with_strict_steps(args.strict || session.config.strict_steps)
        .with_unresolved_vars(session.policy);

    let orchestrator = PipelineOrchestrator::new(
        &manifest,
        &args.tool,
        &session.env,
        session.fs,
        runner,
        terminal,
        config,
    )?;
    let report = orchestrator.execute(&args.steps).await?;

    if !report.skipped.is_empty() {
        let skipped: Vec<&str> = report.skipped.iter().map(|s| s.as_str()).collect();
        warn!("Skipped steps: {}", skipped.join(", "));
    }
    Ok(0)
}

pub fn handle_sources(
    args: &SourcesArgs,
    session: &Session<'_>,
    terminal: &dyn Terminal,
) -> Result<i32, ForgeError> {
    let manifest = session.load_manifest(&args.selection)?;
    let sources = SourceResolver::new(&session.env, session.fs)
        .with_policy(session.policy)
        .resolve_for_tool(&manifest, &args.tool)?;

    let output = OutputFormatter::new(args.format.into())
        .format_sources(&sources, &manifest.repo_root, &manifest.repo_env)
        .map_err(|e| ForgeError::Output(e.to_string()))?;
    terminal.print(output.trim_end());
    Ok(0)
}

/// Exit code 1 under `--check` when the artifact on disk is stale or missing
pub fn handle_generate(
    args: &GenerateArgs,
    session: &Session<'_>,
    terminal: &dyn Terminal,
) -> Result<i32, ForgeError> {
    let manifest = session.load_manifest(&args.selection)?;
    let tool = manifest.tool(&args.tool)?;
    let sources = SourceResolver::new(&session.env, session.fs)
        .with_policy(session.policy)
        .resolve_for_tool(&manifest, &args.tool)?;
    let artifact = generate::render(&manifest, tool, &sources);

    if args.check {
        return Ok(if generate::is_up_to_date(session.fs, &artifact) {
            terminal.print(&format!("{} is up to date", artifact.path.display()));
            0
        } else {
            terminal.print(&format!("{} is out of date", artifact.path.display()));
            1
        });
    }

    generate::write_artifact(session.fs, &artifact)?;
    terminal.print(&artifact.path.display().to_string());
    Ok(0)
}

pub fn handle_projects(
    args: &ProjectsArgs,
    session: &Session<'_>,
    terminal: &dyn Terminal,
) -> Result<i32, ForgeError> {
    let registry = session.registry()?;
    let projects: Vec<ProjectSummary> = registry
        .entries()
        .map(|(name, manifest)| ProjectSummary {
            name: name.to_string(),
            manifest: manifest.to_path_buf(),
            exists: session.fs.is_file(manifest),
        })
        .collect();

    let output = OutputFormatter::new(args.format.into())
        .format_projects(&projects)
        .map_err(|e| ForgeError::Output(e.to_string()))?;
    terminal.print(output.trim_end());
    Ok(0)
}

pub fn handle_add_source(
    args: &AddSourceArgs,
    session: &Session<'_>,
    terminal: &dyn Terminal,
) -> Result<i32, ForgeError> {
    let manifest = session.load_manifest(&args.selection)?;
    // Unknown tools are rejected before the file is touched
    manifest.tool(&args.tool)?;

    let outcome = add_source(
        &manifest.path,
        &args.tool,
        &args.path,
        args.fileset.as_deref(),
        session.fs,
    )?;
    let message = match outcome {
        AddOutcome::Added => format!("Added {} for {}", args.path, args.tool),
        AddOutcome::Extended => format!("Enabled {} for {}", args.path, args.tool),
        AddOutcome::Unchanged => format!("{} is already used by {}", args.path, args.tool),
    };
    info!("{}", message);
    terminal.print(&message);
    Ok(0)
}

pub fn handle_xpr_files(
    args: &XprFilesArgs,
    session: &Session<'_>,
    terminal: &dyn Terminal,
) -> Result<i32, ForgeError> {
    let path = session.absolute(&args.xpr);
    let content = session
        .fs
        .read_to_string(&path)
        .map_err(|e| ForgeError::Filesystem(format!("{}: {}", path.display(), e)))?;
    let files = xpr::list_files(&content).map_err(|e| ForgeError::ProjectFile {
        path: path.clone(),
        message: format!("{:#}", e),
    })?;

    let output = OutputFormatter::new(args.format.into())
        .format_project_files(&files)
        .map_err(|e| ForgeError::Output(e.to_string()))?;
    terminal.print(output.trim_end());
    Ok(0)
}

pub fn handle_config(
    args: &ConfigArgs,
    session: &Session<'_>,
    terminal: &dyn Terminal,
) -> Result<i32, ForgeError> {
    let output = OutputFormatter::new(args.format.into())
        .format_config(&session.config)
        .map_err(|e| ForgeError::Output(e.to_string()))?;
    terminal.print(output.trim_end());
    Ok(0)
}
