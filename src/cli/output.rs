//! Output formatting for listings
//!
//! Every listing renders as JSON, YAML or a human-readable table. Paths in
//! the human form are shown relative to the repository variable.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::HdlforgeConfig;
use crate::paths::with_repo_var;
use crate::sources::ResolvedSourceSet;
use crate::xpr::ProjectFile;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Machine-readable
    Json,
    Yaml,
    Human,
}

/// One registry row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub manifest: PathBuf,
    pub exists: bool,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_sources(
        &self,
        sources: &ResolvedSourceSet,
        repo_root: &Path,
        repo_env: &str,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(sources).context("Failed to serialize sources to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(sources).context("Failed to serialize sources to YAML")
            }
            OutputFormat::Human => Ok(self.sources_human(sources, repo_root, repo_env)),
        }
    }

    pub fn format_projects(&self, projects: &[ProjectSummary]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(projects)
                .context("Failed to serialize projects to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(projects).context("Failed to serialize projects to YAML")
            }
            OutputFormat::Human => Ok(self.projects_human(projects)),
        }
    }

    pub fn format_project_files(&self, files: &[ProjectFile]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(files)
                .context("Failed to serialize project files to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(files).context("Failed to serialize project files to YAML")
            }
            OutputFormat::Human => Ok(self.project_files_human(files)),
        }
    }

    pub fn format_config(&self, config: &HdlforgeConfig) -> Result<String> {
        let config_map: BTreeMap<String, String> = config.to_display_map();
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config_map)
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&config_map).context("Failed to serialize config to YAML")
            }
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn sources_human(&self, sources: &ResolvedSourceSet, repo_root: &Path, repo_env: &str) -> String {
        let mut output = format!("Sources for {} ({})\n{}\n", sources.tool, sources.len(), RULE);

        if sources.is_empty() {
            output.push_str("(none)\n");
            return output;
        }

        for source in sources.iter() {
            let mut flags = Vec::new();
            if let Some(ref fileset) = source.fileset {
                flags.push(format!("fileset={}", fileset));
            }
            if source.synth_only {
                flags.push("synth-only".to_string());
            }
            if source.sim_only {
                flags.push("sim-only".to_string());
            }

            output.push_str(&format!(
                "{:<15} {}",
                source.kind.as_str(),
                with_repo_var(&source.path, repo_root, repo_env)
            ));
            if !flags.is_empty() {
                output.push_str(&format!("  [{}]", flags.join(", ")));
            }
            output.push('\n');
        }
        output
    }

    fn projects_human(&self, projects: &[ProjectSummary]) -> String {
        let mut output = format!("Projects\n{}\n", RULE);
        if projects.is_empty() {
            output.push_str("(none)\n");
            return output;
        }

        let width = projects.iter().map(|p| p.name.len()).max().unwrap_or(0);
        for project in projects {
            let marker = if project.exists { "\u{2713}" } else { "\u{2717}" };
            output.push_str(&format!(
                "{} {:<width$}  {}\n",
                marker,
                project.name,
                project.manifest.display(),
                width = width
            ));
        }
        output
    }

    fn project_files_human(&self, files: &[ProjectFile]) -> String {
        let mut output = format!("{:<30} {:<8} {:<12} {}\n", "Name", "Ext", "Fileset", "Path");
        for file in files {
            output.push_str(&format!(
                "{:<30} {:<8} {:<12} {}\n",
                file.name,
                file.extension,
                file.fileset.as_deref().unwrap_or("-"),
                file.path
            ));
        }
        output
    }
}
