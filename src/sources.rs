//! Per-tool source set resolution

use crate::environment::Environment;
use crate::error::SourceError;
use crate::fs::FileSystem;
use crate::manifest::{ProjectManifest, SourceEntry};
use crate::paths::{ensure_within, normalize, PathResolver, UnresolvedVarPolicy};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    Vhdl,
    Verilog,
    SystemVerilog,
    Constraint,
    Ip,
    Script,
    Unknown,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("vhd") | Some("vhdl") => FileKind::Vhdl,
            Some("v") => FileKind::Verilog,
            Some("sv") => FileKind::SystemVerilog,
            Some("xdc") => FileKind::Constraint,
            Some("xci") | Some("xcix") => FileKind::Ip,
            Some("tcl") => FileKind::Script,
            _ => FileKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Vhdl => "vhdl",
            FileKind::Verilog => "verilog",
            FileKind::SystemVerilog => "system-verilog",
            FileKind::Constraint => "constraint",
            FileKind::Ip => "ip",
            FileKind::Script => "script",
            FileKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSource {
    pub path: PathBuf,
    pub kind: FileKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fileset: Option<String>,
    pub synth_only: bool,
    pub sim_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSourceSet {
    pub tool: String,
    pub sources: Vec<ResolvedSource>,
}

impl ResolvedSourceSet {
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedSource> {
        self.sources.iter()
    }

    pub fn paths(&self) -> Vec<&Path> {
        self.sources.iter().map(|s| s.path.as_path()).collect()
    }
}

pub struct SourceResolver<'a> {
    env: &'a Environment,
    fs: &'a dyn FileSystem,
    policy: UnresolvedVarPolicy,
}

impl<'a> SourceResolver<'a> {
    pub fn new(env: &'a Environment, fs: &'a dyn FileSystem) -> Self {
        Self {
            env,
            fs,
            policy: UnresolvedVarPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnresolvedVarPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ordered, existence-checked sources active for `tool`
    pub fn resolve_for_tool(
        &self,
        manifest: &ProjectManifest,
        tool: &str,
    ) -> Result<ResolvedSourceSet, SourceError> {
        let resolver = PathResolver::new(self.env, self.fs).with_policy(self.policy);
        let mut sources = Vec::new();

        for entry in manifest.sources.iter().filter(|e| e.is_active_for(tool)) {
            let path = self.resolve_entry(&resolver, entry, &manifest.project_root)?;
            if !self.fs.is_file(&path) {
                return Err(SourceError::SourceFileMissing {
                    tool: tool.to_string(),
                    path,
                });
            }

            let kind = FileKind::from_path(&path);
            if kind == FileKind::Unknown {
                warn!(tool, path = %path.display(), "unrecognized source file extension");
            }
            sources.push(ResolvedSource {
                path,
                kind,
                fileset: entry.fileset.clone(),
                synth_only: entry.synth_only,
                sim_only: entry.sim_only,
            });
        }

        if sources.is_empty() {
            return Err(SourceError::EmptySourceSet(tool.to_string()));
        }
        debug!(tool, count = sources.len(), "resolved source set");

        Ok(ResolvedSourceSet {
            tool: tool.to_string(),
            sources,
        })
    }

    fn resolve_entry(
        &self,
        resolver: &PathResolver<'_>,
        entry: &SourceEntry,
        project_root: &Path,
    ) -> Result<PathBuf, SourceError> {
        let wrap = |source| SourceError::Path {
            raw: entry.path.clone(),
            source,
        };

        if entry.relative {
            // `relative` entries are always taken under the project root
            let expanded = resolver.expand(&entry.path).map_err(wrap)?;
            let trimmed = expanded.trim_start_matches('/');
            ensure_within(&normalize(&project_root.join(trimmed)), project_root).map_err(wrap)?;
            // Checked again after symlinks are followed
            let resolved = resolver.resolve(trimmed, project_root).map_err(wrap)?;
            ensure_within(&resolved, project_root).map_err(wrap)?;
            Ok(resolved)
        } else {
            resolver.resolve(&entry.path, project_root).map_err(wrap)
        }
    }
}

/// Convenience wrapper with the default policy
pub fn resolve_for_tool(
    manifest: &ProjectManifest,
    tool: &str,
    env: &Environment,
    fs: &dyn FileSystem,
) -> Result<ResolvedSourceSet, SourceError> {
    SourceResolver::new(env, fs).resolve_for_tool(manifest, tool)
}
