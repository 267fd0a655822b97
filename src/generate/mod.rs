//! Build artifact generation
//!
//! Rendering is pure; [`write_artifact`] is the only place that touches the
//! filesystem. Output depends on nothing but the manifest and the resolved
//! source set, so regenerating an unchanged project gives identical bytes.

pub mod source_list;
pub mod tcl;

use crate::error::GenerationError;
use crate::fs::FileSystem;
use crate::manifest::{FamilySettings, ProjectManifest, ToolSettings};
use crate::sources::ResolvedSourceSet;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use source_list::render_source_list;
pub use tcl::VivadoScript;

/// Rendered artifact and where it belongs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
}

impl Artifact {
    pub fn digest(&self) -> String {
        digest(&self.content)
    }
}

pub fn render(
    manifest: &ProjectManifest,
    tool: &ToolSettings,
    sources: &ResolvedSourceSet,
) -> Artifact {
    let content = match &tool.family {
        FamilySettings::Vivado(settings) => {
            VivadoScript::new(settings, sources, &manifest.repo_root, &manifest.repo_env).render()
        }
        FamilySettings::SourceList(_) => {
            render_source_list(sources, &manifest.repo_root, &manifest.repo_env)
        }
    };
    Artifact {
        path: tool.output_path().to_path_buf(),
        content,
    }
}

/// Write the artifact, creating parent directories as needed
pub fn write_artifact(fs: &dyn FileSystem, artifact: &Artifact) -> Result<(), GenerationError> {
    let io = |e: anyhow::Error| GenerationError::Io {
        path: artifact.path.clone(),
        message: e.to_string(),
    };

    if let Some(parent) = artifact.path.parent() {
        fs.create_dir_all(parent).map_err(io)?;
    }
    fs.write(&artifact.path, &artifact.content).map_err(io)?;

    info!(
        "Generated {} ({} bytes, sha256 {})",
        artifact.path.display(),
        artifact.content.len(),
        &artifact.digest()[..12]
    );
    Ok(())
}

/// Whether the artifact on disk matches the rendered one
pub fn is_up_to_date(fs: &dyn FileSystem, artifact: &Artifact) -> bool {
    let on_disk = match fs.read_to_string(&artifact.path) {
        Ok(content) => digest(&content),
        Err(_) => return false,
    };
    let fresh = artifact.digest();
    debug!(path = %artifact.path.display(), on_disk, fresh, "compared artifact digests");
    on_disk == fresh
}

pub fn digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Remove and recreate a build directory
pub fn reset_dir(fs: &dyn FileSystem, dir: &Path) -> Result<(), GenerationError> {
    let io = |e: anyhow::Error| GenerationError::Io {
        path: dir.to_path_buf(),
        message: e.to_string(),
    };
    if fs.exists(dir) {
        fs.remove_dir_all(dir).map_err(io)?;
    }
    fs.create_dir_all(dir).map_err(io)
}
