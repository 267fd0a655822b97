//! Project registry: maps project names to their manifests
//!
//! ```toml
//! [projects]
//! blinky = "designs/blinky/project.toml"
//! uart = "designs/uart/project.toml"
//! ```
//!
//! Manifest paths are relative to the registry file.

use super::schema::DEFAULT_REPO_ENV;
use super::{ManifestLoader, ProjectManifest};
use crate::environment::Environment;
use crate::error::ManifestError;
use crate::fs::FileSystem;
use crate::paths::normalize;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_REGISTRY: &str = "hdlforge.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRegistry {
    #[serde(default)]
    projects: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRegistry {
    pub path: PathBuf,
    projects: BTreeMap<String, PathBuf>,
}

impl ProjectRegistry {
    /// Registry location: absolute paths as given, relative ones under the repository root
    pub fn locate(raw: &str, env: &Environment) -> Result<PathBuf, ManifestError> {
        let path = Path::new(raw);
        if path.is_absolute() {
            return Ok(normalize(path));
        }
        let root = env.require(DEFAULT_REPO_ENV)?;
        Ok(normalize(&Path::new(root).join(path)))
    }

    pub fn load(path: &Path, fs: &dyn FileSystem) -> Result<Self, ManifestError> {
        if !fs.is_file(path) {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }
        let content = fs.read_to_string(path).map_err(|e| ManifestError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self, ManifestError> {
        let raw: RawRegistry = toml::from_str(content).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("/"));
        let projects = raw
            .projects
            .into_iter()
            .map(|(name, manifest)| (name, normalize(&base.join(manifest))))
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            projects,
        })
    }

    pub fn names(&self) -> Vec<String> {
        self.projects.keys().cloned().collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.projects
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    pub fn manifest_path(&self, name: &str) -> Result<&Path, ManifestError> {
        self.projects
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| ManifestError::ProjectNotFound {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Load the named project, or the one rooted at the invocation directory
    pub fn select(
        &self,
        name: Option<&str>,
        loader: &ManifestLoader<'_>,
        env: &Environment,
        fs: &dyn FileSystem,
    ) -> Result<ProjectManifest, ManifestError> {
        if let Some(name) = name {
            return loader.load(self.manifest_path(name)?);
        }

        let cwd = normalize(env.cwd());
        let cwd = fs.canonicalize(&cwd).unwrap_or(cwd);
        for (name, path) in self.entries() {
            match loader.load(path) {
                Ok(manifest) if manifest.project_root == cwd => {
                    debug!(project = name, "selected project from invocation directory");
                    return Ok(manifest);
                }
                Ok(_) => {}
                Err(e) => warn!(project = name, error = %e, "skipping unloadable project"),
            }
        }
        Err(ManifestError::NoProjectForPath(cwd))
    }
}
