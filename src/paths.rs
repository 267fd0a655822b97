//! Path resolution: variable expansion, project-root joining and normalization

use crate::environment::Environment;
use crate::error::PathError;
use crate::fs::FileSystem;
use regex::Regex;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::trace;

/// What to do with `$VAR` references that are not set in the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedVarPolicy {
    #[default]
    Fail,
    Literal,
}

impl FromStr for UnresolvedVarPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "literal" => Ok(Self::Literal),
            other => Err(format!(
                "Invalid unresolved variable policy '{}'. Valid options: fail, literal",
                other
            )),
        }
    }
}

impl fmt::Display for UnresolvedVarPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Literal => write!(f, "literal"),
        }
    }
}

fn var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
            .expect("valid regex")
    })
}

pub struct PathResolver<'a> {
    env: &'a Environment,
    fs: &'a dyn FileSystem,
    policy: UnresolvedVarPolicy,
}

impl<'a> PathResolver<'a> {
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

    /// Replace `$VAR` and `${VAR}` references with their values
    pub fn expand(&self, raw: &str) -> Result<String, PathError> {
        let mut out = String::with_capacity(raw.len());
        let mut last = 0;

        for caps in var_pattern().captures_iter(raw) {
            let whole = caps.get(0).expect("group 0 always matches");
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();

            out.push_str(&raw[last..whole.start()]);
            match self.env.get(name) {
                Some(value) => out.push_str(value),
                None => match self.policy {
                    UnresolvedVarPolicy::Fail => {
                        return Err(PathError::UnresolvedVariable {
                            var: name.to_string(),
                            raw: raw.to_string(),
                        })
                    }
                    UnresolvedVarPolicy::Literal => out.push_str(whole.as_str()),
                },
            }
            last = whole.end();
        }
        out.push_str(&raw[last..]);

        Ok(out)
    }

    /// Expand, join relative paths onto `project_root`, then normalize.
    /// Existing paths are canonicalized so symlinks are followed.
    pub fn resolve(&self, raw: &str, project_root: &Path) -> Result<PathBuf, PathError> {
        let expanded = PathBuf::from(self.expand(raw)?);
        let joined = if expanded.is_absolute() {
            expanded
        } else {
            project_root.join(expanded)
        };
        let normalized = normalize(&joined);

        let resolved = if self.fs.exists(&normalized) {
            self.fs.canonicalize(&normalized).unwrap_or(normalized)
        } else {
            normalized
        };
        trace!(raw, resolved = %resolved.display(), "resolved path");
        Ok(resolved)
    }

    /// Resolve a directory that must exist as a root (repository root)
    pub fn resolve_root(&self, raw: &str) -> Result<PathBuf, PathError> {
        self.resolve(raw, self.env.cwd())
    }
}

/// Collapse `.` and `..` without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !path.is_absolute() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Fail unless `path` lies underneath (or is) `root`
pub fn ensure_within(path: &Path, root: &Path) -> Result<(), PathError> {
    if normalize(path).starts_with(normalize(root)) {
        Ok(())
    } else {
        Err(PathError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })
    }
}

/// Fail unless `dir` can be emptied safely: strictly underneath `root` and
/// not an ancestor of `keep`
pub fn ensure_disposable(dir: &Path, root: &Path, keep: &Path) -> Result<(), PathError> {
    ensure_within(dir, root)?;

    let dir = normalize(dir);
    for inner in [root, keep] {
        if normalize(inner).starts_with(&dir) {
            return Err(PathError::Encloses {
                path: dir,
                inner: inner.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Render `path` with the repository root replaced by `$<var>`
pub fn with_repo_var(path: &Path, repo_root: &Path, var: &str) -> String {
    match path.strip_prefix(repo_root) {
        Ok(rest) if rest.as_os_str().is_empty() => format!("${}", var),
        Ok(rest) => format!("${}/{}", var, rest.display()),
        Err(_) => path.display().to_string(),
    }
}
