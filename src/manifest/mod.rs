//! Project manifest loading and validation
//!
//! A manifest is a TOML document with a `[settings]` table, one
//! `[<tool>_settings]` table per tool and a `[[sources]]` array. Loading
//! resolves every project and build path against the repository root taken
//! from the environment, and rejects paths that escape it.
//!
//! ```no_run
//! use hdlforge::environment::Environment;
//! use hdlforge::fs::RealFileSystem;
//! use hdlforge::manifest::ProjectManifest;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let env = Environment::from_process()?;
//! let manifest = ProjectManifest::load(Path::new("blinky.toml"), &env, &RealFileSystem)?;
//! let vivado = manifest.tool("vivado")?;
//! println!("build dir: {}", vivado.build_dir.display());
//! # Ok(())
//! # }
//! ```

pub mod edit;
pub mod registry;
pub mod schema;

pub use schema::{RunFlow, SimTarget, SourceEntry, ToolFamily};

use crate::environment::Environment;
use crate::error::{ManifestError, PathError};
use crate::fs::FileSystem;
use crate::paths::{ensure_disposable, ensure_within, PathResolver, UnresolvedVarPolicy};
use crate::strategies;
use schema::{RawSettings, RawSourceListSettings, RawVivadoSettings, DEFAULT_REPO_ENV};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct VivadoSettings {
    pub project_tcl: PathBuf,
    pub project_name: String,
    pub part: String,
    pub top_module: String,
    pub import_env: Vec<String>,
    pub generics: Vec<String>,
    pub defines: Vec<String>,
    pub code: Vec<String>,
    pub executable: String,
    pub compile_tcl: PathBuf,
    pub synth_flow: String,
    pub impl_flow: String,
    pub runs_flow: BTreeMap<String, RunFlow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceListSettings {
    pub source_list: PathBuf,
    pub sim_targets: BTreeMap<String, SimTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FamilySettings {
    Vivado(VivadoSettings),
    SourceList(SourceListSettings),
}

/// Validated settings of one tool, paths already absolute
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub name: String,
    pub build_dir: PathBuf,
    pub family: FamilySettings,
}

impl ToolSettings {
    pub fn family_kind(&self) -> ToolFamily {
        match self.family {
            FamilySettings::Vivado(_) => ToolFamily::Vivado,
            FamilySettings::SourceList(_) => ToolFamily::SourceList,
        }
    }

    /// Where the generated artifact is written
    pub fn output_path(&self) -> &Path {
        match &self.family {
            FamilySettings::Vivado(v) => &v.project_tcl,
            FamilySettings::SourceList(s) => &s.source_list,
        }
    }

    pub fn vivado(&self) -> Option<&VivadoSettings> {
        match &self.family {
            FamilySettings::Vivado(v) => Some(v),
            FamilySettings::SourceList(_) => None,
        }
    }

    /// Vivado project file inside the build directory
    pub fn project_file(&self) -> Option<PathBuf> {
        self.vivado()
            .map(|v| self.build_dir.join(format!("{}.xpr", v.project_name)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectManifest {
    pub path: PathBuf,
    pub repo_env: String,
    pub repo_root: PathBuf,
    pub project_root: PathBuf,
    pub sources: Vec<SourceEntry>,
    tools: BTreeMap<String, ToolSettings>,
}

impl ProjectManifest {
    pub fn load(
        path: &Path,
        env: &Environment,
        fs: &dyn FileSystem,
    ) -> Result<Self, ManifestError> {
        ManifestLoader::new(env, fs).load(path)
    }

    /// Settings block for `name`, failing when the manifest has none
    pub fn tool(&self, name: &str) -> Result<&ToolSettings, ManifestError> {
        self.tools.get(name).ok_or_else(|| ManifestError::MissingKey {
            section: "manifest".to_string(),
            key: format!("{}_settings", name),
        })
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }
}

pub struct ManifestLoader<'a> {
    env: &'a Environment,
    fs: &'a dyn FileSystem,
    policy: UnresolvedVarPolicy,
}

impl<'a> ManifestLoader<'a> {
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

    pub fn load(&self, path: &Path) -> Result<ProjectManifest, ManifestError> {
        if !self.fs.is_file(path) {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| ManifestError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        self.parse(path, &content)
    }

    pub fn parse(&self, path: &Path, content: &str) -> Result<ProjectManifest, ManifestError> {
        let mut document: toml::Table = toml::from_str(content).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let settings: RawSettings = match document.remove("settings") {
            Some(value) => decode(path, "settings", value)?,
            None => return Err(missing("manifest", "settings")),
        };
        let project_path = required(settings.project_path, "settings", "project_path")?;
        let repo_env = settings
            .repo_path_env
            .unwrap_or_else(|| DEFAULT_REPO_ENV.to_string());

        let resolver = PathResolver::new(self.env, self.fs).with_policy(self.policy);
        let repo_root = resolver.resolve_root(self.env.require(&repo_env)?)?;
        let project_root = resolver.resolve(&project_path, &repo_root)?;
        contained(&project_root, &repo_root)?;

        let sources: Vec<SourceEntry> = match document.remove("sources") {
            Some(value) => decode(path, "sources", value)?,
            None => Vec::new(),
        };
        for entry in sources.iter().filter(|e| e.is_dead()) {
            debug!(source = %entry.path, "source entry is not active for any tool");
        }

        let context = ToolContext {
            manifest: path,
            resolver: &resolver,
            repo_env: &repo_env,
            repo_root: &repo_root,
            project_root: &project_root,
        };
        let mut tools = BTreeMap::new();
        for (key, value) in document {
            match key.strip_suffix("_settings") {
                Some(name) if !name.is_empty() => {
                    let tool = context.tool_settings(name, value)?;
                    tools.insert(name.to_string(), tool);
                }
                _ => warn!(section = %key, "ignoring unknown manifest section"),
            }
        }

        info!(
            manifest = %path.display(),
            project_root = %project_root.display(),
            tools = tools.len(),
            sources = sources.len(),
            "loaded project manifest"
        );

        Ok(ProjectManifest {
            path: path.to_path_buf(),
            repo_env,
            repo_root,
            project_root,
            sources,
            tools,
        })
    }
}

struct ToolContext<'a> {
    manifest: &'a Path,
    resolver: &'a PathResolver<'a>,
    repo_env: &'a str,
    repo_root: &'a Path,
    project_root: &'a Path,
}

impl ToolContext<'_> {
    fn tool_settings(&self, name: &str, value: toml::Value) -> Result<ToolSettings, ManifestError> {
        let section = format!("{}_settings", name);
        let family = match value.get("family").cloned() {
            Some(family) => decode::<ToolFamily>(self.manifest, &section, family)?,
            None => ToolFamily::for_tool(name),
        };

        match family {
            ToolFamily::Vivado => {
                let raw: RawVivadoSettings = decode(self.manifest, &section, value)?;
                self.vivado(name, &section, raw)
            }
            ToolFamily::SourceList => {
                let raw: RawSourceListSettings = decode(self.manifest, &section, value)?;
                self.source_list(name, &section, raw)
            }
        }
    }

    fn vivado(
        &self,
        name: &str,
        section: &str,
        raw: RawVivadoSettings,
    ) -> Result<ToolSettings, ManifestError> {
        let build_dir = self.build_dir(&required(raw.build_dir, section, "build_dir")?)?;
        let project_tcl = self.owned_path(&required(raw.project_tcl, section, "project_tcl")?)?;
        let part = required(raw.part, section, "part")?;
        let top_module = required(raw.top_module, section, "top_module")?;
        let project_name = raw
            .project_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| top_module.clone());

        let compile_tcl = raw
            .compile_tcl
            .unwrap_or_else(|| format!("${{{}}}/tools/project_setup/compile.tcl", self.repo_env));
        let compile_tcl = self.resolver.resolve(&compile_tcl, self.project_root)?;

        validate_run_flows(name, &raw.runs_flow)?;
        validate_import_env(name, &raw.import_env)?;

        Ok(ToolSettings {
            name: name.to_string(),
            build_dir,
            family: FamilySettings::Vivado(VivadoSettings {
                project_tcl,
                project_name,
                part,
                top_module,
                import_env: raw.import_env,
                generics: raw.generics,
                defines: raw.defines,
                code: raw.code,
                executable: raw.executable.unwrap_or_else(|| "vivado".to_string()),
                compile_tcl,
                synth_flow: raw
                    .synth_flow
                    .unwrap_or_else(|| strategies::DEFAULT_SYNTH_FLOW.to_string()),
                impl_flow: raw
                    .impl_flow
                    .unwrap_or_else(|| strategies::DEFAULT_IMPL_FLOW.to_string()),
                runs_flow: raw.runs_flow,
            }),
        })
    }

    fn source_list(
        &self,
        name: &str,
        section: &str,
        raw: RawSourceListSettings,
    ) -> Result<ToolSettings, ManifestError> {
        let build_dir = self.build_dir(&required(raw.build_dir, section, "build_dir")?)?;
        let source_list = match raw.source_list {
            Some(list) => self.owned_path(&list)?,
            None => build_dir.join(format!("{}_sources.f", name)),
        };

        Ok(ToolSettings {
            name: name.to_string(),
            build_dir,
            family: FamilySettings::SourceList(SourceListSettings {
                source_list,
                sim_targets: raw.sim_targets,
            }),
        })
    }

    /// Resolve a build directory; it is emptied by `create` and `clean`, so it
    /// must not be the repository root or enclose the project
    fn build_dir(&self, raw: &str) -> Result<PathBuf, ManifestError> {
        let resolved = self.owned_path(raw)?;
        ensure_disposable(&resolved, self.repo_root, self.project_root).map_err(invalid_path)?;
        Ok(resolved)
    }

    /// Resolve a path the engine writes to or deletes; it must stay in the repository
    fn owned_path(&self, raw: &str) -> Result<PathBuf, ManifestError> {
        let resolved = self.resolver.resolve(raw, self.project_root)?;
        contained(&resolved, self.repo_root)?;
        Ok(resolved)
    }
}

/// Imported names become Tcl variables, so they must be plain identifiers
fn validate_import_env(tool: &str, vars: &[String]) -> Result<(), ManifestError> {
    let is_identifier = |name: &str| {
        let mut chars = name.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    match vars.iter().find(|v| !is_identifier(v)) {
        Some(bad) => Err(ManifestError::Invalid(format!(
            "import_env entry '{}' of tool '{}' is not a valid variable name",
            bad, tool
        ))),
        None => Ok(()),
    }
}

fn validate_run_flows(tool: &str, flows: &BTreeMap<String, RunFlow>) -> Result<(), ManifestError> {
    for (name, flow) in flows {
        if name.contains(strategies::DEFAULT_SYNTH_RUN) {
            return Err(ManifestError::Invalid(format!(
                "run flow '{}' of tool '{}' collides with the default run '{}'",
                name,
                tool,
                strategies::DEFAULT_SYNTH_RUN
            )));
        }
        if flow.impl_strategies.is_empty() {
            return Err(ManifestError::Invalid(format!(
                "run flow '{}' of tool '{}' needs at least one implementation strategy",
                name, tool
            )));
        }

        if !strategies::is_known_synth(&flow.synth_strategy) {
            warn!(
                flow = %name,
                strategy = %flow.synth_strategy,
                suggestion = ?strategies::suggest(&flow.synth_strategy, strategies::SYNTH_STRATEGIES),
                "unknown synthesis strategy"
            );
        }
        for strategy in flow.impl_strategies.iter().filter(|s| !strategies::is_known_impl(s)) {
            warn!(
                flow = %name,
                strategy = %strategy,
                suggestion = ?strategies::suggest(strategy, strategies::IMPL_STRATEGIES),
                "unknown implementation strategy"
            );
        }
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(
    path: &Path,
    section: &str,
    value: toml::Value,
) -> Result<T, ManifestError> {
    value.try_into().map_err(|e: toml::de::Error| ManifestError::Parse {
        path: path.to_path_buf(),
        message: format!("[{}] {}", section, e.message()),
    })
}

fn required(value: Option<String>, section: &str, key: &str) -> Result<String, ManifestError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(section, key))
}

fn missing(section: &str, key: &str) -> ManifestError {
    ManifestError::MissingKey {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn contained(path: &Path, root: &Path) -> Result<(), ManifestError> {
    ensure_within(path, root).map_err(invalid_path)
}

fn invalid_path(e: PathError) -> ManifestError {
    match e {
        PathError::OutsideRoot { path, root } => ManifestError::InvalidPath {
            path,
            root,
            reason: "is not under",
        },
        PathError::Encloses { path, inner } => ManifestError::InvalidPath {
            path,
            root: inner,
            reason: "is or contains",
        },
        other => ManifestError::Path(other),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    pub(crate) const BLINKY: &str = r#"
[settings]
project_path = "designs/blinky"

[vivado_settings]
build_dir = "build/vivado"
project_tcl = "build/vivado/create_project.tcl"
project_name = "blinky"
part = "xc7a35tcpg236-1"
top_module = "top"
generics = ["G_WIDTH=8"]

[vivado_settings.runs_flow.fast]
synth_strategy = "Flow_RuntimeOptimized"
impl_strategies = ["Flow_Quick"]

[vivado_settings.runs_flow.timing]
synth_strategy = "Flow_PerfOptimized_high"
impl_strategies = ["Performance_Explore", "Performance_ExtraTimingOpt"]
parameters = ["G_WIDTH=16"]

[ghdl_settings]
build_dir = "build/ghdl"

[[sources]]
path = "rtl/counter.vhd"
tools = { vivado = true, ghdl = true }

[[sources]]
path = "rtl/top.vhd"
tools = { vivado = true }

[[sources]]
path = "tb/top_tb.vhd"
tools = { ghdl = true }
"#;

    pub(crate) fn env() -> Environment {
        Environment::new("/repo").with_var("REPO_TOP", "/repo")
    }

    pub(crate) fn blinky_fs() -> MockFileSystem {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("designs/blinky/project.toml", BLINKY);
        fs.add_file("designs/blinky/rtl/counter.vhd", "");
        fs.add_file("designs/blinky/rtl/top.vhd", "");
        fs.add_file("designs/blinky/tb/top_tb.vhd", "");
        fs
    }

    fn parse(content: &str) -> Result<ProjectManifest, ManifestError> {
        let env = env();
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        ManifestLoader::new(&env, &fs).parse(Path::new("/repo/project.toml"), content)
    }

    #[test]
    fn test_load_blinky() {
        let env = env();
        let fs = blinky_fs();
        let manifest =
            ProjectManifest::load(Path::new("/repo/designs/blinky/project.toml"), &env, &fs)
                .unwrap();

        assert_eq!(manifest.repo_root, PathBuf::from("/repo"));
        assert_eq!(manifest.project_root, PathBuf::from("/repo/designs/blinky"));
        assert_eq!(manifest.sources.len(), 3);
        assert_eq!(manifest.tool_names().collect::<Vec<_>>(), vec!["ghdl", "vivado"]);

        let vivado = manifest.tool("vivado").unwrap();
        assert_eq!(vivado.family_kind(), ToolFamily::Vivado);
        assert_eq!(vivado.build_dir, PathBuf::from("/repo/designs/blinky/build/vivado"));
        let settings = vivado.vivado().unwrap();
        assert_eq!(settings.project_name, "blinky");
        assert_eq!(settings.executable, "vivado");
        assert_eq!(
            settings.compile_tcl,
            PathBuf::from("/repo/tools/project_setup/compile.tcl")
        );
        assert_eq!(settings.runs_flow.len(), 2);
        assert_eq!(
            vivado.project_file(),
            Some(PathBuf::from("/repo/designs/blinky/build/vivado/blinky.xpr"))
        );

        let ghdl = manifest.tool("ghdl").unwrap();
        assert_eq!(ghdl.family_kind(), ToolFamily::SourceList);
        assert_eq!(
            ghdl.output_path(),
            Path::new("/repo/designs/blinky/build/ghdl/ghdl_sources.f")
        );
    }

    #[test]
    fn test_not_found() {
        let env = env();
        let fs = MockFileSystem::new();
        let result = ProjectManifest::load(Path::new("/repo/missing.toml"), &env, &fs);
        assert!(matches!(result, Err(ManifestError::NotFound(_))));
    }

    #[test]
    fn test_missing_project_path() {
        let result = parse("[settings]\nrepo_path_env = \"REPO_TOP\"\n");
        assert!(matches!(
            result,
            Err(ManifestError::MissingKey { ref section, ref key })
                if section == "settings" && key == "project_path"
        ));
    }

    #[test]
    fn test_missing_settings_table() {
        let result = parse("[vivado_settings]\nbuild_dir = \"b\"\n");
        assert!(matches!(result, Err(ManifestError::MissingKey { ref key, .. }) if key == "settings"));
    }

    #[test]
    fn test_missing_tool_block() {
        let manifest = parse("[settings]\nproject_path = \"p\"\n").unwrap();
        let err = manifest.tool("vivado").unwrap_err();
        assert!(matches!(err, ManifestError::MissingKey { ref key, .. } if key == "vivado_settings"));
    }

    #[test]
    fn test_missing_part() {
        let result = parse(
            r#"
[settings]
project_path = "p"

[vivado_settings]
build_dir = "build"
project_tcl = "build/p.tcl"
top_module = "top"
"#,
        );
        assert!(matches!(result, Err(ManifestError::MissingKey { ref key, .. }) if key == "part"));
    }

    #[test]
    fn test_repo_env_not_set() {
        let env = Environment::new("/repo");
        let fs = MockFileSystem::new();
        let result = ManifestLoader::new(&env, &fs)
            .parse(Path::new("/repo/p.toml"), "[settings]\nproject_path = \"p\"\n");
        assert!(matches!(
            result,
            Err(ManifestError::Path(PathError::EnvNotSet(ref name))) if name == "REPO_TOP"
        ));
    }

    #[test]
    fn test_custom_repo_env() {
        let env = Environment::new("/work").with_var("MY_ROOT", "/work/repo");
        let fs = MockFileSystem::new();
        let manifest = ManifestLoader::new(&env, &fs)
            .parse(
                Path::new("/work/repo/p.toml"),
                "[settings]\nproject_path = \"p\"\nrepo_path_env = \"MY_ROOT\"\n",
            )
            .unwrap();
        assert_eq!(manifest.repo_env, "MY_ROOT");
        assert_eq!(manifest.project_root, PathBuf::from("/work/repo/p"));
    }

    #[test]
    fn test_project_outside_repo() {
        let result = parse("[settings]\nproject_path = \"../elsewhere\"\n");
        assert!(matches!(result, Err(ManifestError::InvalidPath { .. })));
    }

    #[test]
    fn test_build_dir_outside_repo() {
        let result = parse(
            r#"
[settings]
project_path = "p"

[ghdl_settings]
build_dir = "/tmp/ghdl"
"#,
        );
        match result {
            Err(ManifestError::InvalidPath { path, root, .. }) => {
                assert_eq!(path, PathBuf::from("/tmp/ghdl"));
                assert_eq!(root, PathBuf::from("/repo"));
            }
            other => panic!("Expected InvalidPath, got {:?}", other),
        }
    }

    #[test]
    fn test_build_dir_at_repo_root() {
        let result = parse(
            r#"
[settings]
project_path = "designs/blinky"

[ghdl_settings]
build_dir = "$REPO_TOP"
"#,
        );
        match result {
            Err(ManifestError::InvalidPath { path, root, .. }) => {
                assert_eq!(path, PathBuf::from("/repo"));
                assert_eq!(root, PathBuf::from("/repo"));
            }
            other => panic!("Expected InvalidPath, got {:?}", other),
        }
    }

    #[test]
    fn test_build_dir_enclosing_project() {
        let result = parse(
            r#"
[settings]
project_path = "designs/blinky"

[vivado_settings]
build_dir = ".."
project_name = "blinky"
part = "xc7a35t"
"#,
        );
        match result {
            Err(ManifestError::InvalidPath { path, root, .. }) => {
                assert_eq!(path, PathBuf::from("/repo/designs"));
                assert_eq!(root, PathBuf::from("/repo/designs/blinky"));
            }
            other => panic!("Expected InvalidPath, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_key_in_tool_block_rejected() {
        let result = parse(
            r#"
[settings]
project_path = "p"

[ghdl_settings]
build_dir = "build"
part = "xc7a35t"
"#,
        );
        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }

    #[test]
    fn test_explicit_family() {
        let manifest = parse(
            r#"
[settings]
project_path = "p"

[vivado_ml_settings]
family = "vivado"
build_dir = "build"
project_tcl = "build/p.tcl"
part = "xcu250"
top_module = "top"
"#,
        )
        .unwrap();
        let tool = manifest.tool("vivado_ml").unwrap();
        assert_eq!(tool.family_kind(), ToolFamily::Vivado);
        assert_eq!(tool.vivado().unwrap().project_name, "top");
    }

    #[test]
    fn test_run_flow_named_like_default_run() {
        let result = parse(
            r#"
[settings]
project_path = "p"

[vivado_settings]
build_dir = "build"
project_tcl = "build/p.tcl"
part = "xc7a35t"
top_module = "top"

[vivado_settings.runs_flow.synth_1]
synth_strategy = "Flow_RuntimeOptimized"
impl_strategies = ["Flow_Quick"]
"#,
        );
        assert!(matches!(result, Err(ManifestError::Invalid(_))));
    }

    #[yare::parameterized(
        spaces = { "BOARD ID" },
        tcl_command = { "X]; exec rm -rf /; set Y[" },
        leading_digit = { "1BOARD" },
        dollar = { "$BOARD" },
        empty = { "" },
    )]
    fn test_import_env_must_be_identifier(name: &str) {
        let manifest = format!(
            r#"
[settings]
project_path = "p"

[vivado_settings]
build_dir = "build"
project_tcl = "build/p.tcl"
part = "xc7a35t"
top_module = "top"
import_env = ["BOARD_ID", {:?}]
"#,
            name
        );
        match parse(&manifest) {
            Err(ManifestError::Invalid(message)) => assert!(message.contains("import_env")),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_import_env_identifiers_accepted() {
        let manifest = parse(
            r#"
[settings]
project_path = "p"

[vivado_settings]
build_dir = "build"
project_tcl = "build/p.tcl"
part = "xc7a35t"
top_module = "top"
import_env = ["BOARD_ID", "_xilinx_local2"]
"#,
        )
        .unwrap();
        let vivado = manifest.tool("vivado").unwrap().vivado().unwrap();
        assert_eq!(vivado.import_env, vec!["BOARD_ID", "_xilinx_local2"]);
    }

    #[test]
    fn test_unknown_top_level_section_is_ignored() {
        let manifest = parse("[settings]\nproject_path = \"p\"\n\n[docker]\nimage = \"x\"\n").unwrap();
        assert_eq!(manifest.tool_names().count(), 0);
    }
}
