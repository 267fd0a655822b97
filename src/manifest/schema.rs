//! Raw manifest records as they appear in the TOML document
//!
//! Required keys are `Option` here so the loader can report them as
//! `MissingKey` instead of a generic parse failure. Unknown keys are rejected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_REPO_ENV: &str = "REPO_TOP";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    pub project_path: Option<String>,
    pub repo_path_env: Option<String>,
}

/// Tool family, decides which settings record a `<tool>_settings` block uses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ToolFamily {
    /// Project-mode synthesis driven through a generated Tcl script
    Vivado,
    /// Simulators and linters fed by an ordered source list file
    SourceList,
}

impl ToolFamily {
    /// Family implied by the tool name when the block does not set `family`
    pub fn for_tool(name: &str) -> Self {
        if name == "vivado" {
            ToolFamily::Vivado
        } else {
            ToolFamily::SourceList
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolFamily::Vivado => "vivado",
            ToolFamily::SourceList => "source-list",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawVivadoSettings {
    pub family: Option<ToolFamily>,
    pub build_dir: Option<String>,
    pub project_tcl: Option<String>,
    pub project_name: Option<String>,
    pub part: Option<String>,
    pub top_module: Option<String>,
    #[serde(default)]
    pub import_env: Vec<String>,
    #[serde(default)]
    pub generics: Vec<String>,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub code: Vec<String>,
    pub executable: Option<String>,
    pub compile_tcl: Option<String>,
    pub synth_flow: Option<String>,
    pub impl_flow: Option<String>,
    #[serde(default)]
    pub runs_flow: BTreeMap<String, RunFlow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawSourceListSettings {
    pub family: Option<ToolFamily>,
    pub build_dir: Option<String>,
    pub source_list: Option<String>,
    #[serde(default)]
    pub sim_targets: BTreeMap<String, SimTarget>,
}

/// Accepts either a single string or a list of strings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// A named synthesis/implementation strategy bundle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawRunFlow")]
pub struct RunFlow {
    pub synth_strategy: String,
    pub impl_strategies: Vec<String>,
    pub debug_probes: bool,
    pub parameters: Vec<String>,
    pub defines: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRunFlow {
    synth_strategy: String,
    impl_strategies: OneOrMany,
    #[serde(default)]
    debug_probes: bool,
    #[serde(default)]
    parameters: Vec<String>,
    #[serde(default)]
    defines: Vec<String>,
}

impl From<RawRunFlow> for RunFlow {
    fn from(raw: RawRunFlow) -> Self {
        Self {
            synth_strategy: raw.synth_strategy,
            impl_strategies: raw.impl_strategies.into_vec(),
            debug_probes: raw.debug_probes,
            parameters: raw.parameters,
            defines: raw.defines,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimTarget {
    pub top_module: String,
    pub python_file: Option<String>,
}

fn default_true() -> bool {
    true
}

/// One declared source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceEntry {
    pub path: String,
    #[serde(default)]
    pub tools: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fileset: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synth_only: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sim_only: bool,
    #[serde(default = "default_true")]
    pub relative: bool,
}

impl SourceEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tools: BTreeMap::new(),
            fileset: None,
            synth_only: false,
            sim_only: false,
            relative: true,
        }
    }

    pub fn is_active_for(&self, tool: &str) -> bool {
        self.tools.get(tool).copied().unwrap_or(false)
    }

    /// An entry no tool uses
    pub fn is_dead(&self) -> bool {
        !self.tools.values().any(|active| *active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_flow_single_impl_strategy() {
        let flow: RunFlow = toml::from_str(
            r#"
synth_strategy = "Flow_PerfOptimized_high"
impl_strategies = "Performance_Explore"
"#,
        )
        .unwrap();
        assert_eq!(flow.impl_strategies, vec!["Performance_Explore"]);
        assert!(!flow.debug_probes);
    }

    #[test]
    fn test_run_flow_rejects_unknown_key() {
        let result: Result<RunFlow, _> = toml::from_str(
            r#"
synth_strategy = "Flow_PerfOptimized_high"
impl_strategies = ["Performance_Explore"]
turbo = true
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_source_entry_defaults() {
        let entry: SourceEntry = toml::from_str(
            r#"
path = "rtl/top.vhd"
tools = { vivado = true, ghdl = false }
"#,
        )
        .unwrap();
        assert!(entry.relative);
        assert!(entry.is_active_for("vivado"));
        assert!(!entry.is_active_for("ghdl"));
        assert!(!entry.is_active_for("verilator"));
        assert!(!entry.is_dead());
    }

    #[test]
    fn test_dead_entry() {
        let mut entry = SourceEntry::new("old.vhd");
        assert!(entry.is_dead());
        entry.tools.insert("vivado".to_string(), false);
        assert!(entry.is_dead());
    }

    #[test]
    fn test_family_for_tool() {
        assert_eq!(ToolFamily::for_tool("vivado"), ToolFamily::Vivado);
        assert_eq!(ToolFamily::for_tool("ghdl"), ToolFamily::SourceList);
    }
}
