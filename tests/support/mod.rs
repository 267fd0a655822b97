//! Shared fixtures for integration tests: a throwaway repository on disk
#![allow(dead_code)]

use hdlforge::Environment;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const BLINKY_MANIFEST: &str = r#"
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

[[sources]]
path = "rtl/legacy.v"
tools = { vivado = false }
"#;

pub const REGISTRY: &str = r#"
[projects]
blinky = "designs/blinky/project.toml"
"#;

pub struct TestRepo {
    _dir: TempDir,
    root: PathBuf,
}

impl TestRepo {
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir");
        Self { _dir: dir, root }
    }

    /// Registry plus the blinky design with all of its source files
    pub fn blinky() -> Self {
        let repo = Self::empty();
        repo.write("hdlforge.toml", REGISTRY);
        repo.write("designs/blinky/project.toml", BLINKY_MANIFEST);
        repo.write("designs/blinky/rtl/counter.vhd", "entity counter is end;\n");
        repo.write("designs/blinky/rtl/top.vhd", "entity top is end;\n");
        repo.write("designs/blinky/tb/top_tb.vhd", "entity top_tb is end;\n");
        repo
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).expect("Failed to read file")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path("designs/blinky/project.toml")
    }

    /// Environment as seen from the repository root with `REPO_TOP` set
    pub fn env(&self) -> Environment {
        Environment::new(&self.root).with_var("REPO_TOP", self.root.display().to_string())
    }
}
