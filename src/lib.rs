//! hdlforge - build orchestration for multi-toolchain HDL projects
//!
//! A TOML manifest lists a project's sources once and says which tools
//! (Vivado, simulators, linters) use each file. hdlforge resolves the
//! per-tool source set, renders a Vivado project script or an ordered source
//! list, and drives the `create` / `synth` / `impl` / `bit` steps.
//!
//! # Core Concepts
//!
//! - **Manifest**: `[settings]`, one `[<tool>_settings]` table per tool and
//!   the `[[sources]]` array
//! - **Source set**: the ordered, existence-checked files a tool uses
//! - **Run flow**: a named synthesis strategy plus implementation strategies
//! - **Pipeline**: the step state machine, from `idle` to `executed`
//!
//! # Example Usage
//!
//! ```no_run
//! use hdlforge::{Environment, ProjectManifest};
//! use hdlforge::fs::RealFileSystem;
//! use hdlforge::sources::resolve_for_tool;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let env = Environment::from_process()?;
//! let fs = RealFileSystem::new();
//! let manifest = ProjectManifest::load(Path::new("designs/blinky/project.toml"), &env, &fs)?;
//!
//! for source in resolve_for_tool(&manifest, "vivado", &env, &fs)?.iter() {
//!     println!("{} {}", source.kind, source.path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`manifest`]: manifest schema, loading, the project registry and edits
//! - [`sources`]: per-tool source resolution
//! - [`generate`]: Vivado Tcl and source-list rendering
//! - [`pipeline`]: steps, state machine and external tool invocation
//! - [`cli`]: argument parsing, handlers and output formatting

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod fs;
pub mod generate;
pub mod manifest;
pub mod paths;
pub mod pipeline;
pub mod sources;
pub mod strategies;
pub mod util;
pub mod xpr;

pub use config::{ConfigError, HdlforgeConfig};
pub use environment::Environment;
pub use error::{
    ExternalToolError, ForgeError, GenerationError, ManifestError, PathError, SourceError,
};
pub use manifest::{ManifestLoader, ProjectManifest, ToolSettings};
pub use pipeline::{PipelineConfig, PipelineOrchestrator, PipelineReport, PipelineState, Step};
pub use sources::{FileKind, ResolvedSource, ResolvedSourceSet, SourceResolver};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
