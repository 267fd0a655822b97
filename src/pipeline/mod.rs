//! Step pipeline: `create`, `clean`, listings and run-flow execution
//!
//! Steps run one at a time against a tool's build directory. External tools
//! are reached through [`ProcessRunner`] and confirmations through
//! [`Terminal`], so the whole pipeline can run against mocks.

pub mod config;
pub mod context;
pub mod orchestrator;
pub mod runner;
pub mod state;
pub mod step;
pub mod step_trait;
pub mod steps;
pub mod terminal;

pub use config::PipelineConfig;
pub use orchestrator::{PipelineOrchestrator, PipelineReport};
pub use runner::{Invocation, ProcessRunner, RecordingRunner, SystemRunner};
pub use state::PipelineState;
pub use step::Step;
pub use terminal::{ScriptedTerminal, StdTerminal, Terminal};
