pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands};
pub use handlers::Session;
pub use output::{OutputFormat, OutputFormatter};
