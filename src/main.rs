use hdlforge::cli::commands::{CliArgs, Commands};
use hdlforge::cli::handlers::{
    handle_add_source, handle_config, handle_generate, handle_projects, handle_run,
    handle_sources, handle_xpr_files, Session,
};
use hdlforge::fs::RealFileSystem;
use hdlforge::pipeline::{StdTerminal, SystemRunner};
use hdlforge::util::logging::{init_logging, parse_level, LoggingConfig};
use hdlforge::{Environment, ForgeError, HdlforgeConfig, VERSION};

use clap::Parser;
use std::env;
use tracing::{debug, Level};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("hdlforge v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match run(&args).await {
        Ok(code) => code,
        Err(e) => {
            debug!("Error details: {:?}", e);
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code);
}

async fn run(args: &CliArgs) -> Result<i32, ForgeError> {
    let env = Environment::from_process()
        .map_err(|e| ForgeError::Filesystem(format!("cannot read working directory: {}", e)))?;
    let fs = RealFileSystem::new();
    let session = Session::new(HdlforgeConfig::default(), args.registry.as_deref(), env, &fs)?;

    match &args.command {
        Commands::Run(run_args) => {
            let runner = SystemRunner::new(session.config.tool_timeout());
            let terminal = StdTerminal::new(run_args.yes || session.config.assume_yes);
            handle_run(run_args, &session, &runner, &terminal).await
        }
        Commands::Sources(sources_args) => {
            handle_sources(sources_args, &session, &StdTerminal::default())
        }
        Commands::Generate(generate_args) => {
            handle_generate(generate_args, &session, &StdTerminal::default())
        }
        Commands::Projects(projects_args) => {
            handle_projects(projects_args, &session, &StdTerminal::default())
        }
        Commands::AddSource(add_args) => {
            handle_add_source(add_args, &session, &StdTerminal::default())
        }
        Commands::XprFiles(xpr_args) => handle_xpr_files(xpr_args, &session, &StdTerminal::default()),
        Commands::Config(config_args) => handle_config(config_args, &session, &StdTerminal::default()),
    }
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("HDLFORGE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    init_logging(LoggingConfig::for_level(level));
}
