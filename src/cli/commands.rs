use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Build orchestrator for multi-toolchain HDL projects
#[derive(Parser, Debug)]
#[command(
    name = "hdlforge",
    about = "Build orchestrator for multi-toolchain HDL projects",
    version,
    long_about = "hdlforge reads a TOML project manifest, resolves which sources belong to \
                  which tool, generates Vivado project scripts or ordered source lists and \
                  drives the create / synth / impl / bit steps.\n\n\
                  The repository root is taken from $REPO_TOP (or the variable named by \
                  settings.repo_path_env)."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only errors are logged"
    )]
    pub quiet: bool,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Project registry (relative paths are taken under the repository root)"
    )]
    pub registry: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run pipeline steps for a tool",
        long_about = "Runs the given steps in order against the tool's build directory.\n\
                      Steps: create, clean, list-strategies, list-runs, synth, impl, bit, all, dry-run.\n\n\
                      Examples:\n  \
                      hdlforge run vivado create\n  \
                      hdlforge run vivado create synth --flow fast\n  \
                      hdlforge run vivado list-runs --project blinky\n  \
                      hdlforge run ghdl create --yes"
    )]
    Run(RunArgs),

    #[command(
        about = "Show the resolved source set of a tool",
        long_about = "Prints the ordered sources active for a tool, with their inferred kind.\n\n\
                      Examples:\n  \
                      hdlforge sources vivado\n  \
                      hdlforge sources ghdl --format json"
    )]
    Sources(SourcesArgs),

    #[command(
        about = "Generate the tool's build artifact without running it",
        long_about = "Writes the Vivado project script or the source list of a tool. With \
                      --check nothing is written; the exit status tells whether the file on \
                      disk is current.\n\n\
                      Examples:\n  \
                      hdlforge generate vivado\n  \
                      hdlforge generate ghdl --check"
    )]
    Generate(GenerateArgs),

    #[command(about = "List projects in the registry")]
    Projects(ProjectsArgs),

    #[command(
        about = "Add a source file to the manifest for a tool",
        long_about = "Enables an existing [[sources]] entry for the tool, or appends a new one.\n\n\
                      Examples:\n  \
                      hdlforge add-source vivado rtl/uart_rx.vhd\n  \
                      hdlforge add-source vivado constr/pins.xdc --fileset constrs_1"
    )]
    AddSource(AddSourceArgs),

    #[command(about = "List the files referenced by a Vivado project (.xpr)")]
    XprFiles(XprFilesArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

/// Which manifest to work on; the invocation directory decides when neither is given
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectSelection {
    #[arg(short = 'p', long, value_name = "NAME", help = "Project name from the registry")]
    pub project: Option<String>,

    #[arg(
        short = 'm',
        long,
        value_name = "FILE",
        conflicts_with = "project",
        help = "Manifest path, bypassing the registry"
    )]
    pub manifest: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(value_name = "TOOL", help = "Tool name, e.g. vivado or ghdl")]
    pub tool: String,

    #[arg(value_name = "STEP", required = true, help = "Steps to run, in order")]
    pub steps: Vec<String>,

    #[command(flatten)]
    pub selection: ProjectSelection,

    #[arg(short = 'f', long, value_name = "NAME", help = "Run flow for synth/impl/bit/all")]
    pub flow: Option<String>,

    #[arg(short = 'y', long, help = "Answer yes to confirmations")]
    pub yes: bool,

    #[arg(long, help = "Fail on unknown step names instead of skipping them")]
    pub strict: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SourcesArgs {
    #[arg(value_name = "TOOL")]
    pub tool: String,

    #[command(flatten)]
    pub selection: ProjectSelection,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(value_name = "TOOL")]
    pub tool: String,

    #[command(flatten)]
    pub selection: ProjectSelection,

    #[arg(long, help = "Only check whether the artifact on disk is up to date")]
    pub check: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ProjectsArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct AddSourceArgs {
    #[arg(value_name = "TOOL")]
    pub tool: String,

    #[arg(value_name = "PATH", help = "Source path as written in the manifest")]
    pub path: String,

    #[arg(long, value_name = "NAME", help = "File-set or constraint-set tag for new entries")]
    pub fileset: Option<String>,

    #[command(flatten)]
    pub selection: ProjectSelection,
}

#[derive(Parser, Debug, Clone)]
pub struct XprFilesArgs {
    #[arg(value_name = "FILE", help = "Vivado project file")]
    pub xpr: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_run_args() {
        let args = CliArgs::parse_from([
            "hdlforge", "run", "vivado", "create", "synth", "--flow", "fast", "-p", "blinky",
        ]);
        match args.command {
            Commands::Run(run) => {
                assert_eq!(run.tool, "vivado");
                assert_eq!(run.steps, vec!["create", "synth"]);
                assert_eq!(run.flow.as_deref(), Some("fast"));
                assert_eq!(run.selection.project.as_deref(), Some("blinky"));
                assert!(!run.yes);
                assert!(!run.strict);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_requires_a_step() {
        assert!(CliArgs::try_parse_from(["hdlforge", "run", "vivado"]).is_err());
    }

    #[test]
    fn test_project_and_manifest_conflict() {
        let result = CliArgs::try_parse_from([
            "hdlforge", "sources", "ghdl", "-p", "blinky", "-m", "p.toml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_sources_default_format() {
        let args = CliArgs::parse_from(["hdlforge", "sources", "ghdl"]);
        match args.command {
            Commands::Sources(sources) => assert_eq!(sources.format, OutputFormatArg::Human),
            _ => panic!("Expected Sources command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from([
            "hdlforge", "generate", "vivado", "--check", "-v", "--registry", "/etc/p.toml",
        ]);
        assert!(args.verbose);
        assert_eq!(args.registry.as_deref(), Some("/etc/p.toml"));
        assert!(matches!(args.command, Commands::Generate(GenerateArgs { check: true, .. })));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(CliArgs::try_parse_from(["hdlforge", "projects", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_add_source_args() {
        let args = CliArgs::parse_from([
            "hdlforge", "add-source", "vivado", "constr/pins.xdc", "--fileset", "constrs_1",
        ]);
        match args.command {
            Commands::AddSource(add) => {
                assert_eq!(add.path, "constr/pins.xdc");
                assert_eq!(add.fileset.as_deref(), Some("constrs_1"));
            }
            _ => panic!("Expected AddSource command"),
        }
    }
}
