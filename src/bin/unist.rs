//! Command-line interface for unist
//! This binary checks syntax trees stored as JSON or YAML against the unist node contracts.
//!
//! Usage:
//!   unist check `<path>` [--config `<file>`] [--source `<file>`] [--format text|json]  - Check a tree
//!   unist print-config [--config `<file>`]                                           - Show the effective configuration
//!
//! Exit codes: 0 when the tree conforms, 1 when it does not, 2 when it could not be checked.

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use unist::config::{Loader, OutputFormat, UnistConfig};
use unist::conformance::Checker;
use unist::loader::{self, TreeFormat};

const EXIT_NOT_CONFORMING: u8 = 1;
const EXIT_FAILURE: u8 = 2;

/// Picked up from the working directory when `--config` is not given
const LOCAL_CONFIG: &str = "unist.toml";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("check", check_matches)) => handle_check_command(check_matches),
        Some(("print-config", config_matches)) => handle_print_config_command(config_matches),
        _ => unreachable!(),
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_FAILURE)
    })
}

fn cli() -> Command {
    let config_arg = Arg::new("config")
        .long("config")
        .short('c')
        .help("Configuration file layered over the defaults");

    Command::new("unist")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for checking unist syntax trees")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("check")
                .about("Check a tree against the node contracts")
                .arg(
                    Arg::new("path")
                        .help("Path to the tree file (JSON or YAML)")
                        .required(true)
                        .index(1),
                )
                .arg(config_arg.clone())
                .arg(
                    Arg::new("source")
                        .long("source")
                        .short('s')
                        .help("Source document the tree was parsed from, to verify points against"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Report format")
                        .value_parser(["text", "json"]),
                )
                .arg(
                    Arg::new("tree-format")
                        .long("tree-format")
                        .help("Format of the tree file (default: from the extension)")
                        .value_parser(["json", "yaml", "yml"]),
                )
                .arg(
                    Arg::new("require-positions")
                        .long("require-positions")
                        .help("Every node must carry a position")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("warnings-as-errors")
                        .long("warnings-as-errors")
                        .help("Fail on warnings as well as errors")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("print-config")
                .about("Print the effective configuration")
                .arg(config_arg),
        )
}

/// Handle the check command
fn handle_check_command(matches: &ArgMatches) -> unist::Result<ExitCode> {
    let mut layers = config_loader(matches.get_one::<String>("config"));
    if let Some(format) = matches.get_one::<String>("format") {
        layers = layers.set_override("output.format", format.as_str())?;
    }
    if matches.get_flag("require-positions") {
        layers = layers.set_override("checker.require_positions", true)?;
    }
    if matches.get_flag("warnings-as-errors") {
        layers = layers.set_override("checker.warnings_as_errors", true)?;
    }
    let config: UnistConfig = layers.build()?;

    let tree_format = matches
        .get_one::<String>("tree-format")
        .map(|name| name.parse::<TreeFormat>())
        .transpose()?;
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    let tree = loader::load_tree(path, tree_format)?;

    let mut checker = Checker::new(config.checker);
    if let Some(source_path) = matches.get_one::<String>("source") {
        checker = checker.with_source(&loader::read_source(source_path)?);
    }
    let report = checker.check(&tree);

    match config.output.format {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if report.is_conforming() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_NOT_CONFORMING)
    })
}

/// Handle the print-config command
fn handle_print_config_command(matches: &ArgMatches) -> unist::Result<ExitCode> {
    let config = config_loader(matches.get_one::<String>("config")).build()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(ExitCode::SUCCESS)
}

fn config_loader(path: Option<&String>) -> Loader {
    match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    }
}
