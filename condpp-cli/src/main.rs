//! Command-line interface for condpp
//! This binary runs the conditional-compilation preprocessor over one file (or stdin) and
//! prints the processed text.
//!
//! Usage:
//!   condpp `<path>` [-D `<NAME[,NAME]>`]... [-I `<dir>`]... [-c `<config>`] [-o `<out>`]
//!          [--format text|json|yaml] [--deny-warnings] [--deps]
//!
//! Diagnostics go to stderr. Exit status is 1 when an error was reported (or any warning with
//! `--deny-warnings`) and 2 when the run itself failed.

mod driver;
mod report;

use clap::{Arg, ArgAction, ArgMatches, Command};
use driver::{CliError, Options, Outcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter
const LOG_ENV: &str = "CONDPP_LOG";

fn main() {
    init_tracing();

    let matches = Command::new("condpp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Blank out #if/#define preprocessor directives while keeping line numbers")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the input file, or '-' for stdin")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("define")
                .long("define")
                .short('D')
                .help("Define a name before processing (repeatable, comma-separated)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("include-dir")
                .long("include-dir")
                .short('I')
                .help("Additional directory searched for #include targets (repeatable)")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults (default: ./condpp.toml if present)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write the processed text here instead of stdout")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Diagnostic format")
                .value_parser(["text", "json", "yaml"]),
        )
        .arg(
            Arg::new("deny-warnings")
                .long("deny-warnings")
                .help("Exit with status 1 when any warning is reported")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("deps")
                .long("deps")
                .help("List the resolved #include targets on stderr")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let code = match handle_run_command(&matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("condpp: {}", e);
            2
        }
    };
    std::process::exit(code);
}

/// Log output is off unless CONDPP_LOG asks for it
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn options_from(matches: &ArgMatches) -> Result<Options, CliError> {
    let defines = matches
        .get_many::<String>("define")
        .map(|values| driver::collect_defines(values.map(String::as_str)))
        .transpose()?
        .unwrap_or_default();

    Ok(Options {
        input: matches
            .get_one::<String>("path")
            .cloned()
            .unwrap_or_else(|| driver::STDIN_PATH.to_string()),
        output: matches.get_one::<PathBuf>("output").cloned(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        defines,
        include_dirs: matches
            .get_many::<PathBuf>("include-dir")
            .map(|dirs| dirs.cloned().collect())
            .unwrap_or_default(),
        format: matches.get_one::<String>("format").cloned(),
        deny_warnings: matches.get_flag("deny-warnings"),
    })
}

/// Handle the run command, returning the exit status
fn handle_run_command(matches: &ArgMatches) -> Result<i32, CliError> {
    let options = options_from(matches)?;
    let outcome = driver::run(&options)?;

    if options.output.is_none() {
        print!("{}", outcome.output);
    }
    if matches.get_flag("deps") {
        print_deps(&outcome);
    }
    eprint!("{}", report::render(&outcome.diagnostics, outcome.format)?);

    Ok(outcome.exit_code())
}

fn print_deps(outcome: &Outcome) {
    for path in &outcome.includes {
        eprintln!("include: {}", path.display());
    }
}
