//! One preprocessing run as driven from the command line
//!
//! The driver resolves configuration, reads the input, wires the include resolver and command
//! handler into a [Preprocessor], and hands back everything the binary prints. It never exits
//! the process itself, so the exit policy stays in `main`.

use condpp::{Diagnostic, Preprocessor};
use condpp_config::{CondppConfig, DiagnosticFormat, Loader};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info};

/// Picked up from the working directory when no `--config` is given
pub const LOCAL_CONFIG: &str = "condpp.toml";

/// Input path meaning "read standard input"
pub const STDIN_PATH: &str = "-";

static DEFINE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("define name pattern is valid"));

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
    #[error("{path} is not valid UTF-8: {source}")]
    InvalidUtf8 {
        path: String,
        source: std::string::FromUtf8Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] condpp_config::ConfigError),
    #[error("invalid define name \"{0}\" (expected letters, digits and underscores)")]
    InvalidDefine(String),
    #[error("failed to render diagnostics: {0}")]
    Render(String),
}

/// Everything the command line can ask of one run
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub input: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub defines: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    pub format: Option<String>,
    pub deny_warnings: bool,
}

/// What a run produced
#[derive(Debug)]
pub struct Outcome {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
    pub includes: Vec<PathBuf>,
    pub format: DiagnosticFormat,
    pub deny_warnings: bool,
}

impl Outcome {
    /// Process exit status for this run: 1 on errors, or on warnings when they are denied.
    pub fn exit_code(&self) -> i32 {
        let failed = self
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.is_error() || self.deny_warnings);
        i32::from(failed)
    }
}

pub fn load_config(options: &Options) -> Result<CondppConfig, CliError> {
    let mut loader = match &options.config {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    if let Some(format) = &options.format {
        loader = loader.set_override("diagnostics.format", format.as_str())?;
    }
    if options.deny_warnings {
        loader = loader.set_override("diagnostics.deny_warnings", true)?;
    }
    Ok(loader.build()?)
}

/// Split `-D` values on commas and check every name.
pub fn collect_defines<'a>(
    values: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<String>, CliError> {
    let mut names = Vec::new();
    for value in values {
        for name in value.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            if !DEFINE_NAME.is_match(name) {
                return Err(CliError::InvalidDefine(name.to_string()));
            }
            names.push(name.to_string());
        }
    }
    Ok(names)
}

pub fn run(options: &Options) -> Result<Outcome, CliError> {
    let config = load_config(options)?;
    let source = read_input(&options.input)?;

    let mut pp = Preprocessor::new();
    for name in config.preprocess.defines.iter().chain(&options.defines) {
        pp.add_define(name.as_str());
    }
    debug!(defines = ?pp.defines().collect::<Vec<_>>(), "seeded defines");

    let mut search_paths = vec![input_dir(&options.input)];
    search_paths.extend(config.include.search_paths.iter().cloned());
    search_paths.extend(options.include_dirs.iter().cloned());

    let includes = Rc::new(RefCell::new(Vec::new()));
    let resolved = Rc::clone(&includes);
    pp.set_include_resolver(move |path| match find_include(&search_paths, path) {
        Some(found) => {
            info!(path, found = %found.display(), "include resolved");
            resolved.borrow_mut().push(found);
            true
        }
        None => false,
    });

    let known: BTreeSet<String> = config.preprocess.known_commands.iter().cloned().collect();
    pp.set_command_handler(move |name, value| {
        let handled = known.contains(name);
        if handled {
            debug!(name, value, "known command");
        }
        handled
    });

    let output = pp.process(source);
    let source_name = display_name(&options.input);
    let diagnostics = pp
        .take_diagnostics()
        .into_iter()
        .map(|diagnostic| diagnostic.with_source(source_name.clone()))
        .collect();

    if let Some(path) = &options.output {
        std::fs::write(path, &output).map_err(|source| CliError::Write {
            path: path.display().to_string(),
            source,
        })?;
    }

    let includes = includes.borrow().clone();
    Ok(Outcome {
        output,
        diagnostics,
        includes,
        format: config.diagnostics.format,
        deny_warnings: config.diagnostics.deny_warnings,
    })
}

fn read_input(input: &str) -> Result<String, CliError> {
    let bytes = if input == STDIN_PATH {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes).map(|_| bytes)
    } else {
        std::fs::read(input)
    }
    .map_err(|source| CliError::Read {
        path: display_name(input),
        source,
    })?;

    String::from_utf8(bytes).map_err(|source| CliError::InvalidUtf8 {
        path: display_name(input),
        source,
    })
}

/// Directory includes are resolved against first
fn input_dir(input: &str) -> PathBuf {
    if input == STDIN_PATH {
        return PathBuf::from(".");
    }
    match Path::new(input).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn find_include(search_paths: &[PathBuf], path: &str) -> Option<PathBuf> {
    search_paths
        .iter()
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.is_file())
}

fn display_name(input: &str) -> String {
    if input == STDIN_PATH {
        "<stdin>".to_string()
    } else {
        input.to_string()
    }
}
