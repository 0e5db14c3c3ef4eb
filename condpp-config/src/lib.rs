//! Configuration for condpp front ends
//!
//! The defaults ship inside the binary (`defaults/condpp.default.toml`), so a run with no
//! config file behaves exactly as documented there. A [`Loader`] stacks project files and
//! command-line overrides on top and deserializes the result into [`CondppConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/condpp.default.toml");

/// Top-level configuration consumed by condpp applications.
#[derive(Debug, Clone, Deserialize)]
pub struct CondppConfig {
    pub preprocess: PreprocessConfig,
    pub include: IncludeConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Engine seeding.
#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessConfig {
    pub defines: Vec<String>,
    pub known_commands: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncludeConfig {
    pub search_paths: Vec<PathBuf>,
}

/// How diagnostics are reported.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    pub format: DiagnosticFormat,
    pub deny_warnings: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticFormat {
    Text,
    Json,
    Yaml,
}

/// Stacks TOML sources over the embedded defaults. Later sources win.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder()
                .add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Layer a TOML file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    /// Override one dotted key, e.g. `diagnostics.format`.
    pub fn set_override<V>(mut self, key: &str, value: V) -> Result<Self, ConfigError>
    where
        V: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<CondppConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let file = File::from(path)
            .format(FileFormat::Toml)
            .required(required);
        self.builder = self.builder.add_source(file);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults with nothing layered on top.
pub fn load_defaults() -> Result<CondppConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_empty() {
        let config = load_defaults().expect("embedded defaults are valid");
        assert!(config.preprocess.defines.is_empty());
        assert!(config.include.search_paths.is_empty());
        assert_eq!(config.diagnostics.format, DiagnosticFormat::Text);
        assert!(!config.diagnostics.deny_warnings);
    }

    #[test]
    fn test_overrides_win() {
        let config = Loader::new()
            .set_override("diagnostics.format", "json")
            .expect("override")
            .set_override("diagnostics.deny_warnings", true)
            .expect("override")
            .build()
            .expect("build");
        assert_eq!(config.diagnostics.format, DiagnosticFormat::Json);
        assert!(config.diagnostics.deny_warnings);
    }

    #[test]
    fn test_project_file_is_layered() {
        let dir = std::env::temp_dir().join(format!("condpp-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("condpp.toml");
        let mut file = std::fs::File::create(&path).expect("config file");
        writeln!(
            file,
            "[preprocess]\ndefines = [\"EDITOR\", \"DEBUG\"]\nknown_commands = [\"pragma\"]"
        )
        .expect("write config");

        let config = Loader::new().with_file(&path).build().expect("build");
        assert_eq!(config.preprocess.defines, vec!["EDITOR", "DEBUG"]);
        assert_eq!(config.preprocess.known_commands, vec!["pragma"]);
        assert_eq!(config.diagnostics.format, DiagnosticFormat::Text);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_optional_file() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here/condpp.toml")
            .build()
            .expect("build");
        assert!(config.preprocess.known_commands.is_empty());
    }
}
