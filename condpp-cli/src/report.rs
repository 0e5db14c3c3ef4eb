//! Diagnostic rendering for stderr

use crate::driver::CliError;
use condpp::Diagnostic;
use condpp_config::DiagnosticFormat;

/// Render diagnostics in the configured format. Text output is one line per diagnostic and
/// empty when there is nothing to report.
pub fn render(diagnostics: &[Diagnostic], format: DiagnosticFormat) -> Result<String, CliError> {
    match format {
        DiagnosticFormat::Text => Ok(diagnostics
            .iter()
            .map(|diagnostic| format!("{}\n", diagnostic))
            .collect()),
        DiagnosticFormat::Json => serde_json::to_string_pretty(diagnostics)
            .map(|json| json + "\n")
            .map_err(|e| CliError::Render(e.to_string())),
        DiagnosticFormat::Yaml => {
            serde_yaml::to_string(diagnostics).map_err(|e| CliError::Render(e.to_string()))
        }
    }
}
