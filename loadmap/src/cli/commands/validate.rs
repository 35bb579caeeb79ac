//! `loadmap validate`
//!
//! Loads each file on its own and reports every issue found, so one bad
//! file does not hide problems in the others.

use std::path::Path;

use serde::Serialize;
use serde_json::json;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoaderOptions};
use crate::error::{ConfigError, Result, Severity, ValidationIssue};

/// Outcome of validating one file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl FileReport {
    fn check(path: &Path, loader: &ConfigLoader, strict: bool) -> Self {
        let file = path.display().to_string();
        tracing::info!(file = %file, "validating configuration");

        let (errors, warnings) = match loader.load(path) {
            Ok(result) => (
                Vec::new(),
                result.warnings.into_iter().map(ValidationIssue::from).collect(),
            ),
            Err(ConfigError::ValidationError {
                errors, warnings, ..
            }) => (errors, warnings),
            Err(e) => (
                vec![ValidationIssue {
                    path: String::new(),
                    message: e.to_string(),
                    severity: Severity::Error,
                }],
                Vec::new(),
            ),
        };

        let valid = errors.is_empty() && (!strict || warnings.is_empty());
        if valid {
            tracing::info!(file = %file, "configuration valid");
        } else {
            tracing::warn!(file = %file, errors = errors.len(), "configuration invalid");
        }

        Self {
            file,
            valid,
            errors,
            warnings,
        }
    }

    fn print_human(&self) {
        let mark = if self.valid { "✓" } else { "✗" };
        println!("{mark} {}", self.file);
        for issue in self.errors.iter().chain(&self.warnings) {
            println!("    {issue}");
        }
    }
}

/// Validate configuration files.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationFailed`] if any file fails, or a JSON
/// error if the report cannot be encoded.
pub fn run(args: &ValidateArgs, options: &LoaderOptions) -> Result<()> {
    let loader = ConfigLoader::new(options.clone());
    let reports: Vec<FileReport> = args
        .files
        .iter()
        .map(|path| FileReport::check(path, &loader, args.strict))
        .collect();

    let invalid = reports.iter().filter(|r| !r.valid).count();

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                report.print_human();
            }
            println!(
                "\n{} file(s) checked: {} valid, {invalid} invalid",
                reports.len(),
                reports.len() - invalid
            );
        }
        OutputFormat::Json => {
            let output = json!({
                "files": reports,
                "summary": {
                    "total": reports.len(),
                    "valid": reports.len() - invalid,
                    "invalid": invalid,
                    "strict": args.strict,
                },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if invalid > 0 {
        return Err(ConfigError::ValidationFailed { count: invalid }.into());
    }
    Ok(())
}
