//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod resolve;
pub mod show;
pub mod validate;
pub mod version;

use std::path::PathBuf;
use std::sync::Arc;

use loadmap_core::config::LoaderConfig;

use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigLoader, LoadWarning, LoaderOptions};
use crate::error::{ConfigError, Result};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<()> {
    let options = LoaderOptions {
        expand_env: cli.expand_env,
        ..LoaderOptions::default()
    };

    match cli.command {
        Commands::Validate(args) => validate::run(&args, &options),
        Commands::Resolve(args) => resolve::run(&args, &options),
        Commands::Show(args) => show::run(&args, &options),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Loads and merges `paths`, logging any warnings.
fn load_config(paths: &[PathBuf], options: &LoaderOptions) -> Result<Arc<LoaderConfig>> {
    let result = ConfigLoader::new(options.clone())
        .load_all(paths)
        .inspect_err(|e| {
            if let ConfigError::ValidationError {
                errors, warnings, ..
            } = e
            {
                for issue in errors {
                    tracing::error!(path = %issue.path, "{}", issue.message);
                }
                for issue in warnings {
                    tracing::warn!(path = %issue.path, "{}", issue.message);
                }
            }
        })?;
    log_warnings(&result.warnings);
    Ok(result.config)
}

fn log_warnings(warnings: &[LoadWarning]) {
    for warning in warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
}
