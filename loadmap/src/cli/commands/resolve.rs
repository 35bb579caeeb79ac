//! `loadmap resolve`

use serde::Serialize;

use crate::cli::args::{OutputFormat, ResolveArgs};
use crate::config::LoaderOptions;
use crate::error::{ResolveError, Result};
use crate::registry::{Registry, register};
use crate::resolver::Resolved;

#[derive(Debug, Serialize)]
struct ResolvedName<'a> {
    name: &'a str,
    #[serde(flatten)]
    resolved: Resolved,
}

/// Resolve identifiers against the merged configuration.
///
/// # Errors
///
/// Returns an error if the configuration fails to load or an identifier
/// cannot be resolved.
pub fn run(args: &ResolveArgs, options: &LoaderOptions) -> Result<()> {
    let config = super::load_config(&args.config, options)?;

    let mut registry = Registry::new();
    register(&mut registry, config)?;
    let resolver = registry.resolver()?;

    let results = args
        .names
        .iter()
        .map(|name| {
            resolver
                .resolve(name, args.parent.as_ref())
                .map(|resolved| ResolvedName { name, resolved })
        })
        .collect::<std::result::Result<Vec<_>, ResolveError>>()?;

    match args.format {
        OutputFormat::Human => {
            for result in &results {
                println!("{} -> {}", result.name, result.resolved.id);
                println!("    location: {}", result.resolved.location);
                println!("    rule:     {}", result.resolved.rule);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
