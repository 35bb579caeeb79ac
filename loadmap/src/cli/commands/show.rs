//! `loadmap show`

use std::fmt::Write as _;

use loadmap_core::config::LoaderConfig;

use crate::cli::args::{ShowArgs, ShowFormat};
use crate::config::{LoaderOptions, script};
use crate::error::Result;

/// Print the merged configuration table.
///
/// # Errors
///
/// Returns an error if the configuration fails to load or cannot be
/// encoded.
pub fn run(args: &ShowArgs, options: &LoaderOptions) -> Result<()> {
    let config = super::load_config(&args.config, options)?;

    match args.format {
        ShowFormat::Human => print!("{}", summarize(&config)),
        ShowFormat::Json => println!("{}", serde_json::to_string_pretty(&*config)?),
        ShowFormat::Script => print!("{}", script::render(&config)?),
    }

    Ok(())
}

/// Human-readable listing of a table.
fn summarize(config: &LoaderConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "defaultJSExtensions: {}", config.default_js_extensions);
    let _ = writeln!(
        out,
        "transpiler: {}",
        config.transpiler.as_deref().unwrap_or("(none)")
    );
    if let Some(base_url) = &config.base_url {
        let _ = writeln!(out, "baseURL: {base_url}");
    }

    let _ = writeln!(out, "paths ({}):", config.paths.len());
    for (pattern, template) in &config.paths {
        let _ = writeln!(out, "  {pattern} -> {template}");
    }

    let _ = writeln!(out, "aliases ({}):", config.alias_count());
    for (name, target) in config.aliases() {
        let _ = writeln!(out, "  {name} -> {target}");
    }

    let _ = writeln!(out, "scopes ({}):", config.scope_count());
    for (package, table) in config.scopes() {
        let _ = writeln!(out, "  {package}");
        for (name, target) in table {
            let _ = writeln!(out, "    {name} -> {target}");
        }
    }

    out
}
