//! CLI argument definitions
//!
//! All Clap derive structs for `loadmap` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use loadmap_core::config::PackageId;

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Load, check and apply module loader package maps.
#[derive(Parser, Debug)]
#[command(name = "loadmap", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "LOADMAP_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "LOADMAP_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Expand `${VAR}`, `${VAR:-default}` and `${VAR:?message}` references
    /// in configuration files (`$$` is a literal `$`).
    #[arg(long, global = true)]
    pub expand_env: bool,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration files.
    Validate(ValidateArgs),

    /// Resolve identifiers against a configuration.
    Resolve(ResolveArgs),

    /// Print the merged configuration table.
    Show(ShowArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Configuration files, merged in order (repeatable or comma-separated).
    #[arg(short, long, required = true, env = "LOADMAP_CONFIG", value_delimiter = ',')]
    pub config: Vec<PathBuf>,

    /// Identifiers to resolve.
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Versioned identifier of the importing package.
    #[arg(short, long, value_parser = parse_package_id)]
    pub parent: Option<PackageId>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Configuration files, merged in order (repeatable or comma-separated).
    #[arg(short, long, required = true, env = "LOADMAP_CONFIG", value_delimiter = ',')]
    pub config: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: ShowFormat,
}

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

fn parse_package_id(value: &str) -> Result<PackageId, String> {
    PackageId::parse(value).map_err(|e| e.to_string())
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Output format for `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShowFormat {
    /// Human-readable summary.
    #[default]
    Human,
    /// The table as JSON.
    Json,
    /// The table as a `System.config({...})` loader script.
    Script,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_validate_requires_files() {
        let cli = Cli::try_parse_from(["loadmap", "validate"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_validate_defaults() {
        let cli = Cli::try_parse_from(["loadmap", "validate", "config.js"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("Expected ValidateArgs");
        };
        assert_eq!(args.files, vec![PathBuf::from("config.js")]);
        assert_eq!(args.format, OutputFormat::Human);
        assert!(!args.strict);
    }

    #[test]
    fn test_resolve_with_parent() {
        let cli = Cli::try_parse_from([
            "loadmap",
            "resolve",
            "--config",
            "config.js",
            "--parent",
            "github:twbs/bootstrap@3.3.5",
            "jquery",
        ])
        .unwrap();
        let Commands::Resolve(args) = cli.command else {
            panic!("Expected ResolveArgs");
        };
        assert_eq!(args.names, vec!["jquery".to_string()]);
        assert_eq!(
            args.parent.map(|p| p.package_key()).as_deref(),
            Some("github:twbs/bootstrap@3.3.5")
        );
    }

    #[test]
    fn test_resolve_rejects_unversioned_parent() {
        let cli = Cli::try_parse_from([
            "loadmap",
            "resolve",
            "--config",
            "config.js",
            "--parent",
            "twbs/bootstrap",
            "jquery",
        ]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_repeated_config_flags() {
        let cli = Cli::try_parse_from([
            "loadmap", "show", "-c", "base.js", "-c", "local.js", "--format", "script",
        ])
        .unwrap();
        let Commands::Show(args) = cli.command else {
            panic!("Expected ShowArgs");
        };
        assert_eq!(args.config.len(), 2);
        assert_eq!(args.format, ShowFormat::Script);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "loadmap",
            "validate",
            "config.js",
            "-vv",
            "--log-format",
            "json",
            "--expand-env",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.expand_env);
    }

    #[test]
    fn test_env_expansion_off_by_default() {
        let cli = Cli::try_parse_from(["loadmap", "validate", "config.js"]).unwrap();
        assert!(!cli.expand_env);
    }

    #[test]
    fn test_comma_separated_config_list() {
        let cli = Cli::try_parse_from(["loadmap", "show", "-c", "base.js,local.js"]).unwrap();
        let Commands::Show(args) = cli.command else {
            panic!("Expected ShowArgs");
        };
        assert_eq!(
            args.config,
            vec![PathBuf::from("base.js"), PathBuf::from("local.js")]
        );
    }

    #[test]
    fn test_help_output() {
        let err = Cli::try_parse_from(["loadmap", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let err = Cli::try_parse_from(["loadmap", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
