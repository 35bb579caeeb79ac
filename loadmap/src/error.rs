//! Error types for `loadmap`
//!
//! Exit codes, the top-level error, and the registry and resolver errors.
//! Configuration errors live in `loadmap-core` and are re-exported here.

use thiserror::Error;

pub use loadmap_core::error::{ConfigError, Severity, ValidationIssue};

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `loadmap` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (parse failure, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Resolution error (identifier could not be resolved)
    pub const RESOLVE_ERROR: i32 = 4;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Exit code for a command line that failed to parse.
    ///
    /// `--help` and `--version` also arrive as parse errors and succeed.
    #[must_use]
    pub fn for_clap(err: &clap::Error) -> i32 {
        if err.use_stderr() {
            Self::USAGE_ERROR
        } else {
            Self::SUCCESS
        }
    }
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `loadmap` operations.
///
/// Aggregates the domain errors and maps each to an exit code.
#[derive(Debug, Error)]
pub enum LoadmapError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Registration error
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Identifier resolution error
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoadmapError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(ConfigError::MissingFile { .. }) => ExitCode::IO_ERROR,
            Self::Config(_) | Self::Json(_) => ExitCode::CONFIG_ERROR,
            Self::Resolve(_) => ExitCode::RESOLVE_ERROR,
            Self::Registry(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors from the loader's configuration entry point.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The loader already holds a configuration table
    #[error("loader is already configured")]
    AlreadyConfigured,

    /// The loader has not been handed a configuration table yet
    #[error("loader has not been configured")]
    NotConfigured,
}

// ============================================================================
// Resolve Errors
// ============================================================================

/// Identifier resolution errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The identifier was empty
    #[error("cannot resolve an empty identifier")]
    EmptyIdentifier,

    /// A relative identifier was given without a parent to resolve against
    #[error("relative identifier '{0}' requires a parent package")]
    RelativeWithoutParent(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `loadmap` operations.
pub type Result<T> = std::result::Result<T, LoadmapError>;

// ============================================================================
// Tests
// ============================================================================
