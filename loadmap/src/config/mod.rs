//! Configuration module
//!
//! Handles loading and validation of module loader configuration tables
//! from loader scripts, JSON and YAML.

pub mod loader;
pub mod script;
pub mod validation;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use loadmap_core::config::{AliasTable, ConfigBuilder, LoaderConfig, MapEntry, PackageId};
pub use validation::{ValidationResult, Validator};
