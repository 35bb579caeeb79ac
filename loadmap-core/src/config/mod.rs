//! Configuration table
//!
//! The typed form of a module loader configuration: option flags, path
//! rules, package aliases and scoped overrides.

pub mod builder;
pub mod identifier;
pub mod schema;

pub use builder::ConfigBuilder;
pub use identifier::PackageId;
pub use schema::{AliasTable, LoaderConfig, MapEntry};
