//! Configuration schema types
//!
//! These types mirror the object a module loader accepts at its
//! configuration entry point. They are deserialized from loader scripts,
//! JSON or YAML and serialize back to the same shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Alias table: logical name → versioned identifier.
pub type AliasTable = IndexMap<String, String>;

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration table handed to a module loader.
///
/// Built once and never mutated after registration. Every mapping keeps
/// insertion order; inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Append `.js` to identifiers that do not already carry it
    #[serde(rename = "defaultJSExtensions", default)]
    pub default_js_extensions: bool,

    /// Package responsible for source transformation before execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transpiler: Option<String>,

    /// Base prefix joined onto relative locations
    #[serde(rename = "baseURL", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Path rules: prefix pattern → location template
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, String>,

    /// Package aliases and scoped overrides, in the loader's combined form
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub map: IndexMap<String, MapEntry>,
}

/// A single `map` entry.
///
/// String values alias a logical name; mapping values hold the overrides
/// that apply only while resolving dependencies of the keyed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapEntry {
    /// Logical name → versioned identifier
    Alias(String),
    /// Versioned package → dependency-local aliases
    Scope(AliasTable),
}

impl LoaderConfig {
    /// Top-level option keys understood by the loader.
    pub const KNOWN_OPTIONS: [&'static str; 5] =
        ["defaultJSExtensions", "transpiler", "baseURL", "paths", "map"];

    /// Iterates over global package aliases in insertion order.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().filter_map(|(k, v)| match v {
            MapEntry::Alias(target) => Some((k.as_str(), target.as_str())),
            MapEntry::Scope(_) => None,
        })
    }

    /// Iterates over scoped override tables in insertion order.
    pub fn scopes(&self) -> impl Iterator<Item = (&str, &AliasTable)> {
        self.map.iter().filter_map(|(k, v)| match v {
            MapEntry::Scope(table) => Some((k.as_str(), table)),
            MapEntry::Alias(_) => None,
        })
    }

    /// Returns the global alias target for `name`, if any.
    #[must_use]
    pub fn alias(&self, name: &str) -> Option<&str> {
        match self.map.get(name)? {
            MapEntry::Alias(target) => Some(target),
            MapEntry::Scope(_) => None,
        }
    }

    /// Returns the override table scoped to `package`, if any.
    #[must_use]
    pub fn scope(&self, package: &str) -> Option<&AliasTable> {
        match self.map.get(package)? {
            MapEntry::Scope(table) => Some(table),
            MapEntry::Alias(_) => None,
        }
    }

    /// Number of global aliases.
    #[must_use]
    pub fn alias_count(&self) -> usize {
        self.aliases().count()
    }

    /// Number of scoped override tables.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.scopes().count()
    }

    /// Returns `true` if the table carries no options or mappings at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.default_js_extensions
            && self.transpiler.is_none()
            && self.base_url.is_none()
            && self.paths.is_empty()
            && self.map.is_empty()
    }
}
