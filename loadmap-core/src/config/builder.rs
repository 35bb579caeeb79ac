//! Literal construction of a configuration table.
//!
//! The builder performs no validation. Malformed entries are accepted as
//! written and surface later, during validation or resolution.

use indexmap::IndexMap;

use super::schema::{LoaderConfig, MapEntry};

/// Fluent builder for [`LoaderConfig`].
///
/// Inserting a key that already exists replaces its value (last write
/// wins) while keeping the key's original position.
///
/// ```
/// use loadmap_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .default_extensions(true)
///     .transpiler("traceur")
///     .path("github:*", "lib/github/*")
///     .alias("components/jquery", "github:components/jquery@2.1.4")
///     .scoped("github:twbs/bootstrap@3.3.5", "jquery", "github:components/jquery@2.1.4")
///     .build();
///
/// assert_eq!(config.alias_count(), 1);
/// assert_eq!(config.scope_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct ConfigBuilder {
    config: LoaderConfig,
}

impl ConfigBuilder {
    /// Starts an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables implicit `.js` extension resolution.
    pub fn default_extensions(mut self, enabled: bool) -> Self {
        self.config.default_js_extensions = enabled;
        self
    }

    /// Names the transpiler package.
    pub fn transpiler(mut self, package: impl Into<String>) -> Self {
        self.config.transpiler = Some(package.into());
        self
    }

    /// Sets the base prefix for relative locations.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Adds a path rule.
    pub fn path(mut self, pattern: impl Into<String>, template: impl Into<String>) -> Self {
        self.config.paths.insert(pattern.into(), template.into());
        self
    }

    /// Adds a global package alias, replacing any entry under `name`.
    pub fn alias(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.config
            .map
            .insert(name.into(), MapEntry::Alias(target.into()));
        self
    }

    /// Adds one override to the scope of `package`.
    ///
    /// An existing scope is extended; an alias stored under `package` is
    /// replaced by a fresh scope.
    pub fn scoped(
        mut self,
        package: impl Into<String>,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        let package = package.into();
        match self.config.map.get_mut(&package) {
            Some(MapEntry::Scope(table)) => {
                table.insert(name.into(), target.into());
            }
            _ => {
                let table = IndexMap::from([(name.into(), target.into())]);
                self.config.map.insert(package, MapEntry::Scope(table));
            }
        }
        self
    }

    /// Replaces the whole scope of `package`.
    pub fn scope<I, K, V>(mut self, package: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.config
            .map
            .insert(package.into(), MapEntry::Scope(table));
        self
    }

    /// Finishes the table.
    pub fn build(self) -> LoaderConfig {
        self.config
    }
}
