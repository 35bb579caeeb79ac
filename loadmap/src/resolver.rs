//! Identifier resolution
//!
//! Resolves the identifiers that modules import against a registered
//! configuration table. Resolution happens in two steps:
//!
//! 1. **Map**: rewrite a logical name into a versioned identifier using the
//!    scoped overrides of the importing package first, then the global
//!    aliases. Relative identifiers are joined onto the importer instead.
//! 2. **Locate**: turn the identifier into a load location using the path
//!    rules, the default extension and the base URL.

use std::sync::Arc;

use serde::Serialize;

use loadmap_core::config::{AliasTable, LoaderConfig, PackageId};

use crate::error::ResolveError;

/// Extension appended when `defaultJSExtensions` is on.
const JS_EXTENSION: &str = ".js";

/// Which part of the table produced a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// An override scoped to the importing package
    Scoped {
        /// Scope key (the importer's `registry:name@version`)
        scope: String,
        /// Matched override name
        key: String,
    },
    /// A global package alias
    Global {
        /// Matched alias name
        key: String,
    },
    /// A `./` or `../` identifier joined onto the importer
    Relative,
    /// Nothing matched; the identifier passed through unchanged
    Unmapped,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scoped { scope, key } => write!(f, "scoped override '{key}' in {scope}"),
            Self::Global { key } => write!(f, "alias '{key}'"),
            Self::Relative => f.write_str("relative to parent"),
            Self::Unmapped => f.write_str("unmapped"),
        }
    }
}

/// Outcome of the map step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Mapped identifier
    pub id: String,
    /// Rule that produced it
    pub rule: Rule,
}

/// Outcome of a full resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    /// Mapped identifier
    pub id: String,
    /// Load location after path rules, extension and base URL
    pub location: String,
    /// Rule that produced the identifier
    pub rule: Rule,
}

/// Resolves identifiers against a frozen configuration table.
#[derive(Debug, Clone)]
pub struct Resolver {
    config: Arc<LoaderConfig>,
}

impl Resolver {
    /// Creates a resolver over `config`.
    #[must_use]
    pub const fn new(config: Arc<LoaderConfig>) -> Self {
        Self { config }
    }

    /// The table this resolver reads.
    #[must_use]
    pub const fn config(&self) -> &Arc<LoaderConfig> {
        &self.config
    }

    /// Maps `name` as imported by `parent`.
    ///
    /// Overrides scoped to the parent package win over global aliases.
    /// Both match the longest key that equals `name` or prefixes it at a
    /// `/` boundary, and carry the rest of `name` over to the target.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::EmptyIdentifier`] for an empty name and
    /// [`ResolveError::RelativeWithoutParent`] for a relative name with no
    /// parent.
    pub fn map(&self, name: &str, parent: Option<&PackageId>) -> Result<Resolution, ResolveError> {
        if name.is_empty() {
            return Err(ResolveError::EmptyIdentifier);
        }

        if is_relative(name) {
            let Some(parent) = parent else {
                return Err(ResolveError::RelativeWithoutParent(name.to_string()));
            };
            return Ok(Resolution {
                id: join_relative(parent, name),
                rule: Rule::Relative,
            });
        }

        if let Some(parent) = parent {
            let scope_key = parent.package_key();
            if let Some(table) = self.config.scope(&scope_key) {
                if let Some((key, id)) = lookup(scope_entries(table), name) {
                    tracing::trace!(identifier = name, scope = %scope_key, key, "scoped override matched");
                    return Ok(Resolution {
                        id,
                        rule: Rule::Scoped {
                            scope: scope_key,
                            key: key.to_string(),
                        },
                    });
                }
            }
        }

        if let Some((key, id)) = lookup(self.config.aliases(), name) {
            tracing::trace!(identifier = name, key, "global alias matched");
            return Ok(Resolution {
                id,
                rule: Rule::Global {
                    key: key.to_string(),
                },
            });
        }

        Ok(Resolution {
            id: name.to_string(),
            rule: Rule::Unmapped,
        })
    }

    /// Turns an identifier into a load location.
    ///
    /// An exact path rule wins; otherwise the wildcard rule with the longest
    /// literal prefix applies. The default extension is added unless the
    /// location already ends in `.js` or names a plugin (`!`). Relative
    /// locations are joined onto `baseURL`.
    #[must_use]
    pub fn locate(&self, id: &str) -> String {
        let mut location = self.apply_paths(id);

        if self.config.default_js_extensions
            && !location.ends_with(JS_EXTENSION)
            && !location.contains('!')
        {
            location.push_str(JS_EXTENSION);
        }

        match self.config.base_url.as_deref() {
            Some(base) if !base.is_empty() && !is_absolute(&location) => {
                format!("{}/{}", base.trim_end_matches('/'), location)
            }
            _ => location,
        }
    }

    /// Maps `name` for `parent`, then locates the result.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`map`](Self::map).
    pub fn resolve(&self, name: &str, parent: Option<&PackageId>) -> Result<Resolved, ResolveError> {
        let Resolution { id, rule } = self.map(name, parent)?;
        let location = self.locate(&id);

        tracing::debug!(
            identifier = name,
            parent = ?parent.map(ToString::to_string),
            id = %id,
            location = %location,
            rule = %rule,
            "resolved identifier"
        );

        Ok(Resolved { id, location, rule })
    }

    fn apply_paths(&self, id: &str) -> String {
        if let Some(template) = self.config.paths.get(id) {
            return template.clone();
        }

        self.config
            .paths
            .iter()
            .filter_map(|(pattern, template)| {
                let (prefix, suffix) = pattern.split_once('*')?;
                let middle = id.strip_prefix(prefix)?.strip_suffix(suffix)?;
                Some((prefix.len(), template.replacen('*', middle, 1)))
            })
            .max_by_key(|(prefix_len, _)| *prefix_len)
            .map_or_else(|| id.to_string(), |(_, location)| location)
    }
}

/// Finds the longest key equal to `name` or prefixing it at a `/`.
///
/// Returns the matched key and the target with the remainder appended.
fn lookup<'a>(
    entries: impl Iterator<Item = (&'a str, &'a str)>,
    name: &str,
) -> Option<(&'a str, String)> {
    entries
        .filter_map(|(key, target)| {
            let rest = name.strip_prefix(key)?;
            (rest.is_empty() || rest.starts_with('/')).then(|| (key, format!("{target}{rest}")))
        })
        .max_by_key(|(key, _)| key.len())
}

fn scope_entries(table: &AliasTable) -> impl Iterator<Item = (&str, &str)> {
    table.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

fn is_relative(name: &str) -> bool {
    name.starts_with("./") || name.starts_with("../") || name == "." || name == ".."
}

fn is_absolute(location: &str) -> bool {
    location.starts_with('/') || location.contains("://")
}

/// Joins a relative name onto the parent's directory inside its package.
fn join_relative(parent: &PackageId, name: &str) -> String {
    let mut segments: Vec<&str> = parent
        .subpath()
        .map(|subpath| {
            let mut dirs: Vec<&str> = subpath.split('/').filter(|s| !s.is_empty()).collect();
            dirs.pop();
            dirs
        })
        .unwrap_or_default();

    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    parent.package().with_subpath(segments.join("/")).to_string()
}
