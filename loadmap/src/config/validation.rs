//! Configuration validation
//!
//! Schema and semantic checks on a fully deserialized `LoaderConfig`.
//! Building a table never validates; the loader runs these checks before
//! a table is handed to a module loader.
//!
//! Validation collects ALL issues (doesn't stop at first) to provide
//! comprehensive feedback to users.

use std::collections::HashSet;

use loadmap_core::config::{AliasTable, LoaderConfig, PackageId};

use crate::config::loader::ConfigLimits;
use crate::error::{Severity, ValidationIssue};

// ============================================================================
// Public API
// ============================================================================

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent registration).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns the result.
    ///
    /// This method collects all errors and warnings rather than stopping
    /// at the first issue.
    pub fn validate(&mut self, config: &LoaderConfig, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        if config.is_empty() {
            self.add_warning("", "Configuration table is empty");
        }

        // Schema validation
        self.validate_options(config);
        self.validate_paths(config);
        self.validate_aliases(config);
        self.validate_scopes(config);

        // Semantic validation
        self.validate_transpiler_alias(config);
        self.validate_scope_reachability(config);
        self.validate_path_consumers(config);

        // Limits validation
        self.validate_limits(config, limits);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Schema Validation
    // ========================================================================

    /// Validates the option flags.
    fn validate_options(&mut self, config: &LoaderConfig) {
        if let Some(transpiler) = &config.transpiler {
            if transpiler.trim().is_empty() {
                self.add_error("transpiler", "Transpiler identifier cannot be empty");
            }
        }

        if let Some(base_url) = &config.base_url {
            if base_url.trim().is_empty() {
                self.add_warning("baseURL", "baseURL is empty and has no effect");
            }
        }
    }

    /// Validates path rule patterns and templates.
    fn validate_paths(&mut self, config: &LoaderConfig) {
        for (pattern, template) in &config.paths {
            let path = format!("paths[{pattern:?}]");

            if pattern.is_empty() {
                self.add_error(&path, "Path pattern cannot be empty");
                continue;
            }

            let pattern_stars = pattern.matches('*').count();
            let template_stars = template.matches('*').count();

            if pattern_stars > 1 {
                self.add_error(
                    &path,
                    &format!("Path pattern '{pattern}' has {pattern_stars} wildcards; at most one is allowed"),
                );
            }

            if template.is_empty() {
                self.add_error(&path, "Path template cannot be empty");
            } else if template_stars != pattern_stars.min(1) {
                self.add_error(
                    &path,
                    &format!(
                        "Path template '{template}' must contain {} wildcard(s) to match pattern '{pattern}'",
                        pattern_stars.min(1)
                    ),
                );
            }
        }
    }

    /// Validates global package aliases.
    fn validate_aliases(&mut self, config: &LoaderConfig) {
        for (name, target) in config.aliases() {
            let path = format!("map[{name:?}]");

            if name.is_empty() {
                self.add_error(&path, "Alias name cannot be empty");
            }

            self.check_versioned(target, &path);
        }
    }

    /// Validates scoped override tables.
    fn validate_scopes(&mut self, config: &LoaderConfig) {
        for (package, table) in config.scopes() {
            let path = format!("map[{package:?}]");

            match PackageId::parse(package) {
                Ok(id) if id.subpath().is_some() => self.add_error(
                    &path,
                    &format!(
                        "Scope key '{package}' must name a package, not a path inside one (use '{}')",
                        id.package_key()
                    ),
                ),
                Ok(_) => {}
                Err(e) => self.add_error(
                    &path,
                    &format!("Scope key must be a fully qualified versioned identifier: {e}"),
                ),
            }

            if table.is_empty() {
                self.add_warning(&path, "Scope has no overrides");
            }

            self.validate_scope_entries(table, &path);
        }
    }

    /// Validates the entries of one scope.
    fn validate_scope_entries(&mut self, table: &AliasTable, scope_path: &str) {
        for (name, target) in table {
            let path = format!("{scope_path}[{name:?}]");

            if name.is_empty() {
                self.add_error(&path, "Override name cannot be empty");
            }

            self.check_versioned(target, &path);
        }
    }

    // ========================================================================
    // Semantic Validation
    // ========================================================================

    /// Warns when the transpiler has no alias to resolve through.
    fn validate_transpiler_alias(&mut self, config: &LoaderConfig) {
        let Some(transpiler) = config.transpiler.as_deref() else {
            return;
        };
        if transpiler.trim().is_empty() || PackageId::is_versioned(transpiler) {
            return;
        }
        if config.alias(transpiler).is_none() {
            self.add_warning(
                "transpiler",
                &format!("Transpiler '{transpiler}' has no package alias in 'map'"),
            );
        }
    }

    /// Warns about scopes that no alias leads to.
    fn validate_scope_reachability(&mut self, config: &LoaderConfig) {
        let targets = collect_target_packages(config);

        for (package, _) in config.scopes() {
            if !targets.contains(package) {
                self.add_warning(
                    &format!("map[{package:?}]"),
                    &format!("No alias resolves to '{package}'; its overrides are only used for direct dependents"),
                );
            }
        }
    }

    /// Warns about path rules that no mapped package would pass through.
    fn validate_path_consumers(&mut self, config: &LoaderConfig) {
        let targets: Vec<&str> = config
            .aliases()
            .map(|(_, target)| target)
            .chain(config.scopes().flat_map(|(_, t)| t.values().map(String::as_str)))
            .collect();

        if targets.is_empty() {
            return;
        }

        for pattern in config.paths.keys() {
            let consumed = targets.iter().any(|target| pattern_matches(pattern, target));
            if !consumed {
                self.add_warning(
                    &format!("paths[{pattern:?}]"),
                    &format!("Path rule '{pattern}' matches no mapped package"),
                );
            }
        }
    }

    // ========================================================================
    // Limits Validation
    // ========================================================================

    /// Validates table sizes against limits.
    fn validate_limits(&mut self, config: &LoaderConfig, limits: &ConfigLimits) {
        if config.paths.len() > limits.max_paths {
            self.add_error(
                "paths",
                &format!(
                    "Too many path rules: {} (limit: {})",
                    config.paths.len(),
                    limits.max_paths
                ),
            );
        }

        if config.map.len() > limits.max_map_entries {
            self.add_error(
                "map",
                &format!(
                    "Too many map entries: {} (limit: {})",
                    config.map.len(),
                    limits.max_map_entries
                ),
            );
        }

        for (package, table) in config.scopes() {
            if table.len() > limits.max_scope_entries {
                self.add_error(
                    &format!("map[{package:?}]"),
                    &format!(
                        "Too many overrides in scope: {} (limit: {})",
                        table.len(),
                        limits.max_scope_entries
                    ),
                );
            }
        }
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Adds an error unless `target` is a versioned identifier.
    fn check_versioned(&mut self, target: &str, path: &str) {
        if let Err(e) = PackageId::parse(target) {
            self.add_error(path, &format!("Target is not a versioned identifier: {e}"));
        }
    }

    /// Adds an error to the validation result.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the validation result.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Collects the package keys every alias and override points at.
fn collect_target_packages(config: &LoaderConfig) -> HashSet<String> {
    config
        .aliases()
        .map(|(_, target)| target)
        .chain(config.scopes().flat_map(|(_, t)| t.values().map(String::as_str)))
        .filter_map(|target| PackageId::parse(target).ok())
        .map(|id| id.package_key())
        .collect()
}

/// Returns `true` if a path rule pattern applies to `id`.
fn pattern_matches(pattern: &str, id: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            id.len() >= prefix.len() + suffix.len()
                && id.starts_with(prefix)
                && id.ends_with(suffix)
        }
        None => pattern == id,
    }
}

// ============================================================================
// Tests
// ============================================================================
