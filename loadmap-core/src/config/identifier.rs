//! Versioned package identifiers
//!
//! A fully qualified identifier names a registry, a package and an exact
//! version: `github:components/jquery@2.1.4`. Resolved identifiers may
//! carry a sub-path inside the package
//! (`github:components/jquery@2.1.4/dist/jquery`).

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;

/// `registry:name@version[/subpath]`; scoped names keep their leading `@`.
static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*):((?:@[^/@\s]+/)?[^@\s]+)@([^/@\s]+)(?:/(\S+))?$")
        .expect("valid regex")
});

/// A parsed versioned package identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId {
    registry: String,
    name: String,
    version: String,
    subpath: Option<String>,
}

impl PackageId {
    /// Creates an identifier from its parts without checking them.
    #[must_use]
    pub fn new(
        registry: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            registry: registry.into(),
            name: name.into(),
            version: version.into(),
            subpath: None,
        }
    }

    /// Returns a copy pointing at `subpath` inside the same package.
    #[must_use]
    pub fn with_subpath(mut self, subpath: impl Into<String>) -> Self {
        let subpath = subpath.into();
        self.subpath = if subpath.is_empty() {
            None
        } else {
            Some(subpath)
        };
        self
    }

    /// Parses `value`, rejecting anything that is not versioned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidIdentifier`] describing the first
    /// structural problem found.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidIdentifier {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let Some(caps) = IDENTIFIER_RE.captures(value) else {
            return Err(invalid(rejection_reason(value)));
        };

        let name = &caps[2];
        if name.starts_with('/') || name.ends_with('/') || name.contains("//") {
            return Err(invalid("package name has an empty path segment"));
        }

        Ok(Self {
            registry: caps[1].to_string(),
            name: name.to_string(),
            version: caps[3].to_string(),
            subpath: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    /// Returns `true` if `value` parses as a versioned identifier.
    #[must_use]
    pub fn is_versioned(value: &str) -> bool {
        Self::parse(value).is_ok()
    }

    /// Registry prefix (e.g. `github`).
    #[must_use]
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// Package name (e.g. `components/jquery`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exact version (e.g. `2.1.4`).
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Path inside the package, if any.
    #[must_use]
    pub fn subpath(&self) -> Option<&str> {
        self.subpath.as_deref()
    }

    /// The package itself, without any sub-path.
    #[must_use]
    pub fn package(&self) -> Self {
        Self {
            subpath: None,
            ..self.clone()
        }
    }

    /// Canonical `registry:name@version` form, used as scope key.
    #[must_use]
    pub fn package_key(&self) -> String {
        format!("{}:{}@{}", self.registry, self.name, self.version)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.registry, self.name, self.version)?;
        if let Some(subpath) = &self.subpath {
            write!(f, "/{subpath}")?;
        }
        Ok(())
    }
}

impl FromStr for PackageId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Explains why `value` did not match the identifier grammar.
fn rejection_reason(value: &str) -> &'static str {
    if value.is_empty() {
        return "identifier is empty";
    }
    if value.chars().any(char::is_whitespace) {
        return "identifier contains whitespace";
    }
    let Some((registry, rest)) = value.split_once(':') else {
        return "missing registry prefix (expected 'registry:name@version')";
    };
    if registry.is_empty() {
        return "missing registry prefix (expected 'registry:name@version')";
    }
    if rest.is_empty() {
        return "missing package name";
    }
    // A leading '@' belongs to a scoped name, not to the version.
    let Some(at) = rest.get(1..).and_then(|tail| tail.find('@')) else {
        return "missing version separator '@'";
    };
    let after = &rest[at + 2..];
    if after.is_empty() || after.starts_with('/') {
        return "missing version after '@'";
    }
    if after.contains('@') && !after.contains('/') {
        return "more than one version separator";
    }
    "malformed versioned identifier"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_identifier() {
        let id = PackageId::parse("github:components/jquery@2.1.4").unwrap();
        assert_eq!(id.registry(), "github");
        assert_eq!(id.name(), "components/jquery");
        assert_eq!(id.version(), "2.1.4");
        assert_eq!(id.subpath(), None);
    }

    #[test]
    fn test_parse_with_subpath() {
        let id = PackageId::parse("github:twbs/bootstrap@3.3.5/js/modal").unwrap();
        assert_eq!(id.name(), "twbs/bootstrap");
        assert_eq!(id.version(), "3.3.5");
        assert_eq!(id.subpath(), Some("js/modal"));
        assert_eq!(id.package_key(), "github:twbs/bootstrap@3.3.5");
        assert_eq!(id.to_string(), "github:twbs/bootstrap@3.3.5/js/modal");
    }

    #[test]
    fn test_parse_scoped_name() {
        let id = PackageId::parse("npm:@angular/core@2.0.0").unwrap();
        assert_eq!(id.registry(), "npm");
        assert_eq!(id.name(), "@angular/core");
        assert_eq!(id.version(), "2.0.0");
    }

    #[test]
    fn test_prerelease_version() {
        let id = PackageId::parse("npm:babel-core@6.0.0-beta.1").unwrap();
        assert_eq!(id.version(), "6.0.0-beta.1");
    }

    #[test]
    fn test_rejects_bare_name() {
        let err = PackageId::parse("jquery").unwrap_err();
        assert!(err.to_string().contains("missing registry prefix"));
    }

    #[test]
    fn test_rejects_missing_version() {
        let err = PackageId::parse("github:components/jquery").unwrap_err();
        assert!(err.to_string().contains("missing version separator"));
    }

    #[test]
    fn test_rejects_empty_version() {
        let err = PackageId::parse("github:components/jquery@").unwrap_err();
        assert!(err.to_string().contains("missing version after '@'"));
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert!(
            PackageId::parse("")
                .unwrap_err()
                .to_string()
                .contains("empty")
        );
        assert!(
            PackageId::parse("github:a b@1")
                .unwrap_err()
                .to_string()
                .contains("whitespace")
        );
    }

    #[test]
    fn test_rejects_empty_name_segment() {
        assert!(PackageId::parse("github:twbs/@3.3.5").is_err());
        assert!(PackageId::parse("github:/bootstrap@3.3.5").is_err());
    }

    #[test]
    fn test_display_round_trips_canonical_form() {
        let raw = "github:jmcriffey/bower-traceur@0.0.92";
        assert_eq!(PackageId::parse(raw).unwrap().to_string(), raw);
    }

    #[test]
    fn test_package_drops_subpath() {
        let id = PackageId::new("github", "twbs/bootstrap", "3.3.5").with_subpath("dist/css");
        assert_eq!(id.package().to_string(), "github:twbs/bootstrap@3.3.5");
        assert_eq!(
            id.with_subpath("").to_string(),
            "github:twbs/bootstrap@3.3.5"
        );
    }

    #[test]
    fn test_from_str() {
        let id: PackageId = "github:twbs/bootstrap@3.3.5".parse().unwrap();
        assert_eq!(id, PackageId::new("github", "twbs/bootstrap", "3.3.5"));
    }
}
