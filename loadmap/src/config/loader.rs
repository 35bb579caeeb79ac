//! Configuration loader
//!
//! This module implements the configuration loading pipeline:
//! 1. Size check and UTF-8 BOM handling
//! 2. Loader script unwrapping (`System.config({...})`, comments removed)
//! 3. Environment variable expansion (opt-in, on the remaining text)
//! 4. YAML parsing (JSON and JS object literals parse as flow mappings)
//! 5. Merging of successive documents and files (last write wins)
//! 6. Unknown option detection
//! 7. Deserialization to typed config
//! 8. Validation
//! 9. Freeze with `Arc`

use crate::config::script;
use crate::config::validation::Validator;
use crate::error::{ConfigError, Severity, ValidationIssue};

use loadmap_core::config::LoaderConfig;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Expand `${VAR}` references before parsing.
    ///
    /// Off by default, so `$` in a location is read literally and a
    /// rendered table loads back unchanged.
    pub expand_env: bool,

    /// Limits for configuration size.
    pub config_limits: ConfigLimits,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            expand_env: false,
            config_limits: ConfigLimits::default(),
        }
    }
}

/// Limits for configuration size to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,

    /// Maximum number of path rules.
    pub max_paths: usize,

    /// Maximum number of `map` entries (aliases plus scopes).
    pub max_map_entries: usize,

    /// Maximum number of overrides in a single scope.
    pub max_scope_entries: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_config_size: env_or("LOADMAP_MAX_CONFIG_SIZE", 1024 * 1024),
            max_paths: env_or("LOADMAP_MAX_PATHS", 1000),
            max_map_entries: env_or("LOADMAP_MAX_MAP_ENTRIES", 10_000),
            max_scope_entries: env_or("LOADMAP_MAX_SCOPE_ENTRIES", 1000),
        }
    }
}

/// Result of loading a configuration.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: Arc<LoaderConfig>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl From<LoadWarning> for ValidationIssue {
    fn from(warning: LoadWarning) -> Self {
        Self {
            path: warning.location.unwrap_or_default(),
            message: warning.message,
            severity: Severity::Warning,
        }
    }
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.location.as_deref() {
            Some(location) if !location.is_empty() => {
                write!(f, "{} at {location}", self.message)
            }
            _ => f.write_str(&self.message),
        }
    }
}

/// Configuration loader.
///
/// Handles the full pipeline from source text to a frozen `LoaderConfig`.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads a single configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - Environment expansion or parsing fails
    /// - Validation fails
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        self.load_all(&[path])
    }

    /// Loads several configuration files and merges them in order.
    ///
    /// Later files override earlier ones key by key, the same way repeated
    /// configuration calls do. The merged table is validated once.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is given, or under the conditions
    /// listed for [`load`](Self::load).
    pub fn load_all<P: AsRef<Path>>(&self, paths: &[P]) -> Result<LoadResult, ConfigError> {
        if paths.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "config".to_string(),
                value: "[]".to_string(),
                expected: "at least one configuration file".to_string(),
            });
        }

        let mut warnings = Vec::new();
        let mut root = Value::Mapping(Mapping::new());

        for path in paths {
            let path = path.as_ref();
            let raw = self.read_source(path)?;
            tracing::debug!(file = %path.display(), bytes = raw.len(), "read configuration source");

            for document in self.parse_source(&raw, path, &mut warnings)? {
                deep_merge(&mut root, &document);
            }
        }

        let origin = paths
            .iter()
            .map(|p| p.as_ref().display().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        self.finish(root, &origin, warnings)
    }

    /// Loads a configuration from in-memory text.
    ///
    /// `origin` is only used in diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if the text exceeds the size limit, fails to parse,
    /// or fails validation.
    pub fn load_from_str(&self, text: &str, origin: &Path) -> Result<LoadResult, ConfigError> {
        self.check_size(text.len())?;

        let mut warnings = Vec::new();
        let mut root = Value::Mapping(Mapping::new());
        for document in self.parse_source(text, origin, &mut warnings)? {
            deep_merge(&mut root, &document);
        }

        self.finish(root, &origin.display().to_string(), warnings)
    }

    /// Reads a source file, enforcing the size limit.
    fn read_source(&self, path: &Path) -> Result<String, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size =
            usize::try_from(metadata.len()).unwrap_or(self.options.config_limits.max_config_size);
        self.check_size(file_size)?;

        std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: format!("Failed to read configuration: {e}"),
        })
    }

    fn check_size(&self, size: usize) -> Result<(), ConfigError> {
        let limit = self.options.config_limits.max_config_size;
        if size > limit {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{size} bytes"),
                expected: format!("at most {limit} bytes"),
            });
        }
        Ok(())
    }

    /// Runs the pre-parse stages and parses every document in `raw`.
    fn parse_source(
        &self,
        raw: &str,
        path: &Path,
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<Vec<Value>, ConfigError> {
        // Handle UTF-8 BOM
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        if !script::is_script(raw) {
            let text = self.expand(raw, path, warnings)?;
            return parse_document(&text, path).map(|doc| vec![doc]);
        }

        // Stage 2: Loader script unwrapping
        let code = script::strip_comments(raw);

        // Stage 3: Environment variable expansion, comments already gone
        let code = self.expand(&code, path, warnings)?;

        let calls = script::extract_config_calls(&code, path)?;
        if calls.is_empty() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "No configuration call found outside comments and strings".to_string(),
            });
        }
        tracing::debug!(file = %path.display(), calls = calls.len(), "unwrapped loader script");

        // Stage 4: Parsing
        calls
            .into_iter()
            .map(|call| parse_document(&script::normalize_call(call), path))
            .collect()
    }

    fn expand<'a>(
        &self,
        text: &'a str,
        path: &Path,
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<Cow<'a, str>, ConfigError> {
        if self.options.expand_env {
            expand_env(text, path, warnings).map(Cow::Owned)
        } else {
            Ok(Cow::Borrowed(text))
        }
    }

    /// Runs the post-parse stages on the merged document.
    fn finish(
        &self,
        root: Value,
        origin: &str,
        mut warnings: Vec<LoadWarning>,
    ) -> Result<LoadResult, ConfigError> {
        // Stage 6: Unknown option detection
        warnings.extend(unknown_option_warnings(&root, origin));

        // Stage 7: Deserialize to typed config
        let config: LoaderConfig =
            serde_yaml::from_value(root).map_err(|e| ConfigError::ParseError {
                path: PathBuf::from(origin),
                line: None,
                message: format!("Failed to deserialize configuration: {e}"),
            })?;

        // Stage 8: Validation
        let mut validator = Validator::new();
        let validation_result = validator.validate(&config, &self.options.config_limits);

        if validation_result.has_errors() {
            let warnings = warnings
                .into_iter()
                .map(ValidationIssue::from)
                .chain(validation_result.warnings)
                .collect();
            return Err(ConfigError::ValidationError {
                path: origin.to_string(),
                errors: validation_result.errors,
                warnings,
            });
        }

        for issue in validation_result.warnings {
            warnings.push(LoadWarning {
                message: issue.message,
                location: Some(issue.path),
            });
        }

        tracing::debug!(
            aliases = config.alias_count(),
            scopes = config.scope_count(),
            paths = config.paths.len(),
            "configuration loaded"
        );

        // Stage 9: Freeze
        Ok(LoadResult {
            config: Arc::new(config),
            warnings,
        })
    }
}

/// Parses one document and checks that it is a non-empty mapping.
fn parse_document(text: &str, path: &Path) -> Result<Value, ConfigError> {
    let value: Value = serde_yaml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })?;

    match value {
        Value::Mapping(_) => Ok(value),
        Value::Null => Err(ConfigError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: "Configuration file is empty".to_string(),
        }),
        other => Err(ConfigError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: format!(
                "Configuration must be a mapping of options, found {}",
                value_kind(&other)
            ),
        }),
    }
}

/// Warns about top-level keys the loader does not understand.
fn unknown_option_warnings(root: &Value, origin: &str) -> Vec<LoadWarning> {
    let Value::Mapping(map) = root else {
        return Vec::new();
    };

    map.keys()
        .filter_map(|key| {
            let Some(name) = key.as_str() else {
                return Some(LoadWarning {
                    message: format!("Ignoring non-string option key {key:?}"),
                    location: Some(origin.to_string()),
                });
            };
            if LoaderConfig::KNOWN_OPTIONS.contains(&name) {
                return None;
            }
            let message = suggest_option(name).map_or_else(
                || format!("Unknown option '{name}' is ignored"),
                |s| format!("Unknown option '{name}' is ignored (did you mean '{s}'?)"),
            );
            Some(LoadWarning {
                message,
                location: Some(origin.to_string()),
            })
        })
        .collect()
}

/// Suggests a known option for a misspelled key.
///
/// Returns the closest match if its Damerau-Levenshtein distance is ≤ 3.
fn suggest_option(input: &str) -> Option<&'static str> {
    LoaderConfig::KNOWN_OPTIONS
        .iter()
        .map(|known| (*known, strsim::damerau_levenshtein(input, known)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name)
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// An environment reference, or a bare `${` that is not a valid one.
///
/// `$$` is an escaped `$`. `${NAME:-text}` falls back to `text` and
/// `${NAME:?text}` fails with `text` when `NAME` is unset.
static ENV_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$|\$\{(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?::(?P<op>[-?])(?P<arg>[^}]*))?\}|\$\{")
        .expect("valid regex")
});

/// Expands environment references in `text`.
///
/// An unset variable without a fallback expands to nothing and adds a
/// warning.
fn expand_env(
    text: &str,
    path: &Path,
    warnings: &mut Vec<LoadWarning>,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;

    for caps in ENV_REF_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[copied..whole.start()]);
        copied = whole.end();

        if whole.as_str() == "$$" {
            out.push('$');
            continue;
        }
        let Some(name) = caps.name("name").map(|m| m.as_str()) else {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: Some(script::line_of(text, whole.start())),
                message: "Malformed environment variable reference, expected ${NAME}".to_string(),
            });
        };
        let arg = caps.name("arg").map_or("", |m| m.as_str());

        match (std::env::var(name), caps.name("op").map(|m| m.as_str())) {
            (Ok(value), _) => out.push_str(&value),
            (Err(_), Some("-")) => out.push_str(arg),
            (Err(_), Some(_)) => {
                return Err(ConfigError::EnvVarNotSet {
                    var: name.to_string(),
                    location: format!("{} ({arg})", path.display()),
                });
            }
            (Err(_), None) => warnings.push(LoadWarning {
                message: format!("Environment variable '{name}' is not set, using empty string"),
                location: Some(path.display().to_string()),
            }),
        }
    }

    out.push_str(&text[copied..]);
    Ok(out)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parses an environment variable with a default value.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Deep merges override into base.
///
/// For mappings: recursively merge keys.
/// For other types: override replaces base.
fn deep_merge(base: &mut Value, override_val: &Value) {
    match (base, override_val) {
        (Value::Mapping(base_map), Value::Mapping(override_map)) => {
            for (key, override_value) in override_map {
                if let Some(base_value) = base_map.get_mut(key) {
                    deep_merge(base_value, override_value);
                } else {
                    base_map.insert(key.clone(), override_value.clone());
                }
            }
        }
        (base, override_val) => {
            *base = override_val.clone();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGINAL_SCRIPT: &str = r#"System.config({
  defaultJSExtensions: true,
  transpiler: "traceur",
  paths: {
    "github:*": "lib/github/*"
  },

  map: {
    "components/jquery": "github:components/jquery@2.1.4",
    "traceur": "github:jmcriffey/bower-traceur@0.0.92",
    "traceur-runtime": "github:jmcriffey/bower-traceur-runtime@0.0.92",
    "twbs/bootstrap": "github:twbs/bootstrap@3.3.5",
    "github:twbs/bootstrap@3.3.5": {
      "jquery": "github:components/jquery@2.1.4"
    }
  }
});
"#;

    fn load_str(text: &str) -> Result<LoadResult, ConfigError> {
        ConfigLoader::with_defaults().load_from_str(text, Path::new("config.js"))
    }

    #[test]
    fn test_load_original_script() {
        let result = load_str(ORIGINAL_SCRIPT).unwrap();
        let config = &result.config;
        assert!(config.default_js_extensions);
        assert_eq!(config.transpiler.as_deref(), Some("traceur"));
        assert_eq!(config.paths["github:*"], "lib/github/*");
        assert_eq!(config.alias_count(), 4);
        assert_eq!(config.scope_count(), 1);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_load_json_document() {
        let json = r#"{"map": {"jquery": "github:components/jquery@2.1.4"}}"#;
        let result = load_str(json).unwrap();
        assert_eq!(
            result.config.alias("jquery"),
            Some("github:components/jquery@2.1.4")
        );
    }

    #[test]
    fn test_script_with_comments_and_trailing_commas() {
        let script = r#"
            // generated by the package manager
            System.config({
              /* extensions */ defaultJSExtensions: true,
              map: {
                "jquery": "github:components/jquery@2.1.4", // pinned
              },
            });
        "#;
        let result = load_str(script).unwrap();
        assert!(result.config.default_js_extensions);
        assert_eq!(result.config.alias_count(), 1);
    }

    #[test]
    fn test_repeated_calls_merge_last_wins() {
        let script = r#"
            System.config({ map: { "a": "npm:a@1.0.0", "b": "npm:b@1.0.0" } });
            System.config({ map: { "a": "npm:a@2.0.0" }, transpiler: "none" });
        "#;
        let config = load_str(script).unwrap().config;
        assert_eq!(config.alias("a"), Some("npm:a@2.0.0"));
        assert_eq!(config.alias("b"), Some("npm:b@1.0.0"));
        assert_eq!(config.transpiler.as_deref(), Some("none"));
    }

    #[test]
    fn test_empty_document_rejected() {
        let err = load_str("").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_non_mapping_rejected() {
        let err = load_str("- just\n- a list\n").unwrap_err();
        assert!(err.to_string().contains("found a sequence"));
    }

    #[test]
    fn test_syntax_error_reports_parse_error() {
        let err = load_str("System.config({ map: { \"a\": [ });").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_validation_errors_abort() {
        let err = load_str(r#"{"map": {"jquery": "jquery"}}"#).unwrap_err();
        match err {
            ConfigError::ValidationError { path, errors, .. } => {
                assert_eq!(path, "config.js");
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].path, "map[\"jquery\"]");
            }
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_option_warns_with_suggestion() {
        let result = load_str(r#"{"transpilr": "traceur", "map": {}}"#).unwrap();
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.message.contains("did you mean 'transpiler'"))
        );
    }

    #[test]
    fn test_unknown_option_without_suggestion() {
        let result = load_str(r#"{"bundles": {}}"#).unwrap();
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.message == "Unknown option 'bundles' is ignored")
        );
    }

    #[test]
    fn test_size_limit() {
        let loader = ConfigLoader::new(LoaderOptions {
            config_limits: ConfigLimits {
                max_config_size: 8,
                ..ConfigLimits::default()
            },
            ..LoaderOptions::default()
        });
        let err = loader
            .load_from_str(r#"{"transpiler": "traceur"}"#, Path::new("big.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "file_size"));
    }

    #[test]
    fn test_bom_is_stripped() {
        let result = load_str("\u{feff}{\"transpiler\": \"traceur\"}").unwrap();
        assert_eq!(result.config.transpiler.as_deref(), Some("traceur"));
    }

    fn load_expanded(text: &str) -> Result<LoadResult, ConfigError> {
        ConfigLoader::new(LoaderOptions {
            expand_env: true,
            ..LoaderOptions::default()
        })
        .load_from_str(text, Path::new("config.js"))
    }

    #[test]
    fn test_env_references_read_literally_by_default() {
        let result = load_str(
            r#"{"baseURL": "${LOADMAP_TEST_UNEXPANDED_XYZ123}", "paths": {"app/*": "src/$$app/*"}}"#,
        )
        .unwrap();
        assert_eq!(
            result.config.base_url.as_deref(),
            Some("${LOADMAP_TEST_UNEXPANDED_XYZ123}")
        );
        assert_eq!(result.config.paths["app/*"], "src/$$app/*");
    }

    #[test]
    fn test_rendered_table_loads_back_unchanged() {
        let text = r#"System.config({
            paths: { "app/*": "src/$$app/*", "cdn:*": "${CDN}/*" },
            map: { "jquery": "github:components/jquery@2.1.4" }
        });"#;
        let first = load_str(text).unwrap().config;
        let rendered = script::render(&first).unwrap();
        let second = load_str(&rendered).unwrap().config;
        assert_eq!(*first, *second);
    }

    #[test]
    fn test_env_reference_in_comment_not_expanded() {
        let script = r#"
            // baseURL: "${LOADMAP_TEST_COMMENTED_XYZ123:?never read}"
            /* ${ */
            System.config({ transpiler: "traceur" });
        "#;
        let result = load_expanded(script).unwrap();
        assert_eq!(result.config.transpiler.as_deref(), Some("traceur"));
        assert!(
            !result
                .warnings
                .iter()
                .any(|w| w.message.contains("Environment variable")),
            "{:?}",
            result.warnings
        );
    }

    #[test]
    fn test_expansion_applies_inside_calls() {
        let script = r#"System.config({ baseURL: "${LOADMAP_TEST_NONEXISTENT_BASE_XYZ123:-/assets}" });"#;
        let result = load_expanded(script).unwrap();
        assert_eq!(result.config.base_url.as_deref(), Some("/assets"));
    }

    #[test]
    fn test_commented_out_call_rejected() {
        let err = load_str("// System.config({ map: { \"a\": \"npm:a@1.0.0\" } });\n").unwrap_err();
        match err {
            ConfigError::ParseError { message, .. } => {
                assert!(message.contains("No configuration call found"), "{message}");
            }
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_minified_script_matches_formatted() {
        let minified = concat!(
            r#"System.config({defaultJSExtensions:true,transpiler:"traceur","#,
            r#"paths:{"github:*":"lib/github/*"},"#,
            r#"map:{"components/jquery":"github:components/jquery@2.1.4","#,
            r#""traceur":"github:jmcriffey/bower-traceur@0.0.92","#,
            r#""traceur-runtime":"github:jmcriffey/bower-traceur-runtime@0.0.92","#,
            r#""twbs/bootstrap":"github:twbs/bootstrap@3.3.5","#,
            r#""github:twbs/bootstrap@3.3.5":{"jquery":"github:components/jquery@2.1.4"}}});"#,
        );
        let compact = load_str(minified).unwrap().config;
        let formatted = load_str(ORIGINAL_SCRIPT).unwrap().config;
        assert_eq!(*compact, *formatted);
    }

    #[test]
    fn test_validation_error_keeps_load_warnings() {
        let err = load_str(r#"{"bundles": {}, "map": {"jquery": "jquery"}}"#).unwrap_err();
        match err {
            ConfigError::ValidationError {
                errors, warnings, ..
            } => {
                assert_eq!(errors.len(), 1);
                assert!(
                    warnings
                        .iter()
                        .any(|w| w.message == "Unknown option 'bundles' is ignored"
                            && w.severity == Severity::Warning)
                );
            }
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_all_requires_a_path() {
        let paths: [&Path; 0] = [];
        let err = ConfigLoader::with_defaults().load_all(&paths).unwrap_err();
        assert!(err.to_string().contains("at least one configuration file"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigLoader::with_defaults()
            .load(Path::new("/tmp/loadmap_nonexistent_config_xyz.js"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    fn expand(text: &str) -> (Result<String, ConfigError>, Vec<LoadWarning>) {
        let mut warnings = Vec::new();
        let result = expand_env(text, Path::new("test.yaml"), &mut warnings);
        (result, warnings)
    }

    #[test]
    fn test_expand_env_default() {
        let (result, _) = expand("value: ${LOADMAP_TEST_NONEXISTENT_VAR_XYZ123:-lib}");
        assert_eq!(result.unwrap(), "value: lib");
    }

    #[test]
    fn test_expand_env_required_missing() {
        match expand("value: ${LOADMAP_TEST_REQUIRED_XYZ123:?must be set}").0 {
            Err(ConfigError::EnvVarNotSet { var, location }) => {
                assert_eq!(var, "LOADMAP_TEST_REQUIRED_XYZ123");
                assert!(location.contains("must be set"));
            }
            other => panic!("Expected EnvVarNotSet error, got {other:?}"),
        }
    }

    #[test]
    fn test_expand_env_escaped_dollar() {
        let (result, _) = expand("price: $$100, ref: $${HOME}, plain: $5");
        assert_eq!(result.unwrap(), "price: $100, ref: ${HOME}, plain: $5");
    }

    #[test]
    fn test_expand_env_missing_warning() {
        let (result, warnings) = expand("value: ${LOADMAP_TEST_WARN_XYZ123}");
        assert_eq!(result.unwrap(), "value: ");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("LOADMAP_TEST_WARN_XYZ123"));
    }

    #[test]
    fn test_expand_env_malformed_reference() {
        match expand("a: 1\nvalue: ${OPEN").0 {
            Err(ConfigError::ParseError { line, .. }) => assert_eq!(line, Some(2)),
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_deep_merge_replaces_alias_with_scope() {
        let mut base =
            serde_yaml::from_str::<Value>("map:\n  x: \"npm:x@1.0.0\"\n  y: \"npm:y@1.0.0\"")
                .unwrap();
        let override_val =
            serde_yaml::from_str::<Value>("map:\n  x:\n    a: \"npm:a@1.0.0\"").unwrap();
        deep_merge(&mut base, &override_val);

        let config: LoaderConfig = serde_yaml::from_value(base).unwrap();
        assert!(config.scope("x").is_some());
        assert_eq!(config.alias("y"), Some("npm:y@1.0.0"));
    }

    #[test]
    fn test_config_limits_default() {
        let limits = ConfigLimits::default();
        assert_eq!(limits.max_config_size, 1024 * 1024);
        assert_eq!(limits.max_paths, 1000);
        assert_eq!(limits.max_map_entries, 10_000);
        assert_eq!(limits.max_scope_entries, 1000);
    }

    #[test]
    fn test_load_warning_display() {
        let warning = LoadWarning {
            message: "Scope has no overrides".to_string(),
            location: Some("map[\"x\"]".to_string()),
        };
        assert_eq!(warning.to_string(), "Scope has no overrides at map[\"x\"]");

        let bare = LoadWarning {
            message: "Configuration table is empty".to_string(),
            location: Some(String::new()),
        };
        assert_eq!(bare.to_string(), "Configuration table is empty");
    }
}
