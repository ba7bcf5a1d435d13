// crates/api-validator-config/src/config.rs
// ============================================================================
// Module: API Validator Configuration
// Description: Configuration loading, environment overrides, and validation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits,
//! then selectively overridden from environment variables. A missing default
//! file is not an error; an explicitly requested file that cannot be read is.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "api-validator.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "API_VALIDATOR_CONFIG";
/// Environment variable overriding `server.base_url`.
pub const BASE_URL_ENV_VAR: &str = "API_VALIDATOR_BASE_URL";
/// Environment variable overriding `server.timeout_ms`.
pub const TIMEOUT_ENV_VAR: &str = "API_VALIDATOR_TIMEOUT_MS";
/// Environment variable overriding `server.bearer_token`.
pub const BEARER_TOKEN_ENV_VAR: &str = "API_VALIDATOR_BEARER_TOKEN";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default base URL of the implementation under test.
pub(crate) const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
/// Default per-request timeout in milliseconds.
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Minimum per-request timeout in milliseconds.
pub(crate) const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum per-request timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 300_000;
/// Default maximum response body size in bytes.
pub(crate) const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
/// Minimum accepted response body limit in bytes.
pub(crate) const MIN_MAX_RESPONSE_BYTES: usize = 1024;
/// Maximum accepted response body limit in bytes.
pub(crate) const MAX_MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
/// Maximum length of a bearer token.
pub(crate) const MAX_BEARER_TOKEN_LENGTH: usize = 4096;
/// Maximum number of static request headers.
pub(crate) const MAX_EXTRA_HEADERS: usize = 32;
/// Maximum length of a static header value.
pub(crate) const MAX_HEADER_VALUE_LENGTH: usize = 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// API Validator configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Implementation-under-test connection settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Report and event log outputs.
    #[serde(default)]
    pub report: ReportConfig,
}

impl ValidatorConfig {
    /// Loads configuration using the default resolution rules, applies
    /// environment overrides, and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overriding, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = Self::load_unvalidated(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration and applies environment overrides without
    /// validating, so callers can layer further overrides first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or an
    /// environment override is malformed.
    pub fn load_unvalidated(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match resolve_path(path)? {
            ConfigSource::File(resolved) => Self::from_file(&resolved)?,
            ConfigSource::Defaults => Self::default(),
        };
        config.apply_overrides(&EnvOverrides::from_env()?)?;
        Ok(config)
    }

    /// Parses a configuration file without applying overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses configuration from a TOML string without validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies environment overrides on top of file values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override value is malformed.
    pub fn apply_overrides(&mut self, overrides: &EnvOverrides) -> Result<(), ConfigError> {
        if let Some(base_url) = &overrides.base_url {
            self.server.base_url.clone_from(base_url);
        }
        if let Some(raw) = &overrides.timeout_ms {
            self.server.timeout_ms = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{TIMEOUT_ENV_VAR} must be a positive integer"))
            })?;
        }
        if let Some(token) = &overrides.bearer_token {
            self.server.bearer_token = Some(token.clone());
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.report.validate()
    }
}

/// Connection settings for the implementation under test.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL the accounts endpoints are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum accepted response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Optional bearer token sent on every request.
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Static headers sent on every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            bearer_token: None,
            headers: BTreeMap::new(),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_response_bytes", &self.max_response_bytes)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ServerConfig {
    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates connection settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url(&self.base_url)?;
        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "server.timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
            )));
        }
        if !(MIN_MAX_RESPONSE_BYTES..=MAX_MAX_RESPONSE_BYTES).contains(&self.max_response_bytes)
        {
            return Err(ConfigError::Invalid(format!(
                "server.max_response_bytes must be between {MIN_MAX_RESPONSE_BYTES} and \
                 {MAX_MAX_RESPONSE_BYTES}"
            )));
        }
        if let Some(token) = &self.bearer_token {
            if token.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "server.bearer_token must be non-empty".to_string(),
                ));
            }
            if token.len() > MAX_BEARER_TOKEN_LENGTH {
                return Err(ConfigError::Invalid(
                    "server.bearer_token exceeds max length".to_string(),
                ));
            }
            if token.chars().any(char::is_control) {
                return Err(ConfigError::Invalid(
                    "server.bearer_token must not contain control characters".to_string(),
                ));
            }
        }
        if self.headers.len() > MAX_EXTRA_HEADERS {
            return Err(ConfigError::Invalid(format!(
                "server.headers exceeds {MAX_EXTRA_HEADERS} entries"
            )));
        }
        for (name, value) in &self.headers {
            validate_header(name, value, self.bearer_token.is_some())?;
        }
        Ok(())
    }
}

/// Report outputs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Optional canonical JSON report path.
    #[serde(default)]
    pub json_path: Option<PathBuf>,
    /// Optional Markdown summary path.
    #[serde(default)]
    pub markdown_path: Option<PathBuf>,
    /// Event log destination.
    #[serde(default)]
    pub event_log: EventLogTarget,
}

impl ReportConfig {
    /// Validates report outputs.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.json_path {
            validate_path_string("report.json_path", &path.to_string_lossy())?;
        }
        if let Some(path) = &self.markdown_path {
            validate_path_string("report.markdown_path", &path.to_string_lossy())?;
        }
        if let EventLogTarget::File(path) = &self.event_log {
            validate_path_string("report.event_log", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Destination for structured execution events.
///
/// Parsed from a string: `"stderr"`, `"none"`, or a file path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum EventLogTarget {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// Events are discarded.
    None,
    /// JSON lines appended to a file.
    File(PathBuf),
}

impl From<String> for EventLogTarget {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl EventLogTarget {
    /// Parses a target label; `-` is accepted as an alias for stderr.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "stderr" | "-" => Self::Stderr,
            "none" | "off" => Self::None,
            other => Self::File(PathBuf::from(other)),
        }
    }
}

// ============================================================================
// SECTION: Environment Overrides
// ============================================================================

/// Raw environment override values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Value of [`BASE_URL_ENV_VAR`].
    pub base_url: Option<String>,
    /// Value of [`TIMEOUT_ENV_VAR`].
    pub timeout_ms: Option<String>,
    /// Value of [`BEARER_TOKEN_ENV_VAR`].
    pub bearer_token: Option<String>,
}

impl fmt::Debug for EnvOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvOverrides")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl EnvOverrides {
    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but empty or not UTF-8.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: read_env_nonempty(BASE_URL_ENV_VAR)?,
            timeout_ms: read_env_nonempty(TIMEOUT_ENV_VAR)?,
            bearer_token: read_env_nonempty(BEARER_TOKEN_ENV_VAR)?,
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Where configuration values come from.
enum ConfigSource {
    /// A file that must be read.
    File(PathBuf),
    /// Built-in defaults.
    Defaults,
}

/// Resolves the config source from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<ConfigSource, ConfigError> {
    if let Some(path) = path {
        return Ok(ConfigSource::File(path.to_path_buf()));
    }
    if let Some(env_path) = read_env_nonempty(CONFIG_ENV_VAR)? {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ConfigSource::File(PathBuf::from(env_path)));
    }
    let default_path = PathBuf::from(DEFAULT_CONFIG_NAME);
    if default_path.is_file() {
        return Ok(ConfigSource::File(default_path));
    }
    Ok(ConfigSource::Defaults)
}

/// Reads an environment variable, rejecting invalid UTF-8 and empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    let Some(raw) = env::var_os(name) else {
        return Ok(None);
    };
    let value = raw
        .into_string()
        .map_err(|_| ConfigError::Invalid(format!("{name} must be valid UTF-8")))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{name} must not be empty")));
    }
    Ok(Some(value))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates the base URL of the implementation under test.
fn validate_base_url(value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|err| ConfigError::Invalid(format!("server.base_url is invalid: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid("server.base_url must use http or https".to_string()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::Invalid("server.base_url must include a host".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Invalid(
            "server.base_url must not include a query or fragment".to_string(),
        ));
    }
    Ok(())
}

/// Validates a static header entry.
fn validate_header(name: &str, value: &str, has_bearer: bool) -> Result<(), ConfigError> {
    let valid_name = !name.is_empty()
        && name.bytes().all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_'));
    if !valid_name {
        return Err(ConfigError::Invalid(format!("server.headers has invalid name: {name}")));
    }
    if has_bearer && name.eq_ignore_ascii_case("authorization") {
        return Err(ConfigError::Invalid(
            "server.headers must not set authorization when bearer_token is set".to_string(),
        ));
    }
    if value.len() > MAX_HEADER_VALUE_LENGTH || value.chars().any(char::is_control) {
        return Err(ConfigError::Invalid(format!("server.headers.{name} has an invalid value")));
    }
    Ok(())
}

/// Default base URL for serde.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Default timeout for serde.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Default response size limit for serde.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}
