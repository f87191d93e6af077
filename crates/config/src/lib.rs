//! Configuration loading, validation, and management for the Radarr MCP server.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. the default config file (`$RADARR_CONFIG`, then
//!    `~/.config/mcp-radarr/config.toml`, then `./config.toml`)
//! 3. an explicit `--config` file, deep-merged over the default file
//! 4. `RADARR_URL` / `RADARR_API_KEY` environment variables
//!
//! CLI flags are applied on top by the binary. The resulting
//! [`AppConfig`] is built once at startup and passed down explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Connection to the Radarr instance
    #[serde(default)]
    pub radarr: RadarrConfig,

    /// MCP transport settings
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RadarrConfig {
    /// Base URL, e.g. `http://localhost:7878`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout for Radarr API calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RadarrConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl fmt::Debug for RadarrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadarrConfig")
            .field("url", &self.url)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// How the MCP server talks to its client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    /// Line-delimited JSON-RPC on stdin/stdout
    #[default]
    Stdio,
    /// JSON-RPC over HTTP POST
    Http,
}

impl fmt::Display for ServerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdio => f.write_str("stdio"),
            Self::Http => f.write_str("http"),
        }
    }
}

impl FromStr for ServerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            other => Err(ConfigError::ValidationError(format!(
                "unknown server mode '{other}' (expected stdio or http)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub mode: ServerMode,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8050
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mode: ServerMode::default(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

const PLACEHOLDER_API_KEY: &str = "changeme";

impl AppConfig {
    /// Load configuration from the default file, an optional explicit file,
    /// and the process environment.
    ///
    /// The result is not validated; call [`AppConfig::validate`] before
    /// talking to Radarr.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let default = default_config_path(&env, &dirs_home(), &cwd);
        Self::load_layers(default.as_deref(), explicit, env)
    }

    /// Layer the given files and environment lookup over the defaults.
    ///
    /// A missing default file is skipped; a missing explicit file is an error.
    pub fn load_layers<F>(
        default: Option<&Path>,
        explicit: Option<&Path>,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut table = toml::Table::new();

        if let Some(path) = default {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading default config file");
                table = read_table(path)?;
            } else {
                tracing::info!("No config file found at {}, using defaults", path.display());
            }
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    reason: "file does not exist".into(),
                });
            }
            tracing::debug!(path = %path.display(), "Merging explicit config file");
            merge_tables(&mut table, read_table(path)?);
        }

        let origin = explicit.or(default).map(Path::to_path_buf).unwrap_or_default();
        let mut config: Self =
            toml::Value::Table(table)
                .try_into()
                .map_err(|e: toml::de::Error| ConfigError::ParseError {
                    path: origin,
                    reason: e.to_string(),
                })?;

        config.apply_env(env);
        config.normalize();
        Ok(config)
    }

    /// Load a single file over the defaults, ignoring the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_layers(None, Some(path), |_| None)
    }

    /// `RADARR_URL` and `RADARR_API_KEY` override file values.
    pub fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env("RADARR_URL").filter(|v| !v.is_empty()) {
            self.radarr.url = Some(url);
        }
        if let Some(key) = env("RADARR_API_KEY").filter(|v| !v.is_empty()) {
            self.radarr.api_key = Some(key);
        }
    }

    fn normalize(&mut self) {
        if let Some(url) = &mut self.radarr.url {
            *url = url.trim().trim_end_matches('/').to_string();
        }
    }

    /// Check everything needed to reach Radarr.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.radarr_url()?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "radarr.url must start with http:// or https:// (got '{url}')"
            )));
        }

        self.radarr_api_key()?;

        if self.radarr.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "radarr.timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    pub fn radarr_url(&self) -> Result<&str, ConfigError> {
        self.radarr
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::Missing("radarr.url (or RADARR_URL)"))
    }

    pub fn radarr_api_key(&self) -> Result<&str, ConfigError> {
        match self.radarr.api_key.as_deref() {
            None | Some("") => Err(ConfigError::Missing("radarr.api_key (or RADARR_API_KEY)")),
            Some(PLACEHOLDER_API_KEY) => Err(ConfigError::ValidationError(
                "radarr.api_key is still the placeholder 'changeme'".into(),
            )),
            Some(key) => Ok(key),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.radarr_api_key().is_ok()
    }

    /// The user-level configuration directory (`~/.config/mcp-radarr`).
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".config").join("mcp-radarr")
    }

    /// Effective configuration as TOML with the API key masked.
    pub fn redacted_toml(&self) -> String {
        let mut shown = self.clone();
        if shown.radarr.api_key.is_some() {
            shown.radarr.api_key = Some("[REDACTED]".into());
        }
        toml::to_string_pretty(&shown).unwrap_or_default()
    }

    /// A starter config file.
    pub fn default_toml() -> String {
        let mut config = Self::default();
        config.radarr.url = Some("http://localhost:7878".into());
        config.radarr.api_key = Some(PLACEHOLDER_API_KEY.into());
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// `$RADARR_CONFIG` if set, else the first existing of the user and
/// working-directory config files.
pub fn default_config_path<F>(env: &F, home: &Path, cwd: &Path) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = env("RADARR_CONFIG").filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    [
        home.join(".config").join("mcp-radarr").join("config.toml"),
        cwd.join("config.toml"),
    ]
    .into_iter()
    .find(|candidate| candidate.exists())
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    content
        .parse::<toml::Table>()
        .map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Recursively merge `overlay` into `base`; overlay wins on conflicts.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) if matches!(base.get(&key), Some(toml::Value::Table(_))) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, incoming);
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.radarr.url = Some("http://localhost:7878".into());
        config.radarr.api_key = Some("abc123".into());
        config
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.mode, ServerMode::Stdio);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8050");
        assert_eq!(config.radarr.timeout_secs, 30);
        assert!(config.radarr.url.is_none());
    }

    #[test]
    fn loads_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "config.toml",
            "[radarr]\nurl = \"http://radarr:7878/\"\napi_key = \"k\"\n\n[server]\nmode = \"http\"\nport = 9000\n",
        );
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.radarr.url.as_deref(), Some("http://radarr:7878"));
        assert_eq!(config.server.mode, ServerMode::Http);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_file_deep_merges_over_default() {
        let dir = tempfile::tempdir().unwrap();
        let default = write_file(
            dir.path(),
            "default.toml",
            "[radarr]\nurl = \"http://a:7878\"\napi_key = \"from-default\"\n[server]\nport = 1111\n",
        );
        let explicit = write_file(dir.path(), "explicit.toml", "[radarr]\napi_key = \"from-explicit\"\n");

        let config = AppConfig::load_layers(Some(&default), Some(&explicit), no_env).unwrap();
        assert_eq!(config.radarr.url.as_deref(), Some("http://a:7878"));
        assert_eq!(config.radarr.api_key.as_deref(), Some("from-explicit"));
        assert_eq!(config.server.port, 1111);
    }

    #[test]
    fn environment_wins_over_files() {
        let dir = tempfile::tempdir().unwrap();
        let default = write_file(dir.path(), "c.toml", "[radarr]\nurl = \"http://file:1\"\napi_key = \"file\"\n");
        let env: HashMap<&str, &str> =
            HashMap::from([("RADARR_URL", "https://env:2/"), ("RADARR_API_KEY", "env-key")]);

        let config =
            AppConfig::load_layers(Some(&default), None, |k| env.get(k).map(|v| v.to_string()))
                .unwrap();
        assert_eq!(config.radarr.url.as_deref(), Some("https://env:2"));
        assert_eq!(config.radarr.api_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn missing_default_file_returns_defaults() {
        let config =
            AppConfig::load_layers(Some(Path::new("/nonexistent/config.toml")), None, no_env)
                .unwrap();
        assert_eq!(config.server.port, 8050);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load_from(Path::new("/nonexistent/explicit.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "bad.toml", "[radarr\nurl = ");
        assert!(matches!(
            AppConfig::load_from(&path).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
    }

    #[test]
    fn wrong_types_are_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "bad.toml", "[server]\nport = \"eighty\"\n");
        assert!(matches!(
            AppConfig::load_from(&path).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
    }

    #[test]
    fn validation_rules() {
        assert!(valid().validate().is_ok());

        let mut config = valid();
        config.radarr.url = None;
        assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));

        let mut config = valid();
        config.radarr.url = Some("localhost:7878".into());
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = valid();
        config.radarr.api_key = Some("changeme".into());
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = valid();
        config.radarr.api_key = None;
        assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));

        let mut config = valid();
        config.radarr.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_path_prefers_env_then_home_then_cwd() {
        let home = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();

        assert_eq!(default_config_path(&no_env, home.path(), cwd.path()), None);

        let local = write_file(cwd.path(), "config.toml", "");
        assert_eq!(default_config_path(&no_env, home.path(), cwd.path()), Some(local));

        let user_dir = home.path().join(".config").join("mcp-radarr");
        std::fs::create_dir_all(&user_dir).unwrap();
        let user = write_file(&user_dir, "config.toml", "");
        assert_eq!(default_config_path(&no_env, home.path(), cwd.path()), Some(user));

        let env = |k: &str| (k == "RADARR_CONFIG").then(|| "/etc/radarr.toml".to_string());
        assert_eq!(
            default_config_path(&env, home.path(), cwd.path()),
            Some(PathBuf::from("/etc/radarr.toml"))
        );
    }

    #[test]
    fn debug_and_status_output_redact_api_key() {
        let config = valid();
        let debug = format!("{config:?}");
        assert!(!debug.contains("abc123"));
        assert!(debug.contains("[REDACTED]"));

        let shown = config.redacted_toml();
        assert!(!shown.contains("abc123"));
        assert!(shown.contains("localhost:7878"));
    }

    #[test]
    fn server_mode_parsing() {
        assert_eq!("HTTP".parse::<ServerMode>().unwrap(), ServerMode::Http);
        assert_eq!("stdio".parse::<ServerMode>().unwrap(), ServerMode::Stdio);
        assert!("sse".parse::<ServerMode>().is_err());
    }

    #[test]
    fn default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, 8050);
        assert_eq!(parsed.radarr.api_key.as_deref(), Some("changeme"));
        assert!(parsed.validate().is_err());
    }
}
