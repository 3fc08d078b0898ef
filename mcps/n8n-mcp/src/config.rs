//! Configuration loading for n8n-mcp
//!
//! Configuration is loaded from the first source that exists:
//! 1. Explicit path (`--config` flag or `N8N_MCP_CONFIG`)
//! 2. `./.config.json`
//! 3. `<config dir>/n8n-mcp/config.json`
//! 4. Environment variables `N8N_HOST` / `N8N_API_KEY`
//!
//! Two file shapes are accepted:
//!
//! ```json
//! { "n8n_host": "https://n8n.example.com", "n8n_api_key": "..." }
//! ```
//!
//! ```json
//! {
//!   "environments": {
//!     "prod": { "n8n_host": "https://n8n.example.com", "n8n_api_key": "..." },
//!     "staging": { "n8n_host": "https://staging.example.com/api/v1/", "n8n_api_key": "..." }
//!   },
//!   "defaultEnv": "prod"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment name used for single-instance configuration
pub const DEFAULT_ENV_NAME: &str = "default";

const API_SUFFIX: &str = "/api/v1";

/// Errors raised while loading configuration. None of them are retried.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config must contain either n8n_host/n8n_api_key or an environments map")]
    MissingInstance,

    #[error("multi-environment config requires a defaultEnv key")]
    MissingDefaultEnv,

    #[error("defaultEnv '{0}' is not one of the declared environments")]
    UnknownDefaultEnv(String),

    #[error("environment '{env}' is missing a non-empty {field}")]
    EmptyField { env: String, field: &'static str },

    #[error("unknown environment '{requested}' (available: {available})")]
    UnknownEnvironment { requested: String, available: String },

    #[error("no configuration found: create .config.json or set N8N_HOST and N8N_API_KEY")]
    NotConfigured,
}

/// Connection parameters for one n8n instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct N8nInstance {
    /// Base URL, normalised to end in exactly one `/api/v1`
    #[serde(rename = "n8n_host")]
    pub host: String,
    /// API key sent as `X-N8N-API-KEY`
    #[serde(rename = "n8n_api_key")]
    pub api_key: String,
}

impl N8nInstance {
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: normalize_base_url(&host.into()),
            api_key: api_key.into(),
        }
    }
}

/// Raw on-disk shape, covering both single and multi-instance layouts
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    n8n_host: Option<String>,
    #[serde(default)]
    n8n_api_key: Option<String>,
    #[serde(default)]
    environments: Option<BTreeMap<String, RawInstance>>,
    #[serde(default, rename = "defaultEnv")]
    default_env: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawInstance {
    #[serde(default)]
    n8n_host: String,
    #[serde(default)]
    n8n_api_key: String,
}

/// Validated multi-environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    environments: BTreeMap<String, N8nInstance>,
    default_env: String,
}

impl Config {
    /// Build a config holding a single environment named `default`
    pub fn single(host: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = RawInstance {
            n8n_host: host.into(),
            n8n_api_key: api_key.into(),
        };
        let instance = validate_instance(DEFAULT_ENV_NAME, raw)?;
        Ok(Self {
            environments: BTreeMap::from([(DEFAULT_ENV_NAME.to_string(), instance)]),
            default_env: DEFAULT_ENV_NAME.to_string(),
        })
    }

    /// Parse and validate a JSON config document
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        Self::from_raw(raw)
    }

    /// Read and validate a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_raw(raw)
    }

    /// Build a config from `N8N_HOST` / `N8N_API_KEY` looked up via `lookup`
    ///
    /// The lookup indirection keeps tests away from process-wide env state.
    pub fn from_env_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match (lookup("N8N_HOST"), lookup("N8N_API_KEY")) {
            (None, None) => Err(ConfigError::NotConfigured),
            (host, key) => Self::single(host.unwrap_or_default(), key.unwrap_or_default()),
        }
    }

    /// Load configuration from the first available source
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        for path in Self::candidate_paths() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(&path);
            }
        }

        tracing::info!("No config file found, using N8N_HOST / N8N_API_KEY");
        Self::from_env_lookup(|key| std::env::var(key).ok())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".config.json")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("n8n-mcp").join("config.json"));
        }
        paths
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        if let Some(envs) = raw.environments {
            let default_env = raw.default_env.ok_or(ConfigError::MissingDefaultEnv)?;
            if !envs.contains_key(&default_env) {
                return Err(ConfigError::UnknownDefaultEnv(default_env));
            }

            let environments = envs
                .into_iter()
                .map(|(name, raw)| {
                    let instance = validate_instance(&name, raw)?;
                    Ok((name, instance))
                })
                .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;

            return Ok(Self {
                environments,
                default_env,
            });
        }

        match (raw.n8n_host, raw.n8n_api_key) {
            (None, None) => Err(ConfigError::MissingInstance),
            (host, key) => Self::single(host.unwrap_or_default(), key.unwrap_or_default()),
        }
    }

    /// Name of the default environment
    pub fn default_env(&self) -> &str {
        &self.default_env
    }

    /// Override the default environment (e.g. from `--env`)
    pub fn with_default_env(mut self, name: &str) -> Result<Self, ConfigError> {
        if !self.environments.contains_key(name) {
            return Err(self.unknown(name));
        }
        self.default_env = name.to_string();
        Ok(self)
    }

    /// Declared environment names, sorted
    pub fn environment_names(&self) -> Vec<&str> {
        self.environments.keys().map(String::as_str).collect()
    }

    /// Resolve an environment name (or the default) to its instance
    pub fn resolve(&self, env: Option<&str>) -> Result<(&str, &N8nInstance), ConfigError> {
        let name = env
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.default_env);
        self.environments
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| self.unknown(name))
    }

    fn unknown(&self, name: &str) -> ConfigError {
        ConfigError::UnknownEnvironment {
            requested: name.to_string(),
            available: self.environment_names().join(", "),
        }
    }
}

fn validate_instance(env: &str, raw: RawInstance) -> Result<N8nInstance, ConfigError> {
    if raw.n8n_host.trim().is_empty() {
        return Err(ConfigError::EmptyField {
            env: env.to_string(),
            field: "n8n_host",
        });
    }
    if raw.n8n_api_key.trim().is_empty() {
        return Err(ConfigError::EmptyField {
            env: env.to_string(),
            field: "n8n_api_key",
        });
    }
    Ok(N8nInstance::new(raw.n8n_host.trim(), raw.n8n_api_key.trim()))
}

/// Normalise a host to `<host>/api/v1`
///
/// Strips trailing slashes, then a trailing `/api/v1`, then re-appends
/// exactly one `/api/v1`. Idempotent.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    let base = trimmed.strip_suffix(API_SUFFIX).unwrap_or(trimmed);
    format!("{}{}", base, API_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_appends_suffix() {
        assert_eq!(
            normalize_base_url("https://n8n.example.com"),
            "https://n8n.example.com/api/v1"
        );
        assert_eq!(
            normalize_base_url("https://n8n.example.com///"),
            "https://n8n.example.com/api/v1"
        );
        assert_eq!(
            normalize_base_url("https://n8n.example.com/api/v1/"),
            "https://n8n.example.com/api/v1"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for suffix in ["", "/api/v1"] {
            for slashes in 0..=3 {
                let raw = format!("http://localhost:5678{}{}", suffix, "/".repeat(slashes));
                let once = normalize_base_url(&raw);
                assert_eq!(normalize_base_url(&once), once, "input: {}", raw);
                assert_eq!(once, "http://localhost:5678/api/v1");
            }
        }
    }

    #[test]
    fn test_single_instance_file_shape() {
        let config = Config::from_json_str(
            r#"{"n8n_host": "http://localhost:5678/", "n8n_api_key": "secret"}"#,
        )
        .unwrap();
        let (name, instance) = config.resolve(None).unwrap();
        assert_eq!(name, DEFAULT_ENV_NAME);
        assert_eq!(instance.host, "http://localhost:5678/api/v1");
        assert_eq!(instance.api_key, "secret");
    }

    #[test]
    fn test_multi_environment_shape() {
        let config = Config::from_json_str(
            r#"{
                "environments": {
                    "prod": {"n8n_host": "https://prod.example.com", "n8n_api_key": "p"},
                    "staging": {"n8n_host": "https://staging.example.com/api/v1", "n8n_api_key": "s"}
                },
                "defaultEnv": "staging"
            }"#,
        )
        .unwrap();

        assert_eq!(config.default_env(), "staging");
        assert_eq!(config.environment_names(), vec!["prod", "staging"]);
        let (_, staging) = config.resolve(None).unwrap();
        assert_eq!(staging.host, "https://staging.example.com/api/v1");
        let (_, prod) = config.resolve(Some("prod")).unwrap();
        assert_eq!(prod.api_key, "p");
    }

    #[test]
    fn test_missing_default_env_fails() {
        let err = Config::from_json_str(
            r#"{"environments": {"prod": {"n8n_host": "h", "n8n_api_key": "k"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingDefaultEnv));
    }

    #[test]
    fn test_default_env_must_be_declared() {
        let err = Config::from_json_str(
            r#"{"environments": {"prod": {"n8n_host": "h", "n8n_api_key": "k"}}, "defaultEnv": "dev"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDefaultEnv(ref e) if e == "dev"));
    }

    #[test]
    fn test_empty_key_fails() {
        let err = Config::from_json_str(
            r#"{"environments": {"prod": {"n8n_host": "h", "n8n_api_key": " "}}, "defaultEnv": "prod"}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EmptyField { ref env, field: "n8n_api_key" } if env == "prod"
        ));
    }

    #[test]
    fn test_unknown_environment_lists_available() {
        let config = Config::single("http://localhost:5678", "k").unwrap();
        let err = config.resolve(Some("prod")).unwrap_err();
        assert!(err.to_string().contains("available: default"));
    }

    #[test]
    fn test_env_lookup() {
        let config = Config::from_env_lookup(|key| match key {
            "N8N_HOST" => Some("http://n8n:5678".to_string()),
            "N8N_API_KEY" => Some("abc".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.resolve(None).unwrap().1.host, "http://n8n:5678/api/v1");

        let err = Config::from_env_lookup(|_| None).unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured));

        let err = Config::from_env_lookup(|key| (key == "N8N_HOST").then(|| "h".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyField { field: "n8n_api_key", .. }));
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"n8n_host": "http://localhost:5678", "n8n_api_key": "from-file"}}"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.resolve(None).unwrap().1.api_key, "from-file");
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_with_default_env_override() {
        let config = Config::from_json_str(
            r#"{
                "environments": {
                    "a": {"n8n_host": "http://a", "n8n_api_key": "ka"},
                    "b": {"n8n_host": "http://b", "n8n_api_key": "kb"}
                },
                "defaultEnv": "a"
            }"#,
        )
        .unwrap()
        .with_default_env("b")
        .unwrap();
        assert_eq!(config.resolve(None).unwrap().0, "b");
    }
}
