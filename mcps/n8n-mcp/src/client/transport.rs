//! Per-environment HTTP transports
//!
//! [`TransportFactory`] owns the loaded [`Config`] and lazily builds one
//! [`Transport`] per environment name. Repeated lookups return the same
//! `Arc`, so requests to one environment share a connection pool.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::config::{Config, N8nInstance};
use crate::error::{N8nError, N8nResult};

/// Header carrying the n8n API key
pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// HTTP client bound to one environment
#[derive(Debug)]
pub struct Transport {
    env: String,
    base_url: String,
    http: Client,
}

impl Transport {
    pub fn new(env: &str, instance: &N8nInstance) -> N8nResult<Self> {
        let client_err = |reason: String| N8nError::Client {
            env: env.to_string(),
            reason,
        };

        let mut api_key = HeaderValue::from_str(&instance.api_key)
            .map_err(|e| client_err(format!("invalid API key header: {}", e)))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(concat!("n8n-mcp/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| client_err(e.to_string()))?;

        Ok(Self {
            env: env.to_string(),
            base_url: instance.host.clone(),
            http,
        })
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Absolute URL for an API path such as `/workflows/1`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Resolves environment names to cached transports
#[derive(Debug)]
pub struct TransportFactory {
    config: RwLock<Arc<Config>>,
    cache: Mutex<HashMap<String, Arc<Transport>>>,
}

impl TransportFactory {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config: RwLock::new(config),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Current configuration snapshot
    pub fn config(&self) -> Arc<Config> {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Transport for `env`, or the default environment when `None`
    pub fn transport(&self, env: Option<&str>) -> N8nResult<Arc<Transport>> {
        let config = self.config();
        let (name, instance) = config.resolve(env)?;

        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = cache.get(name) {
            return Ok(existing.clone());
        }

        tracing::debug!("Creating HTTP transport for environment '{}'", name);
        let transport = Arc::new(Transport::new(name, instance)?);
        cache.insert(name.to_string(), transport.clone());
        Ok(transport)
    }

    /// Drop every cached transport; they are rebuilt on next use
    pub fn clear_cache(&self) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Swap in a new configuration and invalidate the cache
    pub fn reload(&self, config: Arc<Config>) {
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
        self.clear_cache();
        tracing::info!("Configuration reloaded, transport cache cleared");
    }

    /// Environment names that currently hold a transport, sorted
    pub fn cached_environments(&self) -> Vec<String> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = cache.keys().cloned().collect();
        names.sort();
        names
    }
}
