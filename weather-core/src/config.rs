use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::provider::ProviderId;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_VIACEP_URL: &str = "http://viacep.com.br";

/// Configuration for a single weather provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    /// Overrides the provider's public endpoint (used by tests and proxies).
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViaCepConfig {
    pub base_url: String,
}

impl Default for ViaCepConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_VIACEP_URL.to_string() }
    }
}

/// Top-level server configuration.
///
/// Example TOML:
/// ```toml
/// listen_addr = "0.0.0.0:8080"
/// default_provider = "weatherapi"
///
/// [providers.weatherapi]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Upper bound for every outbound provider request.
    pub request_timeout_secs: u64,
    /// Weather provider id, e.g. "weatherapi" or "openweather".
    pub default_provider: Option<String>,
    pub viacep: ViaCepConfig,
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_provider: None,
            viacep: ViaCepConfig::default(),
            providers: HashMap::new(),
        }
    }
}

impl Config {
    /// Weather provider to use; weatherapi.com when nothing is configured.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        match self.default_provider.as_deref() {
            Some(s) => ProviderId::try_from(s),
            None => Ok(ProviderId::WeatherApi),
        }
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Returns API key for a provider, if present and non-empty.
    pub fn provider_api_key(&self, id: ProviderId) -> Option<&str> {
        self.provider_config(id)
            .and_then(|cfg| cfg.api_key.as_deref())
            .filter(|key| !key.is_empty())
    }

    pub fn provider_base_url(&self, id: ProviderId) -> &str {
        self.provider_config(id)
            .and_then(|cfg| cfg.base_url.as_deref())
            .unwrap_or_else(|| id.default_base_url())
    }

    /// Outbound request timeout; `0` falls back to the default.
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Set/replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, id: ProviderId, api_key: String) {
        self.providers.entry(id.as_str().to_string()).or_default().api_key = Some(api_key);
    }

    /// Load config from `path` if given, otherwise from the platform config
    /// directory, falling back to defaults when no file exists there.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = Self::config_file_path()?;
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`: `WEATHER_API_KEY`, `OPENWEATHER_API_KEY`
    /// and `WEATHER_PROVIDER`. Empty values are ignored.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        for id in ProviderId::all() {
            if let Some(key) = var(id.api_key_env()) {
                self.upsert_provider_api_key(*id, key);
            }
        }

        if let Some(provider) = var("WEATHER_PROVIDER") {
            self.default_provider = Some(provider);
        }

        self
    }

    /// Path to the default config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
