use crate::{
    Config, PostalLookup, WeatherError, WeatherReading,
    provider::{openweather::OpenWeatherProvider, viacep::ViaCepProvider, weatherapi::WeatherApiProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug, sync::Arc, time::Duration};

pub mod openweather;
pub mod viacep;
pub mod weatherapi;

/// Resolves a postal code to a city name.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    /// Malformed codes fail with [`WeatherError::InvalidZipCode`] without a
    /// network call. A well-formed code with no match is `Ok` with
    /// `found == false`.
    async fn resolve(&self, zip_code: &str) -> Result<PostalLookup, WeatherError>;
}

/// Looks up the current temperature for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> Result<WeatherReading, WeatherError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    WeatherApi,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::WeatherApi => "weatherapi",
            ProviderId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::WeatherApi, ProviderId::OpenWeather]
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderId::WeatherApi => weatherapi::DEFAULT_BASE_URL,
            ProviderId::OpenWeather => openweather::DEFAULT_BASE_URL,
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderId::WeatherApi => "WEATHER_API_KEY",
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "weatherapi" => Ok(ProviderId::WeatherApi),
            "openweather" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: weatherapi, openweather."
            )),
        }
    }
}

/// HTTP client shared by all providers, bounded by the configured timeout.
pub fn http_client(timeout: Duration) -> anyhow::Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("weather-server/", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(client)
}

pub fn location_provider_from_config(
    config: &Config,
    http: Client,
) -> Arc<dyn LocationProvider> {
    Arc::new(ViaCepProvider::new(config.viacep.base_url.clone(), http))
}

/// Construct a weather provider from config and explicit ProviderId.
///
/// A missing API key is not an error here: the provider is built without one
/// and every `fetch` reports [`WeatherError::MissingApiKey`].
pub fn weather_provider_from_config(
    id: ProviderId,
    config: &Config,
    http: Client,
) -> Arc<dyn WeatherProvider> {
    let api_key = config.provider_api_key(id).map(str::to_owned);
    let base_url = config.provider_base_url(id).to_owned();

    if api_key.is_none() {
        tracing::warn!(
            provider = %id,
            "No API key configured; set {} or [providers.{}].api_key",
            id.api_key_env(),
            id
        );
    }

    match id {
        ProviderId::WeatherApi => Arc::new(WeatherApiProvider::new(base_url, api_key, http)),
        ProviderId::OpenWeather => Arc::new(OpenWeatherProvider::new(base_url, api_key, http)),
    }
}

/// Reads a response body, turning transport failures and non-2xx statuses
/// into provider errors.
pub(crate) async fn read_body(
    provider: &'static str,
    res: reqwest::Response,
) -> Result<String, WeatherError> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|source| WeatherError::transport(provider, source))?;

    if !status.is_success() {
        return Err(WeatherError::Status {
            provider,
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    Ok(body)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
