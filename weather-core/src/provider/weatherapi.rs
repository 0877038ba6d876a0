use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{WeatherError, WeatherReading, normalize::strip_accents};

use super::{WeatherProvider, read_body};

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

const PROVIDER: &str = "weatherapi";

/// Current conditions from weatherapi.com.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    base_url: String,
    api_key: Option<String>,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, api_key, http }
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    temp_f: f64,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(WeatherError::MissingApiKey { provider: PROVIDER })?;

        let url = format!("{}/current.json", self.base_url);
        let city = strip_accents(city);

        let res = self
            .http
            .get(&url)
            .query(&[("key", api_key), ("q", city.as_str()), ("aqi", "no")])
            .send()
            .await
            .map_err(|source| WeatherError::transport(PROVIDER, source))?;

        let body = read_body(PROVIDER, res).await?;

        let parsed: WaResponse = serde_json::from_str(&body)
            .map_err(|source| WeatherError::Decode { provider: PROVIDER, source })?;

        Ok(WeatherReading { temp_c: parsed.current.temp_c, temp_f: parsed.current.temp_f })
    }
}
