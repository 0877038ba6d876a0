use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{WeatherError, WeatherReading, convert::to_fahrenheit, normalize::strip_accents};

use super::{WeatherProvider, read_body};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const PROVIDER: &str = "openweather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    api_key: Option<String>,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, api_key, http }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(WeatherError::MissingApiKey { provider: PROVIDER })?;

        let url = format!("{}/weather", self.base_url);
        let city = strip_accents(city);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city.as_str()), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|source| WeatherError::transport(PROVIDER, source))?;

        let body = read_body(PROVIDER, res).await?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|source| WeatherError::Decode { provider: PROVIDER, source })?;

        // Metric units only report Celsius.
        let temp_c = parsed.main.temp;
        Ok(WeatherReading { temp_c, temp_f: to_fahrenheit(temp_c) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn fetches_metric_temperature() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/weather")
                    .query_param("q", "Florianopolis")
                    .query_param("appid", "OW_KEY")
                    .query_param("units", "metric");
                then.status(200).json_body(json!({
                    "name": "Florianópolis",
                    "main": { "temp": 21.5, "feels_like": 21.0, "humidity": 80 }
                }));
            })
            .await;

        let provider = OpenWeatherProvider::new(server.base_url(), Some("OW_KEY".into()), Client::new());
        let reading = provider.fetch("Florianópolis").await.unwrap();

        mock.assert_async().await;
        assert_eq!(reading, WeatherReading { temp_c: 21.5, temp_f: 70.7 });
    }

    #[tokio::test]
    async fn missing_api_key_is_configuration_error() {
        let provider = OpenWeatherProvider::new(DEFAULT_BASE_URL, None, Client::new());
        let err = provider.fetch("Recife").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "openweather api key not found");
    }

    #[tokio::test]
    async fn unknown_city_is_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/weather");
                then.status(404).json_body(json!({ "cod": "404", "message": "city not found" }));
            })
            .await;

        let provider = OpenWeatherProvider::new(server.base_url(), Some("OW_KEY".into()), Client::new());
        let err = provider.fetch("Atlantis").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Provider);
        assert!(err.to_string().contains("city not found"));
    }
}
