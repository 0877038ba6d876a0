use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use crate::{PostalLookup, WeatherError};

use super::{LocationProvider, read_body};

const PROVIDER: &str = "viacep";
const ZIP_CODE_LEN: usize = 8;

/// Location lookup backed by the ViaCEP postal code API.
#[derive(Debug, Clone)]
pub struct ViaCepProvider {
    base_url: String,
    http: Client,
}

impl ViaCepProvider {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }
}

/// A zipcode is exactly eight ASCII digits, no separators.
pub fn is_valid_zip_code(zip_code: &str) -> bool {
    zip_code.len() == ZIP_CODE_LEN && zip_code.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default, deserialize_with = "flag")]
    erro: bool,
}

/// ViaCEP reports misses as either `"erro": true` or `"erro": "true"`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s.eq_ignore_ascii_case("true"),
    })
}

#[async_trait]
impl LocationProvider for ViaCepProvider {
    async fn resolve(&self, zip_code: &str) -> Result<PostalLookup, WeatherError> {
        if !is_valid_zip_code(zip_code) {
            return Err(WeatherError::InvalidZipCode);
        }

        let url = format!("{}/ws/{}/json/", self.base_url, zip_code);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| WeatherError::transport(PROVIDER, source))?;

        let body = read_body(PROVIDER, res).await?;

        let parsed: ViaCepResponse = serde_json::from_str(&body)
            .map_err(|source| WeatherError::Decode { provider: PROVIDER, source })?;

        if parsed.erro {
            tracing::debug!(zip_code, "ViaCEP has no match");
            return Ok(PostalLookup::not_found());
        }

        Ok(PostalLookup::found(parsed.localidade))
    }
}
