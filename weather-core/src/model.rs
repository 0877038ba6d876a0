use serde::{Deserialize, Serialize};

/// Result of resolving a postal code to a city.
#[derive(Debug, Clone, PartialEq)]
pub struct PostalLookup {
    pub city: String,
    pub found: bool,
}

impl PostalLookup {
    pub fn found(city: impl Into<String>) -> Self {
        Self { city: city.into(), found: true }
    }

    pub fn not_found() -> Self {
        Self { city: String::new(), found: false }
    }
}

/// Current temperature as reported by a weather provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReading {
    pub temp_c: f64,
    pub temp_f: f64,
}

/// Temperature for a zipcode in the three units returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedWeather {
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}
