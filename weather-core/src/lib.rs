//! Core library for the zipcode weather service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location (postal code) and weather provider abstractions
//! - Temperature unit conversion
//! - The orchestration that turns a zipcode into a [`CombinedWeather`]
//!
//! It is used by `weather-server`, but has no dependency on any HTTP server.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;

pub use config::{Config, ProviderConfig, ViaCepConfig};
pub use error::{ErrorKind, WeatherError};
pub use model::{CombinedWeather, PostalLookup, WeatherReading};
pub use provider::{LocationProvider, ProviderId, WeatherProvider};
pub use service::get_weather;
