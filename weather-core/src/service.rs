use crate::{
    CombinedWeather, WeatherError,
    convert::{to_fahrenheit, to_kelvin},
    provider::{LocationProvider, WeatherProvider},
};

/// Resolves `zip_code` to a city, then fetches its current temperature.
///
/// Failures from either provider are returned unchanged; the only error
/// produced here is [`WeatherError::ZipCodeNotFound`], when the location
/// lookup succeeds without a match.
pub async fn get_weather(
    location: &dyn LocationProvider,
    weather: &dyn WeatherProvider,
    zip_code: &str,
) -> Result<CombinedWeather, WeatherError> {
    let lookup = location.resolve(zip_code).await?;
    if !lookup.found {
        return Err(WeatherError::ZipCodeNotFound);
    }

    tracing::debug!(zip_code, city = %lookup.city, "zipcode resolved");

    let reading = weather.fetch(&lookup.city).await?;
    let temp_c = reading.temp_c;

    Ok(CombinedWeather { temp_c, temp_f: to_fahrenheit(temp_c), temp_k: to_kelvin(temp_c) })
}
