//! Temperature unit conversion with two-decimal rounding.

/// Rounds half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn to_fahrenheit(celsius: f64) -> f64 {
    round2(celsius * 1.8 + 32.0)
}

/// Uses a 273 offset, not 273.15.
pub fn to_kelvin(celsius: f64) -> f64 {
    round2(celsius + 273.0)
}
