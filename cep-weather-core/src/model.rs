use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::{convert, error::InvalidCep};

/// Body accepted by both services: `{"cep": "..."}`.
///
/// A missing `cep` field deserializes to an empty string so that it is
/// rejected by validation rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CepRequest {
    #[serde(default)]
    pub cep: String,
}

impl CepRequest {
    pub fn new(cep: impl Into<String>) -> Self {
        Self { cep: cep.into() }
    }
}

/// A postal code that is exactly 8 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    pub const LEN: usize = 8;

    /// Validate a raw code. No trimming, separators or non-ASCII digits are accepted.
    pub fn parse(raw: &str) -> Result<Self, InvalidCep> {
        if raw.len() == Self::LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(InvalidCep)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Cep {
    type Err = InvalidCep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Cep {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Final answer returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    #[serde(rename = "temp_C", serialize_with = "whole_as_integer")]
    pub temp_c: f64,
    #[serde(rename = "temp_F", serialize_with = "whole_as_integer")]
    pub temp_f: f64,
    #[serde(rename = "temp_K", serialize_with = "whole_as_integer")]
    pub temp_k: f64,
}

impl WeatherResult {
    /// Compose a result from a Celsius reading, deriving Fahrenheit and Kelvin.
    pub fn from_celsius(city: impl Into<String>, temp_c: f64) -> Self {
        Self {
            city: city.into(),
            temp_c,
            temp_f: convert::celsius_to_fahrenheit(temp_c),
            temp_k: convert::celsius_to_kelvin(temp_c),
        }
    }
}

// Whole values are written as `25` rather than `25.0`.
fn whole_as_integer<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
