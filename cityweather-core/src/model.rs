use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Geographic coordinates as the provider reports them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainMetrics {
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

/// The part of the provider's current-weather body this crate relies on.
///
/// Every other field of the provider schema is ignored on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    pub coord: Coord,
    pub weather: Vec<Condition>,
    pub main: MainMetrics,
    pub wind: Wind,
    pub name: String,
}

impl WeatherPayload {
    /// Decode and shape-check a current-weather body.
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        let payload: Self =
            serde_json::from_str(body).map_err(|e| FetchError::malformed("weather", e.to_string()))?;

        payload.validate()?;
        Ok(payload)
    }

    /// Checks what serde cannot: the condition list must not be empty.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.weather.is_empty() {
            return Err(FetchError::malformed("weather", "condition list is empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AqiMain {
    pub aqi: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirQualityEntry {
    pub main: AqiMain,
}

/// The part of the provider's air-pollution body this crate relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirQualityPayload {
    pub list: Vec<AirQualityEntry>,
}

/// Both raw payloads of one live lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub weather: WeatherPayload,
    pub air_quality: AirQualityPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub temperature: f64,
    pub feels_like: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub city_name: String,
    pub description: String,
}

impl TryFrom<&WeatherPayload> for WeatherReading {
    type Error = FetchError;

    fn try_from(payload: &WeatherPayload) -> Result<Self, Self::Error> {
        let description = payload
            .weather
            .first()
            .map(|w| w.description.clone())
            .ok_or_else(|| FetchError::malformed("weather", "condition list is empty"))?;

        Ok(Self {
            temperature: payload.main.temp,
            feels_like: payload.main.feels_like,
            pressure: payload.main.pressure,
            humidity: payload.main.humidity,
            wind_speed: payload.wind.speed,
            city_name: payload.name.clone(),
            description,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AirQualityReading {
    pub aqi: u8,
}

impl TryFrom<&AirQualityPayload> for AirQualityReading {
    type Error = FetchError;

    fn try_from(payload: &AirQualityPayload) -> Result<Self, Self::Error> {
        payload
            .list
            .first()
            .map(|entry| Self { aqi: entry.main.aqi })
            .ok_or_else(|| FetchError::malformed("air quality", "measurement list is empty"))
    }
}
