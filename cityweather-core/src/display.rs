//! Static display: show a fixed reading without touching the network.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::{
    model::{Condition, Coord, MainMetrics, WeatherPayload, Wind},
    render::{Block, Container, Renderer},
};

/// The six fields shown for a static reading, copied verbatim from the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFields {
    pub temperature: f64,
    pub feels_like: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub city_name: String,
}

/// Built-in reading for Moscow.
pub fn sample_payload() -> WeatherPayload {
    WeatherPayload {
        coord: Coord { lat: 55.7522, lon: 37.6156 },
        weather: vec![Condition { description: "пасмурно".to_string() }],
        main: MainMetrics { temp: 8.12, feels_like: 6.25, pressure: 1025.0, humidity: 80.0 },
        wind: Wind { speed: 3.01 },
        name: "Москва".to_string(),
    }
}

/// Read a saved current-weather body from disk.
pub fn load_payload(path: &Path) -> Result<WeatherPayload> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("Failed to read weather payload: {}", path.display()))?;

    WeatherPayload::from_json(&body)
        .with_context(|| format!("Invalid weather payload: {}", path.display()))
}

pub fn extract_display_fields(payload: &WeatherPayload) -> DisplayFields {
    DisplayFields {
        temperature: payload.main.temp,
        feels_like: payload.main.feels_like,
        pressure: payload.main.pressure,
        humidity: payload.main.humidity,
        wind_speed: payload.wind.speed,
        city_name: payload.name.clone(),
    }
}

/// Replace the results container with one labelled line per field.
pub fn render<R: Renderer + ?Sized>(fields: &DisplayFields, renderer: &mut R) {
    let block = Block::new(fields.city_name.as_str())
        .paragraph(format!("Температура: {}", fields.temperature))
        .paragraph(format!("Ощущается как: {}", fields.feels_like))
        .paragraph(format!("Давление: {}", fields.pressure))
        .paragraph(format!("Влажность: {}", fields.humidity))
        .paragraph(format!("Скорость ветра: {}", fields.wind_speed))
        .paragraph(format!("Город: {}", fields.city_name));

    renderer.replace(Container::Results, block);
}

/// Extract and render in one step.
pub fn display_weather<R: Renderer + ?Sized>(payload: &WeatherPayload, renderer: &mut R) {
    render(&extract_display_fields(payload), renderer);
}
