//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Provider payload models and the readings extracted from them
//! - The static display of a fixed reading
//! - The live weather + air-quality lookup over an abstract provider
//! - Durable storage of the last searched city
//! - Rendering into named containers, on a terminal or in memory
//! - Configuration & credentials handling
//!
//! It is used by `cityweather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod display;
pub mod error;
pub mod flow;
pub mod model;
pub mod provider;
pub mod render;
pub mod storage;

pub use config::Config;
pub use error::{FetchError, ProviderError, StoreError};
pub use flow::{App, Report, fetch_weather_and_air_quality, format_celsius, normalize_city_name};
pub use model::{AirQualityReading, Lookup, WeatherPayload, WeatherReading};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use render::{Block, Container, OutputFormat, Page, Renderer, TerminalRenderer};
pub use storage::{FileStore, KeyValueStore, LAST_CITY_KEY, MemoryStore};
