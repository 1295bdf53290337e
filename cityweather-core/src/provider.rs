use crate::{
    Config,
    error::ProviderError,
    model::{AirQualityPayload, Coord, WeatherPayload},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The network capability of the live flow.
///
/// One call per endpoint; no retry, no timeout.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current weather for a city name, metric units.
    async fn current_weather(&self, city: &str) -> Result<WeatherPayload, ProviderError>;

    /// Air pollution at the given coordinates.
    async fn air_pollution(&self, coord: Coord) -> Result<AirQualityPayload, ProviderError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key()?;

    Ok(OpenWeatherProvider::new(api_key)
        .with_base_url(&config.base_url)
        .with_lang(config.lang.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_uses_configured_host() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: "http://localhost:1234/".into(),
            lang: None,
        };

        let provider = provider_from_config(&cfg).expect("provider");
        assert_eq!(
            provider.endpoint("/data/2.5/weather"),
            "http://localhost:1234/data/2.5/weather"
        );
    }
}
