use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    config::DEFAULT_BASE_URL,
    error::ProviderError,
    model::{AirQualityPayload, Coord, WeatherPayload},
};

use super::WeatherProvider;

const WEATHER_PATH: &str = "/data/2.5/weather";
const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    lang: Option<String>,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: None,
            http: Client::new(),
        }
    }

    /// Point the provider at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_lang(mut self, lang: Option<String>) -> Self {
        self.lang = lang;
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = self.endpoint(path);
        debug!(url = %url, "Requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            debug!(%status, body = %truncate_body(&body), "OpenWeather returned an error");
            return Err(ProviderError::Status(status));
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn current_weather(&self, city: &str) -> Result<WeatherPayload, ProviderError> {
        let mut query = vec![("q", city.to_string()), ("units", "metric".to_string())];
        if let Some(lang) = &self.lang {
            query.push(("lang", lang.clone()));
        }

        self.get_json(WEATHER_PATH, &query).await
    }

    #[instrument(skip(self), fields(lat = %coord.lat, lon = %coord.lon))]
    async fn air_pollution(&self, coord: Coord) -> Result<AirQualityPayload, ProviderError> {
        let query = [("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())];

        self.get_json(AIR_POLLUTION_PATH, &query).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let provider = OpenWeatherProvider::new("K".into()).with_base_url("http://example.test/");
        assert_eq!(provider.endpoint(WEATHER_PATH), "http://example.test/data/2.5/weather");
    }

    #[test]
    fn default_host_is_openweather() {
        let provider = OpenWeatherProvider::new("K".into());
        assert_eq!(
            provider.endpoint(AIR_POLLUTION_PATH),
            "https://api.openweathermap.org/data/2.5/air_pollution"
        );
    }

    #[tokio::test]
    async fn transport_error_does_not_carry_api_key() {
        let provider =
            OpenWeatherProvider::new("SECRET_KEY_123".into()).with_base_url("http://127.0.0.1:1");

        let err = provider.current_weather("Paris").await.unwrap_err();

        assert!(matches!(err, ProviderError::Transport(_)));
        assert!(!format!("{err:?}").contains("SECRET_KEY_123"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "ж".repeat(300);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);

        assert_eq!(truncate_body("short"), "short");
    }
}
