use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single provider call, before it is attributed to a lookup.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider answered with HTTP {0}")]
    Status(StatusCode),

    /// The request URL is stripped; it carries the API key.
    #[error("request to provider failed")]
    Transport(#[source] reqwest::Error),

    #[error("provider body is not valid JSON for this endpoint: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.without_url())
    }
}

/// Failure of the live weather + air-quality lookup.
///
/// The `Display` text is what the user sees in the alert.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Ошибка получения данных: {city}")]
    WeatherLookupFailed { city: String, status: StatusCode },

    #[error("Ошибка получения данных о качестве воздуха: {city}")]
    AirQualityLookupFailed { city: String, status: StatusCode },

    #[error("Некорректный ответ сервиса ({what}): {reason}")]
    MalformedPayload { what: &'static str, reason: String },

    #[error("Сетевая ошибка при запросе данных: {city}")]
    Transport {
        city: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn malformed(what: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedPayload { what, reason: reason.into() }
    }
}

/// Failure of the durable key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access state file '{}'", .0.display())]
    Io(std::path::PathBuf, #[source] std::io::Error),

    #[error("Failed to parse state file '{}'", .0.display())]
    Parse(std::path::PathBuf, #[source] toml::de::Error),

    #[error("Failed to serialize state")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine platform data directory")]
    NoDataDir,
}
