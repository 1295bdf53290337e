//! Live lookup: current weather by city, then air quality at its coordinates.

use tracing::{error, info, instrument, warn};

use crate::{
    error::{FetchError, ProviderError},
    model::{AirQualityReading, Lookup, WeatherReading},
    provider::WeatherProvider,
    render::{Block, Container, Renderer},
    storage::{KeyValueStore, LAST_CITY_KEY},
};

#[derive(Debug, Clone, Copy)]
enum Stage {
    Weather,
    AirQuality,
}

fn attribute(err: ProviderError, city: &str, stage: Stage) -> FetchError {
    let city = city.to_string();
    match (err, stage) {
        (ProviderError::Status(status), Stage::Weather) => {
            FetchError::WeatherLookupFailed { city, status }
        }
        (ProviderError::Status(status), Stage::AirQuality) => {
            FetchError::AirQualityLookupFailed { city, status }
        }
        (ProviderError::Transport(source), _) => FetchError::Transport { city, source },
        (ProviderError::Decode(reason), Stage::Weather) => FetchError::malformed("weather", reason),
        (ProviderError::Decode(reason), Stage::AirQuality) => {
            FetchError::malformed("air quality", reason)
        }
    }
}

/// Two sequential requests; the first failure ends the lookup.
pub async fn fetch_weather_and_air_quality<P: WeatherProvider + ?Sized>(
    provider: &P,
    city: &str,
) -> Result<Lookup, FetchError> {
    let weather = provider
        .current_weather(city)
        .await
        .map_err(|e| attribute(e, city, Stage::Weather))?;

    // A malformed weather body must not trigger the second request.
    weather.validate()?;

    let air_quality = provider
        .air_pollution(weather.coord)
        .await
        .map_err(|e| attribute(e, city, Stage::AirQuality))?;

    Ok(Lookup { weather, air_quality })
}

/// One decimal place, including for whole numbers.
pub fn format_celsius(value: f64) -> String {
    format!("{value:.1}")
}

/// Upper-case the first character, lower-case the rest.
pub fn normalize_city_name(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// What a successful lookup shows, keyed by the city as it was queried.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub city: String,
    pub weather: WeatherReading,
    pub air_quality: AirQualityReading,
}

impl Report {
    pub fn from_lookup(city: &str, lookup: &Lookup) -> Result<Self, FetchError> {
        Ok(Self {
            city: city.to_string(),
            weather: WeatherReading::try_from(&lookup.weather)?,
            air_quality: AirQualityReading::try_from(&lookup.air_quality)?,
        })
    }

    pub fn weather_block(&self) -> Block {
        Block::new(format!("Погода в городе {}", self.city))
            .paragraph(format!("Температура: {}°C", format_celsius(self.weather.temperature)))
            .paragraph(format!("Ощущается как: {}°C", format_celsius(self.weather.feels_like)))
            .paragraph(format!("Описание: {}", self.weather.description))
    }

    pub fn air_quality_block(&self) -> Block {
        Block::new(format!("Качество воздуха в городе {}", self.city))
            .paragraph(format!("AQI: {}", self.air_quality.aqi))
    }
}

/// The page: provider, durable store, renderer and the current city input.
#[derive(Debug)]
pub struct App<P, S, R> {
    provider: P,
    store: S,
    renderer: R,
    input: String,
}

impl<P, S, R> App<P, S, R>
where
    P: WeatherProvider,
    S: KeyValueStore,
    R: Renderer,
{
    pub fn new(provider: P, store: S, renderer: R) -> Self {
        Self { provider, store, renderer, input: String::new() }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Look up `city`, render both blocks, then remember the city.
    ///
    /// Failures are logged and alerted here; nothing is rendered and nothing
    /// is stored. The error is returned so callers can pick an exit status.
    #[instrument(skip(self))]
    pub async fn display_weather_and_air_quality(
        &mut self,
        city: &str,
    ) -> Result<Report, FetchError> {
        let report = fetch_weather_and_air_quality(&self.provider, city)
            .await
            .and_then(|lookup| Report::from_lookup(city, &lookup));

        let report = match report {
            Ok(report) => report,
            Err(err) => {
                error!(error = ?err, "Weather lookup failed");
                self.renderer.alert(&err.to_string());
                return Err(err);
            }
        };

        self.renderer.replace(Container::WeatherData, report.weather_block());
        self.renderer.replace(Container::AirQualityData, report.air_quality_block());

        match self.store.set(LAST_CITY_KEY, city) {
            Ok(()) => info!(city, aqi = report.air_quality.aqi, "Lookup complete, city remembered"),
            Err(e) => warn!(error = %e, "Failed to remember last city"),
        }

        Ok(report)
    }

    /// Search button: one lookup for the normalized input.
    pub async fn on_search(&mut self) -> Result<Report, FetchError> {
        let city = normalize_city_name(&self.input);
        self.display_weather_and_air_quality(&city).await
    }

    /// Page load: restore the remembered city into the input and look it up once.
    ///
    /// Returns `None` when nothing is remembered.
    pub async fn on_load(&mut self) -> Option<Result<Report, FetchError>> {
        let last = match self.store.get(LAST_CITY_KEY) {
            Ok(last) => last,
            Err(e) => {
                warn!(error = %e, "Failed to read last city");
                None
            }
        };

        let city = last.filter(|c| !c.is_empty())?;
        self.set_input(city.as_str());

        Some(self.display_weather_and_air_quality(&city).await)
    }
}
