use crate::{
    Config,
    error::{FetchError, GENERIC_FETCH_FAILURE},
    location::LocationResolver,
    model::{Location, LocationKind, WeatherRecord},
    provider::{demo::DemoProvider, metno::MetNoProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};
use tracing::{info, warn};

pub mod demo;
pub mod metno;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    MetNo,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::MetNo => "metno",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OpenWeather",
            ProviderId::MetNo => "MET Norway",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::MetNo]
    }

    pub fn location_kind(&self) -> LocationKind {
        match self {
            ProviderId::OpenWeather => LocationKind::Query,
            ProviderId::MetNo => LocationKind::Coordinates,
        }
    }

    /// Location fetched on start-up when nothing else is configured.
    pub fn default_location(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "London",
            ProviderId::MetNo => "Oslo, Norway",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "openweather" | "openweathermap" => Ok(ProviderId::OpenWeather),
            "metno" | "met.no" | "yr" => Ok(ProviderId::MetNo),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, metno."
            )),
        }
    }
}

/// One external weather API, turning a [`Location`] into a [`WeatherRecord`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    /// The form of [`Location`] this provider accepts.
    fn location_kind(&self) -> LocationKind {
        self.id().location_kind()
    }

    /// True when the data is a static placeholder rather than a live fetch.
    fn is_demo(&self) -> bool {
        false
    }

    async fn fetch_weather(&self, location: &Location) -> Result<WeatherRecord, FetchError>;
}

impl dyn WeatherProvider {
    pub fn resolver(&self) -> LocationResolver {
        LocationResolver::for_kind(self.location_kind())
    }
}

/// Construct the provider for `id`. A keyed provider without a key runs in demo mode.
pub fn provider_from_config(id: ProviderId, config: &Config) -> Arc<dyn WeatherProvider> {
    let base_url = config.provider_base_url(id);

    match id {
        ProviderId::OpenWeather => match config.provider_api_key(id) {
            Some(api_key) => {
                let mut provider = OpenWeatherProvider::new(api_key.to_owned());
                if let Some(url) = base_url {
                    provider = provider.with_base_url(url);
                }
                Arc::new(provider)
            }
            None => {
                info!(
                    provider = %id,
                    "No API key configured, showing demo data. Hint: run `weatherview configure {id}`."
                );
                Arc::new(DemoProvider::new(id))
            }
        },
        ProviderId::MetNo => {
            let mut provider = match config.provider_user_agent(id) {
                Some(agent) => MetNoProvider::new(agent.to_owned()),
                None => MetNoProvider::default(),
            };
            if let Some(url) = base_url {
                provider = provider.with_base_url(url);
            }
            Arc::new(provider)
        }
    }
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    Ok(provider_from_config(id, config))
}

/// Read a response body, turning non-2xx statuses into [`FetchError::BadStatus`].
pub(crate) async fn read_body(
    provider: ProviderId,
    response: reqwest::Response,
) -> Result<String, FetchError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!(%provider, %status, body = %truncate_body(&body), "weather request failed");
        return Err(FetchError::BadStatus {
            status: status.as_u16(),
            message: provider_message(&body),
        });
    }

    Ok(body)
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::MalformedPayload(e.to_string()))
}

pub(crate) fn required<T>(value: Option<T>, path: &'static str) -> Result<T, FetchError> {
    value.ok_or(FetchError::MissingRequiredField(path))
}

/// The `message` field of an error body, or the generic fallback.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(|m| m.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map_or_else(|| GENERIC_FETCH_FAILURE.to_string(), str::to_string)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
