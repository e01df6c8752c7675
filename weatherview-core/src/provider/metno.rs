//! MET Norway Locationforecast 2.0 (`compact`), the api.met.no service behind yr.no.
//!
//! The service needs no key but rejects requests without an identifying
//! `User-Agent`, and only takes coordinates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, header::USER_AGENT};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    condition,
    error::FetchError,
    model::{Location, LocationKind, WeatherRecord},
    provider::{ProviderId, parse_json, read_body, required},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.met.no/weatherapi/locationforecast/2.0/compact";
pub const DEFAULT_USER_AGENT: &str = concat!("weatherview/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct MetNoProvider {
    user_agent: String,
    base_url: String,
    http: Client,
}

impl Default for MetNoProvider {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT.to_string())
    }
}

impl MetNoProvider {
    pub fn new(user_agent: String) -> Self {
        Self {
            user_agent,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl WeatherProvider for MetNoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::MetNo
    }

    #[instrument(skip(self), fields(provider = "metno"))]
    async fn fetch_weather(&self, location: &Location) -> Result<WeatherRecord, FetchError> {
        let Location::Coordinates { lat, lon, .. } = location else {
            return Err(FetchError::UnsupportedLocation(LocationKind::Query));
        };

        // api.met.no asks for at most four decimals.
        let params = [("lat", format!("{lat:.4}")), ("lon", format!("{lon:.4}"))];

        debug!(url = %self.base_url, "requesting locationforecast");

        let res = self
            .http
            .get(&self.base_url)
            .header(USER_AGENT, &self.user_agent)
            .query(&params)
            .send()
            .await?;
        let body = read_body(ProviderId::MetNo, res).await?;

        let record = parse_compact(&body, location)?;
        debug!(condition = %record.condition_code, "parsed MET Norway response");
        Ok(record)
    }
}

/// Normalize the first timeseries step of a `compact` forecast body.
pub fn parse_compact(body: &str, location: &Location) -> Result<WeatherRecord, FetchError> {
    let parsed: MnResponse = parse_json(body)?;

    let step = required(
        parsed.properties.and_then(|p| p.timeseries.into_iter().next()),
        "properties.timeseries[0]",
    )?;
    let data = required(step.data, "properties.timeseries[0].data")?;
    let details = required(
        data.instant.and_then(|i| i.details),
        "properties.timeseries[0].data.instant.details",
    )?;

    // Next hour when available, otherwise the six-hour window.
    let periods = [data.next_1_hours.as_ref(), data.next_6_hours.as_ref()];
    let symbol = periods
        .iter()
        .flatten()
        .find_map(|p| p.summary.as_ref().and_then(|s| s.symbol_code.as_deref()));
    let precipitation_mm = periods
        .iter()
        .flatten()
        .find_map(|p| p.details.as_ref().and_then(|d| d.precipitation_amount))
        .unwrap_or(0.0);

    WeatherRecord {
        location_label: location.label().to_string(),
        temperature_c: required(details.air_temperature, "instant.details.air_temperature")?,
        feels_like_c: None,
        humidity_pct: required(details.relative_humidity, "instant.details.relative_humidity")?,
        pressure_hpa: required(
            details.air_pressure_at_sea_level,
            "instant.details.air_pressure_at_sea_level",
        )?,
        wind_speed_ms: required(details.wind_speed, "instant.details.wind_speed")?,
        wind_direction_deg: details.wind_from_direction,
        cloud_cover_pct: details.cloud_area_fraction,
        precipitation_mm,
        condition_code: condition::from_metno_symbol(symbol),
        summary: None,
        visibility_m: None,
        observed_at: step.time,
    }
    .validate()
}

#[derive(Debug, Deserialize)]
struct MnResponse {
    properties: Option<MnProperties>,
}

#[derive(Debug, Deserialize)]
struct MnProperties {
    #[serde(default)]
    timeseries: Vec<MnStep>,
}

#[derive(Debug, Deserialize)]
struct MnStep {
    time: Option<DateTime<Utc>>,
    data: Option<MnData>,
}

#[derive(Debug, Deserialize)]
struct MnData {
    instant: Option<MnInstant>,
    next_1_hours: Option<MnPeriod>,
    next_6_hours: Option<MnPeriod>,
}

#[derive(Debug, Deserialize)]
struct MnInstant {
    details: Option<MnInstantDetails>,
}

#[derive(Debug, Deserialize)]
struct MnInstantDetails {
    air_temperature: Option<f64>,
    relative_humidity: Option<f64>,
    air_pressure_at_sea_level: Option<f64>,
    wind_speed: Option<f64>,
    wind_from_direction: Option<f64>,
    cloud_area_fraction: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MnPeriod {
    summary: Option<MnSummary>,
    details: Option<MnPeriodDetails>,
}

#[derive(Debug, Deserialize)]
struct MnSummary {
    symbol_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MnPeriodDetails {
    precipitation_amount: Option<f64>,
}
