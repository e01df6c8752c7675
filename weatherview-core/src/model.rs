use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// How a provider wants to be told where to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Query,
    Coordinates,
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationKind::Query => f.write_str("a free-text query"),
            LocationKind::Coordinates => f.write_str("coordinates"),
        }
    }
}

/// A place to fetch weather for, built once per submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Query(String),
    Coordinates { label: String, lat: f64, lon: f64 },
}

impl Location {
    pub fn kind(&self) -> LocationKind {
        match self {
            Location::Query(_) => LocationKind::Query,
            Location::Coordinates { .. } => LocationKind::Coordinates,
        }
    }

    /// Human-readable name, used when the provider does not return one.
    pub fn label(&self) -> &str {
        match self {
            Location::Query(q) => q,
            Location::Coordinates { label, .. } => label,
        }
    }
}

/// Canonical, provider-independent weather snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location_label: String,
    pub temperature_c: f64,
    pub feels_like_c: Option<f64>,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub wind_speed_ms: f64,
    pub wind_direction_deg: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
    #[serde(default)]
    pub precipitation_mm: f64,
    pub condition_code: String,
    /// Free-text description as worded by the provider, if it sent one.
    pub summary: Option<String>,
    pub visibility_m: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherRecord {
    /// Check the numeric invariants: everything finite, percentages in 0..=100.
    pub fn validate(self) -> Result<Self, FetchError> {
        let required = [
            ("temperature", self.temperature_c),
            ("humidity", self.humidity_pct),
            ("pressure", self.pressure_hpa),
            ("wind speed", self.wind_speed_ms),
            ("precipitation", self.precipitation_mm),
        ];
        let optional = [
            ("feels-like temperature", self.feels_like_c),
            ("wind direction", self.wind_direction_deg),
            ("cloud cover", self.cloud_cover_pct),
            ("visibility", self.visibility_m),
        ];

        for (name, value) in required
            .into_iter()
            .chain(optional.into_iter().filter_map(|(n, v)| v.map(|v| (n, v))))
        {
            if !value.is_finite() {
                return Err(FetchError::MalformedPayload(format!("{name} is not a finite number")));
            }
        }

        check_percentage("humidity", Some(self.humidity_pct))?;
        check_percentage("cloud cover", self.cloud_cover_pct)?;

        Ok(self)
    }

    /// Static record shown in demo mode, relabelled for the requested place.
    pub fn placeholder(location_label: &str) -> Self {
        Self {
            location_label: location_label.to_string(),
            temperature_c: 22.0,
            feels_like_c: Some(24.0),
            humidity_pct: 65.0,
            pressure_hpa: 1013.0,
            wind_speed_ms: 3.5,
            wind_direction_deg: None,
            cloud_cover_pct: None,
            precipitation_mm: 0.0,
            condition_code: "clearsky_day".to_string(),
            summary: Some("clear sky".to_string()),
            visibility_m: Some(10_000.0),
            observed_at: None,
        }
    }
}

fn check_percentage(name: &str, value: Option<f64>) -> Result<(), FetchError> {
    match value {
        Some(v) if !(0.0..=100.0).contains(&v) => Err(FetchError::MalformedPayload(format!(
            "{name} {v} is outside 0..=100 percent"
        ))),
        _ => Ok(()),
    }
}

/// What the display should currently show. Owned by the orchestrator.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(WeatherRecord),
    Failure(String),
}

impl FetchState {
    pub fn record(&self) -> Option<&WeatherRecord> {
        match self {
            FetchState::Success(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_passes_validation() {
        let record = WeatherRecord::placeholder("London").validate().unwrap();
        assert_eq!(record.location_label, "London");
        assert_eq!(record.visibility_m, Some(10_000.0));
    }

    #[test]
    fn validate_rejects_non_finite_values() {
        let mut record = WeatherRecord::placeholder("X");
        record.pressure_hpa = f64::NAN;
        assert!(matches!(record.validate(), Err(FetchError::MalformedPayload(_))));

        let mut record = WeatherRecord::placeholder("X");
        record.visibility_m = Some(f64::INFINITY);
        assert!(matches!(record.validate(), Err(FetchError::MalformedPayload(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_percentages() {
        let mut record = WeatherRecord::placeholder("X");
        record.humidity_pct = 101.0;
        assert!(record.validate().is_err());

        let mut record = WeatherRecord::placeholder("X");
        record.cloud_cover_pct = Some(-1.0);
        assert!(record.validate().is_err());

        let mut record = WeatherRecord::placeholder("X");
        record.cloud_cover_pct = Some(100.0);
        record.humidity_pct = 0.0;
        assert!(record.validate().is_ok());
    }

    #[test]
    fn fetch_state_accessors() {
        assert!(FetchState::Loading.record().is_none());
        assert_eq!(FetchState::Failure("boom".into()).error(), Some("boom"));
        assert!(FetchState::Idle.record().is_none());
        assert_eq!(FetchState::default(), FetchState::Idle);
    }

    #[test]
    fn location_label_and_kind() {
        let q = Location::Query("Paris".into());
        assert_eq!(q.label(), "Paris");
        assert_eq!(q.kind(), LocationKind::Query);

        let c = Location::Coordinates { label: "Oslo, Norway".into(), lat: 59.9, lon: 10.7 };
        assert_eq!(c.label(), "Oslo, Norway");
        assert_eq!(c.kind(), LocationKind::Coordinates);
    }
}
