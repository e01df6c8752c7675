use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    condition,
    error::FetchError,
    model::{Location, WeatherRecord},
    provider::{ProviderId, parse_json, read_body, required},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
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
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    #[instrument(skip(self), fields(provider = "openweather"))]
    async fn fetch_weather(&self, location: &Location) -> Result<WeatherRecord, FetchError> {
        let mut params = match location {
            Location::Query(q) => vec![("q", q.clone())],
            Location::Coordinates { lat, lon, .. } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        debug!(url = %self.base_url, "requesting current weather");

        let res = self.http.get(&self.base_url).query(&params).send().await?;
        let body = read_body(ProviderId::OpenWeather, res).await?;

        let record = parse_current(&body, location)?;
        debug!(condition = %record.condition_code, "parsed OpenWeather response");
        Ok(record)
    }
}

/// Normalize an OpenWeather "current weather" body.
pub fn parse_current(body: &str, location: &Location) -> Result<WeatherRecord, FetchError> {
    let parsed: OwCurrentResponse = parse_json(body)?;

    let main = required(parsed.main, "main")?;
    let wind = required(parsed.wind, "wind")?;
    let weather = parsed.weather.first();

    let precipitation_mm = [parsed.rain, parsed.snow]
        .iter()
        .flatten()
        .filter_map(|p| p.one_hour)
        .sum::<f64>();

    let location_label = parsed
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| location.label().to_string());

    WeatherRecord {
        location_label,
        temperature_c: required(main.temp, "main.temp")?,
        feels_like_c: main.feels_like,
        humidity_pct: required(main.humidity, "main.humidity")?,
        pressure_hpa: required(main.pressure, "main.pressure")?,
        wind_speed_ms: required(wind.speed, "wind.speed")?,
        wind_direction_deg: wind.deg,
        cloud_cover_pct: parsed.clouds.and_then(|c| c.all),
        precipitation_mm,
        condition_code: condition::from_openweather_icon(weather.and_then(|w| w.icon.as_deref())),
        summary: weather.and_then(|w| w.description.clone()),
        visibility_m: parsed.visibility,
        observed_at: parsed.dt.and_then(|ts| DateTime::from_timestamp(ts, 0)),
    }
    .validate()
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwPrecipitation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    dt: Option<i64>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    clouds: Option<OwClouds>,
    rain: Option<OwPrecipitation>,
    snow: Option<OwPrecipitation>,
    visibility: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn london() -> Location {
        Location::Query("London".into())
    }

    fn sample() -> serde_json::Value {
        json!({
            "name": "London",
            "dt": 1_700_000_000,
            "main": { "temp": 22, "feels_like": 24, "humidity": 65, "pressure": 1013 },
            "weather": [{ "main": "Clear", "description": "clear sky", "icon": "01d" }],
            "wind": { "speed": 3.5, "deg": 240 },
            "clouds": { "all": 0 },
            "visibility": 10000
        })
    }

    #[test]
    fn parses_full_payload() {
        let record = parse_current(&sample().to_string(), &london()).unwrap();

        assert_eq!(record.location_label, "London");
        assert_eq!(record.temperature_c, 22.0);
        assert_eq!(record.feels_like_c, Some(24.0));
        assert_eq!(record.humidity_pct, 65.0);
        assert_eq!(record.pressure_hpa, 1013.0);
        assert_eq!(record.wind_speed_ms, 3.5);
        assert_eq!(record.wind_direction_deg, Some(240.0));
        assert_eq!(record.cloud_cover_pct, Some(0.0));
        assert_eq!(record.precipitation_mm, 0.0);
        assert_eq!(record.condition_code, "clearsky_day");
        assert_eq!(record.summary.as_deref(), Some("clear sky"));
        assert_eq!(record.visibility_m, Some(10000.0));
        assert_eq!(record.observed_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn optional_fields_get_defaults() {
        let body = json!({
            "main": { "temp": 5.2, "humidity": 80, "pressure": 990 },
            "wind": { "speed": 7 }
        });
        let record = parse_current(&body.to_string(), &london()).unwrap();

        assert_eq!(record.location_label, "London");
        assert_eq!(record.feels_like_c, None);
        assert_eq!(record.visibility_m, None);
        assert_eq!(record.precipitation_mm, 0.0);
        assert_eq!(record.condition_code, condition::UNKNOWN_CONDITION);
        assert_eq!(record.summary, None);
        assert_eq!(record.observed_at, None);
    }

    #[test]
    fn rain_and_snow_add_up() {
        let mut body = sample();
        body["rain"] = json!({ "1h": 1.25 });
        body["snow"] = json!({ "1h": 0.5, "3h": 4.0 });
        let record = parse_current(&body.to_string(), &london()).unwrap();
        assert_eq!(record.precipitation_mm, 1.75);
    }

    #[test]
    fn non_ascii_icon_maps_to_unknown() {
        let mut body = sample();
        body["weather"][0]["icon"] = json!("1é");
        let record = parse_current(&body.to_string(), &london()).unwrap();
        assert_eq!(record.condition_code, condition::UNKNOWN_CONDITION);
        assert_eq!(record.summary.as_deref(), Some("clear sky"));
    }

    #[test]
    fn missing_temperature_is_required_field_error() {
        let mut body = sample();
        body["main"].as_object_mut().unwrap().remove("temp");
        let err = parse_current(&body.to_string(), &london()).unwrap_err();
        assert_eq!(err, FetchError::MissingRequiredField("main.temp"));
    }

    #[test]
    fn missing_wind_block_is_required_field_error() {
        let mut body = sample();
        body.as_object_mut().unwrap().remove("wind");
        let err = parse_current(&body.to_string(), &london()).unwrap_err();
        assert_eq!(err, FetchError::MissingRequiredField("wind"));
    }

    #[test]
    fn wrong_types_and_bad_json_are_malformed() {
        let mut body = sample();
        body["main"]["temp"] = json!("warm");
        assert!(matches!(
            parse_current(&body.to_string(), &london()),
            Err(FetchError::MalformedPayload(_))
        ));

        assert!(matches!(
            parse_current("{not json", &london()),
            Err(FetchError::MalformedPayload(_))
        ));
    }

    #[test]
    fn humidity_out_of_range_is_rejected() {
        let mut body = sample();
        body["main"]["humidity"] = json!(140);
        assert!(matches!(
            parse_current(&body.to_string(), &london()),
            Err(FetchError::MalformedPayload(_))
        ));
    }
}
