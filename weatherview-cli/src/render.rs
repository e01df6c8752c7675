use chrono::Local;
use weatherview_core::{FetchState, WeatherRecord, describe};

pub const DEMO_NOTICE: &str = "Note: showing demo data. Get a free API key from \
    https://openweathermap.org/api and run `weatherview configure openweather` for live weather.";

pub fn render_state(state: &FetchState) -> String {
    match state {
        FetchState::Idle => String::new(),
        FetchState::Loading => "Loading...".to_string(),
        FetchState::Success(record) => render_record(record),
        FetchState::Failure(message) => format!("Error: {message}"),
    }
}

pub fn render_record(record: &WeatherRecord) -> String {
    let look = describe(record);

    let mut headline = format!("{}  {}°C  {}", look.icon, round(record.temperature_c), look.description);
    if let Some(summary) = record.summary.as_deref().filter(|s| !s.eq_ignore_ascii_case(look.description)) {
        headline.push_str(&format!(" ({summary})"));
    }

    let mut rows = Vec::new();
    if let Some(feels_like) = record.feels_like_c {
        rows.push(("Feels like", format!("{}°C", round(feels_like))));
    }
    rows.push(("Humidity", format!("{}%", round(record.humidity_pct))));
    rows.push(("Pressure", format!("{} hPa", round(record.pressure_hpa))));

    let wind = match record.wind_direction_deg {
        Some(deg) => format!("{} m/s {}", record.wind_speed_ms, compass(deg)),
        None => format!("{} m/s", record.wind_speed_ms),
    };
    rows.push(("Wind speed", wind));

    if let Some(clouds) = record.cloud_cover_pct {
        rows.push(("Cloud cover", format!("{}%", round(clouds))));
    }
    if record.precipitation_mm > 0.0 {
        rows.push(("Precipitation", format!("{} mm", record.precipitation_mm)));
    }
    if let Some(visibility) = record.visibility_m {
        rows.push(("Visibility", format!("{} km", visibility / 1000.0)));
    }
    if let Some(observed) = record.observed_at {
        rows.push(("Observed", observed.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()));
    }

    let mut out = format!("{}\n{headline}\n", record.location_label);
    for (label, value) in rows {
        out.push_str(&format!("  {:<15}{value}\n", format!("{label}:")));
    }
    out
}

fn round(value: f64) -> i64 {
    value.round() as i64
}

/// Eight-point compass name for a direction the wind blows from.
fn compass(deg: f64) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let idx = ((deg.rem_euclid(360.0) + 22.5) / 45.0) as usize % 8;
    POINTS[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_placeholder_like_the_display() {
        let out = render_record(&WeatherRecord::placeholder("London"));

        assert!(out.starts_with("London\n☀️  22°C  Clear sky\n"), "{out}");
        assert!(out.contains("Feels like:    24°C"), "{out}");
        assert!(out.contains("Humidity:      65%"), "{out}");
        assert!(out.contains("Pressure:      1013 hPa"), "{out}");
        assert!(out.contains("Wind speed:    3.5 m/s\n"), "{out}");
        assert!(out.contains("Visibility:    10 km"), "{out}");
        assert!(!out.contains("Precipitation"), "{out}");
    }

    #[test]
    fn provider_wording_is_kept_when_it_differs() {
        let mut record = WeatherRecord::placeholder("Paris");
        record.summary = Some("few clouds".into());
        record.condition_code = "fair_day".into();
        assert!(render_record(&record).contains("Fair (few clouds)"));
    }

    #[test]
    fn optional_rows_appear_when_present() {
        let mut record = WeatherRecord::placeholder("Oslo, Norway");
        record.feels_like_c = None;
        record.wind_direction_deg = Some(200.0);
        record.precipitation_mm = 0.4;
        record.cloud_cover_pct = Some(87.5);

        let out = render_record(&record);
        assert!(!out.contains("Feels like"));
        assert!(out.contains("3.5 m/s S"));
        assert!(out.contains("Precipitation: 0.4 mm"), "{out}");
        assert!(out.contains("Cloud cover:   88%"), "{out}");
    }

    #[test]
    fn states_render() {
        assert_eq!(render_state(&FetchState::Idle), "");
        assert_eq!(render_state(&FetchState::Loading), "Loading...");
        assert_eq!(render_state(&FetchState::Failure("city not found".into())), "Error: city not found");
    }

    #[test]
    fn compass_points() {
        assert_eq!(compass(0.0), "N");
        assert_eq!(compass(359.0), "N");
        assert_eq!(compass(45.0), "NE");
        assert_eq!(compass(240.0), "SW");
        assert_eq!(compass(-90.0), "W");
    }
}
