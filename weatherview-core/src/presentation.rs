//! Icons and labels for canonical condition codes.

use serde::Serialize;

use crate::model::WeatherRecord;

/// What the display shows next to the numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub icon: &'static str,
    pub description: &'static str,
}

pub const DEFAULT_PRESENTATION: Presentation =
    Presentation { icon: "🌡️", description: "Unknown conditions" };

// (base code, day icon, night icon, label)
static CONDITIONS: &[(&str, &str, &str, &str)] = &[
    ("clearsky", "☀️", "🌙", "Clear sky"),
    ("fair", "🌤️", "🌙", "Fair"),
    ("partlycloudy", "⛅", "☁️", "Partly cloudy"),
    ("cloudy", "☁️", "☁️", "Cloudy"),
    ("fog", "🌫️", "🌫️", "Fog"),
    ("lightrain", "🌦️", "🌧️", "Light rain"),
    ("rain", "🌧️", "🌧️", "Rain"),
    ("heavyrain", "🌧️", "🌧️", "Heavy rain"),
    ("lightrainshowers", "🌦️", "🌧️", "Light rain showers"),
    ("rainshowers", "🌦️", "🌧️", "Rain showers"),
    ("heavyrainshowers", "🌧️", "🌧️", "Heavy rain showers"),
    ("lightsleet", "🌨️", "🌨️", "Light sleet"),
    ("sleet", "🌨️", "🌨️", "Sleet"),
    ("heavysleet", "🌨️", "🌨️", "Heavy sleet"),
    ("sleetshowers", "🌨️", "🌨️", "Sleet showers"),
    ("lightsnow", "🌨️", "🌨️", "Light snow"),
    ("snow", "❄️", "❄️", "Snow"),
    ("heavysnow", "❄️", "❄️", "Heavy snow"),
    ("lightsnowshowers", "🌨️", "🌨️", "Light snow showers"),
    ("snowshowers", "🌨️", "🌨️", "Snow showers"),
    ("heavysnowshowers", "❄️", "❄️", "Heavy snow showers"),
    ("lightrainandthunder", "⛈️", "⛈️", "Light rain and thunder"),
    ("rainandthunder", "⛈️", "⛈️", "Rain and thunder"),
    ("heavyrainandthunder", "⛈️", "⛈️", "Heavy rain and thunder"),
    ("rainshowersandthunder", "⛈️", "⛈️", "Rain showers and thunder"),
    ("snowandthunder", "⛈️", "⛈️", "Snow and thunder"),
];

pub fn describe(record: &WeatherRecord) -> Presentation {
    describe_code(&record.condition_code)
}

/// Look up a condition code. Never fails; unmapped codes get
/// [`DEFAULT_PRESENTATION`].
pub fn describe_code(code: &str) -> Presentation {
    let code = code.trim().to_ascii_lowercase();
    let (base, night) = match code.rsplit_once('_') {
        Some((base, "night")) => (base, true),
        Some((base, "day" | "polartwilight")) => (base, false),
        _ => (code.as_str(), false),
    };

    CONDITIONS
        .iter()
        .find(|(name, ..)| *name == base)
        .map(|&(_, day_icon, night_icon, description)| Presentation {
            icon: if night { night_icon } else { day_icon },
            description,
        })
        .unwrap_or(DEFAULT_PRESENTATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_and_night_variants_pick_their_icon() {
        assert_eq!(describe_code("clearsky_day"), Presentation { icon: "☀️", description: "Clear sky" });
        assert_eq!(describe_code("clearsky_night").icon, "🌙");
        assert_eq!(describe_code("clearsky_polartwilight").icon, "☀️");
    }

    #[test]
    fn codes_without_suffix_resolve() {
        assert_eq!(describe_code("rain").description, "Rain");
        assert_eq!(describe_code("FOG").description, "Fog");
    }

    #[test]
    fn unmapped_codes_fall_back() {
        for code in ["", "unknown", "tornado_day", "_night", "clearsky_evening", "☃"] {
            let p = describe_code(code);
            assert_eq!(p, DEFAULT_PRESENTATION, "{code:?}");
            assert!(!p.icon.is_empty() && !p.description.is_empty());
        }
    }

    #[test]
    fn describe_uses_record_condition() {
        let record = WeatherRecord::placeholder("London");
        assert_eq!(describe(&record).description, "Clear sky");
    }

    #[test]
    fn table_has_no_duplicate_codes() {
        let mut names: Vec<_> = CONDITIONS.iter().map(|(n, ..)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CONDITIONS.len());
    }
}
