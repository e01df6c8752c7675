//! Normalizing provider condition fields into one code vocabulary.
//!
//! Canonical codes use the MET Norway symbol names (`clearsky_day`, `rain`,
//! `snowshowers_night`, ...), so MET Norway symbols pass through and other
//! providers are mapped onto them.

/// Code used when a provider sends nothing usable.
pub const UNKNOWN_CONDITION: &str = "unknown";

/// Canonical code for a MET Norway `symbol_code`.
pub fn from_metno_symbol(symbol: Option<&str>) -> String {
    match symbol.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_lowercase(),
        _ => UNKNOWN_CONDITION.to_string(),
    }
}

/// Canonical code for an OpenWeather icon id such as `01d` or `10n`.
pub fn from_openweather_icon(icon: Option<&str>) -> String {
    let Some((group, period)) = icon
        .map(str::trim)
        .filter(|i| i.is_ascii() && i.len() == 3)
        .map(|i| i.split_at(2))
    else {
        return UNKNOWN_CONDITION.to_string();
    };

    let suffix = match period {
        "d" => "day",
        "n" => "night",
        _ => return UNKNOWN_CONDITION.to_string(),
    };

    let (base, has_period) = match group {
        "01" => ("clearsky", true),
        "02" => ("fair", true),
        "03" => ("partlycloudy", true),
        "04" => ("cloudy", false),
        "09" => ("rainshowers", true),
        "10" => ("rain", false),
        "11" => ("rainandthunder", false),
        "13" => ("snow", false),
        "50" => ("fog", false),
        _ => return UNKNOWN_CONDITION.to_string(),
    };

    if has_period { format!("{base}_{suffix}") } else { base.to_string() }
}
