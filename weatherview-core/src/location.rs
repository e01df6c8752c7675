//! Turning what the user typed or picked into a [`Location`].

use crate::{
    error::ResolutionError,
    model::{Location, LocationKind},
};

/// A named place with fixed coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownPlace {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

const fn place(name: &'static str, lat: f64, lon: f64) -> KnownPlace {
    KnownPlace { name, lat, lon }
}

/// Places selectable for coordinate-based providers.
pub static KNOWN_PLACES: &[KnownPlace] = &[
    place("Oslo, Norway", 59.9139, 10.7522),
    place("Bergen, Norway", 60.3913, 5.3221),
    place("Trondheim, Norway", 63.4305, 10.3951),
    place("Stavanger, Norway", 58.9700, 5.7331),
    place("Tromsø, Norway", 69.6492, 18.9553),
    place("Stockholm, Sweden", 59.3293, 18.0686),
    place("Copenhagen, Denmark", 55.6761, 12.5683),
    place("Helsinki, Finland", 60.1699, 24.9384),
    place("Reykjavik, Iceland", 64.1466, -21.9426),
    place("London, United Kingdom", 51.5074, -0.1278),
    place("Paris, France", 48.8566, 2.3522),
    place("Berlin, Germany", 52.5200, 13.4050),
    place("New York, United States", 40.7128, -74.0060),
    place("Tokyo, Japan", 35.6762, 139.6503),
    place("Sydney, Australia", -33.8688, 151.2093),
];

/// Maps input to a location the active provider understands.
#[derive(Debug, Clone, Copy)]
pub enum LocationResolver {
    /// Pass the trimmed text through as a query.
    FreeText,
    /// Look the name up in a fixed table.
    KnownPlaces(&'static [KnownPlace]),
}

impl LocationResolver {
    /// Resolver matching what a provider of the given kind expects.
    pub fn for_kind(kind: LocationKind) -> Self {
        match kind {
            LocationKind::Query => LocationResolver::FreeText,
            LocationKind::Coordinates => LocationResolver::KnownPlaces(KNOWN_PLACES),
        }
    }

    pub fn resolve(&self, input: &str) -> Result<Location, ResolutionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ResolutionError::EmptyQuery);
        }

        match self {
            LocationResolver::FreeText => Ok(Location::Query(trimmed.to_string())),
            LocationResolver::KnownPlaces(places) => {
                let wanted = trimmed.to_lowercase();
                places
                    .iter()
                    .find(|p| p.name.to_lowercase() == wanted)
                    .map(|p| Location::Coordinates { label: p.name.to_string(), lat: p.lat, lon: p.lon })
                    .ok_or_else(|| ResolutionError::UnknownLocation(trimmed.to_string()))
            }
        }
    }

    /// Names offered for selection, if this resolver has a fixed list.
    pub fn choices(&self) -> Option<Vec<&'static str>> {
        match self {
            LocationResolver::FreeText => None,
            LocationResolver::KnownPlaces(places) => Some(places.iter().map(|p| p.name).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords() -> LocationResolver {
        LocationResolver::for_kind(LocationKind::Coordinates)
    }

    #[test]
    fn free_text_trims_and_wraps() {
        let loc = LocationResolver::FreeText.resolve("  London \n").unwrap();
        assert_eq!(loc, Location::Query("London".into()));
    }

    #[test]
    fn empty_input_is_rejected_by_both_resolvers() {
        assert_eq!(LocationResolver::FreeText.resolve(""), Err(ResolutionError::EmptyQuery));
        assert_eq!(LocationResolver::FreeText.resolve("   "), Err(ResolutionError::EmptyQuery));
        assert_eq!(coords().resolve(""), Err(ResolutionError::EmptyQuery));
    }

    #[test]
    fn known_place_yields_exact_table_coordinates() {
        let loc = coords().resolve("Oslo, Norway").unwrap();
        assert_eq!(
            loc,
            Location::Coordinates { label: "Oslo, Norway".into(), lat: 59.9139, lon: 10.7522 }
        );
    }

    #[test]
    fn known_place_lookup_ignores_case_and_padding() {
        let loc = coords().resolve("  tromsø, norway ").unwrap();
        assert_eq!(loc.label(), "Tromsø, Norway");
    }

    #[test]
    fn unknown_place_is_reported() {
        assert_eq!(
            coords().resolve("Nowhereland"),
            Err(ResolutionError::UnknownLocation("Nowhereland".into()))
        );
    }

    #[test]
    fn every_table_entry_round_trips() {
        for p in KNOWN_PLACES {
            match coords().resolve(p.name).unwrap() {
                Location::Coordinates { lat, lon, .. } => {
                    assert_eq!((lat, lon), (p.lat, p.lon), "{}", p.name);
                }
                other => panic!("expected coordinates, got {other:?}"),
            }
        }
    }

    #[test]
    fn only_fixed_resolver_offers_choices() {
        assert!(LocationResolver::FreeText.choices().is_none());
        assert_eq!(coords().choices().unwrap().len(), KNOWN_PLACES.len());
    }
}
