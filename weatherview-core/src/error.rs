use thiserror::Error;

use crate::model::LocationKind;

/// Generic message shown when a provider gives no better explanation.
pub const GENERIC_FETCH_FAILURE: &str = "Failed to fetch weather data";

/// Failure to turn user input into a [`Location`](crate::Location).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("Please enter a location.")]
    EmptyQuery,

    #[error("Unknown location '{0}'. Run `weatherview locations` to see the supported places.")]
    UnknownLocation(String),
}

/// Failure of a single provider call.
///
/// The `Display` output is what ends up in `FetchState::Failure`, so it is
/// written for the person looking at the screen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Failed to fetch weather data: {0}")]
    NetworkFailure(String),

    /// Non-2xx response. `message` is the provider's own explanation when it
    /// sent one, otherwise [`GENERIC_FETCH_FAILURE`].
    #[error("{message}")]
    BadStatus { status: u16, message: String },

    #[error("Weather provider returned an unreadable response: {0}")]
    MalformedPayload(String),

    #[error("Weather provider response is missing `{0}`")]
    MissingRequiredField(&'static str),

    #[error("This provider cannot look up a location given as {0}")]
    UnsupportedLocation(LocationKind),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::NetworkFailure(err.to_string())
    }
}
