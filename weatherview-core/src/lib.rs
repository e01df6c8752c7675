//! Core library for the `weatherview` display.
//!
//! This crate defines:
//! - Location resolution (free text or a fixed table of known places)
//! - Provider adapters normalizing OpenWeather and MET Norway payloads
//! - The fetch orchestrator owning the single display state
//! - Icon/label lookup for canonical condition codes
//! - Configuration & credentials handling
//!
//! It is used by `weatherview-cli`, but can also back other front ends.

pub mod condition;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod orchestrator;
pub mod presentation;
pub mod provider;

pub use config::{Config, ProviderConfig};
pub use error::{FetchError, ResolutionError};
pub use location::{KNOWN_PLACES, KnownPlace, LocationResolver};
pub use model::{FetchState, Location, LocationKind, WeatherRecord};
pub use orchestrator::FetchOrchestrator;
pub use presentation::{Presentation, describe};
pub use provider::{ProviderId, WeatherProvider};
