use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::FetchError,
    model::{Location, WeatherRecord},
    provider::ProviderId,
};

use super::WeatherProvider;

/// Stands in for a provider that needs an API key nobody configured.
///
/// Every fetch succeeds with [`WeatherRecord::placeholder`], relabelled for
/// the requested place. No network traffic.
#[derive(Debug, Clone)]
pub struct DemoProvider {
    id: ProviderId,
}

impl DemoProvider {
    pub fn new(id: ProviderId) -> Self {
        Self { id }
    }
}

#[async_trait]
impl WeatherProvider for DemoProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn is_demo(&self) -> bool {
        true
    }

    async fn fetch_weather(&self, location: &Location) -> Result<WeatherRecord, FetchError> {
        debug!(location = location.label(), "serving placeholder weather");
        Ok(WeatherRecord::placeholder(location.label()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_placeholder_for_any_location() {
        let provider = DemoProvider::new(ProviderId::OpenWeather);
        let record = provider.fetch_weather(&Location::Query("Lima".into())).await.unwrap();

        assert!(provider.is_demo());
        assert_eq!(record.location_label, "Lima");
        assert_eq!(record.temperature_c, 22.0);
        assert_eq!(record.condition_code, "clearsky_day");
    }
}
