use crate::{
    Config,
    error::FetchError,
    model::{LocationCandidate, Locator, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Maximum number of suggestions requested from the geocoding lookup.
pub const SUGGESTION_LIMIT: usize = 5;

/// Seam between the coordinator and whatever answers lookups.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Candidates matching a partial place name, at most [`SUGGESTION_LIMIT`].
    async fn search_locations(&self, query: &str) -> Result<Vec<LocationCandidate>, FetchError>;

    /// Current conditions for a locator. The snapshot name is the provider's.
    async fn current_weather(&self, locator: &Locator) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::from_config(config)?;
    Ok(Arc::new(provider))
}
