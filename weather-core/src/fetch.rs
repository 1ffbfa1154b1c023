//! Weather lookups by name or coordinates.

use std::sync::Arc;

use crate::{
    model::Locator,
    provider::WeatherProvider,
    state::Action,
    tasks::{TaskKey, TaskManager},
};

pub const WEATHER_TASK: TaskKey = TaskKey::new("weather");

/// Fetches current conditions and tags the outcome with `seq`.
///
/// A coordinate locator's label replaces the provider's location name.
pub async fn fetch_weather(
    provider: Arc<dyn WeatherProvider>,
    seq: u64,
    locator: Locator,
) -> Action {
    tracing::debug!(seq, ?locator, "fetching weather");

    match provider.current_weather(&locator).await {
        Ok(mut snapshot) => {
            if let Some(label) = locator.label() {
                snapshot.name = label.to_string();
            }
            Action::WeatherDidLoad { seq, snapshot }
        }
        Err(error) => {
            tracing::warn!(seq, ?locator, %error, "weather lookup failed");
            Action::WeatherDidFail { seq, error }
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherFetcher {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Not debounced. A newer fetch replaces an older one still in flight.
    pub fn spawn(&self, tasks: &mut TaskManager<Action>, seq: u64, locator: Locator) {
        let provider = Arc::clone(&self.provider);
        tasks.spawn(WEATHER_TASK, fetch_weather(provider, seq, locator));
    }
}
