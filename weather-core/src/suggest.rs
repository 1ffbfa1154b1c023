//! Debounced city suggestions.

use std::{sync::Arc, time::Duration};

use crate::{
    provider::WeatherProvider,
    state::Action,
    tasks::{TaskKey, TaskManager},
};

/// Shorter queries never reach the geocoding endpoint.
pub const MIN_QUERY_LEN: usize = 3;

pub const SUGGESTION_TASK: TaskKey = TaskKey::new("suggestions");

/// Whether a query is worth looking up. Nothing is suggested while a
/// weather result is on screen.
pub fn should_lookup(query: &str, displaying: bool) -> bool {
    !displaying && query.trim().chars().count() >= MIN_QUERY_LEN
}

/// Issues one geocoding lookup and turns the outcome into an action.
///
/// Failures are logged and reported as [`Action::SuggestionsDidFail`], which
/// the reducer ignores; they never reach the user.
pub async fn lookup_suggestions(
    provider: Arc<dyn WeatherProvider>,
    seq: u64,
    query: String,
) -> Action {
    tracing::debug!(seq, %query, "looking up suggestions");

    match provider.search_locations(&query).await {
        Ok(candidates) => {
            tracing::debug!(seq, %query, count = candidates.len(), "suggestions loaded");
            Action::SuggestionsDidLoad {
                seq,
                query,
                candidates,
            }
        }
        Err(err) => {
            tracing::warn!(seq, %query, error = %err, "failed to fetch suggestions");
            Action::SuggestionsDidFail { seq, query }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SuggestionFetcher {
    provider: Arc<dyn WeatherProvider>,
    debounce: Duration,
}

impl SuggestionFetcher {
    pub fn new(provider: Arc<dyn WeatherProvider>, debounce: Duration) -> Self {
        Self { provider, debounce }
    }

    /// (Re)starts the quiet-period timer; a pending or in-flight lookup is aborted.
    pub fn schedule(&self, tasks: &mut TaskManager<Action>, seq: u64, query: String) {
        let provider = Arc::clone(&self.provider);
        tasks.debounce(
            SUGGESTION_TASK,
            self.debounce,
            lookup_suggestions(provider, seq, query),
        );
    }

    pub fn cancel(&self, tasks: &mut TaskManager<Action>) {
        tasks.cancel(&SUGGESTION_TASK);
    }
}
