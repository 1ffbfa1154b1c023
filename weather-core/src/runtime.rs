//! Owns the state and runs the effects the reducer asks for.
//!
//! Everything happens on the caller's task: `dispatch` is synchronous, and
//! task results only touch the state once the caller pulls them in with
//! [`Runtime::step`]. Lookups themselves run as tokio tasks.

use std::{sync::Arc, time::Duration};

use crate::{
    Config,
    fetch::WeatherFetcher,
    provider::{WeatherProvider, provider_from_config},
    state::{Action, AppState, Effect, reducer},
    suggest::SuggestionFetcher,
    tasks::TaskManager,
};

pub struct Runtime {
    state: AppState,
    tasks: TaskManager<Action>,
    suggestions: SuggestionFetcher,
    weather: WeatherFetcher,
}

impl Runtime {
    /// Dispatching must happen inside a tokio runtime.
    pub fn new(provider: Arc<dyn WeatherProvider>, debounce: Duration) -> Self {
        Self {
            state: AppState::new(),
            tasks: TaskManager::new(),
            suggestions: SuggestionFetcher::new(Arc::clone(&provider), debounce),
            weather: WeatherFetcher::new(provider),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        Ok(Self::new(provider, config.debounce()))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Applies `action` and starts whatever it asks for. Returns whether a
    /// re-render is due.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = reducer(&mut self.state, action);
        for effect in result.effects {
            self.handle_effect(effect);
        }
        result.changed
    }

    fn handle_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SearchLocations { seq, query } => {
                self.suggestions.schedule(&mut self.tasks, seq, query);
            }
            Effect::CancelSearch => self.suggestions.cancel(&mut self.tasks),
            Effect::FetchWeather { seq, locator } => {
                self.weather.spawn(&mut self.tasks, seq, locator);
            }
        }
    }

    /// Next finished task result, without applying it.
    pub async fn next_action(&mut self) -> Option<Action> {
        self.tasks.recv().await
    }

    /// Waits for one task result and applies it.
    pub async fn step(&mut self) -> Option<bool> {
        let action = self.next_action().await?;
        Some(self.dispatch(action))
    }

    /// No task running and no result waiting to be applied.
    pub fn is_settled(&self) -> bool {
        self.tasks.is_idle()
    }

    /// Applies results until nothing is outstanding. A request that never
    /// completes keeps this waiting unless a request timeout is configured.
    pub async fn run_until_settled(&mut self) {
        while !self.is_settled() {
            if self.step().await.is_none() {
                break;
            }
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("state", &self.state)
            .field("outstanding_tasks", &self.tasks.len())
            .finish()
    }
}
