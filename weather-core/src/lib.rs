//! Core library for the `weather` client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the weather provider (OpenWeather)
//! - Debounced city suggestions and weather lookups
//! - The interaction state machine and the runtime that drives it
//! - Pure unit conversions and display-ready view data
//!
//! It is used by `weather-cli`, but any front end can own a [`Runtime`]
//! and render from [`AppState`].

pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod runtime;
pub mod state;
pub mod suggest;
pub mod tasks;
pub mod units;
pub mod view;

pub use config::{Config, Endpoints, SearchConfig};
pub use error::FetchError;
pub use fetch::WeatherFetcher;
pub use model::{DisplayUnit, LocationCandidate, Locator, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use runtime::Runtime;
pub use state::{Action, AppState, DispatchResult, Effect, InteractionState, reducer};
pub use suggest::SuggestionFetcher;
pub use view::{Background, WeatherView};
