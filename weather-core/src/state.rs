//! Interaction state and the reducer that owns every transition.
//!
//! The reducer never touches the network. It returns [`Effect`]s that the
//! [`Runtime`](crate::runtime::Runtime) turns into tasks; task results come
//! back as `*Did*` actions tagged with the sequence number they were issued
//! under, and anything tagged with an outdated number is dropped here.

use chrono::{DateTime, Utc};

use crate::{
    error::FetchError,
    model::{DisplayUnit, LocationCandidate, Locator, WeatherSnapshot},
    provider::SUGGESTION_LIMIT,
    suggest::should_lookup,
    view::WeatherView,
};

/// Exactly one of these is on screen at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Suggesting(Vec<LocationCandidate>),
    Displaying(WeatherSnapshot),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The input text changed (every keystroke).
    QueryChanged(String),
    /// Form submitted with the current text.
    Submit,
    /// Suggestion at this index was clicked.
    SelectSuggestion(usize),
    ToggleUnit,
    NewSearch,

    SuggestionsDidLoad {
        seq: u64,
        query: String,
        candidates: Vec<LocationCandidate>,
    },
    SuggestionsDidFail {
        seq: u64,
        query: String,
    },
    WeatherDidLoad {
        seq: u64,
        snapshot: WeatherSnapshot,
    },
    WeatherDidFail {
        seq: u64,
        error: FetchError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Debounced geocoding lookup for `query`.
    SearchLocations { seq: u64, query: String },
    /// Drop any pending or in-flight suggestion lookup.
    CancelSearch,
    FetchWeather { seq: u64, locator: Locator },
}

/// Outcome of a single dispatch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DispatchResult {
    /// Whether anything visible changed.
    pub changed: bool,
    pub effects: Vec<Effect>,
}

impl DispatchResult {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    pub fn changed_with(effect: Effect) -> Self {
        Self::changed().with(effect)
    }

    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    query: String,
    interaction: InteractionState,
    unit: DisplayUnit,
    /// Bumped whenever an outstanding suggestion lookup stops being relevant.
    suggestion_seq: u64,
    /// Sequence number of the most recently issued weather fetch.
    weather_seq: u64,
    /// Set while the latest weather fetch is outstanding.
    pending_weather: Option<u64>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    pub fn suggestions(&self) -> &[LocationCandidate] {
        match &self.interaction {
            InteractionState::Suggesting(list) => list,
            _ => &[],
        }
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match &self.interaction {
            InteractionState::Displaying(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.interaction {
            InteractionState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_displaying(&self) -> bool {
        matches!(self.interaction, InteractionState::Displaying(_))
    }

    /// Waiting on a weather response.
    pub fn is_loading(&self) -> bool {
        self.pending_weather.is_some()
    }

    /// Render data for the displayed snapshot, computed against `now`.
    pub fn view(&self, now: DateTime<Utc>) -> Option<WeatherView> {
        self.snapshot()
            .map(|snapshot| WeatherView::new(snapshot, self.unit, now))
    }

    fn clear_suggestions(&mut self) {
        if matches!(self.interaction, InteractionState::Suggesting(_)) {
            self.interaction = InteractionState::Idle;
        }
    }

    /// Invalidates outstanding suggestion lookups and hides the list.
    fn retire_suggestions(&mut self) {
        self.suggestion_seq += 1;
        self.clear_suggestions();
    }

    fn issue_fetch(&mut self, locator: Locator) -> DispatchResult {
        self.retire_suggestions();
        self.weather_seq += 1;
        self.pending_weather = Some(self.weather_seq);

        DispatchResult::changed_with(Effect::CancelSearch).with(Effect::FetchWeather {
            seq: self.weather_seq,
            locator,
        })
    }

    fn is_current_weather(&self, seq: u64) -> bool {
        self.pending_weather == Some(seq) && seq == self.weather_seq
    }
}

/// Applies `action` to `state`.
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult {
    match action {
        Action::QueryChanged(query) => {
            if query == state.query {
                return DispatchResult::unchanged();
            }
            state.query = query;
            state.suggestion_seq += 1;

            if should_lookup(&state.query, state.is_displaying()) {
                DispatchResult::changed_with(Effect::SearchLocations {
                    seq: state.suggestion_seq,
                    query: state.query.trim().to_string(),
                })
            } else {
                state.clear_suggestions();
                DispatchResult::changed_with(Effect::CancelSearch)
            }
        }

        Action::Submit => {
            let query = state.query.trim().to_string();
            if query.is_empty() {
                state.retire_suggestions();
                state.interaction =
                    InteractionState::Error(FetchError::empty_query().user_message());
                return DispatchResult::changed_with(Effect::CancelSearch);
            }
            state.issue_fetch(Locator::CityName(query))
        }

        Action::SelectSuggestion(index) => match state
            .suggestions()
            .get(index)
            .map(LocationCandidate::locator)
        {
            Some(locator) => state.issue_fetch(locator),
            None => {
                tracing::debug!(index, "no suggestion at index");
                DispatchResult::unchanged()
            }
        },

        Action::ToggleUnit => {
            state.unit = state.unit.toggle();
            DispatchResult::changed()
        }

        Action::NewSearch => {
            state.query.clear();
            state.interaction = InteractionState::Idle;
            state.suggestion_seq += 1;
            // Anything still in flight belongs to the previous search.
            state.weather_seq += 1;
            state.pending_weather = None;
            DispatchResult::changed_with(Effect::CancelSearch)
        }

        Action::SuggestionsDidLoad {
            seq,
            query,
            mut candidates,
        } => {
            if seq != state.suggestion_seq
                || query != state.query.trim()
                || state.is_displaying()
            {
                tracing::debug!(
                    seq,
                    current = state.suggestion_seq,
                    %query,
                    "discarding stale suggestions"
                );
                return DispatchResult::unchanged();
            }

            if candidates.is_empty() {
                let had_list = !state.suggestions().is_empty();
                state.clear_suggestions();
                return DispatchResult {
                    changed: had_list,
                    effects: vec![],
                };
            }

            candidates.truncate(SUGGESTION_LIMIT);
            state.interaction = InteractionState::Suggesting(candidates);
            DispatchResult::changed()
        }

        // Already logged where it happened; the list stays as it was.
        Action::SuggestionsDidFail { .. } => DispatchResult::unchanged(),

        Action::WeatherDidLoad { seq, snapshot } => {
            if !state.is_current_weather(seq) {
                tracing::debug!(seq, latest = state.weather_seq, "discarding stale weather");
                return DispatchResult::unchanged();
            }

            tracing::info!(seq, name = %snapshot.name, "weather loaded");
            state.pending_weather = None;
            state.query = snapshot.name.clone();
            state.suggestion_seq += 1;
            state.interaction = InteractionState::Displaying(snapshot);
            DispatchResult::changed_with(Effect::CancelSearch)
        }

        Action::WeatherDidFail { seq, error } => {
            if !state.is_current_weather(seq) {
                tracing::debug!(seq, latest = state.weather_seq, "discarding stale weather error");
                return DispatchResult::unchanged();
            }

            state.pending_weather = None;
            state.interaction = InteractionState::Error(error.user_message());
            DispatchResult::changed()
        }
    }
}
