use thiserror::Error;

/// Shown when a transport failure leaves nothing useful to report.
pub const TRANSPORT_MESSAGE: &str = "Failed to fetch weather data. Please try again.";

/// Shown when the provider reports a failure without a message.
pub const PROVIDER_FALLBACK_MESSAGE: &str = "Failed to fetch weather data";

/// Shown when the user submits an empty query.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a city name";

/// Failure of a lookup, classified by who is at fault.
///
/// `Display` keeps the technical detail for logs; [`FetchError::user_message`]
/// is what ends up next to the input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Input rejected before any request was made.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Network failure or a response we could not make sense of.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Well-formed error payload from the provider (e.g. "city not found").
    #[error("Provider error: {0}")]
    Provider(String),
}

impl FetchError {
    pub fn empty_query() -> Self {
        FetchError::Validation(EMPTY_QUERY_MESSAGE.to_string())
    }

    /// Single-line message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Validation(msg) => msg.clone(),
            FetchError::Transport(_) => TRANSPORT_MESSAGE.to_string(),
            FetchError::Provider(msg) if msg.trim().is_empty() => {
                PROVIDER_FALLBACK_MESSAGE.to_string()
            }
            FetchError::Provider(msg) => msg.clone(),
        }
    }
}

/// The request URL carries the API key, so it never makes it into the message.
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Transport(format!("malformed response: {err}"))
    }
}
