use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::{
    config::{Config, Endpoints},
    error::{FetchError, PROVIDER_FALLBACK_MESSAGE},
    model::{LocationCandidate, Locator, WeatherSnapshot},
};

use super::{SUGGESTION_LIMIT, WeatherProvider};

/// Status value OpenWeather uses for a successful weather payload.
const OW_SUCCESS: i64 = 200;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoints: Endpoints,
    timeout: Option<Duration>,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: String,
        endpoints: Endpoints,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            endpoints,
            timeout,
            http,
        })
    }

    /// `None` means requests wait as long as the server takes.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?.to_owned();
        Self::new(api_key, config.endpoints.clone(), config.request_timeout())
    }

    async fn fetch_locations(&self, query: &str) -> Result<Vec<LocationCandidate>, FetchError> {
        let limit = SUGGESTION_LIMIT.to_string();

        let res = self
            .http
            .get(&self.endpoints.geocoding_url)
            .query(&[
                ("q", query),
                ("limit", limit.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Transport(format!(
                "OpenWeather geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: Vec<OwGeoEntry> = serde_json::from_str(&body)?;

        Ok(parsed
            .into_iter()
            .take(SUGGESTION_LIMIT)
            .map(OwGeoEntry::into_candidate)
            .collect())
    }

    async fn fetch_current(&self, locator: &Locator) -> Result<WeatherSnapshot, FetchError> {
        let request = self.http.get(&self.endpoints.weather_url);
        let request = match locator {
            Locator::CityName(name) => request.query(&[("q", name.trim())]),
            Locator::Coordinates { lat, lon, .. } => {
                request.query(&[("lat", lat.to_string()), ("lon", lon.to_string())])
            }
        };

        let res = request
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            FetchError::Transport(format!(
                "OpenWeather returned unparseable body (status {}): {}: {}",
                status,
                e,
                truncate_body(&body),
            ))
        })?;

        if let Some(message) = provider_failure(status, &value) {
            return Err(FetchError::Provider(message));
        }

        let parsed: OwCurrentResponse = serde_json::from_value(value)?;
        Ok(parsed.into_snapshot())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn search_locations(&self, query: &str) -> Result<Vec<LocationCandidate>, FetchError> {
        self.fetch_locations(query).await
    }

    async fn current_weather(&self, locator: &Locator) -> Result<WeatherSnapshot, FetchError> {
        self.fetch_current(locator).await
    }
}

/// `cod` shows up both as a number and as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn as_number(&self) -> Option<i64> {
        match self {
            OwCode::Number(n) => Some(*n),
            OwCode::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwStatus {
    cod: Option<OwCode>,
    message: Option<Value>,
}

/// Returns the message to surface when the payload reports a failure.
///
/// Success is strictly `cod == 200`. Without a `cod`, the HTTP status decides.
fn provider_failure(status: StatusCode, value: &Value) -> Option<String> {
    let envelope = OwStatus::deserialize(value).unwrap_or_default();

    let failed = match &envelope.cod {
        Some(code) => code.as_number() != Some(OW_SUCCESS),
        None => !status.is_success(),
    };
    if !failed {
        return None;
    }

    let message = envelope
        .message
        .as_ref()
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(PROVIDER_FALLBACK_MESSAGE);

    Some(message.to_string())
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    #[serde(default)]
    country: String,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

impl OwGeoEntry {
    fn into_candidate(self) -> LocationCandidate {
        LocationCandidate {
            name: self.name,
            country: self.country,
            state: self.state,
            lat: self.lat,
            lon: self.lon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
    visibility: Option<u32>,
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_snapshot(self) -> WeatherSnapshot {
        let (condition, description, icon) = match self.weather.into_iter().next() {
            Some(w) => (w.main, w.description, w.icon),
            None => ("Unknown".to_string(), String::new(), String::new()),
        };

        WeatherSnapshot {
            name: self.name,
            condition,
            icon,
            description,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            pressure_hpa: self.main.pressure.round() as u32,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            wind_deg: self.wind.deg,
            visibility_m: self.visibility,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
