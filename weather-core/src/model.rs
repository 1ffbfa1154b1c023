use serde::{Deserialize, Serialize};

/// A place returned by the geocoding lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl LocationCandidate {
    /// "name, country[, state]"
    pub fn display_name(&self) -> String {
        match self.state.as_deref().filter(|s| !s.is_empty()) {
            Some(state) => format!("{}, {}, {}", self.name, self.country, state),
            None => format!("{}, {}", self.name, self.country),
        }
    }

    /// Identity for list rendering.
    pub fn key(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// Weather locator for this candidate, labelled with its display name.
    pub fn locator(&self) -> Locator {
        Locator::Coordinates {
            lat: self.lat,
            lon: self.lon,
            label: self.display_name(),
        }
    }
}

/// What to ask the weather endpoint for.
#[derive(Debug, Clone, PartialEq)]
pub enum Locator {
    /// Free-text place name, sent as typed (trimmed).
    CityName(String),
    /// Coordinates with a precomputed label that replaces the provider's name.
    Coordinates { lat: f64, lon: f64, label: String },
}

impl Locator {
    pub fn label(&self) -> Option<&str> {
        match self {
            Locator::CityName(_) => None,
            Locator::Coordinates { label, .. } => Some(label),
        }
    }
}

/// Normalized result of a successful weather lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    /// Primary condition, e.g. "Clouds".
    pub condition: String,
    pub icon: String,
    pub description: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub pressure_hpa: u32,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub wind_deg: Option<f64>,
    pub visibility_m: Option<u32>,
    pub sunrise: i64,
    pub sunset: i64,
}

impl WeatherSnapshot {
    pub fn icon_url(&self) -> Option<String> {
        if self.icon.is_empty() {
            None
        } else {
            Some(format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon))
        }
    }

    /// True when `now` lies strictly between sunrise and sunset.
    pub fn is_daytime(&self, now: i64) -> bool {
        now > self.sunrise && now < self.sunset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl DisplayUnit {
    pub fn toggle(self) -> Self {
        match self {
            DisplayUnit::Celsius => DisplayUnit::Fahrenheit,
            DisplayUnit::Fahrenheit => DisplayUnit::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "°C",
            DisplayUnit::Fahrenheit => "°F",
        }
    }
}
