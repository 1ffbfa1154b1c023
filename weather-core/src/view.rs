//! Display-ready data derived from a snapshot.
//!
//! Nothing here is cached: day/night depends on the wall clock, so callers
//! rebuild the view on every render.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

use crate::{
    model::{DisplayUnit, WeatherSnapshot},
    units::{
        NOT_AVAILABLE, format_clock_in, format_temperature, humidity_label, visibility_label,
        wind_direction_label,
    },
};

/// What the background should depict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Background {
    pub condition: String,
    pub is_day: bool,
}

impl Background {
    pub fn new(snapshot: &WeatherSnapshot, now: i64) -> Self {
        Self {
            condition: snapshot.condition.clone(),
            is_day: snapshot.is_daytime(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub name: String,
    pub condition: String,
    pub description: String,
    pub icon_url: Option<String>,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub visibility: String,
    pub pressure: String,
    pub sunrise: String,
    pub sunset: String,
    /// Label for the unit switch, e.g. "Switch to °F".
    pub unit_toggle: String,
    pub background: Background,
}

impl WeatherView {
    /// Clock values in local time.
    pub fn new(snapshot: &WeatherSnapshot, unit: DisplayUnit, now: DateTime<Utc>) -> Self {
        Self::new_in(snapshot, unit, now, &Local)
    }

    pub fn new_in<Tz: TimeZone>(
        snapshot: &WeatherSnapshot,
        unit: DisplayUnit,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let wind_dir = snapshot
            .wind_deg
            .map_or(NOT_AVAILABLE, wind_direction_label);

        Self {
            name: snapshot.name.clone(),
            condition: snapshot.condition.clone(),
            description: snapshot.description.clone(),
            icon_url: snapshot.icon_url(),
            temperature: format_temperature(snapshot.temperature_c, unit),
            feels_like: format_temperature(snapshot.feels_like_c, unit),
            humidity: format!(
                "{}% ({})",
                snapshot.humidity_pct,
                humidity_label(snapshot.humidity_pct)
            ),
            wind: format!("{} m/s ({})", snapshot.wind_speed_mps, wind_dir),
            visibility: snapshot
                .visibility_m
                .map_or(NOT_AVAILABLE, visibility_label)
                .to_string(),
            pressure: format!("{} hPa", snapshot.pressure_hpa),
            sunrise: format_clock_in(snapshot.sunrise, tz),
            sunset: format_clock_in(snapshot.sunset, tz),
            unit_toggle: format!("Switch to {}", unit.toggle().symbol()),
            background: Background::new(snapshot, now.timestamp()),
        }
    }
}
