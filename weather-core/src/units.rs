//! Pure conversions from raw metric measurements to display values.

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::model::DisplayUnit;

/// Label used when a measurement is missing or not a number.
pub const NOT_AVAILABLE: &str = "N/A";

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
const COMPASS_BUCKET_DEG: f64 = 360.0 / COMPASS.len() as f64;

/// Celsius is passed through; Fahrenheit is rounded to a whole degree.
pub fn convert_temperature(celsius: f64, unit: DisplayUnit) -> f64 {
    match unit {
        DisplayUnit::Celsius => celsius,
        DisplayUnit::Fahrenheit => (celsius * 9.0 / 5.0 + 32.0).round(),
    }
}

pub fn format_temperature(celsius: f64, unit: DisplayUnit) -> String {
    format!("{}{}", convert_temperature(celsius, unit), unit.symbol())
}

/// 8-point compass label. Each label owns a 45° bucket centred on it,
/// so "N" covers [337.5, 22.5).
pub fn wind_direction_label(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return NOT_AVAILABLE;
    }

    let normalized = degrees.rem_euclid(360.0);
    let index = ((normalized + COMPASS_BUCKET_DEG / 2.0) / COMPASS_BUCKET_DEG) as usize;
    COMPASS[index % COMPASS.len()]
}

/// Thresholds in meters: <1000 Poor, <4000 Moderate, <10000 Good, else Excellent.
pub fn visibility_label(meters: u32) -> &'static str {
    match meters {
        0..1_000 => "Poor",
        1_000..4_000 => "Moderate",
        4_000..10_000 => "Good",
        _ => "Excellent",
    }
}

/// Thresholds in percent: <30 Low, <=60 Comfortable, else High.
pub fn humidity_label(percent: u8) -> &'static str {
    match percent {
        0..30 => "Low",
        30..=60 => "Comfortable",
        _ => "High",
    }
}

/// 24-hour "HH:MM" in the given zone.
pub fn format_clock_in<Tz: TimeZone>(epoch: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::<Utc>::from_timestamp(epoch, 0) {
        Some(utc) => utc.with_timezone(tz).format("%H:%M").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// 24-hour "HH:MM" in local time.
pub fn format_clock(epoch: i64) -> String {
    format_clock_in(epoch, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_is_unchanged() {
        assert_eq!(convert_temperature(12.34, DisplayUnit::Celsius), 12.34);
    }

    #[test]
    fn fahrenheit_reference_points() {
        assert_eq!(convert_temperature(0.0, DisplayUnit::Fahrenheit), 32.0);
        assert_eq!(convert_temperature(100.0, DisplayUnit::Fahrenheit), 212.0);
        assert_eq!(convert_temperature(-40.0, DisplayUnit::Fahrenheit), -40.0);
        // 21.3°C = 70.34°F
        assert_eq!(convert_temperature(21.3, DisplayUnit::Fahrenheit), 70.0);
    }

    #[test]
    fn toggling_twice_shows_original_value() {
        let unit = DisplayUnit::Celsius;
        let before = format_temperature(18.6, unit);
        let after = format_temperature(18.6, unit.toggle().toggle());
        assert_eq!(before, after);
        assert_eq!(format_temperature(0.0, unit.toggle()), "32°F");
    }

    #[test]
    fn wind_buckets() {
        assert_eq!(wind_direction_label(0.0), "N");
        assert_eq!(wind_direction_label(22.4), "N");
        assert_eq!(wind_direction_label(22.5), "NE");
        assert_eq!(wind_direction_label(90.0), "E");
        assert_eq!(wind_direction_label(180.0), "S");
        assert_eq!(wind_direction_label(225.0), "SW");
        assert_eq!(wind_direction_label(337.4), "NW");
        assert_eq!(wind_direction_label(337.5), "N");
        assert_eq!(wind_direction_label(360.0), "N");
    }

    #[test]
    fn wind_normalizes_out_of_range() {
        assert_eq!(wind_direction_label(450.0), "E");
        assert_eq!(wind_direction_label(-90.0), "W");
        assert_eq!(wind_direction_label(f64::NAN), NOT_AVAILABLE);
        assert_eq!(wind_direction_label(f64::INFINITY), NOT_AVAILABLE);
    }

    #[test]
    fn visibility_buckets() {
        assert_eq!(visibility_label(0), "Poor");
        assert_eq!(visibility_label(999), "Poor");
        assert_eq!(visibility_label(1_000), "Moderate");
        assert_eq!(visibility_label(5_000), "Good");
        assert_eq!(visibility_label(10_000), "Excellent");
    }

    #[test]
    fn humidity_buckets() {
        assert_eq!(humidity_label(10), "Low");
        assert_eq!(humidity_label(30), "Comfortable");
        assert_eq!(humidity_label(60), "Comfortable");
        assert_eq!(humidity_label(61), "High");
        assert_eq!(humidity_label(100), "High");
    }

    #[test]
    fn clock_in_utc() {
        assert_eq!(format_clock_in(6 * 3600 + 5 * 60, &Utc), "06:05");
        assert_eq!(format_clock_in(18 * 3600, &Utc), "18:00");
    }
}
