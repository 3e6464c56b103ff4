//! Text shown in the info cards, derived deterministically from a reading.

use chrono::{DateTime, TimeZone};
use geoloc_geo::Coordinate;

/// Shown when the device did not report altitude or heading.
pub const UNAVAILABLE: &str = "Indisponível";

/// Shown when the device reports no (or zero) speed.
pub const STATIONARY: &str = "Parado";

/// Meters per second to kilometers per hour.
const MPS_TO_KMH: f64 = 3.6;

/// Round to `places` decimals with ties away from zero (`2.5` -> `3`).
///
/// `format!` alone rounds exact ties to even, which would print "± 2 metros".
fn round_half_away(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// Absolute degrees to 6 places plus hemisphere: `-23.5` -> `"23.500000° S"`.
pub fn format_coordinate(value: f64, axis: Axis) -> String {
    let hemisphere = match (axis, value >= 0.0) {
        (Axis::Latitude, true) => 'N',
        (Axis::Latitude, false) => 'S',
        (Axis::Longitude, true) => 'E',
        (Axis::Longitude, false) => 'W',
    };
    format!("{:.6}° {}", round_half_away(value.abs(), 6), hemisphere)
}

/// Signed `"lat, lon"` to 6 places, as shown in the click popup.
pub fn format_coordinate_pair(coordinate: Coordinate) -> String {
    format!(
        "{:.6}, {:.6}",
        round_half_away(coordinate.latitude, 6),
        round_half_away(coordinate.longitude, 6)
    )
}

pub fn format_accuracy(meters: f64) -> String {
    format!("± {:.0} metros", round_half_away(meters, 0))
}

pub fn format_altitude(altitude: Option<f64>) -> String {
    match altitude {
        Some(m) if m.is_finite() => format!("{:.1} m", round_half_away(m, 1)),
        _ => UNAVAILABLE.to_string(),
    }
}

/// `10.0` m/s -> `"36.0 km/h"`; absent or zero speed reads as stationary.
pub fn format_speed(speed: Option<f64>) -> String {
    match speed {
        Some(mps) if mps.is_finite() && mps.abs() > f64::EPSILON => {
            format!("{:.1} km/h", round_half_away(mps * MPS_TO_KMH, 1))
        }
        _ => STATIONARY.to_string(),
    }
}

pub fn format_heading(heading: Option<f64>) -> String {
    match heading {
        Some(deg) if deg.is_finite() => {
            let deg = deg.rem_euclid(360.0);
            format!("{:.0}° {}", round_half_away(deg, 0), compass_point(deg))
        }
        _ => UNAVAILABLE.to_string(),
    }
}

fn compass_point(deg: f64) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "L", "SE", "S", "SO", "O", "NO"];
    let index = ((deg + 22.5) / 45.0).floor() as usize % POINTS.len();
    POINTS[index]
}

/// Time of day (`HH:MM:SS`) of an epoch-milliseconds timestamp in `tz`.
pub fn format_time_of_day<Tz>(timestamp_ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(utc) => utc.with_timezone(tz).format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}
