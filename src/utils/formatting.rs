//! Formatting utilities used for CLI outputs.

use crate::models::coordinate::Coordinate;
use chrono::{DateTime, Local, Utc};

pub fn mins2readable(mins: i64) -> String {
    let abs_m = mins.abs();
    let sign = if mins < 0 { "-" } else { "" };
    format!("{}{:02}h {:02}m", sign, abs_m / 60, abs_m % 60)
}

/// Metres below 1 km, kilometres with two decimals above.
pub fn format_distance(m: f64) -> String {
    if m < 1000.0 {
        format!("{:.0} m", m)
    } else {
        format!("{:.2} km", m / 1000.0)
    }
}

pub fn format_coord(c: &Coordinate) -> String {
    format!("{:.6}, {:.6}", c.lat, c.lng)
}

pub fn format_opt_coord(c: Option<&Coordinate>) -> String {
    c.map(format_coord).unwrap_or_else(|| "--".to_string())
}

/// Local wall-clock time, `HH:MM:SS`.
pub fn local_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Local date and time, `YYYY-MM-DD HH:MM`.
pub fn local_datetime(ts: Option<&DateTime<Utc>>) -> String {
    ts.map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "--".to_string())
}
