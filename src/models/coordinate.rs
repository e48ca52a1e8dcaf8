use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS84 position as reported by the field device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting NaN/infinite and out-of-range values.
    pub fn new(lat: f64, lng: f64) -> AppResult<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(AppError::Validation(format!(
                "Coordinate must be finite (lat={lat}, lng={lng})"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::Validation(format!(
                "Latitude out of range [-90, 90]: {lat}"
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::Validation(format!(
                "Longitude out of range [-180, 180]: {lng}"
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Parse the raw strings a client sends; blank or garbage values are
    /// validation failures, not panics.
    pub fn parse(lat: &str, lng: &str) -> AppResult<Self> {
        let lat_v = parse_axis("latitude", lat)?;
        let lng_v = parse_axis("longitude", lng)?;
        Self::new(lat_v, lng_v)
    }

    /// Haversine distance in metres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

fn parse_axis(label: &str, raw: &str) -> AppResult<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("Missing {label}")));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| AppError::Validation(format!("Unparseable {label}: '{raw}'")))
}
