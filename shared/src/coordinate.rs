use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("Coordinates must be numbers")]
    NotFinite,
    #[error("Latitude {0} is outside -90..90")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is outside -180..180")]
    LongitudeOutOfRange(f64),
}

/// A WGS84 latitude/longitude pair that has passed range validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Build from values reported by the mapping library. Click positions can
    /// run past the antimeridian when the world is wrapped, so longitude is
    /// wrapped back into range and latitude clamped instead of rejected.
    pub fn from_map(lat: f64, lon: f64) -> Self {
        let lon = if (MIN_LON..=MAX_LON).contains(&lon) {
            lon
        } else {
            (lon + 180.0).rem_euclid(360.0) - 180.0
        };
        Self {
            lat: lat.clamp(MIN_LAT, MAX_LAT),
            lon,
        }
    }

    /// Fixed-precision text for the latitude and longitude inputs.
    pub fn format_parts(&self, precision: usize) -> (String, String) {
        (
            format!("{:.*}", precision, self.lat),
            format!("{:.*}", precision, self.lon),
        )
    }

    pub fn popup_text(&self, precision: usize) -> String {
        let (lat, lon) = self.format_parts(precision);
        format!("Selected location<br>Lat: {lat}<br>Lon: {lon}")
    }
}

pub fn validate_coordinate(lat: f64, lon: f64) -> bool {
    Coordinate::new(lat, lon).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_range_corners() {
        for lat in [-90.0, -45.5, 0.0, 45.5, 90.0] {
            for lon in [-180.0, -90.25, 0.0, 90.25, 180.0] {
                assert!(validate_coordinate(lat, lon), "{lat},{lon}");
            }
        }
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert!(!validate_coordinate(91.0, 0.0));
        assert!(!validate_coordinate(0.0, 181.0));
        assert!(!validate_coordinate(-90.000_001, 0.0));
        assert!(!validate_coordinate(f64::NAN, 0.0));
        assert!(!validate_coordinate(0.0, f64::NAN));
        assert!(!validate_coordinate(f64::INFINITY, 0.0));
    }

    #[test]
    fn error_variants_describe_failure() {
        assert_eq!(
            Coordinate::new(100.0, 20.0),
            Err(CoordinateError::LatitudeOutOfRange(100.0))
        );
        assert_eq!(
            Coordinate::new(10.0, -200.0),
            Err(CoordinateError::LongitudeOutOfRange(-200.0))
        );
        assert_eq!(
            Coordinate::new(f64::NAN, 1.0),
            Err(CoordinateError::NotFinite)
        );
        assert_eq!(
            CoordinateError::LatitudeOutOfRange(100.0).to_string(),
            "Latitude 100 is outside -90..90"
        );
    }

    #[test]
    fn formats_six_decimals() {
        let c = Coordinate::new(12.5, -77.123_456_789).unwrap();
        assert_eq!(
            c.format_parts(6),
            ("12.500000".to_string(), "-77.123457".to_string())
        );
    }

    #[test]
    fn from_map_wraps_longitude() {
        let c = Coordinate::from_map(10.0, 190.0);
        assert!((c.lon - -170.0).abs() < 1e-9);
        let c = Coordinate::from_map(95.0, -540.0);
        assert_eq!(c.lat, 90.0);
        assert!((c.lon - 180.0).abs() < 1e-9 || (c.lon + 180.0).abs() < 1e-9);
    }
}
