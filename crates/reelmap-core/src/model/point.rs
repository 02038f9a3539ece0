use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{InvalidCoordinate, ParseError};

/// A validated position in decimal degrees.
///
/// The only way to obtain a `GeoPoint` is through [`GeoPoint::new`] (or
/// parsing), so every instance lies within `[-90, 90]` latitude and
/// `[-180, 180]` longitude and holds finite values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
    pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        // NaN fails `contains`, infinities fall outside the ranges.
        if Self::LATITUDE_RANGE.contains(&latitude) && Self::LONGITUDE_RANGE.contains(&longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Parses the `"lat, lon"` form used for interactive input.
impl FromStr for GeoPoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [lat, lon] = parts.as_slice() else {
            return Err(ParseError::FieldCount {
                expected: 2,
                found: parts.len(),
            });
        };
        let latitude = parse_degrees("latitude", lat)?;
        let longitude = parse_degrees("longitude", lon)?;
        Ok(Self::new(latitude, longitude)?)
    }
}

pub(crate) fn parse_degrees(field: &'static str, value: &str) -> Result<f64, ParseError> {
    value.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
