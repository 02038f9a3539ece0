use serde::Serialize;
use std::fmt;

use crate::model::point::GeoPoint;

/// One recorded filming location.
///
/// Titles are not unique: a series shot in several places in one year has
/// one record per place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    pub title: String,
    pub year: i32,
    pub place_name: String,
    pub position: GeoPoint,
}

impl LocationRecord {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        year: i32,
        place_name: impl Into<String>,
        position: GeoPoint,
    ) -> Self {
        Self {
            title: title.into(),
            year,
            place_name: place_name.into(),
            position,
        }
    }
}

/// Formats the record as a dataset line (see [`crate::parse`]).
impl fmt::Display for LocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.title,
            self.year,
            self.place_name,
            self.position.latitude(),
            self.position.longitude()
        )
    }
}

/// A record paired with its distance from a query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedMatch<'a> {
    pub record: &'a LocationRecord,
    pub distance_km: f64,
}
