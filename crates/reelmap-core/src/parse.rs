//! Dataset line parsing.
//!
//! A dataset line holds five TAB-separated fields:
//!
//! ```text
//! title<TAB>year<TAB>place name<TAB>latitude<TAB>longitude
//! ```
//!
//! Place names routinely contain commas, hence the TAB delimiter.

use chrono::{Datelike, Utc};
use std::ops::RangeInclusive;

use crate::error::ParseError;
use crate::model::point::parse_degrees;
use crate::model::{GeoPoint, LocationRecord};

pub const DELIMITER: char = '\t';
pub const FIELD_COUNT: usize = 5;

/// Earliest year accepted for a production.
pub const FIRST_FILM_YEAR: i32 = 1880;

/// Validates dataset lines into [`LocationRecord`]s.
#[derive(Debug, Clone)]
pub struct RecordParser {
    years: RangeInclusive<i32>,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordParser {
    /// A parser accepting years from 1880 up to next year.
    #[must_use]
    pub fn new() -> Self {
        Self::with_year_range(FIRST_FILM_YEAR..=Utc::now().year() + 1)
    }

    #[must_use]
    pub fn with_year_range(years: RangeInclusive<i32>) -> Self {
        Self { years }
    }

    #[must_use]
    pub fn year_range(&self) -> &RangeInclusive<i32> {
        &self.years
    }

    /// Parse one dataset line.
    ///
    /// # Errors
    /// Returns the first problem found with the line; nothing is partially
    /// built.
    pub fn parse(&self, line: &str) -> Result<LocationRecord, ParseError> {
        let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
        let [title, year, place_name, latitude, longitude] = fields.as_slice() else {
            return Err(ParseError::FieldCount {
                expected: FIELD_COUNT,
                found: fields.len(),
            });
        };

        if title.is_empty() {
            return Err(ParseError::EmptyTitle);
        }

        let year = self.parse_year(year)?;
        let latitude = parse_degrees("latitude", latitude)?;
        let longitude = parse_degrees("longitude", longitude)?;
        let position = GeoPoint::new(latitude, longitude)?;

        Ok(LocationRecord::new(*title, year, *place_name, position))
    }

    fn parse_year(&self, value: &str) -> Result<i32, ParseError> {
        let year: i32 = value
            .parse()
            .map_err(|_| ParseError::InvalidYear(value.to_string()))?;
        if self.years.contains(&year) {
            Ok(year)
        } else {
            Err(ParseError::YearOutOfRange {
                year,
                min: *self.years.start(),
                max: *self.years.end(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> RecordParser {
        RecordParser::with_year_range(1880..=2030)
    }

    #[test]
    fn test_parse_valid_line() {
        let record = parser()
            .parse("Game of Thrones\t2011\tDubrovnik, Croatia\t42.6507\t18.0944")
            .unwrap();
        assert_eq!(record.title, "Game of Thrones");
        assert_eq!(record.year, 2011);
        assert_eq!(record.place_name, "Dubrovnik, Croatia");
        assert!((record.position.latitude() - 42.6507).abs() < f64::EPSILON);
        assert!((record.position.longitude() - 18.0944).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_trims_fields() {
        let record = parser()
            .parse("  Hugo \t 2011\t Paris, France \t48.8566 \t 2.3522  ")
            .unwrap();
        assert_eq!(record.title, "Hugo");
        assert_eq!(record.place_name, "Paris, France");
    }

    #[test]
    fn test_parse_keeps_hash_titles() {
        let record = parser()
            .parse("#15SecondScare\t2015\tCoventry, England, UK\t52.4081\t-1.5106")
            .unwrap();
        assert_eq!(record.title, "#15SecondScare");
    }

    #[test]
    fn test_parse_rejects_field_count() {
        assert_eq!(
            parser().parse("Hugo\t2011\tParis"),
            Err(ParseError::FieldCount {
                expected: 5,
                found: 3
            })
        );
        assert!(matches!(
            parser().parse("a\t2011\tb\t1\t2\textra"),
            Err(ParseError::FieldCount { found: 6, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_empty_title() {
        assert_eq!(
            parser().parse(" \t2011\tParis\t48.8\t2.3"),
            Err(ParseError::EmptyTitle)
        );
    }

    #[test]
    fn test_parse_rejects_bad_year() {
        assert_eq!(
            parser().parse("Hugo\t????\tParis\t48.8\t2.3"),
            Err(ParseError::InvalidYear("????".to_string()))
        );
        assert_eq!(
            parser().parse("Hugo\t1066\tParis\t48.8\t2.3"),
            Err(ParseError::YearOutOfRange {
                year: 1066,
                min: 1880,
                max: 2030
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_coordinates() {
        assert!(matches!(
            parser().parse("Hugo\t2011\tParis\tnorth\t2.3"),
            Err(ParseError::InvalidNumber {
                field: "latitude",
                ..
            })
        ));
        assert!(matches!(
            parser().parse("Hugo\t2011\tParis\t48.8\t"),
            Err(ParseError::InvalidNumber {
                field: "longitude",
                ..
            })
        ));
        assert!(matches!(
            parser().parse("Hugo\t2011\tParis\t48.8\t200.0"),
            Err(ParseError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        let line = "W.E.\t2011\tKyiv, Ukraine\t50.4501\t30.5234";
        let record = parser().parse(line).unwrap();
        assert_eq!(parser().parse(&record.to_string()).unwrap(), record);
    }

    #[test]
    fn test_default_range_includes_next_year() {
        let next_year = Utc::now().year() + 1;
        assert_eq!(*RecordParser::new().year_range().end(), next_year);
        assert_eq!(*RecordParser::new().year_range().start(), FIRST_FILM_YEAR);
    }
}
