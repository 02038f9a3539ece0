//! Core domain model and proximity ranking for reelmap.
//!
//! This crate parses the filming-location dataset into a read-only
//! [`LocationIndex`], measures great-circle distances, ranks the nearest
//! locations to a point, and composes those pieces into a single
//! [`query::FilmQuery`] whose result is handed to a [`MapRenderer`].

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod distance;
pub mod error;
pub mod index;
pub mod model;
pub mod parse;
pub mod query;
pub mod rank;

pub use distance::distance_km;
pub use error::{Error, InvalidCoordinate, MalformedRecord, ParseError, Result};
pub use index::{LoadReport, LocationIndex};
pub use model::{GeoPoint, LocationRecord, RankedMatch};
pub use parse::RecordParser;
pub use query::{FilmMap, FilmQuery, MapRenderer};
pub use rank::nearest;
