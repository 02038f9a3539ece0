use std::path::PathBuf;

use thiserror::Error;

/// A latitude/longitude pair outside the valid range, or not a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid coordinate ({latitude}, {longitude})")]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why a single dataset line was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("title is empty")]
    EmptyTitle,

    #[error("year is not a number: {0:?}")]
    InvalidYear(String),

    #[error("year {year} outside {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),
}

/// A dataset line that failed parsing, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {reason}")]
pub struct MalformedRecord {
    pub line: usize,
    pub reason: ParseError,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed record at {0}")]
    MalformedRecord(#[from] MalformedRecord),

    #[error("dataset unavailable at {}: {source}", .path.display())]
    DatasetUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no filming location recorded for {title:?} in {year}")]
    FilmNotFound { title: String, year: i32 },

    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),

    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
