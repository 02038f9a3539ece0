//! The film-location query.
//!
//! A single pass per invocation: find the requested film's locations, rank
//! the year's locations around the caller's point, and hand both sets to a
//! [`MapRenderer`]. Nothing is retried and nothing is kept between queries.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::index::LocationIndex;
use crate::model::{GeoPoint, LocationRecord, RankedMatch};
use crate::rank::nearest;

/// Number of nearby locations shown when the caller does not say otherwise.
pub const DEFAULT_NEAREST: usize = 10;

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmQuery {
    pub year: i32,
    pub title: String,
    pub origin: GeoPoint,
    pub limit: usize,
}

impl FilmQuery {
    #[must_use]
    pub fn new(year: i32, title: impl Into<String>, origin: GeoPoint) -> Self {
        Self {
            year,
            title: title.into(),
            origin,
            limit: DEFAULT_NEAREST,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Everything a renderer needs to draw the answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmMap<'a> {
    pub year: i32,
    pub title: String,
    pub origin: GeoPoint,
    /// Every location recorded for the requested title and year.
    pub film_locations: Vec<&'a LocationRecord>,
    /// The year's locations closest to `origin`, nearest first.
    pub nearest: Vec<RankedMatch<'a>>,
}

/// Turns a resolved [`FilmMap`] into an artifact.
pub trait MapRenderer {
    type Output;

    /// # Errors
    /// Implementations report failures as [`Error::Render`].
    fn render(&self, map: &FilmMap<'_>) -> Result<Self::Output>;
}

impl FilmQuery {
    /// The `limit` locations of the query year closest to the origin.
    ///
    /// Independent of the title: succeeds even when the film is unknown, and
    /// an empty year gives an empty list.
    #[must_use]
    pub fn nearest_in_year<'a>(&self, index: &'a LocationIndex) -> Vec<RankedMatch<'a>> {
        nearest(self.origin, index.by_year(self.year), self.limit)
    }

    /// Resolve both result sets without rendering.
    ///
    /// # Errors
    /// Returns [`Error::FilmNotFound`] when the title has no location in the
    /// query year.
    pub fn resolve<'a>(&self, index: &'a LocationIndex) -> Result<FilmMap<'a>> {
        log::debug!(
            "Resolving {:?} ({}) around {} with limit {}",
            self.title,
            self.year,
            self.origin,
            self.limit
        );

        let film_locations = index.by_title_and_year(&self.title, self.year);
        if film_locations.is_empty() {
            return Err(Error::FilmNotFound {
                title: self.title.clone(),
                year: self.year,
            });
        }

        let nearest = self.nearest_in_year(index);
        log::info!(
            "{:?} ({}): {} film locations, {} nearby",
            self.title,
            self.year,
            film_locations.len(),
            nearest.len()
        );

        Ok(FilmMap {
            year: self.year,
            title: self.title.trim().to_string(),
            origin: self.origin,
            film_locations,
            nearest,
        })
    }

    /// Resolve the query and render it.
    ///
    /// # Errors
    /// Returns [`Error::FilmNotFound`] or whatever the renderer reports.
    pub fn run<R: MapRenderer>(&self, index: &LocationIndex, renderer: &R) -> Result<R::Output> {
        let map = self.resolve(index)?;
        renderer.render(&map)
    }
}
