//! Leaflet map output.

use std::path::PathBuf;

use askama::Template;
use serde::Serialize;

use reelmap_core::{Error, FilmMap, GeoPoint, MapRenderer, Result};

pub const ORIGIN_LAYER: &str = "Your location";
pub const NEAREST_LAYER: &str = "Nearest film points";
const ORIGIN_POPUP: &str = "You are here";

/// Name of the map file for a film: `Harry Potter`, 2002 becomes
/// `Harry_Potter_2002_film_map.html`.
pub fn map_file_name(title: &str, year: i32) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("{stem}_{year}_film_map.html")
}

#[derive(Debug, Serialize)]
struct Marker<'a> {
    lat: f64,
    lon: f64,
    popup: &'a str,
}

impl<'a> Marker<'a> {
    fn at(point: GeoPoint, popup: &'a str) -> Self {
        Self {
            lat: point.latitude(),
            lon: point.longitude(),
            popup,
        }
    }
}

#[derive(Debug, Serialize)]
struct LayerNames<'a> {
    origin: &'a str,
    nearest: &'a str,
    film: &'a str,
}

#[derive(Debug, Serialize)]
struct MapData<'a> {
    origin: Marker<'a>,
    nearest: Vec<Marker<'a>>,
    film: Vec<Marker<'a>>,
    layers: LayerNames<'a>,
}

impl<'a> MapData<'a> {
    fn from_map(map: &'a FilmMap<'a>) -> Self {
        Self {
            origin: Marker::at(map.origin, ORIGIN_POPUP),
            nearest: map
                .nearest
                .iter()
                .map(|m| Marker::at(m.record.position, &m.record.title))
                .collect(),
            film: map
                .film_locations
                .iter()
                .map(|r| Marker::at(r.position, &r.place_name))
                .collect(),
            layers: LayerNames {
                origin: ORIGIN_LAYER,
                nearest: NEAREST_LAYER,
                film: &map.title,
            },
        }
    }

    /// JSON safe to embed in a `<script>` element.
    fn to_embedded_json(&self) -> serde_json::Result<String> {
        Ok(serde_json::to_string(self)?.replace('<', "\\u003c"))
    }
}

#[derive(Template)]
#[template(path = "map.html")]
struct MapTemplate<'a> {
    title: &'a str,
    year: i32,
    data_json: String,
}

/// Writes an interactive Leaflet map per query into `output_dir`.
#[derive(Debug, Clone)]
pub struct LeafletRenderer {
    output_dir: PathBuf,
}

impl LeafletRenderer {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Render the map document without touching the filesystem.
    pub fn render_html(&self, map: &FilmMap<'_>) -> Result<String> {
        let data_json = MapData::from_map(map)
            .to_embedded_json()
            .map_err(|e| Error::Render(format!("Failed to encode map data: {e}")))?;

        MapTemplate {
            title: &map.title,
            year: map.year,
            data_json,
        }
        .render()
        .map_err(|e| Error::Render(format!("Failed to render map template: {e}")))
    }
}

impl MapRenderer for LeafletRenderer {
    type Output = PathBuf;

    fn render(&self, map: &FilmMap<'_>) -> Result<PathBuf> {
        let html = self.render_html(map)?;

        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            Error::Render(format!(
                "Failed to create {}: {e}",
                self.output_dir.display()
            ))
        })?;

        let path = self.output_dir.join(map_file_name(&map.title, map.year));
        std::fs::write(&path, html)
            .map_err(|e| Error::Render(format!("Failed to write {}: {e}", path.display())))?;

        log::info!("Map written to {}", path.display());
        Ok(path)
    }
}
