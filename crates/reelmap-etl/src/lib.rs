//! Import pipeline, geocoding and map rendering for reelmap.
//!
//! Implements the extract and geocode stages as treadle `Stage`
//! implementations, the Nominatim geocoder they rely on, layered
//! configuration, and the Leaflet renderer used by `reelmap map`.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod extract;
pub mod geocode;
pub mod imdb;
pub mod locate;
pub mod pipeline;
pub mod render;
pub mod work_item;

pub use config::Config;
pub use error::{GeocodeError, GeocodeResult};
pub use extract::ExtractStage;
pub use geocode::{Geocoder, NominatimClient, NominatimGeocoder, RateLimiter};
pub use imdb::{parse_entry, read_entries, ImdbEntry};
pub use locate::{GeocodeStage, GeocodeSummary};
pub use pipeline::{build_import_pipeline, staging_path};
pub use render::{map_file_name, LeafletRenderer};
pub use work_item::ImportJob;
