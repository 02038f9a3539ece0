//! Forward geocoding: free-text place names to coordinates.

pub mod nominatim;
pub mod resilience;

use reelmap_core::GeoPoint;

use crate::error::GeocodeResult;

pub use nominatim::{NominatimClient, NominatimGeocoder};
pub use resilience::RateLimiter;

/// Resolves a place name to a position.
///
/// `Ok(None)` means the service answered but knows no such place; errors are
/// reserved for failed lookups.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync + std::fmt::Debug {
    async fn locate(&self, place: &str) -> GeocodeResult<Option<GeoPoint>>;
}
