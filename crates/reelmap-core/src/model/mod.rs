pub mod point;
pub mod record;

pub use point::GeoPoint;
pub use record::{LocationRecord, RankedMatch};
