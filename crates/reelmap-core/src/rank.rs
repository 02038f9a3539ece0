//! Nearest-location ranking.
//!
//! A linear scan: every candidate is measured, the list is sorted, and the
//! head is kept. The dataset is small enough that a spatial index would not
//! pay for itself.

use crate::distance::distance_km;
use crate::model::{GeoPoint, LocationRecord, RankedMatch};

/// The `k` candidates closest to `origin`, nearest first.
///
/// The sort is stable, so candidates at exactly the same distance keep
/// their input order. Fewer than `k` candidates yields all of them; `k == 0`
/// yields nothing.
pub fn nearest<'a, I>(origin: GeoPoint, candidates: I, k: usize) -> Vec<RankedMatch<'a>>
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    if k == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<RankedMatch<'a>> = candidates
        .into_iter()
        .map(|record| RankedMatch {
            record,
            distance_km: distance_km(origin, record.position),
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, lat: f64, lon: f64) -> LocationRecord {
        LocationRecord::new(title, 2011, title, GeoPoint::new(lat, lon).unwrap())
    }

    fn origin() -> GeoPoint {
        GeoPoint::new(49.817_702_9, 24.023_791_2).unwrap()
    }

    fn candidates() -> Vec<LocationRecord> {
        vec![
            record("Paris", 48.8566, 2.3522),
            record("Krakow", 50.0647, 19.9450),
            record("Kyiv", 50.4501, 30.5234),
            record("Budapest", 47.4979, 19.0402),
        ]
    }

    fn titles(ranked: &[RankedMatch<'_>]) -> Vec<String> {
        ranked.iter().map(|m| m.record.title.clone()).collect()
    }

    #[test]
    fn test_nearest_orders_by_distance() {
        let candidates = candidates();
        let ranked = nearest(origin(), &candidates, 2);
        assert_eq!(titles(&ranked), vec!["Krakow", "Budapest"]);
        assert!(ranked[0].distance_km <= ranked[1].distance_km);
    }

    #[test]
    fn test_k_larger_than_candidates_returns_all_sorted() {
        let candidates = candidates();
        let ranked = nearest(origin(), &candidates, 10);
        assert_eq!(titles(&ranked), vec!["Krakow", "Budapest", "Kyiv", "Paris"]);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn test_k_zero_is_empty() {
        let candidates = candidates();
        assert!(nearest(origin(), &candidates, 0).is_empty());
    }

    #[test]
    fn test_empty_candidates() {
        let candidates: Vec<LocationRecord> = Vec::new();
        assert!(nearest(origin(), &candidates, 3).is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let candidates = vec![
            record("first", 10.0, 10.0),
            record("second", 10.0, 10.0),
            record("third", 10.0, 10.0),
        ];
        let ranked = nearest(origin(), &candidates, 3);
        assert_eq!(titles(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_candidates_are_not_reordered() {
        let candidates = candidates();
        let before = candidates.clone();
        let _ranked = nearest(origin(), &candidates, 4);
        assert_eq!(candidates, before);
    }

    #[test]
    fn test_accepts_index_views() {
        let candidates = candidates();
        let view: Vec<&LocationRecord> = candidates.iter().collect();
        let ranked = nearest(origin(), view, 1);
        assert_eq!(titles(&ranked), vec!["Krakow"]);
    }
}
