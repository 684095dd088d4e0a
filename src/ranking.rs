// 🏆 Ranking Engine - priority-aware top-N + nearest-unique selection
//
// Top-N pipeline (order-sensitive, kept as explicit steps):
// 1. locate    → drop venues without a usable location, compute distances
// 2. partition → priority (registry members, encounter order) / other
// 3. sort      → other by distance ascending (stable on ties)
// 4. merge     → priority ++ other-not-in-priority, dedup by identity, take N
//
// Nearest-unique ignores the registry: absolute nearest, not curated nearest.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::RankingError;
use crate::geo::Coordinate;
use crate::priority::PriorityRegistry;
use crate::venue::{RankedVenue, Venue};

/// Number of venues returned by the nearest-pair selector
pub const NEAREST_PAIR: usize = 2;

// ============================================================================
// RANKING ENGINE
// ============================================================================

/// Stateless between calls; safe to share across request handlers
#[derive(Debug, Clone)]
pub struct RankingEngine {
    registry: Arc<PriorityRegistry>,
}

impl RankingEngine {
    pub fn new(registry: Arc<PriorityRegistry>) -> Self {
        RankingEngine { registry }
    }

    /// Priority venues first, then the rest by distance; at most `n` unique entries
    ///
    /// An empty result is a valid "nothing nearby" outcome, not an error.
    pub fn rank_top_n(
        &self,
        origin: Coordinate,
        venues: &[Venue],
        n: usize,
    ) -> Result<Vec<RankedVenue>, RankingError> {
        if n == 0 {
            return Err(RankingError::InvalidLimit(n));
        }

        let located = self.locate(origin, venues);
        let located_count = located.len();

        let (priority, mut other): (Vec<RankedVenue>, Vec<RankedVenue>) =
            located.into_iter().partition(|r| r.is_priority);

        sort_by_distance(&mut other);

        // Priority entries take precedence over a duplicate appearance in `other`
        let priority_ids: HashSet<String> =
            priority.iter().map(|r| r.identity().to_string()).collect();

        let merged = priority
            .into_iter()
            .chain(other.into_iter().filter(|r| !priority_ids.contains(r.identity())));

        let ranked = dedup_by_identity(merged, n);

        tracing::debug!(
            input = venues.len(),
            located = located_count,
            priority = priority_ids.len(),
            returned = ranked.len(),
            limit = n,
            "Ranked top venues"
        );

        Ok(ranked)
    }

    /// The `k` closest unique venues in non-decreasing distance order
    ///
    /// Returns fewer than `k` when fewer unique venues are available.
    pub fn select_nearest_unique(&self, origin: Coordinate, venues: &[Venue], k: usize) -> Vec<RankedVenue> {
        let mut located = self.locate(origin, venues);
        sort_by_distance(&mut located);

        let nearest = dedup_by_identity(located, k);

        tracing::debug!(
            input = venues.len(),
            returned = nearest.len(),
            wanted = k,
            "Selected nearest venues"
        );

        nearest
    }

    /// Exactly the two closest unique venues (or as many as exist: 0, 1 or 2)
    pub fn select_nearest_two_unique(&self, origin: Coordinate, venues: &[Venue]) -> Vec<RankedVenue> {
        self.select_nearest_unique(origin, venues, NEAREST_PAIR)
    }

    /// Drop venues without a location, attach distance + priority flag
    fn locate(&self, origin: Coordinate, venues: &[Venue]) -> Vec<RankedVenue> {
        venues
            .iter()
            .filter_map(|venue| {
                let location = venue.location?;
                Some(RankedVenue {
                    venue: venue.clone(),
                    distance_meters: origin.distance_to(&location),
                    is_priority: self.registry.contains(&venue.identity),
                })
            })
            .collect()
    }
}

impl Default for RankingEngine {
    fn default() -> Self {
        RankingEngine::new(Arc::new(PriorityRegistry::with_defaults()))
    }
}

/// Stable ascending sort (`sort_by` is stable; ties keep provider order)
fn sort_by_distance(ranked: &mut [RankedVenue]) {
    ranked.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
}

/// Keep the first occurrence of each identity, stop after `limit` entries
fn dedup_by_identity<I>(ranked: I, limit: usize) -> Vec<RankedVenue>
where
    I: IntoIterator<Item = RankedVenue>,
{
    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .filter(|r| seen.insert(r.identity().to_string()))
        .take(limit)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_cafe_like;

    fn origin() -> Coordinate {
        Coordinate::new(39.9255, 32.8663).unwrap()
    }

    fn cafe(id: &str, lat: f64, lon: f64) -> Venue {
        Venue::new(id, &format!("Cafe {}", id), &["cafe"], Some(Coordinate::new(lat, lon).unwrap()))
    }

    fn engine_with(ids: &[&str]) -> RankingEngine {
        RankingEngine::new(Arc::new(PriorityRegistry::from_ids(ids.iter().copied())))
    }

    fn ids(ranked: &[RankedVenue]) -> Vec<&str> {
        ranked.iter().map(|r| r.identity()).collect()
    }

    #[test]
    fn test_filter_then_rank_dedups_duplicate_entries() {
        let mut shop = cafe("B", 39.95, 32.90);
        shop.display_name = Some("Random Shop".to_string());
        shop.categories = Some(vec!["shop".to_string()]);

        let venues = vec![cafe("A", 39.93, 32.87), shop, cafe("A", 39.93, 32.87)];

        let filtered = filter_cafe_like(&venues);
        assert!(filtered.iter().all(|v| v.identity == "A"));

        let ranked = engine_with(&[]).rank_top_n(origin(), &filtered, 5).unwrap();
        assert_eq!(ids(&ranked), vec!["A"]);
        assert!(!ranked[0].is_priority);
    }

    #[test]
    fn test_priority_beats_distance() {
        let venues = vec![
            cafe("N1", 39.9256, 32.8663), // ~11 m
            cafe("P1", 39.9705, 32.8663), // ~5 km
        ];

        let ranked = engine_with(&["P1"]).rank_top_n(origin(), &venues, 2).unwrap();
        assert_eq!(ids(&ranked), vec!["P1", "N1"]);
        assert!(ranked[0].is_priority);
        assert!(!ranked[1].is_priority);
        assert!(ranked[0].distance_meters > 4_900.0);
        assert!(ranked[1].distance_meters < 20.0);
    }

    #[test]
    fn test_priority_entries_keep_encounter_order() {
        let venues = vec![
            cafe("P2", 39.99, 32.8663),
            cafe("X", 39.9260, 32.8663),
            cafe("P1", 39.93, 32.8663),
        ];

        let ranked = engine_with(&["P1", "P2"]).rank_top_n(origin(), &venues, 3).unwrap();
        assert_eq!(ids(&ranked), vec!["P2", "P1", "X"]);
    }

    #[test]
    fn test_others_sorted_by_distance_with_stable_ties() {
        let venues = vec![
            cafe("far", 39.95, 32.8663),
            cafe("tie1", 39.93, 32.8663),
            cafe("near", 39.926, 32.8663),
            cafe("tie2", 39.93, 32.8663),
        ];

        let ranked = engine_with(&[]).rank_top_n(origin(), &venues, 10).unwrap();
        assert_eq!(ids(&ranked), vec!["near", "tie1", "tie2", "far"]);
    }

    #[test]
    fn test_truncates_to_n_without_duplicates() {
        let venues: Vec<Venue> = (0..10)
            .map(|i| cafe(&format!("v{}", i % 4), 39.93 + i as f64 * 0.001, 32.87))
            .collect();

        for n in 1..=6 {
            let ranked = engine_with(&["v3"]).rank_top_n(origin(), &venues, n).unwrap();
            assert!(ranked.len() <= n);

            let unique: HashSet<&str> = ids(&ranked).into_iter().collect();
            assert_eq!(unique.len(), ranked.len());
        }

        let ranked = engine_with(&[]).rank_top_n(origin(), &venues, 6).unwrap();
        assert_eq!(ranked.len(), 4);
    }

    #[test]
    fn test_duplicate_priority_venue_appears_once() {
        let venues = vec![
            cafe("P1", 39.95, 32.8663),
            cafe("N1", 39.926, 32.8663),
            cafe("P1", 39.95, 32.8663),
        ];

        let ranked = engine_with(&["P1"]).rank_top_n(origin(), &venues, 5).unwrap();
        assert_eq!(ids(&ranked), vec!["P1", "N1"]);
    }

    #[test]
    fn test_all_priority_before_any_other() {
        let venues = vec![
            cafe("a", 39.926, 32.8663),
            cafe("P1", 39.99, 32.8663),
            cafe("b", 39.927, 32.8663),
            cafe("P2", 39.98, 32.8663),
            cafe("c", 39.928, 32.8663),
        ];

        let ranked = engine_with(&["P1", "P2"]).rank_top_n(origin(), &venues, 5).unwrap();
        let first_other = ranked.iter().position(|r| !r.is_priority).unwrap();
        assert!(ranked[..first_other].iter().all(|r| r.is_priority));
        assert!(ranked[first_other..].iter().all(|r| !r.is_priority));
        assert_eq!(first_other, 2);
    }

    #[test]
    fn test_venues_without_location_are_never_ranked() {
        let mut lost = cafe("lost", 39.93, 32.87);
        lost.location = None;
        let mut lost_priority = cafe("P1", 39.93, 32.87);
        lost_priority.location = None;

        let venues = vec![lost, cafe("ok", 39.93, 32.87), lost_priority];
        let engine = engine_with(&["P1"]);

        let ranked = engine.rank_top_n(origin(), &venues, 5).unwrap();
        assert_eq!(ids(&ranked), vec!["ok"]);

        let nearest = engine.select_nearest_two_unique(origin(), &venues);
        assert_eq!(ids(&nearest), vec!["ok"]);
    }

    #[test]
    fn test_no_candidates_is_empty_not_error() {
        let engine = engine_with(&["P1"]);
        let ranked = engine.rank_top_n(origin(), &[], 5).unwrap();
        assert!(ranked.is_empty());

        let filtered = filter_cafe_like(&[Venue::new("x", "Book Store", &["store"], None)]);
        assert!(engine.rank_top_n(origin(), &filtered, 5).unwrap().is_empty());
        assert!(engine.select_nearest_two_unique(origin(), &filtered).is_empty());
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let err = engine_with(&[]).rank_top_n(origin(), &[], 0).unwrap_err();
        assert_eq!(err, RankingError::InvalidLimit(0));
    }

    #[test]
    fn test_nearest_two_ignores_priority() {
        let venues = vec![
            cafe("P1", 39.99, 32.8663),
            cafe("b", 39.927, 32.8663),
            cafe("a", 39.926, 32.8663),
        ];

        let nearest = engine_with(&["P1"]).select_nearest_two_unique(origin(), &venues);
        assert_eq!(ids(&nearest), vec!["a", "b"]);
    }

    #[test]
    fn test_nearest_two_dedups_and_orders() {
        let venues = vec![
            cafe("b", 39.927, 32.8663),
            cafe("a", 39.926, 32.8663),
            cafe("a", 39.926, 32.8663),
            cafe("c", 39.94, 32.8663),
        ];

        let nearest = engine_with(&[]).select_nearest_two_unique(origin(), &venues);
        assert_eq!(ids(&nearest), vec!["a", "b"]);
        assert!(nearest[0].distance_meters <= nearest[1].distance_meters);
    }

    #[test]
    fn test_nearest_two_with_fewer_unique_venues() {
        let venues = vec![cafe("a", 39.926, 32.8663), cafe("a", 39.926, 32.8663)];

        let nearest = engine_with(&[]).select_nearest_two_unique(origin(), &venues);
        assert_eq!(ids(&nearest), vec!["a"]);
    }

    #[test]
    fn test_nearest_unique_is_non_decreasing() {
        let venues: Vec<Venue> = [0.05, 0.01, 0.03, 0.02, 0.04, 0.01]
            .iter()
            .enumerate()
            .map(|(i, d)| cafe(&format!("v{}", i), 39.9255 + d, 32.8663))
            .collect();

        let nearest = engine_with(&[]).select_nearest_unique(origin(), &venues, 10);
        assert_eq!(nearest.len(), 6);
        assert!(nearest.windows(2).all(|w| w[0].distance_meters <= w[1].distance_meters));
        assert_eq!(ids(&nearest)[..2], ["v1", "v5"]);
    }
}
