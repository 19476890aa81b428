//! Frecency scoring for visit records.
//!
//! Deterministic and stateless: the same records and the same `now` always
//! produce the same order, which both the picker and the prune policy rely on.

use crate::types::VisitRecord;
use std::cmp::Ordering;

const HOUR: u64 = 60 * 60;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

/// Piecewise recency weight. Bounded tiers instead of a continuous decay
/// curve: the resulting scores fall into predictable bands.
pub fn recency_weight(elapsed_secs: u64) -> f64 {
    if elapsed_secs < HOUR {
        4.0
    } else if elapsed_secs < DAY {
        2.0
    } else if elapsed_secs < WEEK {
        0.5
    } else {
        0.25
    }
}

pub fn rank_score(visit_count: u32, last_visited: u64, now: u64) -> f64 {
    let elapsed = now.saturating_sub(last_visited);
    f64::from(visit_count) * recency_weight(elapsed)
}

/// Total order over scored records: score descending, then more recent
/// `last_visited` first, then path ascending. The path leg makes the order
/// total, so repeated sorts of unchanged input are byte-identical.
pub fn compare_scored(a: &(f64, &VisitRecord), b: &(f64, &VisitRecord)) -> Ordering {
    b.0.total_cmp(&a.0)
        .then_with(|| b.1.last_visited.cmp(&a.1.last_visited))
        .then_with(|| a.1.path.cmp(&b.1.path))
}

/// Score and sort records best-first. Returns (score, record) pairs so
/// callers can reuse the score (candidate building, prune eviction).
pub fn rank_records(records: &[VisitRecord], now: u64) -> Vec<(f64, &VisitRecord)> {
    let mut scored: Vec<(f64, &VisitRecord)> = records
        .iter()
        .map(|r| (rank_score(r.visit_count, r.last_visited, now), r))
        .collect();
    scored.sort_by(compare_scored);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, visit_count: u32, last_visited: u64) -> VisitRecord {
        VisitRecord {
            path: path.to_string(),
            visit_count,
            last_visited,
            first_visited: 0,
        }
    }

    #[test]
    fn weight_tiers() {
        assert_eq!(recency_weight(0), 4.0);
        assert_eq!(recency_weight(HOUR - 1), 4.0);
        assert_eq!(recency_weight(HOUR), 2.0);
        assert_eq!(recency_weight(DAY - 1), 2.0);
        assert_eq!(recency_weight(DAY), 0.5);
        assert_eq!(recency_weight(WEEK - 1), 0.5);
        assert_eq!(recency_weight(WEEK), 0.25);
        assert_eq!(recency_weight(WEEK * 52), 0.25);
    }

    #[test]
    fn frequent_recent_beats_old_rare() {
        // /tmp visited 10x five minutes ago, project visited 2x ten days ago
        let now = 100 * DAY;
        let tmp = record("/tmp", 10, now - 5 * 60);
        let project = record("/home/u/project", 2, now - 10 * DAY);

        assert_eq!(rank_score(tmp.visit_count, tmp.last_visited, now), 40.0);
        assert_eq!(
            rank_score(project.visit_count, project.last_visited, now),
            0.5
        );

        let records = vec![project.clone(), tmp.clone()];
        let ranked = rank_records(&records, now);
        assert_eq!(ranked[0].1.path, "/tmp");
        assert_eq!(ranked[1].1.path, "/home/u/project");
    }

    #[test]
    fn ties_break_by_recency_then_path() {
        let now = 10 * DAY;
        // Equal scores: same count, same tier.
        let a = record("/b", 3, now - 2 * DAY);
        let b = record("/a", 3, now - 3 * DAY);
        let records = vec![a, b];
        let ranked = rank_records(&records, now);
        assert_eq!(ranked[0].1.path, "/b", "more recent wins the tie");

        // Fully equal: path order decides.
        let records = vec![record("/z", 3, now - DAY), record("/a", 3, now - DAY)];
        let ranked = rank_records(&records, now);
        assert_eq!(ranked[0].1.path, "/a");
        assert_eq!(ranked[1].1.path, "/z");
    }

    #[test]
    fn order_is_stable_across_recomputation() {
        let now = 30 * DAY;
        let records: Vec<VisitRecord> = (0..50)
            .map(|i| record(&format!("/dir/{}", i % 17), 1 + i % 5, now - (i as u64) * HOUR))
            .collect();

        let first: Vec<String> = rank_records(&records, now)
            .iter()
            .map(|(_, r)| r.path.clone())
            .collect();
        let second: Vec<String> = rank_records(&records, now)
            .iter()
            .map(|(_, r)| r.path.clone())
            .collect();
        assert_eq!(first, second);
    }
}
