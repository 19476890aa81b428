//! Subsequence match engine.
//!
//! Query characters must appear in order within the candidate text,
//! case-insensitive. Among matches, fewer and longer contiguous runs score
//! higher, runs anchored at a path-segment boundary score higher, and shorter
//! candidates win remaining ties. The exact constants are a local choice; the
//! ordering they induce is what the picker guarantees.

use crate::types::Candidate;
use std::cmp::Ordering;

/// Score per matched character.
const CHAR_SCORE: i32 = 16;
/// Extra score for every character that extends a contiguous run. Must stay
/// above the boundary bonus: a single n-char run has to outscore n separate
/// boundary-anchored hits.
const RUN_BONUS: i32 = 16;
/// Extra score for a run starting at the text start or right after '/'.
const BOUNDARY_BONUS: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub total: i32,
    pub runs: u32,
    pub boundary_runs: u32,
}

/// Match `query` against `text` as a case-insensitive subsequence.
/// Returns `None` when any query character cannot be placed; an empty query
/// matches everything with score zero (ordering then falls to rank score).
pub fn match_score(query: &str, text: &str) -> Option<MatchScore> {
    if query.is_empty() {
        return Some(MatchScore {
            total: 0,
            runs: 0,
            boundary_runs: 0,
        });
    }

    let needle: Vec<char> = query.chars().flat_map(|c| c.to_lowercase()).collect();
    let haystack: Vec<char> = text.chars().flat_map(|c| c.to_lowercase()).collect();

    let positions = align(&needle, &haystack)?;
    Some(score_positions(&positions, &haystack))
}

/// Greedy forward scan to prove the subsequence exists and find the earliest
/// end, then a backward scan from that end taking the latest possible
/// position for each character. The backward pass pulls scattered hits
/// together, e.g. "ab" on "axab" lands on the trailing "ab" run instead of
/// a[0] + b[3].
fn align(needle: &[char], haystack: &[char]) -> Option<Vec<usize>> {
    let mut end = 0usize;
    let mut qi = 0usize;
    for (i, &c) in haystack.iter().enumerate() {
        if c == needle[qi] {
            qi += 1;
            if qi == needle.len() {
                end = i;
                break;
            }
        }
    }
    if qi < needle.len() {
        return None;
    }

    let mut positions = vec![0usize; needle.len()];
    let mut i = end as i64;
    for qi in (0..needle.len()).rev() {
        while haystack[i as usize] != needle[qi] {
            i -= 1;
        }
        positions[qi] = i as usize;
        i -= 1;
    }
    Some(positions)
}

fn score_positions(positions: &[usize], haystack: &[char]) -> MatchScore {
    let mut total = 0i32;
    let mut runs = 0u32;
    let mut boundary_runs = 0u32;

    let mut prev: Option<usize> = None;
    for &pos in positions {
        total += CHAR_SCORE;
        match prev {
            Some(p) if pos == p + 1 => {
                total += RUN_BONUS;
            }
            _ => {
                runs += 1;
                if pos == 0 || haystack[pos - 1] == '/' {
                    boundary_runs += 1;
                    total += BOUNDARY_BONUS;
                }
            }
        }
        prev = Some(pos);
    }

    MatchScore {
        total,
        runs,
        boundary_runs,
    }
}

/// Ordering among matched candidates: score descending, shorter match text
/// first, then text order so the result is total and reproducible.
pub fn compare_matched(a: &Candidate, b: &Candidate) -> Ordering {
    b.match_score
        .cmp(&a.match_score)
        .then_with(|| a.match_text.len().cmp(&b.match_text.len()))
        .then_with(|| a.match_text.cmp(&b.match_text))
}

/// Apply the query to a candidate pool. Empty query: the pool passes through
/// untouched (the pool's own order — frecency or name — stands). Otherwise
/// non-matches are dropped and matches are re-sorted by match score.
pub fn filter_candidates(pool: &[Candidate], query: &str) -> Vec<Candidate> {
    if query.is_empty() {
        return pool.to_vec();
    }

    let mut matched: Vec<Candidate> = pool
        .iter()
        .filter_map(|candidate| {
            match_score(query, &candidate.match_text).map(|score| {
                let mut c = candidate.clone();
                c.match_score = score.total;
                c
            })
        })
        .collect();
    matched.sort_by(compare_matched);
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Candidate, Origin};

    fn candidate(text: &str) -> Candidate {
        Candidate {
            path: text.to_string(),
            match_text: text.to_string(),
            origin: Origin::History,
            rank_score: 0.0,
            match_score: 0,
            last_visited: 0,
        }
    }

    #[test]
    fn empty_query_matches_everything_with_zero() {
        let score = match_score("", "/home/u/project").unwrap();
        assert_eq!(score.total, 0);
    }

    #[test]
    fn absent_character_excludes() {
        assert!(match_score("xq", "/home/u/project").is_none());
        assert!(match_score("pj", "t").is_none());
    }

    #[test]
    fn subsequence_in_order_matches() {
        // p then j appear in order inside "proj"
        assert!(match_score("pj", "proj").is_some());
        // j then p do not
        assert!(match_score("jp", "proj").is_none());
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(match_score("PJ", "proj").is_some());
        assert!(match_score("pj", "PROJ").is_some());
    }

    #[test]
    fn full_text_query_attains_maximum_score() {
        let text = "/home/u/project";
        let full = match_score(text, text).unwrap();
        // One run covering everything, anchored at the start.
        assert_eq!(full.runs, 1);
        assert_eq!(full.boundary_runs, 1);

        // Any shorter query scores strictly less on the same text.
        for query in ["home", "hup", "project", "/home"] {
            let partial = match_score(query, text).unwrap();
            assert!(partial.total < full.total, "{query} should score below full text");
        }
    }

    #[test]
    fn contiguous_run_beats_scattered_hits() {
        let contiguous = match_score("abc", "/x/abc").unwrap();
        // Every hit here is boundary-anchored, yet the single run still wins.
        let scattered = match_score("abc", "/a/b/c").unwrap();
        assert_eq!(contiguous.runs, 1);
        assert_eq!(scattered.runs, 3);
        assert!(contiguous.total > scattered.total);
    }

    #[test]
    fn backward_pass_tightens_the_window() {
        // Greedy forward alone would pick a[1] and b[4]; the backward pass
        // must land on the contiguous trailing "ab".
        let score = match_score("ab", "/axab").unwrap();
        assert_eq!(score.runs, 1);
    }

    #[test]
    fn boundary_anchor_scores_higher_than_mid_word() {
        let anchored = match_score("doc", "/x/doc").unwrap();
        let mid_word = match_score("doc", "/xydoc").unwrap();
        assert!(anchored.total > mid_word.total);
    }

    #[test]
    fn filter_orders_by_score_then_length_then_text() {
        let pool = vec![
            candidate("/work/notes-archive"),
            candidate("/work/notes"),
            candidate("/tmp"),
        ];
        let result = filter_candidates(&pool, "notes");
        assert_eq!(result.len(), 2);
        // Same matched run, shorter candidate first.
        assert_eq!(result[0].match_text, "/work/notes");
        assert_eq!(result[1].match_text, "/work/notes-archive");
    }

    #[test]
    fn narrowing_is_monotonic() {
        let pool = vec![
            candidate("/home/u/project"),
            candidate("/var/log"),
            candidate("/home/u/photos"),
        ];

        let mut query = String::new();
        let mut previous = filter_candidates(&pool, &query).len();
        for c in "hop".chars() {
            query.push(c);
            let current = filter_candidates(&pool, &query);
            assert!(current.len() <= previous, "appending must never widen");
            previous = current.len();
        }

        // Backspace restores exactly the shorter query's set.
        let with_ho: Vec<String> = filter_candidates(&pool, "ho")
            .iter()
            .map(|c| c.match_text.clone())
            .collect();
        query.pop();
        let restored: Vec<String> = filter_candidates(&pool, &query)
            .iter()
            .map(|c| c.match_text.clone())
            .collect();
        assert_eq!(with_ho, restored);
    }

    #[test]
    fn empty_query_preserves_pool_order() {
        let pool = vec![candidate("/z"), candidate("/a"), candidate("/m")];
        let result = filter_candidates(&pool, "");
        let texts: Vec<&str> = result.iter().map(|c| c.match_text.as_str()).collect();
        assert_eq!(texts, ["/z", "/a", "/m"]);
    }
}
