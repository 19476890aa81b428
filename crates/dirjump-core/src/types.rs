use serde::{Deserialize, Serialize};

/// One durable record per unique canonical path. The path string is the
/// database key, so it is not repeated inside the stored value; `VisitRecord`
/// as handed out by the store carries both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub path: String,
    pub visit_count: u32,
    /// Unix seconds of the most recent visit.
    pub last_visited: u64,
    /// Unix seconds of the first visit, kept for diagnostics.
    pub first_visited: u64,
}

/// Stored value for the visits database; the key carries the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct VisitData {
    pub visit_count: u32,
    pub last_visited: u64,
    pub first_visited: u64,
}

impl VisitData {
    pub(crate) fn into_record(self, path: &str) -> VisitRecord {
        VisitRecord {
            path: path.to_string(),
            visit_count: self.visit_count,
            last_visited: self.last_visited,
            first_visited: self.first_visited,
        }
    }
}

/// A named pin to an arbitrary absolute path. The target is not validated at
/// write time; a dangling shortcut is only warned about when used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortcut {
    pub name: String,
    pub path: String,
}

/// Where a selectable item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    History,
    Shortcut,
}

/// Ephemeral, display-facing union of a visit record and a shortcut.
/// Built fresh for every interactive session, never persisted.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Absolute path this candidate resolves to on confirm.
    pub path: String,
    /// Text the match engine runs against: the path for history entries,
    /// the name for shortcuts. Stable across display-mode toggles.
    pub match_text: String,
    pub origin: Origin,
    /// Frecency score; governs ordering while the query is empty.
    pub rank_score: f64,
    /// Subsequence match score; governs ordering while a query is present.
    pub match_score: i32,
    /// Unix seconds of the last visit (0 for shortcuts), used as a tie-break.
    pub last_visited: u64,
}

impl Candidate {
    pub fn from_record(record: &VisitRecord, rank_score: f64) -> Self {
        Candidate {
            path: record.path.clone(),
            match_text: record.path.clone(),
            origin: Origin::History,
            rank_score,
            match_score: 0,
            last_visited: record.last_visited,
        }
    }

    pub fn from_shortcut(shortcut: &Shortcut) -> Self {
        Candidate {
            path: shortcut.path.clone(),
            match_text: shortcut.name.clone(),
            origin: Origin::Shortcut,
            rank_score: 0.0,
            match_score: 0,
            last_visited: 0,
        }
    }
}
