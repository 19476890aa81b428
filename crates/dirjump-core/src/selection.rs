//! Interactive selection state machine.
//!
//! A pure reducer over synthetic input events: no terminal, no clock, no
//! store access. The renderer consumes a read-only window snapshot and the
//! frontend feeds events in; every transition is synchronous and the machine
//! holds all session state itself, so the whole interaction is unit-testable
//! with event sequences.

use crate::frecency;
use crate::matcher;
use crate::types::{Candidate, Shortcut, VisitRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    History,
    Shortcuts,
}

/// Terminal-agnostic input events; the frontend maps key codes to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectEvent {
    Char(char),
    Backspace,
    Up,
    Down,
    /// shift+up / shift+down: configured larger step.
    JumpUp,
    JumpDown,
    /// page up / page down: one visible window height.
    PageUp,
    PageDown,
    Home,
    /// Tab: switch view, keep the query, re-apply it to the other pool.
    ToggleView,
    /// ctrl+a: full vs shortened path display; never affects ordering.
    TogglePathMode,
    Confirm,
    Cancel,
}

/// Session outcome of one event. `Continue` includes the confirmed-on-empty
/// case: confirming with no candidates is a recoverable no-op, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Continue,
    Confirmed(String),
    Cancelled,
}

const DEFAULT_PAGE_HEIGHT: usize = 20;

#[derive(Debug)]
pub struct SelectionState {
    view: View,
    query: String,
    cursor: Option<usize>,
    full_path_mode: bool,
    jump_step: usize,
    page_height: usize,
    history_pool: Vec<Candidate>,
    shortcut_pool: Vec<Candidate>,
    candidates: Vec<Candidate>,
}

impl SelectionState {
    /// Build a session over a store snapshot taken at launch. History is
    /// frecency-ranked, shortcuts are name-ordered; both orders stand while
    /// the query is empty.
    pub fn new(
        records: &[VisitRecord],
        shortcuts: &[Shortcut],
        now: u64,
        jump_step: usize,
    ) -> Self {
        let history_pool: Vec<Candidate> = frecency::rank_records(records, now)
            .into_iter()
            .map(|(score, record)| Candidate::from_record(record, score))
            .collect();

        let mut shortcut_pool: Vec<Candidate> =
            shortcuts.iter().map(Candidate::from_shortcut).collect();
        shortcut_pool.sort_by(|a, b| a.match_text.cmp(&b.match_text));

        let candidates = history_pool.clone();
        let cursor = if candidates.is_empty() { None } else { Some(0) };

        SelectionState {
            view: View::History,
            query: String::new(),
            cursor,
            full_path_mode: false,
            jump_step: jump_step.max(1),
            page_height: DEFAULT_PAGE_HEIGHT,
            history_pool,
            shortcut_pool,
            candidates,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn full_path_mode(&self) -> bool {
        self.full_path_mode
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// The renderer reports the list area height here; used as the page step
    /// and the scroll window.
    pub fn set_page_height(&mut self, height: usize) {
        self.page_height = height.max(1);
    }

    /// Derived, never stored: the minimal offset that keeps the cursor inside
    /// the visible window.
    pub fn scroll_offset(&self) -> usize {
        match self.cursor {
            Some(cursor) => cursor.saturating_sub(self.page_height - 1),
            None => 0,
        }
    }

    /// Visible slice plus the cursor position relative to it.
    pub fn visible_window(&self) -> (&[Candidate], Option<usize>) {
        let offset = self.scroll_offset();
        let end = (offset + self.page_height).min(self.candidates.len());
        let window = &self.candidates[offset..end];
        (window, self.cursor.map(|c| c - offset))
    }

    pub fn apply(&mut self, event: SelectEvent) -> Transition {
        match event {
            SelectEvent::Char(c) => {
                self.query.push(c);
                self.recompute();
                Transition::Continue
            }
            SelectEvent::Backspace => {
                self.query.pop();
                self.recompute();
                Transition::Continue
            }
            SelectEvent::Up => self.move_cursor(-1),
            SelectEvent::Down => self.move_cursor(1),
            SelectEvent::JumpUp => self.move_cursor(-(self.jump_step as i64)),
            SelectEvent::JumpDown => self.move_cursor(self.jump_step as i64),
            SelectEvent::PageUp => self.move_cursor(-(self.page_height as i64)),
            SelectEvent::PageDown => self.move_cursor(self.page_height as i64),
            SelectEvent::Home => {
                if !self.candidates.is_empty() {
                    self.cursor = Some(0);
                }
                Transition::Continue
            }
            SelectEvent::ToggleView => {
                self.view = match self.view {
                    View::History => View::Shortcuts,
                    View::Shortcuts => View::History,
                };
                self.recompute();
                self.cursor = if self.candidates.is_empty() {
                    None
                } else {
                    Some(0)
                };
                Transition::Continue
            }
            SelectEvent::TogglePathMode => {
                self.full_path_mode = !self.full_path_mode;
                Transition::Continue
            }
            SelectEvent::Confirm => match self.cursor {
                Some(cursor) => Transition::Confirmed(self.candidates[cursor].path.clone()),
                None => {
                    tracing::debug!("Confirm with no candidates, ignoring");
                    Transition::Continue
                }
            },
            SelectEvent::Cancel => Transition::Cancelled,
        }
    }

    fn active_pool(&self) -> &[Candidate] {
        match self.view {
            View::History => &self.history_pool,
            View::Shortcuts => &self.shortcut_pool,
        }
    }

    /// Re-derive `candidates` from the active pool and the live query, then
    /// clamp the cursor into the new list.
    fn recompute(&mut self) {
        self.candidates = matcher::filter_candidates(self.active_pool(), &self.query);
        self.cursor = if self.candidates.is_empty() {
            None
        } else {
            Some(self.cursor.unwrap_or(0).min(self.candidates.len() - 1))
        };
    }

    fn move_cursor(&mut self, delta: i64) -> Transition {
        if let Some(cursor) = self.cursor {
            let max = (self.candidates.len() - 1) as i64;
            let next = (cursor as i64 + delta).clamp(0, max);
            self.cursor = Some(next as usize);
        }
        Transition::Continue
    }
}
