//! Copy-to-days selection state.
//!
//! Target days may already hold overlapping sessions; no conflict check is
//! made, the copy is accepted as-is.

use std::collections::BTreeSet;

use crate::error::Notice;
use crate::models::{AgendaDay, AgendaItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySelection {
    session_id: i64,
    session_title: String,
    source_day: u32,
    candidates: Vec<u32>,
    selected: BTreeSet<u32>,
}

impl CopySelection {
    /// Every camp day other than the session's own is a candidate.
    pub fn for_session(item: &AgendaItem, days: &[AgendaDay]) -> Self {
        let mut candidates: Vec<u32> = days
            .iter()
            .map(|d| d.day)
            .filter(|&d| d != item.day)
            .collect();
        candidates.sort_unstable();
        candidates.dedup();
        Self {
            session_id: item.id,
            session_title: item.title.clone(),
            source_day: item.day,
            candidates,
            selected: BTreeSet::new(),
        }
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    pub fn session_title(&self) -> &str {
        &self.session_title
    }

    pub fn source_day(&self) -> u32 {
        self.source_day
    }

    pub fn candidates(&self) -> &[u32] {
        &self.candidates
    }

    /// Flip `day` in or out of the selection. Non-candidates are ignored.
    /// Returns whether the day is selected afterwards.
    pub fn toggle(&mut self, day: u32) -> bool {
        if !self.candidates.contains(&day) {
            return false;
        }
        if !self.selected.remove(&day) {
            self.selected.insert(day);
        }
        self.selected.contains(&day)
    }

    pub fn select_all(&mut self) {
        self.selected = self.candidates.iter().copied().collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, day: u32) -> bool {
        self.selected.contains(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected days, ascending.
    pub fn selected_days(&self) -> Vec<u32> {
        self.selected.iter().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { session_id: i64, days: Vec<u32> },
    NoTargetDays,
}

impl CopyOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            CopyOutcome::NoTargetDays => Some(Notice::NoTargetDays),
            CopyOutcome::Copied { .. } => None,
        }
    }
}
