//! Staff pickers used by the session form.
//!
//! The primary clinician is a single choice; additional staff is a set. Both
//! go through the same operations so the form can treat them uniformly.

use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffSelection {
    Single(Option<i64>),
    Multiple(BTreeSet<i64>),
}

impl StaffSelection {
    pub fn single(selected: Option<i64>) -> Self {
        StaffSelection::Single(selected)
    }

    pub fn multiple<I: IntoIterator<Item = i64>>(selected: I) -> Self {
        StaffSelection::Multiple(selected.into_iter().collect())
    }

    /// Select or deselect `id`. A single picker replaces its current choice.
    pub fn toggle(&mut self, id: i64) {
        match self {
            StaffSelection::Single(current) => {
                *current = if *current == Some(id) { None } else { Some(id) };
            }
            StaffSelection::Multiple(set) => {
                if !set.remove(&id) {
                    set.insert(id);
                }
            }
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        match self {
            StaffSelection::Single(current) => *current == Some(id),
            StaffSelection::Multiple(set) => set.contains(&id),
        }
    }

    pub fn selected_ids(&self) -> Vec<i64> {
        match self {
            StaffSelection::Single(current) => current.iter().copied().collect(),
            StaffSelection::Multiple(set) => set.iter().copied().collect(),
        }
    }

    /// The single choice, or the lowest id of a multiple selection.
    pub fn first(&self) -> Option<i64> {
        match self {
            StaffSelection::Single(current) => *current,
            StaffSelection::Multiple(set) => set.iter().next().copied(),
        }
    }

    pub fn clear(&mut self) {
        match self {
            StaffSelection::Single(current) => *current = None,
            StaffSelection::Multiple(set) => set.clear(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected_ids().is_empty()
    }
}
