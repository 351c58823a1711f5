//! Timestamp and variable selection.
//!
//! The selection lives for the whole session and survives file swaps. Call
//! [`SelectionState::ensure_initialized`] and [`SelectionState::repair`]
//! before reading it each frame.

use chrono::NaiveDateTime;
use std::collections::BTreeSet;

/// Currently chosen timestamp index and variable labels.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Index into the sorted distinct validity times
    time_index: usize,

    /// Labels chosen in the variable multiselect
    selected_labels: BTreeSet<String>,

    /// Whether the first-load defaults have been applied
    initialized: bool,
}

impl SelectionState {
    /// Applies first-load defaults: index 0 and the first sorted label.
    ///
    /// Does nothing once initialized, or while there are no labels to pick.
    pub fn ensure_initialized(&mut self, unique_labels: &[String]) {
        if self.initialized {
            return;
        }
        if let Some(first) = unique_labels.first() {
            self.time_index = 0;
            self.selected_labels = BTreeSet::from([first.clone()]);
            self.initialized = true;
        }
    }

    /// Resets an out-of-range time index to 0. Returns true if it was reset.
    pub fn repair(&mut self, time_count: usize) -> bool {
        if self.time_index >= time_count && self.time_index != 0 {
            log::debug!(
                "Time index {} out of range for {} timestamp(s), resetting",
                self.time_index,
                time_count
            );
            self.time_index = 0;
            return true;
        }
        false
    }

    pub fn time_index(&self) -> usize {
        self.time_index
    }

    /// Sets the index from the dropdown or slider, clamped to the last valid index.
    pub fn select_time(&mut self, index: usize, time_count: usize) {
        self.time_index = index.min(time_count.saturating_sub(1));
    }

    /// "Previous": decrements, floored at 0.
    pub fn step_previous(&mut self) {
        self.time_index = self.time_index.saturating_sub(1);
    }

    /// "Next": increments, capped at the last valid index.
    pub fn step_next(&mut self, time_count: usize) {
        if time_count > 0 {
            self.time_index = (self.time_index + 1).min(time_count - 1);
        }
    }

    /// Timestamp at the current index.
    pub fn current_time<'a>(&self, valid_times: &'a [NaiveDateTime]) -> Option<&'a NaiveDateTime> {
        valid_times.get(self.time_index)
    }

    pub fn selected_labels(&self) -> &BTreeSet<String> {
        &self.selected_labels
    }

    /// Replaces the selected labels wholesale.
    pub fn set_selected_labels(&mut self, labels: BTreeSet<String>) {
        self.selected_labels = labels;
    }
}
