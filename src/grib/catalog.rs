//! The record list of one loaded file and its derived vocabularies.

use super::labels::extract_label;
use super::record::WeatherRecord;
use chrono::NaiveDateTime;
use std::collections::BTreeSet;

/// Number of map panels per layout row.
pub const PANELS_PER_ROW: usize = 2;

/// Records of the loaded file with their labels and sorted vocabularies.
#[derive(Debug, Clone, Default)]
pub struct RecordCatalog {
    records: Vec<WeatherRecord>,
    /// Label of each record, parallel to `records`
    labels: Vec<String>,
    unique_labels: Vec<String>,
    valid_times: Vec<NaiveDateTime>,
}

impl RecordCatalog {
    /// Builds the catalog, deriving labels and vocabularies once.
    pub fn from_records(records: Vec<WeatherRecord>) -> Self {
        let labels: Vec<String> = records.iter().map(extract_label).collect();
        let unique_labels = unique_sorted(labels.iter().cloned());
        let valid_times = unique_sorted(records.iter().map(|r| r.valid_time));

        Self {
            records,
            labels,
            unique_labels,
            valid_times,
        }
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Distinct labels, lexicographically sorted.
    pub fn unique_labels(&self) -> &[String] {
        &self.unique_labels
    }

    /// Distinct validity times, chronologically sorted.
    pub fn valid_times(&self) -> &[NaiveDateTime] {
        &self.valid_times
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Indices of the records matching the selection, in file order.
    pub fn filter_indices(
        &self,
        selected: &BTreeSet<String>,
        valid_time: &NaiveDateTime,
    ) -> Vec<usize> {
        self.records
            .iter()
            .zip(&self.labels)
            .enumerate()
            .filter(|(_, (record, label))| {
                selected.contains(label.as_str()) && record.valid_time == *valid_time
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Labels in `selected` that no record of this file carries.
    pub fn missing_labels<'a>(&self, selected: &'a BTreeSet<String>) -> Vec<&'a str> {
        selected
            .iter()
            .filter(|label| self.unique_labels.binary_search(*label).is_err())
            .map(String::as_str)
            .collect()
    }
}

fn unique_sorted<T: Ord>(items: impl Iterator<Item = T>) -> Vec<T> {
    items.collect::<BTreeSet<_>>().into_iter().collect()
}

/// Groups panels into rows of at most [`PANELS_PER_ROW`].
pub fn panel_rows<T>(items: &[T]) -> std::slice::Chunks<'_, T> {
    items.chunks(PANELS_PER_ROW)
}

/// Number of layout rows needed for `count` panels.
pub fn row_count(count: usize) -> usize {
    count.div_ceil(PANELS_PER_ROW)
}
