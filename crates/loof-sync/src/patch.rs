//! Field updates derived from a lookup, for a caller's stored breeder record.
//!
//! The record form exposes four title slots. A patch always clears all four
//! and refills them from the most recent titles, so stale titles from an
//! earlier sync never survive.

use serde::{Deserialize, Serialize};

use crate::types::{BreederRecord, Sex};

/// Number of title slots on a stored breeder record.
pub const TITLE_SLOTS: usize = 4;

/// Updates to apply to a stored breeder record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub breed: Option<String>,
    /// Empty string clears the stored color.
    pub color: String,
    pub sex: Option<Sex>,
    /// Empty string clears the stored grade.
    pub qualification_grade: String,
    /// Most recent first; `None` clears the slot.
    pub title_slots: [Option<String>; TITLE_SLOTS],
    pub total_titles: usize,
}

impl RecordPatch {
    pub fn from_record(record: &BreederRecord) -> Self {
        let mut title_slots: [Option<String>; TITLE_SLOTS] = Default::default();
        let titles = record.titles.as_deref().unwrap_or_default();
        for (slot, title) in title_slots.iter_mut().zip(titles) {
            *slot = Some(title.name.clone());
        }

        Self {
            breed: record.breed.clone(),
            color: record.color.clone().unwrap_or_default(),
            sex: record.sex,
            qualification_grade: record.qualification_grade.clone().unwrap_or_default(),
            title_slots,
            total_titles: titles.len(),
        }
    }

    /// False when the registry returned no breed. The caller should report
    /// an unknown chip and leave its record untouched.
    pub fn is_known(&self) -> bool {
        self.breed.is_some()
    }

    /// True when more titles exist than there are slots.
    pub fn is_truncated(&self) -> bool {
        self.total_titles > TITLE_SLOTS
    }

    /// Message for the person running the sync.
    pub fn summary(&self) -> String {
        if !self.is_known() {
            "Chip not known to the registry".to_string()
        } else if self.is_truncated() {
            format!(
                "{} titles found; the {TITLE_SLOTS} most recent were filled in",
                self.total_titles
            )
        } else {
            "Registry data found; save the record to keep it".to_string()
        }
    }
}
