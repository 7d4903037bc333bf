use std::fmt;

use crate::models::{NutritionTotals, PendingDiaryEntry};

/// Shown while the batch is empty.
pub const EMPTY_BATCH_MESSAGE: &str =
    "No items selected. Search for a food or recipe to get started.";

/// Confirmed entries awaiting submission, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingBatch {
    entries: Vec<PendingDiaryEntry>,
}

impl PendingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: PendingDiaryEntry) {
        self.entries.push(entry);
    }

    /// Removes the entry at `index`. Out of range is a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<PendingDiaryEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[PendingDiaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_empty()
    }

    /// Sum of every entry's totals, recomputed on each call.
    pub fn totals(&self) -> NutritionTotals {
        self.entries.iter().map(|e| e.totals).sum()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_BATCH_MESSAGE)
    }
}

impl fmt::Display for PendingBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{}", EMPTY_BATCH_MESSAGE);
        }

        for (index, entry) in self.entries.iter().enumerate() {
            writeln!(f, "{}. {}", index + 1, entry)?;
        }
        write!(f, "Total: {}", self.totals())
    }
}
