//! Migration filename stamps

use std::time::{SystemTime, UNIX_EPOCH};

/// Strictly increasing millisecond stamps for migration file names.
///
/// Stamps are drawn at plan time, one per entity, so two migrations planned
/// within the same millisecond still sort in schema order.
#[derive(Debug, Clone)]
pub struct MigrationSequence {
    next: u64,
}

impl MigrationSequence {
    /// Start the sequence at `base` milliseconds since the Unix epoch
    pub fn starting_at(base: u64) -> Self {
        Self { next: base }
    }

    /// Start the sequence at the current wall-clock time
    pub fn from_now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self::starting_at(millis)
    }

    /// Next stamp, zero-padded to 13 digits so lexical order matches numeric order.
    /// The sequence stops advancing at `u64::MAX`.
    pub fn next_stamp(&mut self) -> String {
        let stamp = self.next;
        self.next = self.next.saturating_add(1);
        format!("{:013}", stamp)
    }
}
