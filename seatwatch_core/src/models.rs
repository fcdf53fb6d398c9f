// Shared models for the seat monitor
use serde::{Deserialize, Serialize};

/// One scheduled offering of a course, as listed in the schedule table.
///
/// Derived fresh each polling cycle; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Section id from the `SEC.` column, unique within one cycle.
    pub section: String,
    /// Registration number from the `CLASS #` column.
    pub class_number: String,
    pub instructor: String,
    /// Seats currently open. Empty or non-numeric cells count as 0.
    pub open_seats: u32,
}

impl SectionRecord {
    pub fn has_open_seats(&self) -> bool {
        self.open_seats > 0
    }
}
