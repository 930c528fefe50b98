use crate::types::*;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;


/// What to do when a candidate entry double-books a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Report conflicts but let the caller save anyway
    Advisory,
    /// Reject candidates that overlap an existing booking
    #[default]
    Enforce,
}

impl std::str::FromStr for ConflictPolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advisory" | "warn" => Ok(ConflictPolicy::Advisory),
            "enforce" | "block" => Ok(ConflictPolicy::Enforce),
            other => Err(EngineError::InvalidInput(format!(
                "Unknown conflict policy '{}'",
                other
            ))),
        }
    }
}

/// Returns every existing entry that books the candidate's room on the same
/// date with an overlapping time range.
///
/// Ranges are half-open, so back-to-back bookings do not conflict. Times are
/// compared as `HH:MM` strings; run [`validate_entry`] on the candidate first.
pub fn find_conflicts(candidate: &ScheduleEntry, existing: &[ScheduleEntry]) -> Vec<ScheduleEntry> {
    existing
        .iter()
        .filter(|entry| {
            entry.date == candidate.date
                && entry.building_code == candidate.building_code
                && entry.room_number == candidate.room_number
                && candidate.start_time < entry.end_time
                && candidate.end_time > entry.start_time
        })
        .cloned()
        .collect()
}

/// Rejects candidates with a malformed date or time, or a range that does
/// not end after it starts.
pub fn validate_entry(candidate: &ScheduleEntry) -> Result<()> {
    if candidate.building_code.trim().is_empty() || candidate.room_number.trim().is_empty() {
        return Err(EngineError::InvalidInput(
            "Building code and room number are required".to_string(),
        ));
    }

    NaiveDate::parse_from_str(&candidate.date, "%Y-%m-%d").map_err(|_| {
        EngineError::InvalidInput(format!("Date '{}' is not in YYYY-MM-DD format", candidate.date))
    })?;

    let start = parse_clock("Start time", &candidate.start_time)?;
    let end = parse_clock("End time", &candidate.end_time)?;

    if start >= end {
        return Err(EngineError::InvalidTimeRange(format!(
            "start {} must be before end {}",
            candidate.start_time, candidate.end_time
        )));
    }

    Ok(())
}

/// `HH:MM` with both fields zero-padded, so string order equals time order.
fn parse_clock(label: &str, value: &str) -> Result<NaiveTime> {
    let malformed =
        || EngineError::InvalidTimeRange(format!("{} '{}' is not in HH:MM format", label, value));

    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit());
    if !well_formed {
        return Err(malformed());
    }
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| malformed())
}

/// Validates a candidate and looks for double bookings.
///
/// When an existing entry is being edited, pass its id as `exclude_id` so the
/// stored version is not reported as clashing with its own update.
/// Under [`ConflictPolicy::Advisory`] the conflicts are returned for display;
/// under [`ConflictPolicy::Enforce`] any conflict is an error.
pub fn check_candidate(
    candidate: &ScheduleEntry,
    existing: &[ScheduleEntry],
    exclude_id: Option<&EntityId>,
    policy: ConflictPolicy,
) -> Result<Vec<ScheduleEntry>> {
    validate_entry(candidate)?;

    let mut conflicts = find_conflicts(candidate, existing);
    if let Some(excluded) = exclude_id {
        conflicts.retain(|entry| entry.id.as_ref() != Some(excluded));
    }
    debug!(
        date = %candidate.date,
        room = %format!("{} {}", candidate.building_code, candidate.room_number),
        conflicts = conflicts.len(),
        "checked schedule candidate"
    );

    if policy == ConflictPolicy::Enforce && !conflicts.is_empty() {
        return Err(EngineError::ScheduleConflict {
            conflicting_ids: conflicts.iter().map(describe_entry).collect(),
        });
    }

    Ok(conflicts)
}

fn describe_entry(entry: &ScheduleEntry) -> String {
    match &entry.id {
        Some(id) => id.to_string(),
        None => format!("'{}' {}-{}", entry.title, entry.start_time, entry.end_time),
    }
}
