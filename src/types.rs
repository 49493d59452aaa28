//! Core types for the Roster Pulse pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: mapped records, schedule intervals, enriched records, and the
//! dashboard payload.

use serde::{Deserialize, Serialize};

/// Coverage status of a service slot.
///
/// The spreadsheet column is free text; the four well-known values get their
/// own variants and anything else is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    Covered,
    Uncovered,
    Brigade,
    Pending,
    /// For custom/unknown statuses, preserved as-is
    #[serde(untagged)]
    Other(String),
}

impl CoverageStatus {
    /// Build a status from a raw (already trimmed) cell value
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "COVERED" => CoverageStatus::Covered,
            "UNCOVERED" => CoverageStatus::Uncovered,
            "BRIGADE" => CoverageStatus::Brigade,
            "PENDING" => CoverageStatus::Pending,
            other => CoverageStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CoverageStatus::Covered => "COVERED",
            CoverageStatus::Uncovered => "UNCOVERED",
            CoverageStatus::Brigade => "BRIGADE",
            CoverageStatus::Pending => "PENDING",
            CoverageStatus::Other(name) => name.as_str(),
        }
    }
}

/// Coarse time-of-day bucket derived from a parsed start hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftCategory {
    Morning,
    Afternoon,
    Night,
    Variable,
}

impl ShiftCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftCategory::Morning => "MORNING",
            ShiftCategory::Afternoon => "AFTERNOON",
            ShiftCategory::Night => "NIGHT",
            ShiftCategory::Variable => "VARIABLE",
        }
    }
}

/// Wall-clock time of day extracted from schedule text.
///
/// Minutes are 0-59 by construction of the pattern; hours carry whatever one
/// or two digits the text held, so values above 23 pass through unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }
}

/// Parsed schedule interval, embedded in the enriched record.
///
/// Computed fresh on every pipeline run; never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInterval {
    /// Interval start
    pub start: ClockTime,
    /// Interval end
    pub end: ClockTime,
    /// Shift bucket classified from the start hour
    pub category: ShiftCategory,
    /// The exact substring of the (upper-cased) schedule text that matched
    pub matched_text: String,
}

/// Staffing record with semantic field names.
///
/// Every field is present after mapping: missing or empty cells either take
/// the declared default or become `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedRecord {
    /// Project identifier
    pub id_project: Option<String>,
    /// Service name
    pub service_name: Option<String>,
    /// Client the service belongs to
    pub client: Option<String>,
    /// Assigned worker, if any
    pub worker_name: Option<String>,
    /// Coverage status (COVERED, UNCOVERED, BRIGADE, PENDING, or custom)
    pub coverage_status: CoverageStatus,
    /// Personnel status; may contain leave markers. Defaults to "NONE"
    pub personnel_status: String,
    /// Free-text schedule. Defaults to "NOT DEFINED"
    pub schedule_text: String,
    /// Free-text notes
    pub notes: Option<String>,
    /// Substitute worker covering an absence, if any
    pub substitute_name: Option<String>,
    /// Billing status
    pub billable_status: Option<String>,
    /// Vacation planning info
    pub vacation_info: Option<String>,
    /// Responsible manager. Defaults to "UNASSIGNED"
    pub manager_name: String,
}

/// Mapped record plus the derived coverage, leave, shift, and activity fields.
///
/// `active_now` is evaluated against the wall-clock instant of the pipeline
/// run and must be recomputed on each read - it is not a stable truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: MappedRecord,
    /// Service slot lacks an assigned, present worker
    pub is_uncovered: bool,
    /// Assigned worker is absent (sick leave, accident, ...)
    pub is_on_leave: bool,
    /// Shift label; "VARIABLE/NOT DEFINED" when nothing could be inferred
    pub detected_shift: String,
    /// Parsed schedule interval, when the text contained a time range
    pub computed_schedule: Option<ScheduleInterval>,
    /// Whether the schedule covers the instant the pipeline ran
    pub active_now: bool,
}

/// Dashboard payload producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Aggregate counts over the enriched records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadSummary {
    pub total: usize,
    pub uncovered: usize,
    pub on_leave: usize,
    pub active_now: usize,
}

/// Complete dashboard payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterPayload {
    pub payload_version: String,
    pub producer: PayloadProducer,
    pub computed_at_utc: String,
    pub summary: PayloadSummary,
    pub records: Vec<EnrichedRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_status_from_raw() {
        assert_eq!(CoverageStatus::from_raw("COVERED"), CoverageStatus::Covered);
        assert_eq!(
            CoverageStatus::from_raw("UNCOVERED"),
            CoverageStatus::Uncovered
        );
        assert_eq!(CoverageStatus::from_raw("BRIGADE"), CoverageStatus::Brigade);
        assert_eq!(
            CoverageStatus::from_raw("ON HOLD"),
            CoverageStatus::Other("ON HOLD".to_string())
        );
    }

    #[test]
    fn test_coverage_status_serialization() {
        let json = serde_json::to_string(&CoverageStatus::Uncovered).unwrap();
        assert_eq!(json, "\"UNCOVERED\"");

        let json = serde_json::to_string(&CoverageStatus::Other("ON HOLD".to_string())).unwrap();
        assert_eq!(json, "\"ON HOLD\"");

        let status: CoverageStatus = serde_json::from_str("\"BRIGADE\"").unwrap();
        assert_eq!(status, CoverageStatus::Brigade);

        let status: CoverageStatus = serde_json::from_str("\"ON HOLD\"").unwrap();
        assert_eq!(status, CoverageStatus::Other("ON HOLD".to_string()));
    }

    #[test]
    fn test_minutes_since_midnight() {
        let t = ClockTime { hour: 14, minute: 30 };
        assert_eq!(t.minutes_since_midnight(), 870);

        let midnight = ClockTime { hour: 0, minute: 0 };
        assert_eq!(midnight.minutes_since_midnight(), 0);

        // Hours above 23 are accepted and simply produce large values
        let late = ClockTime { hour: 25, minute: 0 };
        assert_eq!(late.minutes_since_midnight(), 1500);
    }
}
