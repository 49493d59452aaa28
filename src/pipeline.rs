//! Pipeline orchestration
//!
//! This module provides the public API for Roster Pulse. It composes the full
//! pipeline from raw spreadsheet rows to the dashboard payload.
//!
//! The enrichment itself is a pure function of (rows, wall-clock instant):
//! no I/O, no shared state between records, and safe to re-run. Only the
//! wire surface (`process_json`) can fail, and only on invalid JSON text.

use crate::activity::ActivityChecker;
use crate::config::InferenceConfig;
use crate::coverage::CoverageAnalyzer;
use crate::encoder::DashboardEncoder;
use crate::error::PipelineError;
use crate::mapper::FieldMapper;
use crate::schedule::ScheduleParser;
use crate::types::{EnrichedRecord, MappedRecord, RosterPayload};
use chrono::{Local, NaiveDateTime};
use serde_json::Value;

/// Enrich raw roster JSON into a dashboard payload JSON string.
///
/// # Arguments
/// * `raw_json` - JSON array of raw spreadsheet rows
///
/// # Example
/// ```ignore
/// let payload = enrich_roster(r#"[{"PROJECT": "P-1", "HOLDER": "J. Doe"}]"#)?;
/// ```
pub fn enrich_roster(raw_json: &str) -> Result<String, PipelineError> {
    RosterProcessor::new().process_json(raw_json)
}

/// Processor composing the mapper and the inference stages.
///
/// Construction compiles the schedule pattern and snapshots the configured
/// marker tables; the processor itself is immutable and reusable.
pub struct RosterProcessor {
    analyzer: CoverageAnalyzer,
    parser: ScheduleParser,
    checker: ActivityChecker,
    encoder: DashboardEncoder,
}

impl Default for RosterProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterProcessor {
    /// Create a processor with the default inference configuration
    pub fn new() -> Self {
        Self::with_config(&InferenceConfig::default())
    }

    /// Create a processor with a custom inference configuration
    pub fn with_config(config: &InferenceConfig) -> Self {
        Self {
            analyzer: CoverageAnalyzer::new(config),
            parser: ScheduleParser::new(config),
            checker: ActivityChecker::new(config),
            encoder: DashboardEncoder::new(),
        }
    }

    /// Enrich raw rows against an explicit wall-clock instant.
    ///
    /// Total: a non-array input enriches to an empty vector.
    pub fn enrich_at(&self, rows: &Value, now: NaiveDateTime) -> Vec<EnrichedRecord> {
        FieldMapper::map_records(rows)
            .into_iter()
            .map(|record| self.enrich_record(record, now))
            .collect()
    }

    /// Enrich raw rows against the current local wall-clock
    pub fn enrich(&self, rows: &Value) -> Vec<EnrichedRecord> {
        self.enrich_at(rows, Local::now().naive_local())
    }

    /// Wire surface: parse JSON text, enrich, and encode the dashboard payload
    pub fn process_json(&self, raw_json: &str) -> Result<String, PipelineError> {
        let rows: Value = serde_json::from_str(raw_json)?;
        let records = self.enrich(&rows);
        self.encoder.encode_to_json(&records)
    }

    /// Assemble the dashboard payload for already-enriched records
    pub fn encode_payload(&self, records: &[EnrichedRecord]) -> RosterPayload {
        self.encoder.encode(records)
    }

    // Derivation order is fixed: coverage gap, leave, schedule, activity.
    fn enrich_record(&self, record: MappedRecord, now: NaiveDateTime) -> EnrichedRecord {
        let is_uncovered = self.analyzer.is_uncovered(&record);
        let is_on_leave = self.analyzer.is_on_leave(&record);

        let computed_schedule = self.parser.parse_interval(&record.schedule_text);
        let detected_shift = self
            .parser
            .shift_label(&record.schedule_text, computed_schedule.as_ref());

        let active_now = self.checker.is_active_at(computed_schedule.as_ref(), now);

        EnrichedRecord {
            record,
            is_uncovered,
            is_on_leave,
            detected_shift,
            computed_schedule,
            active_now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClockTime, CoverageStatus, ShiftCategory};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_rows() -> Value {
        json!([
            {
                "PROJECT": "P-100",
                "SERVICE": "Reception desk",
                "HOLDER": "J. Doe",
                "STATUS": "COVERED",
                "SCHEDULE": "L A V DE 06:00 A 14:00"
            },
            {
                "PROJECT": "P-200",
                "SERVICE": "Warehouse gate",
                "STATUS": "UNCOVERED",
                "SCHEDULE": "22:00 A 06:00"
            },
            {
                "PROJECT": "P-300",
                "SERVICE": "Patrol pool",
                "STATUS": "BRIGADE",
                "SCHEDULE": "rotating night"
            }
        ])
    }

    fn monday_morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_full_enrichment() {
        let records = RosterProcessor::new().enrich_at(&sample_rows(), monday_morning());
        assert_eq!(records.len(), 3);

        let reception = &records[0];
        assert!(!reception.is_uncovered);
        assert_eq!(reception.detected_shift, "MORNING");
        let schedule = reception.computed_schedule.as_ref().unwrap();
        assert_eq!(schedule.matched_text, "06:00 A 14:00");
        assert_eq!(schedule.start, ClockTime { hour: 6, minute: 0 });
        assert!(reception.active_now);

        let warehouse = &records[1];
        assert!(warehouse.is_uncovered);
        assert_eq!(warehouse.detected_shift, "NIGHT");
        // Overnight interval: active_now can never hold
        assert!(!warehouse.active_now);

        let patrol = &records[2];
        assert!(!patrol.is_uncovered);
        assert!(patrol.computed_schedule.is_none());
        assert_eq!(patrol.detected_shift, "NIGHT");
        assert!(!patrol.active_now);
    }

    #[test]
    fn test_enrichment_is_idempotent() {
        let processor = RosterProcessor::new();
        let now = monday_morning();

        let first = processor.enrich_at(&sample_rows(), now);
        let second = processor.enrich_at(&sample_rows(), now);
        assert_eq!(first, second);
    }

    #[test]
    fn test_weekend_run_deactivates_everything() {
        // 2024-01-13 is a Saturday
        let saturday = NaiveDate::from_ymd_opt(2024, 1, 13)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();

        let records = RosterProcessor::new().enrich_at(&sample_rows(), saturday);
        assert!(records.iter().all(|r| !r.active_now));
    }

    #[test]
    fn test_non_array_rows_enrich_to_empty() {
        let processor = RosterProcessor::new();
        assert!(processor
            .enrich_at(&json!({"PROJECT": "P-1"}), monday_morning())
            .is_empty());
    }

    #[test]
    fn test_process_json_payload() {
        let json_text = RosterProcessor::new()
            .process_json(&sample_rows().to_string())
            .unwrap();
        let payload: Value = serde_json::from_str(&json_text).unwrap();

        assert_eq!(payload["payload_version"], "1.0.0");
        assert_eq!(payload["producer"]["name"], "roster-pulse");
        assert_eq!(payload["summary"]["total"], 3);
        assert_eq!(payload["summary"]["uncovered"], 1);
        assert_eq!(payload["records"][0]["id_project"], "P-100");
    }

    #[test]
    fn test_process_json_rejects_invalid_text() {
        assert!(RosterProcessor::new().process_json("not valid json").is_err());
    }

    #[test]
    fn test_process_json_accepts_non_array_shape() {
        let json_text = RosterProcessor::new().process_json("{}").unwrap();
        let payload: Value = serde_json::from_str(&json_text).unwrap();
        assert_eq!(payload["summary"]["total"], 0);
    }

    #[test]
    fn test_custom_config_changes_inference() {
        let config = InferenceConfig {
            absence_markers: vec!["FURLOUGH".to_string()],
            gap_leave_marker: "FURLOUGH".to_string(),
            ..Default::default()
        };
        let processor = RosterProcessor::with_config(&config);

        let rows = json!([{"HOLDER": "J. Doe", "STATUS": "COVERED", "STATUS1": "FURLOUGH"}]);
        let records = processor.enrich_at(&rows, monday_morning());

        assert!(records[0].is_on_leave);
        // Furlough with no substitute is now a coverage gap
        assert!(records[0].is_uncovered);
    }

    #[test]
    fn test_defaulted_record_shape() {
        let records = RosterProcessor::new().enrich_at(&json!([{}]), monday_morning());
        let record = &records[0];

        assert_eq!(record.record.coverage_status, CoverageStatus::Pending);
        assert_eq!(record.record.schedule_text, "NOT DEFINED");
        assert!(record.computed_schedule.is_none());
        assert_eq!(record.detected_shift, "VARIABLE/NOT DEFINED");
        // No worker and not BRIGADE: a gap
        assert!(record.is_uncovered);
        assert!(!record.is_on_leave);
        assert!(!record.active_now);
    }

    #[test]
    fn test_keyword_only_schedule() {
        let rows = json!([{"HOLDER": "J. Doe", "STATUS": "COVERED", "SCHEDULE": "afternoon cover"}]);
        let records = RosterProcessor::new().enrich_at(&rows, monday_morning());

        assert!(records[0].computed_schedule.is_none());
        assert_eq!(records[0].detected_shift, ShiftCategory::Afternoon.as_str());
    }
}
