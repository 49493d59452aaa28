//! Dashboard payload encoding
//!
//! This module assembles the versioned application-state payload the
//! dashboard consumes: producer metadata, a computed-at timestamp, summary
//! counts, and the enriched records themselves.

use crate::error::PipelineError;
use crate::types::{EnrichedRecord, PayloadProducer, PayloadSummary, RosterPayload};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current dashboard payload version
pub const PAYLOAD_VERSION: &str = "1.0.0";

/// Encoder for producing dashboard payloads
pub struct DashboardEncoder {
    instance_id: String,
}

impl Default for DashboardEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Assemble the payload for a set of enriched records
    pub fn encode(&self, records: &[EnrichedRecord]) -> RosterPayload {
        let summary = PayloadSummary {
            total: records.len(),
            uncovered: records.iter().filter(|r| r.is_uncovered).count(),
            on_leave: records.iter().filter(|r| r.is_on_leave).count(),
            active_now: records.iter().filter(|r| r.active_now).count(),
        };

        RosterPayload {
            payload_version: PAYLOAD_VERSION.to_string(),
            producer: PayloadProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            summary,
            records: records.to_vec(),
        }
    }

    /// Encode to a JSON string
    pub fn encode_to_json(&self, records: &[EnrichedRecord]) -> Result<String, PipelineError> {
        let payload = self.encode(records);
        serde_json::to_string_pretty(&payload).map_err(PipelineError::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RosterProcessor;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample_records() -> Vec<EnrichedRecord> {
        let rows = json!([
            {"PROJECT": "P-1", "HOLDER": "J. Doe", "STATUS": "COVERED", "SCHEDULE": "06:00 A 14:00"},
            {"PROJECT": "P-2", "STATUS": "UNCOVERED"},
            {"PROJECT": "P-3", "HOLDER": "M. Roe", "STATUS1": "ON LEAVE", "SUBSTITUTE": "K. Poe"}
        ]);
        // Monday 10:00, inside the first record's shift
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        RosterProcessor::new().enrich_at(&rows, now)
    }

    #[test]
    fn test_summary_counts_match_record_flags() {
        let records = sample_records();
        let payload = DashboardEncoder::new().encode(&records);

        assert_eq!(payload.summary.total, 3);
        assert_eq!(payload.summary.uncovered, 1);
        assert_eq!(payload.summary.on_leave, 1);
        assert_eq!(payload.summary.active_now, 1);
    }

    #[test]
    fn test_payload_metadata() {
        let encoder = DashboardEncoder::with_instance_id("fixed-instance".to_string());
        let payload = encoder.encode(&sample_records());

        assert_eq!(payload.payload_version, PAYLOAD_VERSION);
        assert_eq!(payload.producer.name, PRODUCER_NAME);
        assert_eq!(payload.producer.instance_id, "fixed-instance");
    }

    #[test]
    fn test_encoded_json_flattens_record_fields() {
        let json_text = DashboardEncoder::new()
            .encode_to_json(&sample_records())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json_text).unwrap();

        let first = &value["records"][0];
        assert_eq!(first["id_project"], "P-1");
        assert_eq!(first["coverage_status"], "COVERED");
        assert_eq!(first["detected_shift"], "MORNING");
        assert_eq!(first["active_now"], true);
        assert_eq!(first["computed_schedule"]["start"]["hour"], 6);
    }
}
