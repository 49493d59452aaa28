//! Inference configuration
//!
//! The marker substrings and day-part keywords the inference engine scans for
//! are domain- and locale-specific, so they are injected here instead of being
//! hard-coded in the rules. The defaults match the reference deployment.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Configurable tables consumed by the inference engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Substrings of the (upper-cased) personnel status that mark an absence
    pub absence_markers: Vec<String>,
    /// Marker used by the coverage-gap rule: a leave with no substitute is a gap
    pub gap_leave_marker: String,
    /// Keywords that classify unparseable schedule text as a morning shift
    pub morning_keywords: Vec<String>,
    /// Keywords that classify unparseable schedule text as an afternoon shift
    pub afternoon_keywords: Vec<String>,
    /// Keywords that classify unparseable schedule text as a night shift
    pub night_keywords: Vec<String>,
    /// Weekdays on which a schedule can be active
    pub active_weekdays: Vec<Weekday>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            absence_markers: vec![
                "LEAVE".to_string(),
                "SICK".to_string(),
                "ACCIDENT".to_string(),
            ],
            gap_leave_marker: "LEAVE".to_string(),
            morning_keywords: vec![
                "6:00".to_string(),
                "7:00".to_string(),
                "8:00".to_string(),
                "morning".to_string(),
            ],
            afternoon_keywords: vec![
                "14:00".to_string(),
                "15:00".to_string(),
                "16:00".to_string(),
                "afternoon".to_string(),
            ],
            night_keywords: vec![
                "22:00".to_string(),
                "23:00".to_string(),
                "night".to_string(),
            ],
            active_weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}

impl InferenceConfig {
    /// Load a configuration from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
