//! Field mapping
//!
//! This module renames raw spreadsheet columns to semantic fields and fills
//! declared defaults. It is total by design: input that is not an array maps
//! to an empty sequence, rows that are not objects map to all-default rows,
//! and unknown columns are silently dropped. One malformed row must never
//! block ingestion of the rest.

use crate::error::PipelineError;
use crate::types::{CoverageStatus, MappedRecord};
use serde_json::Value;

/// Raw spreadsheet column names recognized by the mapper, in mapping order
pub mod columns {
    pub const PROJECT: &str = "PROJECT";
    pub const SERVICE: &str = "SERVICE";
    pub const TYPE_S: &str = "TYPE_S";
    pub const HOLDER: &str = "HOLDER";
    pub const STATUS: &str = "STATUS";
    pub const STATUS1: &str = "STATUS1";
    pub const SCHEDULE: &str = "SCHEDULE";
    pub const NOTES: &str = "NOTES";
    pub const SUBSTITUTE: &str = "SUBSTITUTE";
    pub const BILLING: &str = "BILLING";
    pub const VACATION_26: &str = "VACATION_26";
    pub const MANAGER: &str = "MANAGER";

    /// All recognized columns
    pub const ALL: [&str; 12] = [
        PROJECT, SERVICE, TYPE_S, HOLDER, STATUS, STATUS1, SCHEDULE, NOTES, SUBSTITUTE, BILLING,
        VACATION_26, MANAGER,
    ];
}

/// Per-field defaults substituted when the source cell is missing or empty
pub mod defaults {
    pub const COVERAGE_STATUS: &str = "PENDING";
    pub const PERSONNEL_STATUS: &str = "NONE";
    pub const SCHEDULE_TEXT: &str = "NOT DEFINED";
    pub const MANAGER_NAME: &str = "UNASSIGNED";
}

/// Mapper from raw spreadsheet rows to semantic records
pub struct FieldMapper;

impl FieldMapper {
    /// Map a sequence of raw rows to mapped records.
    ///
    /// Returns an empty vector when `data` is not a JSON array.
    pub fn map_records(data: &Value) -> Vec<MappedRecord> {
        let Some(rows) = data.as_array() else {
            return Vec::new();
        };

        rows.iter().map(Self::map_row).collect()
    }

    /// Map a single raw row. A non-object row yields an all-default record.
    pub fn map_row(row: &Value) -> MappedRecord {
        let cell = |key: &str| clean_cell(row.get(key));

        MappedRecord {
            id_project: cell(columns::PROJECT),
            service_name: cell(columns::SERVICE),
            client: cell(columns::TYPE_S),
            worker_name: cell(columns::HOLDER),
            coverage_status: CoverageStatus::from_raw(
                cell(columns::STATUS)
                    .as_deref()
                    .unwrap_or(defaults::COVERAGE_STATUS),
            ),
            personnel_status: cell(columns::STATUS1)
                .unwrap_or_else(|| defaults::PERSONNEL_STATUS.to_string()),
            schedule_text: cell(columns::SCHEDULE)
                .unwrap_or_else(|| defaults::SCHEDULE_TEXT.to_string()),
            notes: cell(columns::NOTES),
            substitute_name: cell(columns::SUBSTITUTE),
            billable_status: cell(columns::BILLING),
            vacation_info: cell(columns::VACATION_26),
            manager_name: cell(columns::MANAGER)
                .unwrap_or_else(|| defaults::MANAGER_NAME.to_string()),
        }
    }

    /// Parse a JSON array of raw rows
    pub fn parse_rows_json(input: &str) -> Result<Value, PipelineError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parse NDJSON (one raw row per line) into a JSON array of rows
    pub fn parse_rows_ndjson(input: &str) -> Result<Value, PipelineError> {
        let mut rows = Vec::new();
        for (line_num, line) in input.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    return Err(PipelineError::Parse(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(Value::Array(rows))
    }
}

/// Reduce a raw cell to a usable string.
///
/// Strings are trimmed; empty/whitespace strings, nulls, numeric zero, and
/// `false` all count as missing. Numbers and `true` are rendered to their
/// string form since spreadsheet cells arrive untyped.
fn clean_cell(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => {
            if n.as_f64() == Some(0.0) {
                None
            } else {
                Some(n.to_string())
            }
        }
        Some(Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    }
}
