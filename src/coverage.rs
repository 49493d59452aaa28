//! Coverage-gap and leave detection
//!
//! First-match-wins rules over the mapped fields. An explicit UNCOVERED flag
//! always wins; an unresolved absence (a leave with no substitute, or no
//! assigned worker) signals a real gap, except for BRIGADE services which are
//! staffed by a pool rather than a named worker.

use crate::config::InferenceConfig;
use crate::types::{CoverageStatus, MappedRecord};

/// Analyzer applying the configured marker tables to mapped records
pub struct CoverageAnalyzer {
    gap_leave_marker: String,
    absence_markers: Vec<String>,
}

impl CoverageAnalyzer {
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            gap_leave_marker: config.gap_leave_marker.clone(),
            absence_markers: config
                .absence_markers
                .iter()
                .map(|m| m.to_uppercase())
                .collect(),
        }
    }

    /// Is the service slot lacking an assigned, present worker?
    pub fn is_uncovered(&self, record: &MappedRecord) -> bool {
        // Priority 1: explicitly flagged
        if record.coverage_status == CoverageStatus::Uncovered {
            return true;
        }

        // Priority 2: leave without a substitute
        if record.personnel_status.contains(&self.gap_leave_marker)
            && record.substitute_name.is_none()
        {
            return true;
        }

        // Priority 3: no assigned worker, unless the service is pool-staffed
        if record.worker_name.is_none() && record.coverage_status != CoverageStatus::Brigade {
            return true;
        }

        false
    }

    /// Is the assigned worker absent?
    pub fn is_on_leave(&self, record: &MappedRecord) -> bool {
        let status = record.personnel_status.to_uppercase();
        self.absence_markers.iter().any(|m| status.contains(m))
    }
}
