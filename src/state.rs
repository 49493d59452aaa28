//! Application-state persistence
//!
//! The dashboard persists its full state as a single versioned blob under a
//! fixed key in a durable key-value store. This module defines the snapshot
//! type and the store contract (get / put / atomic read-modify-write); any
//! backend that honors the contract works, browser storage being the
//! reference deployment.

use crate::types::EnrichedRecord;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current application-state schema version
pub const STATE_SCHEMA_VERSION: &str = "roster.app_state.v1";

/// Key the state blob is stored under
pub const STATE_KEY: &str = "app_state";

/// Persisted application-state snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Schema version identifier
    pub schema_version: String,
    /// When the snapshot was taken (RFC 3339, UTC)
    pub saved_at_utc: String,
    /// Enriched records at snapshot time. `active_now` inside them is
    /// ephemeral and must be recomputed on load.
    pub records: Vec<EnrichedRecord>,
}

impl AppState {
    /// Snapshot a set of enriched records
    pub fn new(records: Vec<EnrichedRecord>) -> Self {
        Self {
            schema_version: STATE_SCHEMA_VERSION.to_string(),
            saved_at_utc: Utc::now().to_rfc3339(),
            records,
        }
    }

    /// Load a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the snapshot to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Durable key-value store contract for application state.
///
/// `update` is the read-modify-write primitive: implementations must apply
/// the closure to the current value and store the result as one step.
pub trait StateStore {
    fn get(&self, key: &str) -> Option<String>;

    fn put(&mut self, key: &str, value: String);

    fn update<F>(&mut self, key: &str, f: F)
    where
        F: FnOnce(Option<String>) -> String,
    {
        let next = f(self.get(key));
        self.put(key, next);
    }
}

/// In-memory store, useful for tests and single-process deployments
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}
