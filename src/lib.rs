//! Roster Pulse - compute engine for shift-coverage roster records
//!
//! Roster Pulse transforms spreadsheet-derived staffing rows into enriched
//! roster records through a deterministic pipeline: field mapping →
//! coverage/leave inference → schedule parsing → real-time activity check
//! → dashboard payload encoding.
//!
//! ## Modules
//!
//! - **mapper**: Rename raw spreadsheet columns to semantic fields
//! - **coverage**: Coverage-gap and leave detection rules
//! - **schedule**: Free-text schedule parsing and shift classification
//! - **activity**: "Active now" evaluation against a wall-clock instant
//! - **encoder**: Versioned dashboard payload with summary counts
//! - **state**: Application-state snapshot and key-value store contract

pub mod activity;
pub mod config;
pub mod coverage;
pub mod encoder;
pub mod error;
pub mod mapper;
pub mod pipeline;
pub mod schedule;
pub mod state;
pub mod types;

pub use config::InferenceConfig;
pub use error::PipelineError;
pub use mapper::FieldMapper;
pub use pipeline::{enrich_roster, RosterProcessor};
pub use schedule::ScheduleParser;
pub use state::{AppState, MemoryStore, StateStore};
pub use types::{
    ClockTime, CoverageStatus, EnrichedRecord, MappedRecord, RosterPayload, ScheduleInterval,
    ShiftCategory,
};

/// Engine version embedded in all dashboard payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for dashboard payloads
pub const PRODUCER_NAME: &str = "roster-pulse";
