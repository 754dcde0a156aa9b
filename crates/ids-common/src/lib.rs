//! Activity IDS common types and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - Event catalogue and statistics types
//! - Generated sample values
//! - Common error types
//! - Output formats for CLI commands

pub mod error;
pub mod event;
pub mod output;

pub use error::{Error, ErrorCategory, Result};
pub use event::{
    Baseline, BaselineStats, EventCatalogue, EventDefinition, EventKind, EventStatistics,
    SampleValue, StatsSet,
};
pub use output::OutputFormat;
