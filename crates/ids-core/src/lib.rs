//! Activity IDS core library.
//!
//! - Bounded Gaussian value generation per event kind
//! - Multi-day simulation into an activity table
//! - Baseline estimation from generated or persisted tables
//! - Weighted z-score anomaly scoring against a baseline
//! - Logging, progress events and exit codes for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod alert;
pub mod baseline;
pub mod csv;
pub mod events;
pub mod exit_codes;
pub mod generate;
pub mod logging;
pub mod pipeline;
pub mod simulate;
pub mod table;

pub use alert::{score, DayScore, ScoreDiagnostics, ScoreReport, Verdict};
pub use baseline::{estimate, estimate_log, BaselineEstimate, EstimateDiagnostics};
pub use generate::{sample, seeded_rng};
pub use simulate::{simulate, SimulationEngine};
pub use table::{ActivityTable, RawLog};
