//! runlog - Personal running log with race performance predictions
//!
//! The analytics are pure functions over snapshots of the run and race
//! collections; storage lives outside this crate.

pub mod analytics;
pub mod format;
pub mod records;

pub use analytics::Analytics;
pub use records::{PerformanceRecord, RaceResult, Snapshot};
