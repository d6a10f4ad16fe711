//! Records module - training runs and race results
//!
//! Records arrive as a snapshot of the external store: two ordered
//! collections whose positions are the records' identities.

pub mod history;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::analytics::vdot::calculate_vdot;

/// Submission validation failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("Distance must be positive, got {0} km")]
    NonPositiveDistance(f64),

    #[error("Time must be a positive whole number of seconds")]
    NonPositiveTime,

    #[error("Race name is required")]
    MissingRaceName,
}

/// One logged effort (a training run, or the base of a race result)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub date: NaiveDate,
    #[serde(rename = "distance")]
    pub distance_km: f64,
    /// Zero when the stored time is not a positive whole number of seconds
    #[serde(rename = "time", deserialize_with = "stored_time")]
    pub time_seconds: u32,
    #[serde(rename = "hr", default)]
    pub heart_rate_bpm: Option<u32>,
    #[serde(rename = "cadence", default)]
    pub cadence_spm: Option<u32>,
    #[serde(rename = "elevation", default)]
    pub elevation_m: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Stored times that are negative, fractional or out of range load as 0,
/// which keeps the record but leaves it unusable.
fn stored_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let seconds = f64::deserialize(deserializer)?;
    if seconds.fract() == 0.0 && seconds > 0.0 && seconds <= u32::MAX as f64 {
        Ok(seconds as u32)
    } else {
        Ok(0)
    }
}

impl PerformanceRecord {
    pub fn new(date: NaiveDate, distance_km: f64, time_seconds: u32) -> Self {
        Self {
            date,
            distance_km,
            time_seconds,
            heart_rate_bpm: None,
            cadence_spm: None,
            elevation_m: None,
            notes: None,
        }
    }

    /// Usable by the performance model: positive distance and time
    pub fn is_usable(&self) -> bool {
        self.distance_km.is_finite() && self.distance_km > 0.0 && self.time_seconds > 0
    }

    /// Check the rules a user submission must satisfy
    pub fn validate(&self) -> Result<(), RecordError> {
        if !self.distance_km.is_finite() || self.distance_km <= 0.0 {
            return Err(RecordError::NonPositiveDistance(self.distance_km));
        }
        if self.time_seconds == 0 {
            return Err(RecordError::NonPositiveTime);
        }
        Ok(())
    }

    /// Seconds per kilometer
    pub fn pace_sec_per_km(&self) -> f64 {
        self.time_seconds as f64 / self.distance_km
    }

    /// VDOT of this effort, `None` when the record is not usable
    pub fn fitness_score(&self) -> Option<f64> {
        self.is_usable()
            .then(|| calculate_vdot(self.distance_km, self.time_seconds as f64))
    }
}

impl AsRef<PerformanceRecord> for PerformanceRecord {
    fn as_ref(&self) -> &PerformanceRecord {
        self
    }
}

/// A race result: the base record plus race metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub race_name: String,
    #[serde(default)]
    pub race_type: Option<String>,
    /// Pace as stored alongside the record (seconds per km)
    #[serde(rename = "pace", default)]
    pub stored_pace: Option<f64>,
    #[serde(flatten)]
    pub record: PerformanceRecord,
}

impl RaceResult {
    /// Build a validated race result with its pace filled in
    pub fn new(
        race_name: impl Into<String>,
        record: PerformanceRecord,
    ) -> Result<Self, RecordError> {
        let race = Self {
            race_name: race_name.into(),
            race_type: None,
            stored_pace: Some(record.pace_sec_per_km()),
            record,
        };
        race.validate()?;
        Ok(race)
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        if self.race_name.trim().is_empty() {
            return Err(RecordError::MissingRaceName);
        }
        self.record.validate()
    }

    /// Effective pace, always derived from distance and time
    pub fn pace_sec_per_km(&self) -> f64 {
        self.record.pace_sec_per_km()
    }
}

impl AsRef<PerformanceRecord> for RaceResult {
    fn as_ref(&self) -> &PerformanceRecord {
        &self.record
    }
}

/// Both collections as returned by the external store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Training runs, most recent first
    #[serde(default)]
    pub runs: Vec<PerformanceRecord>,
    /// Race results in store order
    #[serde(default)]
    pub races: Vec<RaceResult>,
}

impl Snapshot {
    /// Parse a snapshot from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json).context("invalid snapshot JSON")?;
        snapshot.report_invalid();
        Ok(snapshot)
    }

    /// Load a snapshot file; a missing file is an empty log
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "Snapshot not found, starting empty");
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let snapshot = Self::from_json(&json)?;
        debug!(
            runs = snapshot.runs.len(),
            races = snapshot.races.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Invalid records are kept, they are only left out of the model
    fn report_invalid(&self) {
        for (index, run) in self.runs.iter().enumerate() {
            if let Err(e) = run.validate() {
                warn!(index, error = %e, "Run excluded from fitness calculations");
            }
        }
        for (index, race) in self.races.iter().enumerate() {
            if let Err(e) = race.validate() {
                warn!(index, error = %e, "Race failed validation");
            }
        }
    }
}
