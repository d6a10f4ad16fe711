//! Race progress over calendar time using linear regression (linfa)

use chrono::NaiveDate;
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};

use crate::records::PerformanceRecord;

use super::filter::filter_by_distance;

/// Minimum races required for training
const MIN_DATA_POINTS: usize = 3;

/// Finish-time trend for one race distance
#[derive(Debug, Clone)]
pub struct RaceProgress {
    /// Seconds gained (positive) or lost per day
    slope: f64,
    intercept: f64,
    r2_score: f64,
    data_points: usize,
    first_date: NaiveDate,
}

impl RaceProgress {
    /// Fit finish time against days since the first matching race
    pub fn train<T: AsRef<PerformanceRecord>>(records: &[T], target_km: f64) -> Option<Self> {
        let races: Vec<&PerformanceRecord> = filter_by_distance(records, target_km)
            .into_iter()
            .map(|(_, r)| r.as_ref())
            .filter(|r| r.is_usable())
            .collect();

        if races.len() < MIN_DATA_POINTS {
            return None;
        }

        // Already sorted oldest first
        let first_date = races.first()?.date;
        let last_date = races.last()?.date;
        if last_date == first_date {
            return None;
        }

        // X = days since first race, Y = finish time
        let x_data: Vec<f64> = races
            .iter()
            .map(|r| (r.date - first_date).num_days() as f64)
            .collect();
        let y_data: Vec<f64> = races.iter().map(|r| r.time_seconds as f64).collect();

        let n_samples = x_data.len();
        let records = Array2::from_shape_vec((n_samples, 1), x_data).ok()?;
        let targets = Array1::from_vec(y_data);
        let dataset = Dataset::new(records, targets);

        let model = LinearRegression::default().fit(&dataset).ok()?;

        let slope = model.params()[0];
        let intercept = model.intercept();
        if !slope.is_finite() || !intercept.is_finite() {
            return None;
        }

        let predictions = model.predict(&dataset);
        let r2_score = predictions.r2(&dataset).unwrap_or(0.0);

        Some(Self {
            slope,
            intercept,
            r2_score,
            data_points: n_samples,
            first_date,
        })
    }

    /// Predicted finish time (seconds) on a given date
    pub fn predict_time(&self, date: NaiveDate) -> f64 {
        let days = (date - self.first_date).num_days() as f64;
        self.slope * days + self.intercept
    }

    /// Change in finish time per day; negative means getting faster
    pub fn daily_change(&self) -> f64 {
        self.slope
    }

    pub fn is_improving(&self) -> bool {
        self.slope < 0.0
    }

    /// Model fit quality (R², 1.0 is a perfect line)
    pub fn r2_score(&self) -> f64 {
        self.r2_score
    }

    pub fn data_points(&self) -> usize {
        self.data_points
    }

    pub fn first_date(&self) -> NaiveDate {
        self.first_date
    }
}
