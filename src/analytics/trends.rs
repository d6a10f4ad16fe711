//! Race chart series for one distance, each with a one-step forecast

use chrono::NaiveDate;
use serde::Serialize;

use crate::records::RaceResult;

use super::filter::filter_by_distance;
use super::forecast::linear_forecast;

/// One chart series and its projected next value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
    /// Empty when the series has fewer than two points
    pub forecast: Vec<f64>,
}

impl Series {
    fn new(points: Vec<(NaiveDate, f64)>) -> Self {
        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = points.into_iter().unzip();
        let forecast = linear_forecast(&values, 1);
        Self { dates, values, forecast }
    }

    /// Next projected value, if any
    pub fn next(&self) -> Option<f64> {
        self.forecast.first().copied()
    }
}

/// Finish time, pace and heart-rate trends for a race distance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceTrends {
    pub target_km: f64,
    /// Finish times in minutes
    pub finish_minutes: Series,
    /// Pace in minutes per km
    pub pace_min_per_km: Series,
    /// Average heart rate, only races that recorded one
    pub heart_rate: Series,
}

impl RaceTrends {
    pub fn build(races: &[RaceResult], target_km: f64) -> Self {
        let selected: Vec<&RaceResult> = filter_by_distance(races, target_km)
            .into_iter()
            .map(|(_, r)| r)
            .collect();

        let finish_minutes = Series::new(
            selected
                .iter()
                .map(|r| (r.record.date, r.record.time_seconds as f64 / 60.0))
                .collect(),
        );
        let pace_min_per_km = Series::new(
            selected
                .iter()
                .map(|r| (r.record.date, r.pace_sec_per_km() / 60.0))
                .collect(),
        );
        let heart_rate = Series::new(
            selected
                .iter()
                .filter_map(|r| r.record.heart_rate_bpm.map(|hr| (r.record.date, hr as f64)))
                .collect(),
        );

        Self {
            target_km,
            finish_minutes,
            pace_min_per_km,
            heart_rate,
        }
    }

    pub fn race_count(&self) -> usize {
        self.finish_minutes.values.len()
    }
}
