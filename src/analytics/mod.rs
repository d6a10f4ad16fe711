//! Analytics module - race predictions and training statistics
//!
//! Features:
//! - VDOT fitness score, Riegel extrapolation, pace zones
//! - Linear trend forecasting over race series
//! - Weekly volume and dashboard aggregates
//! - Race progress regression (linfa)

pub mod filter;
pub mod forecast;
pub mod progress;
pub mod trends;
pub mod vdot;

pub use filter::{RaceDistance, filter_by_distance, filter_by_distance_newest_first};
pub use forecast::{linear_forecast, vdot_weighted_forecast};
pub use progress::RaceProgress;
pub use trends::RaceTrends;
pub use vdot::{
    PaceZone, ZoneName, calculate_riegel, calculate_vdot, derive_pace_zones, predict_time_from_vdot,
};

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::records::{PerformanceRecord, RecordError};

/// Weeks kept in the weekly volume chart
pub const WEEKS_SHOWN: usize = 8;

/// Runs shown in the pace trend chart
pub const PACE_TREND_RUNS: usize = 10;

/// Distances (km) shown on the dashboard and calculator
pub const PREDICTION_DISTANCES_KM: [f64; 3] = [10.0, 21.1, 42.2];

/// The run with the highest fitness score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestEffort {
    /// Position in the run collection
    pub index: usize,
    pub vdot: f64,
}

/// Distance summed over one Sunday-started week
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekVolume {
    pub week_start: NaiveDate,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyVolume {
    /// Oldest week first
    pub weeks: Vec<WeekVolume>,
    /// Mean of the shown week totals
    pub average_km: Option<f64>,
}

/// Recent pace history for charting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceTrend {
    /// Oldest first, minutes per km
    pub paces_min_per_km: Vec<f64>,
    pub average_min_per_km: Option<f64>,
}

/// Predicted time at one distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistancePrediction {
    pub distance_km: f64,
    pub seconds: f64,
}

fn predictions_at(distances: &[f64], predict: impl Fn(f64) -> f64) -> Vec<DistancePrediction> {
    distances
        .iter()
        .map(|&distance_km| DistancePrediction {
            distance_km,
            seconds: predict(distance_km),
        })
        .collect()
}

/// Calculator output for one observed performance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RacePrediction {
    pub vdot: f64,
    pub riegel: Vec<DistancePrediction>,
    pub vdot_based: Vec<DistancePrediction>,
    pub zones: Vec<PaceZone>,
}

impl RacePrediction {
    /// Both predictors for an observed distance and time
    pub fn calculate(distance_km: f64, time_seconds: u32) -> Result<Self, RecordError> {
        let observed = PerformanceRecord::new(NaiveDate::MIN, distance_km, time_seconds);
        observed.validate()?;

        let t1 = time_seconds as f64;
        let vdot = calculate_vdot(distance_km, t1);

        Ok(Self {
            vdot,
            riegel: predictions_at(&PREDICTION_DISTANCES_KM, |d2| {
                calculate_riegel(distance_km, t1, d2)
            }),
            vdot_based: predictions_at(&PREDICTION_DISTANCES_KM, |d| {
                predict_time_from_vdot(vdot, d)
            }),
            zones: derive_pace_zones(vdot),
        })
    }
}

/// Dashboard predictions from the best run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPrediction {
    pub best: BestEffort,
    pub predictions: Vec<DistancePrediction>,
}

/// Aggregate statistics over the training-run collection
pub struct Analytics {
    /// Most recent first
    runs: Vec<PerformanceRecord>,
}

impl Analytics {
    pub fn new(runs: Vec<PerformanceRecord>) -> Self {
        Self { runs }
    }

    pub fn runs(&self) -> &[PerformanceRecord] {
        &self.runs
    }

    pub fn total_runs(&self) -> usize {
        self.runs.len()
    }

    /// Distance over runs dated within the last 7 days (inclusive)
    pub fn weekly_volume_km(&self, today: NaiveDate) -> f64 {
        let week_ago = today - Duration::days(7);
        self.runs
            .iter()
            .filter(|r| r.date >= week_ago)
            .map(|r| r.distance_km)
            .sum()
    }

    /// Mean seconds per km across all runs
    pub fn average_pace_sec_per_km(&self) -> Option<f64> {
        if self.runs.is_empty() {
            return None;
        }
        let total: f64 = self.runs.iter().map(|r| r.pace_sec_per_km()).sum();
        Some(total / self.runs.len() as f64)
    }

    /// Mean heart rate over runs that recorded one
    pub fn average_heart_rate(&self) -> Option<f64> {
        let rates: Vec<u32> = self.runs.iter().filter_map(|r| r.heart_rate_bpm).collect();
        if rates.is_empty() {
            return None;
        }
        Some(rates.iter().map(|&hr| hr as f64).sum::<f64>() / rates.len() as f64)
    }

    /// Highest positive VDOT among usable runs; the first of equal scores wins
    pub fn best_fitness_score(&self) -> Option<BestEffort> {
        let mut best: Option<BestEffort> = None;

        for (index, run) in self.runs.iter().enumerate() {
            let Some(vdot) = run.fitness_score() else {
                continue;
            };
            if vdot > best.map_or(0.0, |b| b.vdot) {
                best = Some(BestEffort { index, vdot });
            }
        }

        best
    }

    /// Predicted 10K, half and marathon times from the best run
    pub fn dashboard_prediction(&self) -> Option<DashboardPrediction> {
        let best = self.best_fitness_score()?;
        Some(DashboardPrediction {
            best,
            predictions: predictions_at(&PREDICTION_DISTANCES_KM, |d| {
                predict_time_from_vdot(best.vdot, d)
            }),
        })
    }

    /// Distance per Sunday-started week, most recent [`WEEKS_SHOWN`] weeks
    pub fn weekly_aggregation(&self) -> WeeklyVolume {
        let mut by_week: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for run in &self.runs {
            let offset = run.date.weekday().num_days_from_sunday() as i64;
            let week_start = run.date - Duration::days(offset);
            *by_week.entry(week_start).or_insert(0.0) += run.distance_km;
        }

        let skip = by_week.len().saturating_sub(WEEKS_SHOWN);
        let weeks: Vec<WeekVolume> = by_week
            .into_iter()
            .skip(skip)
            .map(|(week_start, distance_km)| WeekVolume {
                week_start,
                distance_km,
            })
            .collect();

        let average_km = mean(weeks.iter().map(|w| w.distance_km));
        WeeklyVolume { weeks, average_km }
    }

    /// Paces of the latest runs, oldest first
    pub fn pace_trend(&self) -> PaceTrend {
        let paces_min_per_km: Vec<f64> = self
            .recent_runs(PACE_TREND_RUNS)
            .iter()
            .rev()
            .map(|r| r.pace_sec_per_km() / 60.0)
            .collect();
        let average_min_per_km = mean(paces_min_per_km.iter().copied());

        PaceTrend {
            paces_min_per_km,
            average_min_per_km,
        }
    }

    /// First `n` runs in collection order
    pub fn recent_runs(&self, n: usize) -> &[PerformanceRecord] {
        &self.runs[..n.min(self.runs.len())]
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_run(date: NaiveDate, distance_km: f64, time_seconds: u32) -> PerformanceRecord {
        PerformanceRecord::new(date, distance_km, time_seconds)
    }

    fn create_run_hr(
        date: NaiveDate,
        distance_km: f64,
        time_seconds: u32,
        hr: u32,
    ) -> PerformanceRecord {
        let mut run = create_run(date, distance_km, time_seconds);
        run.heart_rate_bpm = Some(hr);
        run
    }

    #[test]
    fn test_analytics_empty() {
        let analytics = Analytics::new(vec![]);
        let today = date(2024, 6, 15);
        assert_eq!(analytics.total_runs(), 0);
        assert_eq!(analytics.weekly_volume_km(today), 0.0);
        assert_eq!(analytics.average_pace_sec_per_km(), None);
        assert_eq!(analytics.average_heart_rate(), None);
        assert_eq!(analytics.best_fitness_score(), None);
        assert!(analytics.dashboard_prediction().is_none());
        assert!(analytics.weekly_aggregation().weeks.is_empty());
        assert_eq!(analytics.weekly_aggregation().average_km, None);
        assert!(analytics.recent_runs(5).is_empty());
    }

    #[test]
    fn test_weekly_volume_window() {
        let today = date(2024, 6, 15);
        let analytics = Analytics::new(vec![
            create_run(date(2024, 6, 15), 5.0, 1500),
            create_run(date(2024, 6, 8), 10.0, 3000), // exactly 7 days ago, included
            create_run(date(2024, 6, 7), 20.0, 6600),
        ]);
        assert_eq!(analytics.weekly_volume_km(today), 15.0);
    }

    #[test]
    fn test_average_pace() {
        let analytics = Analytics::new(vec![
            create_run(date(2024, 6, 15), 5.0, 1500),  // 300 s/km
            create_run(date(2024, 6, 14), 10.0, 3600), // 360 s/km
        ]);
        assert_eq!(analytics.average_pace_sec_per_km(), Some(330.0));
    }

    #[test]
    fn test_average_heart_rate_only_counts_recorded() {
        let analytics = Analytics::new(vec![
            create_run_hr(date(2024, 6, 15), 5.0, 1500, 150),
            create_run(date(2024, 6, 14), 10.0, 3600),
            create_run_hr(date(2024, 6, 13), 8.0, 2800, 141),
        ]);
        assert_eq!(analytics.average_heart_rate(), Some(145.5));
    }

    #[test]
    fn test_best_fitness_score() {
        let analytics = Analytics::new(vec![
            create_run(date(2024, 6, 15), 10.0, 2400),
            create_run(date(2024, 6, 14), 5.0, 1200),
            create_run(date(2024, 6, 13), 10.0, 2300),
            create_run(date(2024, 6, 12), 0.0, 100),
        ]);
        let best = analytics.best_fitness_score().unwrap();
        assert_eq!(best.index, 2);
        assert!((best.vdot - 54.595006).abs() < 1e-5);
    }

    #[test]
    fn test_best_fitness_tie_first_wins() {
        let analytics = Analytics::new(vec![
            create_run(date(2024, 6, 10), 5.0, 1500),
            create_run(date(2024, 6, 15), 10.0, 2400),
            create_run(date(2024, 6, 14), 10.0, 2400),
        ]);
        assert_eq!(analytics.best_fitness_score().unwrap().index, 1);
    }

    #[test]
    fn test_best_fitness_skips_unusable() {
        let analytics = Analytics::new(vec![
            create_run(date(2024, 6, 15), 10.0, 0),
            create_run(date(2024, 6, 14), -3.0, 900),
        ]);
        assert!(analytics.best_fitness_score().is_none());
    }

    #[test]
    fn test_best_fitness_ignores_non_positive_score() {
        // 0.5 km walked in an hour scores about -3.46
        let analytics = Analytics::new(vec![create_run(date(2024, 6, 15), 0.5, 3600)]);
        assert!(analytics.runs()[0].fitness_score().unwrap() < 0.0);
        assert_eq!(analytics.best_fitness_score(), None);
        assert_eq!(analytics.dashboard_prediction(), None);

        let analytics = Analytics::new(vec![
            create_run(date(2024, 6, 15), 0.5, 3600),
            create_run(date(2024, 6, 14), 10.0, 2400),
        ]);
        assert_eq!(analytics.best_fitness_score().unwrap().index, 1);
    }

    #[test]
    fn test_dashboard_prediction() {
        let analytics = Analytics::new(vec![create_run(date(2024, 6, 15), 10.0, 2400)]);
        let dashboard = analytics.dashboard_prediction().unwrap();
        assert_eq!(dashboard.best.index, 0);
        let distances: Vec<f64> = dashboard.predictions.iter().map(|p| p.distance_km).collect();
        assert_eq!(distances, vec![10.0, 21.1, 42.2]);
        assert!((dashboard.predictions[0].seconds - 2347.690277).abs() < 1e-3);
    }

    #[test]
    fn test_weekly_aggregation_sunday_weeks() {
        // 2024-06-16 is a Sunday
        let analytics = Analytics::new(vec![
            create_run(date(2024, 6, 22), 6.0, 1800), // Saturday, week of 16th
            create_run(date(2024, 6, 16), 4.0, 1200), // Sunday, week of 16th
            create_run(date(2024, 6, 15), 10.0, 3000), // Saturday, week of 9th
        ]);
        let weekly = analytics.weekly_aggregation();
        assert_eq!(
            weekly.weeks,
            vec![
                WeekVolume {
                    week_start: date(2024, 6, 9),
                    distance_km: 10.0,
                },
                WeekVolume {
                    week_start: date(2024, 6, 16),
                    distance_km: 10.0,
                },
            ]
        );
        assert_eq!(weekly.average_km, Some(10.0));
    }

    #[test]
    fn test_weekly_aggregation_keeps_latest_eight() {
        // One run per week for 10 weeks, Sundays starting 2024-03-03
        let start = date(2024, 3, 3);
        let runs: Vec<PerformanceRecord> = (0..10)
            .rev()
            .map(|w| create_run(start + Duration::weeks(w), (w + 1) as f64, 600))
            .collect();
        let weekly = Analytics::new(runs).weekly_aggregation();

        assert_eq!(weekly.weeks.len(), 8);
        assert_eq!(weekly.weeks[0].week_start, start + Duration::weeks(2));
        assert_eq!(weekly.weeks[7].week_start, start + Duration::weeks(9));
        // totals 3..=10
        assert_eq!(weekly.average_km, Some(6.5));
    }

    #[test]
    fn test_recent_runs_native_order() {
        let runs = vec![
            create_run(date(2024, 6, 15), 5.0, 1500),
            create_run(date(2024, 6, 14), 6.0, 1800),
            create_run(date(2024, 6, 13), 7.0, 2100),
        ];
        let analytics = Analytics::new(runs.clone());
        assert_eq!(analytics.recent_runs(2), &runs[..2]);
        assert_eq!(analytics.recent_runs(10).len(), 3);
    }

    #[test]
    fn test_pace_trend_oldest_first() {
        let analytics = Analytics::new(vec![
            create_run(date(2024, 6, 15), 5.0, 1500), // 5.0 min/km
            create_run(date(2024, 6, 14), 6.0, 2160), // 6.0 min/km
        ]);
        let trend = analytics.pace_trend();
        assert_eq!(trend.paces_min_per_km, vec![6.0, 5.0]);
        assert_eq!(trend.average_min_per_km, Some(5.5));
    }

    #[test]
    fn test_race_prediction_calculator() {
        let prediction = RacePrediction::calculate(5.0, 1200).unwrap();
        assert!((prediction.vdot - 49.806233).abs() < 1e-5);
        assert!((prediction.riegel[0].seconds - 2501.917826).abs() < 1e-3);
        assert_eq!(prediction.vdot_based.len(), 3);
        assert_eq!(prediction.zones.len(), 5);
        // the two predictors disagree
        assert!((prediction.riegel[0].seconds - prediction.vdot_based[0].seconds).abs() > 1.0);
    }

    #[test]
    fn test_race_prediction_rejects_bad_input() {
        assert_eq!(
            RacePrediction::calculate(0.0, 1200).unwrap_err(),
            RecordError::NonPositiveDistance(0.0)
        );
        assert_eq!(
            RacePrediction::calculate(5.0, 0).unwrap_err(),
            RecordError::NonPositiveTime
        );
    }
}
