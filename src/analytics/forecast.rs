//! Trend forecasting over race series

use crate::records::PerformanceRecord;

use super::vdot::predict_time_from_vdot;

/// Number of most recent efforts averaged by [`vdot_weighted_forecast`]
pub const RECENT_EFFORTS: usize = 3;

/// Project the next `periods` values of a series with ordinary least squares.
///
/// The series index `0..n` is the x axis. Fewer than two points give an
/// empty forecast.
pub fn linear_forecast(series: &[f64], periods: usize) -> Vec<f64> {
    let n = series.len();
    if n < 2 {
        return Vec::new();
    }

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (index, &y) in series.iter().enumerate() {
        let x = index as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let n = n as f64;
    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_x2 - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    (1..=periods)
        .map(|i| slope * (n - 1.0 + i as f64) + intercept)
        .collect()
}

/// Predict a race time from the average fitness of the latest efforts.
///
/// `records` must be oldest first (as returned by the race filter); the
/// last [`RECENT_EFFORTS`] are used and unusable ones are skipped.
pub fn vdot_weighted_forecast<T: AsRef<PerformanceRecord>>(
    records: &[T],
    target_distance_km: f64,
) -> Option<f64> {
    let start = records.len().saturating_sub(RECENT_EFFORTS);
    let scores: Vec<f64> = records[start..]
        .iter()
        .filter_map(|r| r.as_ref().fitness_score())
        .collect();

    if scores.is_empty() {
        return None;
    }

    let average = scores.iter().sum::<f64>() / scores.len() as f64;
    Some(predict_time_from_vdot(average, target_distance_km))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_run(day: u32, distance_km: f64, time_seconds: u32) -> PerformanceRecord {
        PerformanceRecord::new(
            NaiveDate::from_ymd_opt(2024, 9, day).unwrap(),
            distance_km,
            time_seconds,
        )
    }

    #[test]
    fn test_forecast_needs_two_points() {
        assert!(linear_forecast(&[], 1).is_empty());
        assert!(linear_forecast(&[42.0], 1).is_empty());
        assert!(linear_forecast(&[42.0], 5).is_empty());
    }

    #[test]
    fn test_forecast_exact_line() {
        assert_eq!(linear_forecast(&[1.0, 2.0, 3.0], 1), vec![4.0]);
        assert_eq!(linear_forecast(&[1.0, 2.0, 3.0], 3), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_forecast_two_points() {
        assert_eq!(linear_forecast(&[40.0, 39.0], 1), vec![38.0]);
    }

    #[test]
    fn test_forecast_flat_series() {
        assert_eq!(linear_forecast(&[7.0, 7.0, 7.0, 7.0], 2), vec![7.0, 7.0]);
    }

    #[test]
    fn test_forecast_noisy_series() {
        // x = 0..4, y = 2, 4, 5, 4, 5 -> slope 0.6, intercept 2.8
        let forecast = linear_forecast(&[2.0, 4.0, 5.0, 4.0, 5.0], 1);
        assert_eq!(forecast.len(), 1);
        assert!((forecast[0] - 5.8).abs() < 1e-9, "Forecast: {}", forecast[0]);
    }

    #[test]
    fn test_forecast_zero_periods() {
        assert!(linear_forecast(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_weighted_forecast_improving_ten_ks() {
        let races = vec![
            create_run(1, 10.0, 2400),
            create_run(8, 10.0, 2350),
            create_run(15, 10.0, 2300),
        ];
        let forecast = vdot_weighted_forecast(&races, 10.0).unwrap();
        assert!((forecast - 2299.940097).abs() < 1e-3, "Forecast: {}", forecast);
        assert!(forecast <= 2300.0);
    }

    #[test]
    fn test_weighted_forecast_uses_latest_three() {
        let races = vec![
            create_run(1, 10.0, 3600),
            create_run(2, 10.0, 2400),
            create_run(8, 10.0, 2350),
            create_run(15, 10.0, 2300),
        ];
        let forecast = vdot_weighted_forecast(&races, 10.0).unwrap();
        assert!((forecast - 2299.940097).abs() < 1e-3, "Forecast: {}", forecast);
    }

    #[test]
    fn test_weighted_forecast_two_records() {
        let races = vec![create_run(1, 10.0, 2400), create_run(8, 10.0, 2350)];
        let forecast = vdot_weighted_forecast(&races, 10.0).unwrap();

        // mean of 51.944083 and 53.238745
        let expected = predict_time_from_vdot(52.591414, 10.0);
        assert!((forecast - 2323.916776).abs() < 1e-3, "Forecast: {}", forecast);
        assert!((forecast - expected).abs() < 1e-3);
        assert!(forecast < 2347.690277 && forecast > 2300.669089);
    }

    #[test]
    fn test_weighted_forecast_skips_unusable() {
        let races = vec![
            create_run(1, 10.0, 0),
            create_run(2, 0.0, 2400),
            create_run(3, 10.0, 2400),
        ];
        let forecast = vdot_weighted_forecast(&races, 10.0).unwrap();
        let expected = predict_time_from_vdot(51.944082668, 10.0);
        assert!((forecast - expected).abs() < 1e-3);
    }

    #[test]
    fn test_weighted_forecast_none() {
        let empty: Vec<PerformanceRecord> = vec![];
        assert!(vdot_weighted_forecast(&empty, 10.0).is_none());

        let unusable = vec![create_run(1, 10.0, 0)];
        assert!(vdot_weighted_forecast(&unusable, 10.0).is_none());
    }
}
