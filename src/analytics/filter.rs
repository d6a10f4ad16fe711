//! Race filter - select races belonging to a nominal distance

use std::fmt;

use crate::records::PerformanceRecord;

/// Nominal race distances offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaceDistance {
    FiveK,
    TenK,
    Half,
    Marathon,
    Custom(f64),
}

impl RaceDistance {
    pub fn from_km(km: f64) -> Self {
        if km == 5.0 {
            RaceDistance::FiveK
        } else if km == 10.0 {
            RaceDistance::TenK
        } else if km == 21.1 {
            RaceDistance::Half
        } else if km == 42.195 {
            RaceDistance::Marathon
        } else {
            RaceDistance::Custom(km)
        }
    }

    pub fn km(&self) -> f64 {
        match self {
            RaceDistance::FiveK => 5.0,
            RaceDistance::TenK => 10.0,
            RaceDistance::Half => 21.1,
            RaceDistance::Marathon => 42.195,
            RaceDistance::Custom(km) => *km,
        }
    }

    /// Allowed deviation (km) for a logged distance to count as this race
    pub fn tolerance(&self) -> f64 {
        match self {
            RaceDistance::FiveK => 0.5,
            RaceDistance::TenK | RaceDistance::Half | RaceDistance::Marathon => 1.0,
            RaceDistance::Custom(_) => 1.0,
        }
    }

    pub fn contains(&self, distance_km: f64) -> bool {
        (distance_km - self.km()).abs() <= self.tolerance()
    }
}

impl fmt::Display for RaceDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceDistance::FiveK => write!(f, "5K"),
            RaceDistance::TenK => write!(f, "10K"),
            RaceDistance::Half => write!(f, "Half Marathon"),
            RaceDistance::Marathon => write!(f, "Marathon"),
            RaceDistance::Custom(km) => write!(f, "{} km", km),
        }
    }
}

fn base<T: AsRef<PerformanceRecord>>(record: &T) -> &PerformanceRecord {
    record.as_ref()
}

/// Records within the tolerance band of `target_km`, oldest first.
///
/// Each entry carries its position in the input collection so edits and
/// deletes address the original record. Records on the same date keep
/// their input order.
pub fn filter_by_distance<T: AsRef<PerformanceRecord>>(
    records: &[T],
    target_km: f64,
) -> Vec<(usize, &T)> {
    let band = RaceDistance::from_km(target_km);

    let mut selected: Vec<(usize, &T)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| band.contains(base(*r).distance_km))
        .collect();

    selected.sort_by_key(|(_, r)| base(*r).date);
    selected
}

/// Same selection as [`filter_by_distance`], newest first for list views
pub fn filter_by_distance_newest_first<T: AsRef<PerformanceRecord>>(
    records: &[T],
    target_km: f64,
) -> Vec<(usize, &T)> {
    let mut selected = filter_by_distance(records, target_km);
    selected.reverse();
    selected
}
