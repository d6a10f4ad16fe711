//! History view - search and sort over the run collection

use std::cmp::Ordering;
use std::str::FromStr;

use super::PerformanceRecord;

/// Sort order for the history table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistorySort {
    #[default]
    DateDesc,
    DateAsc,
    DistanceDesc,
    DistanceAsc,
    PaceAsc,
    PaceDesc,
}

impl FromStr for HistorySort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(Self::DateDesc),
            "date-asc" => Ok(Self::DateAsc),
            "distance-desc" => Ok(Self::DistanceDesc),
            "distance-asc" => Ok(Self::DistanceAsc),
            "pace-asc" => Ok(Self::PaceAsc),
            "pace-desc" => Ok(Self::PaceDesc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// A history row that remembers where it lives in the collection
#[derive(Debug, Clone, Copy)]
pub struct HistoryRow<'a> {
    pub index: usize,
    pub record: &'a PerformanceRecord,
}

/// Case-insensitive match on notes, ISO date text or distance text
fn matches(record: &PerformanceRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let notes = record.notes.as_deref().unwrap_or("").to_lowercase();
    notes.contains(needle)
        || record.date.format("%Y-%m-%d").to_string().contains(needle)
        || record.distance_km.to_string().contains(needle)
}

fn compare(a: &PerformanceRecord, b: &PerformanceRecord, sort: HistorySort) -> Ordering {
    match sort {
        HistorySort::DateDesc => b.date.cmp(&a.date),
        HistorySort::DateAsc => a.date.cmp(&b.date),
        HistorySort::DistanceDesc => b.distance_km.total_cmp(&a.distance_km),
        HistorySort::DistanceAsc => a.distance_km.total_cmp(&b.distance_km),
        HistorySort::PaceAsc => a.pace_sec_per_km().total_cmp(&b.pace_sec_per_km()),
        HistorySort::PaceDesc => b.pace_sec_per_km().total_cmp(&a.pace_sec_per_km()),
    }
}

/// Filter and sort runs for display, keeping original indices for edit/delete
pub fn search<'a>(runs: &'a [PerformanceRecord], query: &str, sort: HistorySort) -> Vec<HistoryRow<'a>> {
    let needle = query.trim().to_lowercase();

    let mut rows: Vec<HistoryRow<'_>> = runs
        .iter()
        .enumerate()
        .filter(|(_, r)| matches(r, &needle))
        .map(|(index, record)| HistoryRow { index, record })
        .collect();

    rows.sort_by(|a, b| compare(a.record, b.record, sort));
    rows
}
