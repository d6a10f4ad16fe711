//! Clock-time and pace formatting

/// Format whole seconds as `h:mm:ss`
pub fn format_time(seconds: u32) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{}:{:02}:{:02}", h, m, s)
}

/// Format a fractional number of seconds as `h:mm:ss`, rounding to the nearest second
pub fn format_duration(seconds: f64) -> String {
    format_time(seconds.max(0.0).round() as u32)
}

/// Format pace per kilometer as `m:ss`
///
/// Rounds to whole seconds before splitting so a pace never renders as `4:60`.
pub fn format_pace(seconds: f64, distance_km: f64) -> String {
    if distance_km <= 0.0 || !seconds.is_finite() {
        return "-".to_string();
    }
    format_split(seconds / distance_km)
}

/// Format a short split time (under an hour) as `m:ss`
pub fn format_split(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "-".to_string();
    }
    let total = seconds.round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Parse `h:mm:ss`, `mm:ss` or plain seconds into total seconds
pub fn parse_time(input: &str) -> Option<u32> {
    let parts: Vec<&str> = input.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut total: u32 = 0;
    for part in parts {
        let value: u32 = part.trim().parse().ok()?;
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}
