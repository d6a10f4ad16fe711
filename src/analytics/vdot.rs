//! Performance model - VDOT, Riegel extrapolation and training paces
//!
//! All functions are plain formulas. Callers filter out non-positive
//! distances and times first; the formulas do not guard against them.

use serde::Serialize;

/// Riegel fatigue exponent
pub const RIEGEL_EXPONENT: f64 = 1.06;

/// Interval split distances shown for quality zones (meters)
pub const INTERVAL_DISTANCES_M: [u32; 6] = [1200, 800, 600, 400, 300, 200];

// VO2 cost of running at velocity v (m/min): -4.60 + 0.182258v + 0.000104v²
const VO2_C: f64 = -4.60;
const VO2_B: f64 = 0.182258;
const VO2_A: f64 = 0.000104;

// Fraction of VO2max sustainable for a given duration (minutes)
const PCT_BASE: f64 = 0.8;
const PCT_K1: f64 = 0.1894393;
const PCT_R1: f64 = -0.012778;
const PCT_K2: f64 = 0.2989558;
const PCT_R2: f64 = -0.1932605;

/// Velocity coefficients `(c, b, a)` for `v = c + b*score - a*score²`
#[derive(Debug, Clone, Copy, PartialEq)]
struct VelocityCurve {
    c: f64,
    b: f64,
    a: f64,
}

/// Up to 5 km
const SHORT_CURVE: VelocityCurve = VelocityCurve {
    c: 29.54,
    b: 5.000663,
    a: 0.007546,
};
/// Up to 15 km
const MIDDLE_CURVE: VelocityCurve = VelocityCurve {
    c: 27.61,
    b: 4.734,
    a: 0.00665,
};
/// Beyond 15 km
const LONG_CURVE: VelocityCurve = VelocityCurve {
    c: 26.01,
    b: 4.527,
    a: 0.00591,
};

impl VelocityCurve {
    fn for_distance(distance_km: f64) -> Self {
        if distance_km <= 5.0 {
            SHORT_CURVE
        } else if distance_km <= 15.0 {
            MIDDLE_CURVE
        } else {
            LONG_CURVE
        }
    }

    /// Race velocity in meters per minute
    fn velocity(&self, score: f64) -> f64 {
        self.c + self.b * score - self.a * score * score
    }
}

/// Fitness score (VDOT) from one performance
pub fn calculate_vdot(distance_km: f64, time_seconds: f64) -> f64 {
    let velocity = (distance_km * 1000.0 / time_seconds) * 60.0;
    let vo2 = VO2_C + VO2_B * velocity + VO2_A * velocity * velocity;

    let minutes = time_seconds / 60.0;
    let pct_max = PCT_BASE + PCT_K1 * (PCT_R1 * minutes).exp() + PCT_K2 * (PCT_R2 * minutes).exp();

    vo2 / pct_max
}

/// Predicted race time in seconds for a target distance.
///
/// The velocity curve is chosen by distance: `<= 5`, `<= 15`, then
/// everything longer. A boundary distance belongs to the shorter curve.
pub fn predict_time_from_vdot(score: f64, target_distance_km: f64) -> f64 {
    let velocity = VelocityCurve::for_distance(target_distance_km).velocity(score);
    target_distance_km * 1000.0 / velocity * 60.0
}

/// Riegel's power law: `t1 * (d2 / d1)^1.06`
pub fn calculate_riegel(d1_km: f64, t1_seconds: f64, d2_km: f64) -> f64 {
    t1_seconds * (d2_km / d1_km).powf(RIEGEL_EXPONENT)
}

/// Training intensity zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ZoneName {
    Easy,
    Marathon,
    Threshold,
    Interval,
    Repetition,
}

impl ZoneName {
    pub fn label(&self) -> &'static str {
        match self {
            ZoneName::Easy => "Easy",
            ZoneName::Marathon => "Marathon",
            ZoneName::Threshold => "Threshold",
            ZoneName::Interval => "Interval",
            ZoneName::Repetition => "Repetition",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ZoneName::Easy => "Conversational pace",
            ZoneName::Marathon => "Race pace",
            ZoneName::Threshold => "Comfortably hard",
            ZoneName::Interval => "5K pace",
            ZoneName::Repetition => "Fast bursts",
        }
    }
}

/// Zone table: name, fraction of the fitness score, whether splits are shown
pub const ZONE_TABLE: [(ZoneName, f64, bool); 5] = [
    (ZoneName::Easy, 0.70, false),
    (ZoneName::Marathon, 0.84, false),
    (ZoneName::Threshold, 0.88, true),
    (ZoneName::Interval, 0.98, true),
    (ZoneName::Repetition, 1.0, true),
];

/// Target time for one interval distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalSplit {
    pub distance_m: u32,
    pub seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceZone {
    pub name: ZoneName,
    pub multiplier: f64,
    pub pace_sec_per_km: f64,
    /// Empty for zones without interval work
    pub splits: Vec<IntervalSplit>,
}

/// Five pace zones, easiest first
pub fn derive_pace_zones(score: f64) -> Vec<PaceZone> {
    ZONE_TABLE
        .iter()
        .map(|&(name, multiplier, show_intervals)| {
            let velocity = SHORT_CURVE.c + SHORT_CURVE.b * score * multiplier;
            let pace_sec_per_km = 1000.0 / velocity * 60.0;

            let splits = if show_intervals {
                INTERVAL_DISTANCES_M
                    .iter()
                    .map(|&distance_m| IntervalSplit {
                        distance_m,
                        seconds: pace_sec_per_km * (distance_m as f64 / 1000.0),
                    })
                    .collect()
            } else {
                Vec::new()
            };

            PaceZone {
                name,
                multiplier,
                pace_sec_per_km,
                splits,
            }
        })
        .collect()
}
