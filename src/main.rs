//! runlog - Personal running log with race performance predictions

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use runlog::Snapshot;
use runlog::analytics::vdot::PaceZone;
use runlog::analytics::{
    Analytics, RaceDistance, RacePrediction, RaceProgress, RaceTrends, derive_pace_zones,
    filter_by_distance, filter_by_distance_newest_first, vdot_weighted_forecast,
};
use runlog::format::{format_duration, format_pace, format_split, format_time, parse_time};
use runlog::records::history::{self, HistorySort};
use runlog::records::{PerformanceRecord, RaceResult};

#[derive(Parser)]
#[command(name = "runlog")]
#[command(author, version, about = "Personal running log with race predictions")]
struct Cli {
    /// Snapshot of the run and race collections (JSON)
    #[arg(long, env = "RUNLOG_DATA", default_value = "runlog.json", global = true)]
    data: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dashboard: totals, weekly volume, best VDOT and predictions
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List most recent runs
    List {
        /// Number of runs to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Search and sort the run history
    History {
        /// Text to match in notes, date or distance
        #[arg(short, long, default_value = "")]
        search: String,

        /// date-desc, date-asc, distance-desc, distance-asc, pace-asc, pace-desc
        #[arg(long, default_value = "date-desc")]
        sort: HistorySort,
    },

    /// Predict race times from one performance
    Predict {
        /// Distance in km
        #[arg(short, long)]
        distance: f64,

        /// Time as h:mm:ss, mm:ss or seconds
        #[arg(short, long)]
        time: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Training pace zones for a VDOT score
    Zones {
        vdot: f64,
    },

    /// Races at a distance with trends and forecasts
    Races {
        /// Nominal distance in km (5, 10, 21.1, 42.195 or custom)
        #[arg(short, long, default_value = "5")]
        distance: f64,

        /// List oldest first instead of newest first
        #[arg(long)]
        oldest_first: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    debug!(data = %cli.data, "Starting runlog");

    match cli.command {
        Some(Commands::Predict { distance, time, json }) => {
            let seconds = parse_time(&time).with_context(|| format!("invalid time: {}", time))?;
            let prediction = RacePrediction::calculate(distance, seconds)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
            } else {
                print_prediction(&prediction);
            }
        }

        Some(Commands::Zones { vdot }) => {
            if vdot <= 0.0 {
                bail!("VDOT must be positive, got {}", vdot);
            }
            println!("Pace zones for VDOT {:.1}", vdot);
            println!("{:-<40}", "");
            print_zones(&derive_pace_zones(vdot));
        }

        Some(Commands::Stats { json }) => {
            let snapshot = Snapshot::load(&cli.data)?;
            print_stats(Analytics::new(snapshot.runs), json)?;
        }

        Some(Commands::List { limit }) => {
            let snapshot = Snapshot::load(&cli.data)?;
            let analytics = Analytics::new(snapshot.runs);
            println!("Recent runs:");
            println!("{:-<60}", "");
            for run in analytics.recent_runs(limit) {
                print_run(run);
            }
        }

        Some(Commands::History { search, sort }) => {
            let snapshot = Snapshot::load(&cli.data)?;
            let rows = history::search(&snapshot.runs, &search, sort);
            info!(matches = rows.len(), "History search");
            for row in rows {
                print!("#{:<4} ", row.index);
                print_run(row.record);
            }
        }

        Some(Commands::Races { distance, oldest_first }) => {
            let snapshot = Snapshot::load(&cli.data)?;
            print_races(&snapshot.races, distance, oldest_first);
        }

        None => {
            let snapshot = Snapshot::load(&cli.data)?;
            print_stats(Analytics::new(snapshot.runs), false)?;
        }
    }

    Ok(())
}

fn print_run(run: &PerformanceRecord) {
    println!(
        "{} | {:>6.2} km | {} | {}/km | {} | {}",
        run.date.format("%Y-%m-%d"),
        run.distance_km,
        format_time(run.time_seconds),
        format_pace(run.time_seconds as f64, run.distance_km),
        run.heart_rate_bpm.map(|hr| format!("{} bpm", hr)).unwrap_or_else(|| "-".to_string()),
        run.notes.as_deref().filter(|n| !n.is_empty()).unwrap_or("Run")
    );
}

fn print_stats(analytics: Analytics, json: bool) -> Result<()> {
    let today = Local::now().date_naive();

    if json {
        let stats = serde_json::json!({
            "total_runs": analytics.total_runs(),
            "weekly_volume_km": analytics.weekly_volume_km(today),
            "average_pace_sec_per_km": analytics.average_pace_sec_per_km(),
            "average_heart_rate": analytics.average_heart_rate(),
            "dashboard": analytics.dashboard_prediction(),
            "weekly": analytics.weekly_aggregation(),
            "pace_trend": analytics.pace_trend(),
        });
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Training Statistics");
    println!("{:-<40}", "");
    println!("Total runs:    {}", analytics.total_runs());
    println!("Weekly volume: {:.1} km", analytics.weekly_volume_km(today));
    println!(
        "Average pace:  {}/km",
        analytics
            .average_pace_sec_per_km()
            .map(|p| format_pace(p, 1.0))
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Average HR:    {}",
        analytics
            .average_heart_rate()
            .map(|hr| format!("{:.0} bpm", hr))
            .unwrap_or_else(|| "-".to_string())
    );

    if let Some(dashboard) = analytics.dashboard_prediction() {
        let best_run = &analytics.runs()[dashboard.best.index];
        println!();
        println!(
            "Best VDOT: {:.0} from {} km on {}",
            dashboard.best.vdot,
            best_run.distance_km,
            best_run.date.format("%b %-d, %Y")
        );
        for p in &dashboard.predictions {
            println!("  {:>5} km  {}", p.distance_km, format_duration(p.seconds));
        }
    }

    let weekly = analytics.weekly_aggregation();
    if !weekly.weeks.is_empty() {
        println!();
        println!("Weekly volume (avg {:.1} km)", weekly.average_km.unwrap_or(0.0));
        for week in &weekly.weeks {
            println!("  {}  {:>6.1} km", week.week_start.format("%b %d"), week.distance_km);
        }
    }

    let trend = analytics.pace_trend();
    if let Some(avg) = trend.average_min_per_km {
        println!();
        let paces: Vec<String> = trend
            .paces_min_per_km
            .iter()
            .map(|p| format_split(p * 60.0))
            .collect();
        println!("Recent paces: {} (avg {})", paces.join(" "), format_split(avg * 60.0));
    }

    Ok(())
}

fn print_prediction(prediction: &RacePrediction) {
    println!("VDOT: {:.0}", prediction.vdot);
    println!("{:-<40}", "");
    println!("{:>8} | {:>10} | {:>10}", "Distance", "Riegel", "VDOT");
    for (riegel, vdot) in prediction.riegel.iter().zip(&prediction.vdot_based) {
        println!(
            "{:>5} km | {:>10} | {:>10}",
            riegel.distance_km,
            format_duration(riegel.seconds),
            format_duration(vdot.seconds)
        );
    }
    println!();
    print_zones(&prediction.zones);
}

fn print_zones(zones: &[PaceZone]) {
    for zone in zones {
        println!(
            "{:<11} {}/km  ({})",
            zone.name.label(),
            format_split(zone.pace_sec_per_km),
            zone.name.description()
        );
        if !zone.splits.is_empty() {
            let splits: Vec<String> = zone
                .splits
                .iter()
                .map(|s| format!("{}m {}", s.distance_m, format_split(s.seconds)))
                .collect();
            println!("            {}", splits.join(" | "));
        }
    }
}

fn print_races(races: &[RaceResult], distance: f64, oldest_first: bool) {
    let band = RaceDistance::from_km(distance);
    let selected = if oldest_first {
        filter_by_distance(races, distance)
    } else {
        filter_by_distance_newest_first(races, distance)
    };

    println!("{} - {} race{}", band, selected.len(), if selected.len() == 1 { "" } else { "s" });
    println!("{:-<60}", "");
    if selected.is_empty() {
        println!("No races found for this distance.");
        return;
    }

    for (index, race) in &selected {
        println!(
            "#{:<4} {} | {:<20} | {:.2} km | {} | {}/km",
            index,
            race.record.date.format("%a %b %-d, %Y"),
            race.race_name,
            race.record.distance_km,
            format_time(race.record.time_seconds),
            format_pace(race.record.time_seconds as f64, race.record.distance_km),
        );
    }

    let trends = RaceTrends::build(races, distance);
    println!();
    if let Some(next) = trends.finish_minutes.next() {
        println!("Forecast time: {}", format_duration(next * 60.0));
    }
    if let Some(next) = trends.pace_min_per_km.next() {
        println!("Forecast pace: {}/km", format_split(next * 60.0));
    }
    if let Some(next) = trends.heart_rate.next() {
        println!("Forecast HR:   {:.0} bpm", next);
    }

    let chronological: Vec<&RaceResult> = filter_by_distance(races, distance)
        .into_iter()
        .map(|(_, r)| r)
        .collect();
    if let Some(seconds) = vdot_weighted_forecast(&chronological, band.km()) {
        println!("VDOT forecast: {}", format_duration(seconds));
    }

    if let Some(progress) = RaceProgress::train(races, distance) {
        println!(
            "Trend: {:+.2} s/day over {} races (R² {:.2})",
            progress.daily_change(),
            progress.data_points(),
            progress.r2_score()
        );
    }
}
