use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tabled::{Table, Tabled};

use coachrs::logging::{self, LogConfig, LogFormat, LogLevel};
use coachrs::models::{CompletedWorkout, PaceSettings, PlanRequest, PlannedWorkout, WeatherSnapshot};
use coachrs::plan::PlanGenerator;
use coachrs::scoring::ExecutionScorer;
use coachrs::trend::{FormState, TrendAnalyzer};
use coachrs::vdot::VdotCalculator;
use coachrs::zones::PaceLadder;

#[derive(Parser)]
#[command(name = "coachrs", version, about = "Training intelligence engine")]
struct Cli {
    /// Verbose logging (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a training plan from a request file
    Plan {
        /// Path to a PlanRequest JSON document
        #[arg(long)]
        request: PathBuf,
    },
    /// Score a completed workout against its plan
    Score {
        /// Path to the planned workout JSON
        #[arg(long)]
        planned: PathBuf,
        /// Path to the completed workout JSON
        #[arg(long)]
        actual: PathBuf,
        /// Optional weather snapshot JSON
        #[arg(long)]
        weather: Option<PathBuf>,
        /// Optional reference pace settings JSON
        #[arg(long)]
        paces: Option<PathBuf>,
    },
    /// Compute fitness/fatigue/form trends from a daily load file
    Trend {
        /// Path to a JSON array of {date, load} entries
        #[arg(long)]
        loads: PathBuf,
    },
    /// Show the training pace ladder for a fitness score
    Zones {
        #[arg(long)]
        vdot: f64,
    },
    /// Predict race times for a fitness score
    Predict {
        #[arg(long)]
        vdot: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LogLevel::Warn,
        1 => LogLevel::Info,
        _ => LogLevel::Debug,
    };
    logging::init(&LogConfig {
        level,
        format: LogFormat::Compact,
    })?;

    match cli.command {
        Commands::Plan { request } => run_plan(&request, cli.json),
        Commands::Score {
            planned,
            actual,
            weather,
            paces,
        } => run_score(&planned, &actual, weather.as_deref(), paces.as_deref(), cli.json),
        Commands::Trend { loads } => run_trend(&loads, cli.json),
        Commands::Zones { vdot } => run_zones(vdot, cli.json),
        Commands::Predict { vdot } => run_predict(vdot, cli.json),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

#[derive(Tabled)]
struct WeekRow {
    #[tabled(rename = "Week")]
    week: u32,
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "Miles")]
    miles: Decimal,
    #[tabled(rename = "Long run")]
    long_run: Decimal,
    #[tabled(rename = "Quality")]
    quality: u8,
    #[tabled(rename = "Down")]
    down: String,
}

fn run_plan(request_path: &Path, json: bool) -> Result<()> {
    let request: PlanRequest = read_json(request_path)?;
    let plan = PlanGenerator::generate(&request).map_err(|e| {
        anyhow::anyhow!(coachrs::CoachError::from(e).user_message())
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{}-week plan toward {} ({:.1} mi) on {}",
            plan.total_weeks,
            race_label(plan.race_distance_meters),
            plan.race_distance_meters / 1609.344,
            plan.race_date
        )
        .bold()
    );
    for phase in &plan.phases {
        println!(
            "  {:<6} {:>2} weeks  {}",
            phase.phase.name(),
            phase.weeks,
            phase.focus.dimmed()
        );
    }
    println!();

    let rows: Vec<WeekRow> = plan
        .weeks
        .iter()
        .map(|w| WeekRow {
            week: w.number,
            phase: w.phase.name().to_string(),
            starts: w.start_date.to_string(),
            miles: w.target_miles,
            long_run: w.long_run_miles,
            quality: w.quality_sessions,
            down: if w.is_down_week { "yes".to_string() } else { String::new() },
        })
        .collect();
    println!("{}", Table::new(rows));

    println!(
        "\nTotal {} mi, peak week {} at {} mi, {} quality sessions, {} long runs",
        plan.summary.total_miles,
        plan.summary.peak_week,
        plan.summary.peak_week_miles,
        plan.summary.quality_sessions,
        plan.summary.long_runs
    );
    Ok(())
}

fn run_score(
    planned_path: &Path,
    actual_path: &Path,
    weather_path: Option<&Path>,
    paces_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let planned: PlannedWorkout = read_json(planned_path)?;
    let actual: CompletedWorkout = read_json(actual_path)?;
    let weather: Option<WeatherSnapshot> = weather_path.map(read_json).transpose()?;
    let paces: Option<PaceSettings> = paces_path.map(read_json).transpose()?;

    let score = ExecutionScorer::new()
        .score(&planned, &actual, weather.as_ref(), paces.as_ref())
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&score)?);
        return Ok(());
    }

    println!("{}", format!("Execution score: {}", score.overall).bold());
    println!(
        "  pace {:.0}  zones {:.0}  completion {:.0}  consistency {:.0}",
        score.pace_accuracy, score.zone_adherence, score.completion, score.consistency
    );
    println!("\n{}", score.diagnosis);
    for highlight in &score.highlights {
        println!("{}", format!("  + {}", highlight).green());
    }
    for concern in &score.concerns {
        println!("{}", format!("  - {}", concern).yellow());
    }
    println!("\n{} {}", "Next:".bold(), score.suggestion);
    Ok(())
}

#[derive(Debug, Deserialize)]
struct DailyLoadEntry {
    date: NaiveDate,
    load: Decimal,
}

fn run_trend(loads_path: &Path, json: bool) -> Result<()> {
    let entries: Vec<DailyLoadEntry> = read_json(loads_path)?;
    let series: Vec<(NaiveDate, Decimal)> =
        entries.into_iter().map(|e| (e.date, e.load)).collect();

    let analyzer = TrendAnalyzer::new();
    let points = analyzer
        .compute_series(&series)
        .map_err(|e| anyhow::anyhow!(coachrs::CoachError::from(e).user_message()))?;
    let ramp = analyzer
        .ramp_rate(&points)
        .map_err(|e| anyhow::anyhow!(coachrs::CoachError::from(e).user_message()))?;

    if json {
        #[derive(serde::Serialize)]
        struct TrendOutput<'a> {
            points: &'a [coachrs::trend::TrendPoint],
            ramp: &'a coachrs::trend::RampAssessment,
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&TrendOutput {
                points: &points,
                ramp: &ramp
            })?
        );
        return Ok(());
    }

    let last = points.last().expect("series is non-empty");
    let form_state = FormState::from_form(last.form);
    println!("{}", format!("Trend through {}", last.date).bold());
    println!(
        "  fitness {}  fatigue {}  form {} ({})",
        last.chronic,
        last.acute,
        last.form,
        form_state.description()
    );
    println!(
        "  ramp rate {} per week over {} weeks: {}",
        ramp.rate, ramp.window_weeks, ramp.recommendation
    );
    Ok(())
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Pace")]
    pace: String,
    #[tabled(rename = "Purpose")]
    purpose: String,
}

fn run_zones(vdot: f64, json: bool) -> Result<()> {
    let ladder = PaceLadder::from_vdot(vdot).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ladder)?);
        return Ok(());
    }

    let rows: Vec<ZoneRow> = ladder
        .ordered()
        .into_iter()
        .map(|(zone, pace)| ZoneRow {
            zone: zone.name().to_string(),
            pace: format!("{}/mi", format_pace(pace)),
            purpose: zone.purpose().to_string(),
        })
        .collect();
    println!("{}", format!("Training paces for VDOT {vdot:.1}").bold());
    println!("{}", Table::new(rows));
    Ok(())
}

fn run_predict(vdot: f64, json: bool) -> Result<()> {
    let predictions =
        VdotCalculator::race_predictions(vdot).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&predictions)?);
        return Ok(());
    }

    println!("{}", format!("Race predictions for VDOT {vdot:.1}").bold());
    println!("  5K             {}", format_time(predictions.time_5k));
    println!("  10K            {}", format_time(predictions.time_10k));
    println!(
        "  Half marathon  {}",
        format_time(predictions.time_half_marathon)
    );
    println!("  Marathon       {}", format_time(predictions.time_marathon));
    Ok(())
}

fn race_label(distance_meters: f64) -> &'static str {
    if distance_meters >= 40_000.0 {
        "a marathon"
    } else if distance_meters >= 20_000.0 {
        "a half marathon"
    } else if distance_meters >= 10_000.0 {
        "a 10K"
    } else {
        "a short race"
    }
}

fn format_pace(seconds_per_mile: u32) -> String {
    format!("{}:{:02}", seconds_per_mile / 60, seconds_per_mile % 60)
}

fn format_time(total_seconds: f64) -> String {
    let total = total_seconds.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
