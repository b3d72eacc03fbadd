use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Macro-periodization phase of a training plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Base,
    Build,
    Peak,
    Taper,
}

impl Phase {
    /// Human-readable training focus for this phase
    pub fn focus(&self) -> &'static str {
        match self {
            Phase::Base => "Aerobic development and durability",
            Phase::Build => "Threshold and VO2max development",
            Phase::Peak => "Race-specific sharpening",
            Phase::Taper => "Recovery and freshness for race day",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Base => "Base",
            Phase::Build => "Build",
            Phase::Peak => "Peak",
            Phase::Taper => "Taper",
        }
    }
}

/// How aggressively weekly volume is allowed to ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggressiveness {
    Conservative,
    Moderate,
    Aggressive,
}

/// Coarse workout categories used for day placement and load scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkoutCategory {
    Easy,
    Long,
    Quality,
    Race,
    Recovery,
}

/// Specific session flavors for quality days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityKind {
    Fartlek,
    HillRepeats,
    Strides,
    Tempo,
    Threshold,
    Vo2max,
    RacePace,
    Progression,
}

impl QualityKind {
    pub fn label(&self) -> &'static str {
        match self {
            QualityKind::Fartlek => "fartlek",
            QualityKind::HillRepeats => "hill repeats",
            QualityKind::Strides => "strides",
            QualityKind::Tempo => "tempo run",
            QualityKind::Threshold => "threshold intervals",
            QualityKind::Vo2max => "VO2max intervals",
            QualityKind::RacePace => "race-pace work",
            QualityKind::Progression => "progression run",
        }
    }
}

/// Priority of a non-goal race embedded inside the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePriority {
    B,
    C,
}

/// A tune-up race scheduled before the goal race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntermediateRace {
    pub date: NaiveDate,
    pub distance_meters: f64,
    pub priority: RacePriority,
}

/// Optional 1-5 comfort ratings for the main quality-session families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComfortRatings {
    pub vo2max: u8,
    pub tempo: u8,
    pub hills: u8,
}

/// Experience signals used to delay or soften high-intensity work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceProfile {
    /// Years of consistent running
    pub years_running: u8,

    /// Whether the athlete has done structured speedwork before
    pub has_speedwork_background: bool,

    /// Highest weekly mileage historically sustained
    pub peak_weekly_miles: Option<Decimal>,
}

/// Time available for running, in minutes per day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAvailability {
    pub weekday_minutes: u16,
    pub weekend_minutes: u16,
}

/// Athlete training profile consumed by the plan generator
///
/// Distance, frequency, and day preferences are required; everything else is
/// an optional refinement that tightens workout selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Current sustainable weekly mileage
    pub current_weekly_miles: Decimal,

    /// Target peak weekly mileage for this training cycle
    pub target_peak_miles: Decimal,

    /// Current runs per week
    pub current_runs_per_week: u8,

    /// Target runs per week at peak
    pub target_runs_per_week: u8,

    /// Preferred day for the weekly long run
    pub long_run_day: Weekday,

    /// Preferred days for hard sessions, in priority order
    pub preferred_hard_days: Vec<Weekday>,

    /// Days that must stay workout-free
    pub rest_days: Vec<Weekday>,

    pub aggressiveness: Aggressiveness,

    /// Quality sessions per week the athlete wants to absorb
    pub quality_sessions_per_week: u8,

    /// Longest run the athlete has demonstrated recently
    pub current_long_run_miles: Decimal,

    pub comfort: Option<ComfortRatings>,

    pub experience: Option<ExperienceProfile>,

    pub availability: Option<TimeAvailability>,

    /// Free-text injury notes, newest first
    #[serde(default)]
    pub injury_history: Vec<String>,
}

/// Plan generation request (external interface)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Goal race date
    pub race_date: NaiveDate,

    /// Goal race distance in meters
    pub race_distance_meters: f64,

    /// First day of the plan
    pub start_date: NaiveDate,

    pub profile: AthleteProfile,

    /// Current fitness score, if a qualifying race result exists
    pub vdot: Option<f64>,

    /// Non-goal races embedded in the plan window
    #[serde(default)]
    pub intermediate_races: Vec<IntermediateRace>,
}

/// Planned interval structure, carried so execution scoring can compare
/// training stimulus rather than literal rep counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStructure {
    pub reps: u32,
    pub rep_distance_miles: Decimal,
    /// Target pace for work reps in seconds per mile
    pub rep_pace_seconds: u32,
    pub recovery_seconds: u32,
}

/// A single scheduled workout within a plan week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedWorkout {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub category: WorkoutCategory,

    /// Session flavor when this is a quality day
    pub kind: Option<QualityKind>,

    pub distance_miles: Decimal,

    /// Rough duration estimate at target pace
    pub duration_minutes: Option<u32>,

    /// Target pace in seconds per mile, when a fitness score is available
    pub target_pace_seconds: Option<u32>,

    /// Interval prescription for structured sessions
    pub structure: Option<WorkoutStructure>,

    /// Why this workout is here
    pub rationale: String,

    /// Long runs, quality sessions, and races are key workouts
    pub is_key_workout: bool,

    /// Acceptable substitutions preserving the session's intent
    #[serde(default)]
    pub alternatives: Vec<String>,
}

/// One week of a generated plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanWeek {
    /// 1-based week number
    pub number: u32,
    pub start_date: NaiveDate,
    pub phase: Phase,
    pub target_miles: Decimal,
    pub long_run_miles: Decimal,
    pub quality_sessions: u8,
    pub is_down_week: bool,
    pub workouts: Vec<PlannedWorkout>,
}

/// Share of weekly volume by intensity bucket, as whole percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityMix {
    pub easy_pct: u8,
    pub quality_pct: u8,
    pub long_pct: u8,
}

/// Phase-level summary for plan presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub phase: Phase,
    pub weeks: u32,
    pub focus: String,
    pub intensity: IntensityMix,
}

/// Whole-plan aggregate figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_miles: Decimal,
    /// 1-based index of the highest-volume week
    pub peak_week: u32,
    pub peak_week_miles: Decimal,
    pub quality_sessions: u32,
    pub long_runs: u32,
}

/// Plan generation result (external interface)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub id: String,
    pub race_date: NaiveDate,
    pub race_distance_meters: f64,
    pub start_date: NaiveDate,
    pub total_weeks: u32,
    pub phases: Vec<PhaseSummary>,
    pub weeks: Vec<PlanWeek>,
    pub summary: PlanSummary,
}

/// Weather observed (or forecast) for a workout, reference scale Fahrenheit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_f: f64,
    pub humidity_pct: f64,
    pub dew_point_f: Option<f64>,
}

/// Role of a recorded segment within a workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Warmup,
    Work,
    Recovery,
    Steady,
    Cooldown,
}

/// One recorded segment of a completed workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSegment {
    pub kind: SegmentKind,
    pub distance_miles: f64,
    pub duration_seconds: u32,
    /// Average pace in seconds per mile
    pub pace_seconds: u32,
    pub heart_rate: Option<u16>,
}

/// A completed workout record as supplied by the activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedWorkout {
    pub date: NaiveDate,
    pub distance_miles: f64,
    pub duration_seconds: u32,
    /// Overall average pace in seconds per mile
    pub avg_pace_seconds: u32,
    #[serde(default)]
    pub segments: Vec<WorkoutSegment>,
}

/// Reference paces for zone banding when no full ladder is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaceSettings {
    pub easy_pace_seconds: u32,
    pub tempo_pace_seconds: u32,
    pub threshold_pace_seconds: u32,
}
