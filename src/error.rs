//! Unified error hierarchy for the coachrs engine
//!
//! Typed errors per component with a single top-level enum, severity
//! classification for the tracing layer, and user-facing messages.

use thiserror::Error;

/// Top-level error type for all coachrs operations
#[derive(Debug, Error)]
pub enum CoachError {
    /// Fitness model errors
    #[error("Fitness model error: {0}")]
    Model(#[from] ModelError),

    /// Plan generation errors
    #[error("Plan generation error: {0}")]
    Plan(#[from] PlanError),

    /// Execution scoring errors
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    /// Fitness trend errors
    #[error("Trend error: {0}")]
    Trend(#[from] TrendError),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Fitness model (VDOT) errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// Race result with non-positive distance or time
    #[error("Invalid race result: {field} must be positive, got {value}")]
    InvalidResult { field: &'static str, value: f64 },

    /// Fitness score outside the supported range
    #[error("Fitness score out of range: {score}")]
    ScoreOutOfRange { score: f64 },
}

/// Plan generation errors
#[derive(Debug, Error)]
pub enum PlanError {
    /// Fewer than four weeks between plan start and goal race.
    /// Callers must distinguish this from every other path.
    #[error("Not enough time before the race: {available_weeks} weeks available, 4 required")]
    InsufficientTime { available_weeks: i64 },

    /// Race date precedes the plan start
    #[error("Race date {race} is before plan start {start}")]
    RaceBeforeStart {
        race: chrono::NaiveDate,
        start: chrono::NaiveDate,
    },

    /// Profile field that makes scheduling impossible
    #[error("Invalid profile: {reason}")]
    InvalidProfile { reason: String },
}

/// Execution scoring errors
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Completed record that cannot be scored at all
    #[error("Unusable workout record: {reason}")]
    UnusableRecord { reason: String },
}

/// Fitness trend errors
#[derive(Debug, Error)]
pub enum TrendError {
    /// Less history than the minimum needed for a meaningful trend
    #[error("Insufficient history: {days} days available, {required} required")]
    InsufficientHistory { days: usize, required: usize },

    /// Load series not in strictly increasing date order
    #[error("Load series out of order at {date}")]
    OutOfOrder { date: chrono::NaiveDate },
}

/// Result type alias for coachrs operations
pub type Result<T> = std::result::Result<T, CoachError>;

impl CoachError {
    /// Fatal errors reject the request outright; everything else is a
    /// degraded-but-structured result at the component level.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CoachError::Plan(PlanError::InsufficientTime { .. })
                | CoachError::Plan(PlanError::RaceBeforeStart { .. })
                | CoachError::Model(ModelError::InvalidResult { .. })
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoachError::Plan(PlanError::InsufficientTime { .. }) => ErrorSeverity::Error,
            CoachError::Trend(TrendError::InsufficientHistory { .. }) => ErrorSeverity::Warning,
            CoachError::Scoring(_) => ErrorSeverity::Warning,
            CoachError::Internal(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CoachError::Plan(PlanError::InsufficientTime { available_weeks }) => {
                format!(
                    "There are only {} weeks before your race. A structured plan needs at least 4.",
                    available_weeks
                )
            }
            CoachError::Model(ModelError::InvalidResult { field, .. }) => {
                format!("Race result rejected: {} must be positive.", field)
            }
            CoachError::Trend(TrendError::InsufficientHistory { required, .. }) => {
                format!(
                    "Not enough training history yet. Log at least {} days to see trends.",
                    required
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Critical,
    Error,
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical | ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
