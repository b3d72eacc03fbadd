// Library interface for the coachrs training intelligence engine.
// Every component is a pure computation over value types; callers own all
// I/O, persistence, and presentation.

pub mod error;
pub mod logging;
pub mod models;
pub mod periodization;
pub mod plan;
pub mod scheduling;
pub mod scoring;
pub mod trend;
pub mod vdot;
pub mod zones;

// Re-export commonly used types for convenience
pub use error::{CoachError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use plan::PlanGenerator;
pub use scoring::{ExecutionScore, ExecutionScorer, ScoringConfig};
pub use trend::{FormState, RampRisk, TrendAnalyzer, TrendConfig};
pub use vdot::{RacePredictions, VdotCalculator};
pub use zones::{PaceLadder, PaceZone};
