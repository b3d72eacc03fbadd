//! Fitness trend model
//!
//! Converts daily training-load history into rolling chronic (fitness) and
//! acute (fatigue) load via exponential moving averages, their difference
//! (form), and a trailing ramp-rate assessment used as an injury-risk signal.
//! Rest days count as zero load; skipping them instead of zero-filling would
//! inflate both averages.

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::TrendError;
use crate::models::{CompletedWorkout, WorkoutCategory};

/// Trend configuration with the standard time constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Chronic load time constant in days
    pub chronic_days: u16,

    /// Acute load time constant in days
    pub acute_days: u16,

    /// Trailing window for ramp-rate assessment, in weeks
    pub ramp_window_weeks: u16,

    /// Minimum days of history for any trend output
    pub min_history_days: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        TrendConfig {
            chronic_days: 42,
            acute_days: 7,
            ramp_window_weeks: 4,
            min_history_days: 7,
        }
    }
}

/// One day of the computed trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub load: Decimal,
    /// Chronic training load (fitness)
    pub chronic: Decimal,
    /// Acute training load (fatigue)
    pub acute: Decimal,
    /// Form: chronic minus acute
    pub form: Decimal,
}

/// Ramp-rate risk banding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RampRisk {
    Decreasing,
    Conservative,
    Moderate,
    Elevated,
    HighRisk,
}

impl RampRisk {
    /// Band a chronic-load change per week
    pub fn from_rate(rate: Decimal) -> Self {
        if rate < Decimal::ZERO {
            RampRisk::Decreasing
        } else if rate < dec!(5) {
            RampRisk::Conservative
        } else if rate < dec!(8) {
            RampRisk::Moderate
        } else if rate < dec!(10) {
            RampRisk::Elevated
        } else {
            RampRisk::HighRisk
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RampRisk::Decreasing => "Fitness is declining; add load if recovery allows",
            RampRisk::Conservative => "Sustainable build; keep progressing",
            RampRisk::Moderate => "Productive ramp; watch sleep and soreness",
            RampRisk::Elevated => "Ramp is steep; consider reducing the coming week's load",
            RampRisk::HighRisk => "Injury-risk territory; schedule a recovery week",
        }
    }
}

/// Form interpretation bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormState {
    Fresh,
    Neutral,
    Fatigued,
    VeryFatigued,
}

impl FormState {
    pub fn from_form(form: Decimal) -> Self {
        if form >= dec!(5) {
            FormState::Fresh
        } else if form >= dec!(-10) {
            FormState::Neutral
        } else if form >= dec!(-30) {
            FormState::Fatigued
        } else {
            FormState::VeryFatigued
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FormState::Fresh => "Fresh and ready for hard training or racing",
            FormState::Neutral => "Normal training fatigue",
            FormState::Fatigued => "Carrying fatigue; monitor closely",
            FormState::VeryFatigued => "Deep fatigue; prioritize recovery",
        }
    }
}

/// Ramp-rate assessment over the trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampAssessment {
    /// Chronic-load change per week
    pub rate: Decimal,
    pub risk: RampRisk,
    pub window_weeks: Decimal,
    pub recommendation: String,
}

/// Fixed intensity factor per workout category
fn intensity_factor(category: WorkoutCategory) -> f64 {
    match category {
        WorkoutCategory::Recovery => 0.4,
        WorkoutCategory::Easy => 0.6,
        WorkoutCategory::Long => 0.85,
        WorkoutCategory::Quality => 1.0,
        WorkoutCategory::Race => 1.1,
    }
}

/// Sanity band for the pace multiplier, seconds per mile
const PACE_SANE_LOW: f64 = 240.0;
const PACE_SANE_HIGH: f64 = 900.0;
const PACE_BENCHMARK: f64 = 600.0;

/// Trend calculation engine
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendAnalyzer {
    pub fn new() -> Self {
        TrendAnalyzer {
            config: TrendConfig::default(),
        }
    }

    pub fn with_config(config: TrendConfig) -> Self {
        TrendAnalyzer { config }
    }

    /// Training load for one workout: duration times the category intensity
    /// factor, a 0.5%-per-minute bonus past the first hour, and a square-root
    /// pace multiplier against a 10:00/mi benchmark when the pace is sane.
    pub fn workout_load(
        category: WorkoutCategory,
        duration_seconds: u32,
        avg_pace_seconds: Option<u32>,
    ) -> Decimal {
        let minutes = f64::from(duration_seconds) / 60.0;
        let mut load = minutes * intensity_factor(category);

        if minutes > 60.0 {
            load *= 1.0 + 0.005 * (minutes - 60.0);
        }

        if let Some(pace) = avg_pace_seconds {
            let pace = f64::from(pace);
            if (PACE_SANE_LOW..=PACE_SANE_HIGH).contains(&pace) {
                load *= (PACE_BENCHMARK / pace).sqrt();
            }
        }

        Decimal::from_f64(load).unwrap_or_default().round_dp(1)
    }

    /// Aggregate completed workouts into per-day load, summing multiples
    pub fn aggregate_daily_load(
        workouts: &[(WorkoutCategory, CompletedWorkout)],
    ) -> BTreeMap<NaiveDate, Decimal> {
        let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for (category, workout) in workouts {
            let load = Self::workout_load(
                *category,
                workout.duration_seconds,
                Some(workout.avg_pace_seconds),
            );
            *daily.entry(workout.date).or_insert(Decimal::ZERO) += load;
        }
        daily
    }

    /// Compute the chronic/acute/form series over a date-ordered load series.
    ///
    /// Days absent from the input count as zero load; the fold runs strictly
    /// in date order because each day's averages depend on the previous
    /// day's. Decay per day is 1 - e^(-1/tau).
    pub fn compute_series(
        &self,
        series: &[(NaiveDate, Decimal)],
    ) -> Result<Vec<TrendPoint>, TrendError> {
        if series.len() < self.config.min_history_days {
            return Err(TrendError::InsufficientHistory {
                days: series.len(),
                required: self.config.min_history_days,
            });
        }
        for pair in series.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(TrendError::OutOfOrder { date: pair[1].0 });
            }
        }

        let by_date: BTreeMap<NaiveDate, Decimal> = series.iter().copied().collect();
        let start = series[0].0;
        let end = series[series.len() - 1].0;

        let chronic_decay = Self::decay(self.config.chronic_days);
        let acute_decay = Self::decay(self.config.acute_days);

        let mut points = Vec::new();
        let mut chronic = Decimal::ZERO;
        let mut acute = Decimal::ZERO;
        let mut date = start;
        while date <= end {
            // Zero-fill: a missing day is a rest day, not a skipped sample
            let load = by_date.get(&date).copied().unwrap_or(Decimal::ZERO);

            chronic += (load - chronic) * chronic_decay;
            acute += (load - acute) * acute_decay;

            points.push(TrendPoint {
                date,
                load,
                chronic: chronic.round_dp(2),
                acute: acute.round_dp(2),
                form: (chronic - acute).round_dp(2),
            });
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        Ok(points)
    }

    fn decay(time_constant_days: u16) -> Decimal {
        let decay = 1.0 - (-1.0 / f64::from(time_constant_days)).exp();
        Decimal::from_f64(decay).unwrap_or(dec!(0.1))
    }

    /// Ramp rate over the trailing window: chronic-load change per week.
    /// Uses as much of the requested window as the series provides, never
    /// less than one week.
    pub fn ramp_rate(&self, points: &[TrendPoint]) -> Result<RampAssessment, TrendError> {
        if points.len() < self.config.min_history_days {
            return Err(TrendError::InsufficientHistory {
                days: points.len(),
                required: self.config.min_history_days,
            });
        }

        let window_days = (usize::from(self.config.ramp_window_weeks) * 7)
            .min(points.len())
            .max(7);
        let last = &points[points.len() - 1];
        let first = &points[points.len() - window_days];

        let weeks = Decimal::from(window_days as u32) / dec!(7);
        let rate = ((last.chronic - first.chronic) / weeks).round_dp(2);
        let risk = RampRisk::from_rate(rate);

        Ok(RampAssessment {
            rate,
            risk,
            window_weeks: weeks.round_dp(2),
            recommendation: risk.recommendation().to_string(),
        })
    }
}
