//! Execution scoring
//!
//! Compares a completed workout against its plan across four independent
//! dimensions and combines them with fixed weights into a 0-100 score with
//! human-readable feedback. Structured interval sessions are judged on
//! training stimulus rather than literal rep structure, so 4x1000 executed
//! as 3x1200 at the right pace still scores as done.

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::error::ScoringError;
use crate::models::{
    CompletedWorkout, PaceSettings, PlannedWorkout, QualityKind, SegmentKind, WeatherSnapshot,
    WorkoutCategory,
};
use crate::vdot::VdotCalculator;

/// Neutral defaults when an input is missing, per the recovery policy:
/// degrade to a plausible middle score instead of failing the whole record.
const DEFAULT_PACE_SCORE: f64 = 75.0;
const DEFAULT_CONSISTENCY_SCORE: f64 = 80.0;

/// Scoring weights and tolerance bands.
///
/// The stimulus-equivalence tolerances are empirical calibration, not derived
/// law, so they live here rather than inline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub pace_weight: f64,
    pub zone_weight: f64,
    pub completion_weight: f64,
    pub consistency_weight: f64,

    /// Acceptable actual/planned work-volume ratio for equivalence
    pub stimulus_volume_low: f64,
    pub stimulus_volume_high: f64,
    /// Acceptable fractional deviation of average work pace
    pub stimulus_pace_tolerance: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pace_weight: 0.30,
            zone_weight: 0.25,
            completion_weight: 0.25,
            consistency_weight: 0.20,
            stimulus_volume_low: 0.8,
            stimulus_volume_high: 1.2,
            stimulus_pace_tolerance: 0.075,
        }
    }
}

/// Execution score with per-dimension breakdown and generated feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionScore {
    pub pace_accuracy: f64,
    pub zone_adherence: f64,
    pub completion: f64,
    pub consistency: f64,
    /// Weighted overall score, rounded
    pub overall: u8,
    pub diagnosis: String,
    pub suggestion: String,
    pub highlights: Vec<String>,
    pub concerns: Vec<String>,
}

/// Multi-factor execution scorer
pub struct ExecutionScorer {
    config: ScoringConfig,
}

impl Default for ExecutionScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionScorer {
    pub fn new() -> Self {
        Self {
            config: ScoringConfig::default(),
        }
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score one completed workout against its plan.
    pub fn score(
        &self,
        planned: &PlannedWorkout,
        actual: &CompletedWorkout,
        weather: Option<&WeatherSnapshot>,
        paces: Option<&PaceSettings>,
    ) -> Result<ExecutionScore, ScoringError> {
        if actual.distance_miles <= 0.0 && actual.duration_seconds == 0 {
            return Err(ScoringError::UnusableRecord {
                reason: "no distance or duration recorded".to_string(),
            });
        }

        let pace_accuracy = self.pace_accuracy(planned, actual, weather);
        let zone_adherence = self.zone_adherence(planned, actual, paces);
        let completion = self.completion(planned, actual);
        let consistency = Self::consistency(actual);

        let weighted = self.config.pace_weight * pace_accuracy
            + self.config.zone_weight * zone_adherence
            + self.config.completion_weight * completion
            + self.config.consistency_weight * consistency;
        let overall = weighted.round().clamp(0.0, 100.0) as u8;
        debug!(
            pace_accuracy,
            zone_adherence, completion, consistency, overall, "workout scored"
        );

        let weather_adjusted = weather
            .map(|w| {
                VdotCalculator::weather_pace_adjustment(
                    w.temperature_f,
                    w.humidity_pct,
                    w.dew_point_f,
                ) > 0
            })
            .unwrap_or(false);

        let components = [
            ("pace", pace_accuracy),
            ("zones", zone_adherence),
            ("completion", completion),
            ("consistency", consistency),
        ];

        Ok(ExecutionScore {
            pace_accuracy,
            zone_adherence,
            completion,
            consistency,
            overall,
            diagnosis: Self::diagnosis(overall, weather_adjusted),
            suggestion: Self::suggestion(&components),
            highlights: Self::highlights(&components),
            concerns: Self::concerns(&components),
        })
    }

    /// Percentage deviation from the weather-adjusted target, on a fixed
    /// deviation-to-score curve. The weather adjustment applies at full
    /// strength for easy and recovery runs and half strength otherwise,
    /// since hard sessions already budget for discomfort.
    fn pace_accuracy(
        &self,
        planned: &PlannedWorkout,
        actual: &CompletedWorkout,
        weather: Option<&WeatherSnapshot>,
    ) -> f64 {
        let Some(target) = planned.target_pace_seconds else {
            return DEFAULT_PACE_SCORE;
        };
        if actual.avg_pace_seconds == 0 {
            return DEFAULT_PACE_SCORE;
        }

        let adjustment = weather
            .map(|w| {
                VdotCalculator::weather_pace_adjustment(
                    w.temperature_f,
                    w.humidity_pct,
                    w.dew_point_f,
                )
            })
            .unwrap_or(0);
        let strength = match planned.category {
            WorkoutCategory::Easy | WorkoutCategory::Recovery => 1.0,
            _ => 0.5,
        };
        let adjusted_target = f64::from(target) + f64::from(adjustment) * strength;

        let deviation =
            (f64::from(actual.avg_pace_seconds) - adjusted_target).abs() / adjusted_target * 100.0;
        match deviation {
            d if d <= 2.0 => 100.0,
            d if d <= 5.0 => 100.0 - (d - 2.0) / 3.0 * 10.0,
            d if d <= 10.0 => 90.0 - (d - 5.0) / 5.0 * 20.0,
            d if d <= 20.0 => 70.0 - (d - 10.0) / 10.0 * 20.0,
            d => (50.0 - (d - 20.0) * 2.0).max(20.0),
        }
    }

    /// Fraction of segment time inside the workout's intensity band, or a
    /// coarse overall-pace estimate when no segments were recorded.
    fn zone_adherence(
        &self,
        planned: &PlannedWorkout,
        actual: &CompletedWorkout,
        paces: Option<&PaceSettings>,
    ) -> f64 {
        let Some(paces) = paces else {
            return Self::coarse_zone_estimate(planned, actual);
        };
        if actual.segments.is_empty() {
            return Self::coarse_zone_estimate(planned, actual);
        }

        let mut total: f64 = 0.0;
        let mut in_band: f64 = 0.0;
        for segment in &actual.segments {
            let seconds = f64::from(segment.duration_seconds);
            total += seconds;
            if Self::segment_in_band(planned, segment.kind, segment.pace_seconds, paces) {
                in_band += seconds;
            }
        }
        if total <= 0.0 {
            return Self::coarse_zone_estimate(planned, actual);
        }
        in_band / total * 100.0
    }

    /// Whether a segment pace lands in its expected band. Warmup, cooldown,
    /// and recovery segments must be at-or-slower-than easy pace; work
    /// segments follow the session's intensity band, defined as ratios of the
    /// easy/tempo/threshold reference paces.
    fn segment_in_band(
        planned: &PlannedWorkout,
        kind: SegmentKind,
        pace_seconds: u32,
        paces: &PaceSettings,
    ) -> bool {
        let pace = f64::from(pace_seconds);
        let easy = f64::from(paces.easy_pace_seconds);
        let tempo = f64::from(paces.tempo_pace_seconds);
        let threshold = f64::from(paces.threshold_pace_seconds);

        match kind {
            SegmentKind::Warmup | SegmentKind::Cooldown | SegmentKind::Recovery => {
                pace >= easy * 0.97
            }
            SegmentKind::Work | SegmentKind::Steady => {
                let (fast, slow) = match (planned.category, planned.kind) {
                    (WorkoutCategory::Easy | WorkoutCategory::Recovery | WorkoutCategory::Long, _) => {
                        (easy * 0.93, f64::INFINITY)
                    }
                    (_, Some(QualityKind::Tempo | QualityKind::Progression)) => {
                        (tempo * 0.95, tempo * 1.05)
                    }
                    (_, Some(QualityKind::Threshold)) => (threshold * 0.95, threshold * 1.05),
                    (_, Some(QualityKind::Vo2max)) => (threshold * 0.85, threshold * 0.98),
                    (_, Some(QualityKind::RacePace)) => {
                        let target = planned
                            .target_pace_seconds
                            .map(f64::from)
                            .unwrap_or(tempo);
                        (target * 0.95, target * 1.05)
                    }
                    _ => (easy * 0.90, f64::INFINITY),
                };
                pace >= fast && pace <= slow
            }
        }
    }

    fn coarse_zone_estimate(planned: &PlannedWorkout, actual: &CompletedWorkout) -> f64 {
        let Some(target) = planned.target_pace_seconds else {
            return DEFAULT_PACE_SCORE;
        };
        if actual.avg_pace_seconds == 0 {
            return DEFAULT_PACE_SCORE;
        }
        let deviation =
            (f64::from(actual.avg_pace_seconds) - f64::from(target)).abs() / f64::from(target);
        match deviation {
            d if d <= 0.03 => 90.0,
            d if d <= 0.07 => 80.0,
            d if d <= 0.12 => 65.0,
            _ => 50.0,
        }
    }

    /// Completion ratio on a fixed curve, overridden for structured interval
    /// sessions by the training-stimulus equivalence check.
    fn completion(&self, planned: &PlannedWorkout, actual: &CompletedWorkout) -> f64 {
        let basic = Self::basic_completion(planned, actual);

        let Some(structure) = &planned.structure else {
            return basic;
        };
        let work: Vec<_> = actual
            .segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Work)
            .collect();
        if work.is_empty() {
            return basic;
        }

        let planned_work =
            f64::from(structure.reps) * structure.rep_distance_miles.to_f64().unwrap_or(0.0);
        if planned_work <= 0.0 {
            return basic;
        }
        let actual_work: f64 = work.iter().map(|s| s.distance_miles).sum();
        let work_seconds: f64 = work.iter().map(|s| f64::from(s.duration_seconds)).sum();
        let actual_pace = if actual_work > 0.0 {
            work_seconds / actual_work
        } else {
            return basic;
        };

        let volume_ratio = actual_work / planned_work;
        let pace_deviation = (actual_pace - f64::from(structure.rep_pace_seconds)).abs()
            / f64::from(structure.rep_pace_seconds);

        let volume_ok = (self.config.stimulus_volume_low..=self.config.stimulus_volume_high)
            .contains(&volume_ratio);
        let pace_ok = pace_deviation <= self.config.stimulus_pace_tolerance;

        if volume_ok && pace_ok {
            // Different structure, same stimulus: full credit band
            let closeness = 1.0 - pace_deviation / self.config.stimulus_pace_tolerance;
            return 95.0 + 5.0 * closeness;
        }

        let volume_score = (100.0 - (volume_ratio - 1.0).abs() * 125.0).clamp(0.0, 100.0);
        let pace_score = (100.0 - pace_deviation * 400.0).clamp(0.0, 100.0);
        let stimulus = 0.5 * volume_score + 0.5 * pace_score;
        0.6 * stimulus + 0.4 * basic
    }

    fn basic_completion(planned: &PlannedWorkout, actual: &CompletedWorkout) -> f64 {
        let planned_distance = planned.distance_miles.to_f64().unwrap_or(0.0);
        let ratio = if planned_distance > 0.0 {
            actual.distance_miles / planned_distance
        } else if let Some(minutes) = planned.duration_minutes {
            if minutes == 0 {
                return 100.0;
            }
            f64::from(actual.duration_seconds) / (f64::from(minutes) * 60.0)
        } else {
            return 100.0;
        };

        if ratio >= 0.95 {
            100.0
        } else if ratio >= 0.5 {
            50.0 + (ratio - 0.5) / 0.45 * 50.0
        } else {
            ratio * 100.0 * 0.8
        }
    }

    /// Coefficient of variation of pace across the meat of the workout.
    /// Warmup and cooldown are excluded; fewer than two usable segments
    /// falls back to the neutral default.
    fn consistency(actual: &CompletedWorkout) -> f64 {
        let paces: Vec<f64> = actual
            .segments
            .iter()
            .filter(|s| !matches!(s.kind, SegmentKind::Warmup | SegmentKind::Cooldown))
            .filter(|s| s.pace_seconds > 0)
            .map(|s| f64::from(s.pace_seconds))
            .collect();
        if paces.len() < 2 {
            return DEFAULT_CONSISTENCY_SCORE;
        }

        let mean = paces.iter().copied().mean();
        let std_dev = paces.iter().copied().std_dev();
        if mean <= 0.0 {
            return DEFAULT_CONSISTENCY_SCORE;
        }
        let cv = std_dev / mean * 100.0;

        match cv {
            c if c < 3.0 => (95.0 + (3.0 - c) / 3.0 * 5.0).min(100.0),
            c if c < 5.0 => 94.0 - (c - 3.0) / 2.0 * 9.0,
            c if c < 8.0 => 84.0 - (c - 5.0) / 3.0 * 14.0,
            c => (70.0 - (c - 8.0) * 5.0).max(30.0),
        }
    }

    fn diagnosis(overall: u8, weather_adjusted: bool) -> String {
        let base = match overall {
            90..=100 => "Excellent execution. The workout did exactly what it was designed to do.",
            80..=89 => "Strong execution with minor drift from the plan.",
            70..=79 => "Solid work, though a few elements missed their marks.",
            60..=69 => "Partial execution; the session delivered some but not all of its intent.",
            _ => "The workout diverged substantially from the plan.",
        };
        if weather_adjusted {
            format!(
                "{} Conditions were difficult, and targets were adjusted for the weather.",
                base
            )
        } else {
            base.to_string()
        }
    }

    /// One actionable suggestion, driven by the weakest component
    fn suggestion(components: &[(&str, f64); 4]) -> String {
        let (worst, _) = components
            .iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .copied()
            .unwrap_or(("pace", 100.0));
        match worst {
            "pace" => {
                "Start a touch more conservatively and settle into target pace by the second mile."
            }
            "zones" => {
                "Spend more of the session inside the prescribed intensity band; easy parts easier, hard parts on target."
            }
            "completion" => {
                "Cover the planned volume; shorten the pace targets before shortening the distance."
            }
            _ => "Work on even pacing; aim for splits within a few seconds of each other.",
        }
        .to_string()
    }

    fn highlights(components: &[(&str, f64); 4]) -> Vec<String> {
        components
            .iter()
            .filter(|(_, score)| *score >= 90.0)
            .map(|(name, _)| match *name {
                "pace" => "Pace was right on target.".to_string(),
                "zones" => "Time in the right intensity zones was excellent.".to_string(),
                "completion" => "Full planned volume completed.".to_string(),
                _ => "Very even pacing throughout.".to_string(),
            })
            .collect()
    }

    fn concerns(components: &[(&str, f64); 4]) -> Vec<String> {
        components
            .iter()
            .filter(|(_, score)| *score < 70.0)
            .map(|(name, _)| match *name {
                "pace" => "Pace drifted well away from the target.".to_string(),
                "zones" => "Significant time outside the prescribed zones.".to_string(),
                "completion" => "The session came up short on planned volume.".to_string(),
                _ => "Pacing was erratic across the session.".to_string(),
            })
            .collect()
    }
}
