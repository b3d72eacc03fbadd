//! Week-by-week plan generation
//!
//! Orchestrates the periodization and scheduling rule tables into a concrete
//! calendar of workouts: phase transitions in strictly increasing week order,
//! taper and race-week overrides, intermediate-race handling, distance
//! distribution, and per-workout rationale text. Generation is a pure
//! function of the request; regeneration replaces the plan wholesale.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::error::PlanError;
use crate::models::{
    AthleteProfile, IntensityMix, Phase, PhaseSummary, PlanRequest, PlanSummary, PlanWeek,
    PlannedWorkout, QualityKind, RacePriority, TrainingPlan, WorkoutCategory, WorkoutStructure,
};
use crate::periodization::Periodizer;
use crate::scheduling::{DaySlot, WeeklyStructure, WorkoutSelector};
use crate::vdot::{VdotCalculator, METERS_PER_MILE};
use crate::zones::PaceLadder;

/// Minimum weeks needed for a structured plan
const MIN_PLAN_WEEKS: i64 = 4;

/// Easy days never exceed this distance
const EASY_DAY_CAP: Decimal = dec!(9);

/// Quality days run this much farther than the easy-day estimate
const QUALITY_DAY_SURPLUS: Decimal = dec!(2);

/// Plan generator
pub struct PlanGenerator;

impl PlanGenerator {
    /// Generate a plan for the request.
    ///
    /// Fails fatally when fewer than four weeks separate the start date from
    /// the goal race; every other path produces a structured plan.
    pub fn generate(request: &PlanRequest) -> Result<TrainingPlan, PlanError> {
        let profile = &request.profile;

        if request.race_date < request.start_date {
            return Err(PlanError::RaceBeforeStart {
                race: request.race_date,
                start: request.start_date,
            });
        }
        let days_out = (request.race_date - request.start_date).num_days();
        let available_weeks = days_out / 7;
        if available_weeks < MIN_PLAN_WEEKS {
            return Err(PlanError::InsufficientTime { available_weeks });
        }
        if profile.target_runs_per_week == 0 {
            return Err(PlanError::InvalidProfile {
                reason: "target runs per week must be at least 1".to_string(),
            });
        }
        if profile.target_peak_miles <= Decimal::ZERO {
            return Err(PlanError::InvalidProfile {
                reason: "target peak mileage must be positive".to_string(),
            });
        }

        // The race-day week counts even when partial
        let total_weeks = ((days_out + 7) / 7) as u32;

        let distance = request.race_distance_meters;
        let split = Periodizer::phase_split(distance);
        let phase_weeks = Periodizer::phase_weeks(&split, total_weeks, distance);
        let volumes = Periodizer::mileage_progression(
            profile.current_weekly_miles,
            profile.target_peak_miles,
            &phase_weeks,
            profile.aggressiveness,
        );
        let structure = WeeklyStructure::assign(
            profile.target_runs_per_week,
            profile.long_run_day,
            &profile.preferred_hard_days,
            &profile.rest_days,
            profile.quality_sessions_per_week,
        );

        let ladder = match request.vdot {
            Some(vdot) => Some(PaceLadder::from_vdot(vdot).map_err(|e| {
                PlanError::InvalidProfile {
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };
        let race_pace = Self::goal_pace(request.vdot, distance);
        let tune_up_day = profile
            .preferred_hard_days
            .first()
            .copied()
            .unwrap_or(Weekday::Tue);

        let mut weeks = Vec::with_capacity(total_weeks as usize);
        for week_index in 0..total_weeks {
            let week_start = request.start_date + Duration::weeks(i64::from(week_index));
            let (phase, week_in_phase) = phase_weeks.phase_for_week(week_index);
            let volume = volumes[week_index as usize];
            debug!(week = week_index + 1, phase = phase.name(), "building week");

            let long_run = Self::long_run_distance(
                phase,
                volume.miles,
                profile.current_long_run_miles,
                distance,
            );
            let quota = match phase {
                Phase::Taper => profile.quality_sessions_per_week.min(1),
                _ => profile.quality_sessions_per_week,
            };

            let week = Self::build_week(
                request,
                &structure,
                WeekContext {
                    number: week_index + 1,
                    start: week_start,
                    phase,
                    week_in_phase,
                    target_miles: volume.miles,
                    long_run,
                    is_down_week: volume.is_down_week,
                    quality_quota: quota,
                    race_pace,
                    tune_up_day,
                },
                ladder.as_ref(),
            );
            weeks.push(week);
        }

        let phases = Self::phase_summaries(&phase_weeks);
        let summary = Self::summarize(&weeks);
        Ok(TrainingPlan {
            id: format!(
                "plan-{}-{}m-{}w",
                request.race_date, request.race_distance_meters as u64, total_weeks
            ),
            race_date: request.race_date,
            race_distance_meters: distance,
            start_date: request.start_date,
            total_weeks,
            phases,
            weeks,
            summary,
        })
    }

    /// Long-run distance: phase fraction of the weekly target, floored at the
    /// athlete's demonstrated ability and capped for the race distance.
    fn long_run_distance(
        phase: Phase,
        target_miles: Decimal,
        demonstrated: Decimal,
        race_distance_meters: f64,
    ) -> Decimal {
        let cap = Periodizer::long_run_cap(race_distance_meters);
        let fraction = Periodizer::long_run_fraction(phase);
        (target_miles * fraction)
            .max(demonstrated.min(cap))
            .min(cap)
            .round_dp(1)
    }

    fn goal_pace(vdot: Option<f64>, distance_meters: f64) -> Option<u32> {
        let vdot = vdot?;
        let time = VdotCalculator::predict_time(vdot, distance_meters).ok()?;
        let miles = distance_meters / METERS_PER_MILE;
        Some((time / miles).round() as u32)
    }

    fn build_week(
        request: &PlanRequest,
        structure: &WeeklyStructure,
        ctx: WeekContext,
        ladder: Option<&PaceLadder>,
    ) -> PlanWeek {
        let (easy_distance, quality_distance) =
            Self::daily_distances(structure, &ctx);

        let mut workouts = Vec::new();
        let mut quality_used: u8 = 0;

        for offset in 0..7 {
            let date = ctx.start + Duration::days(offset);
            if date > request.race_date {
                break;
            }
            let slot = structure.slot(date.weekday());

            let workout = Self::day_workout(
                request,
                &ctx,
                date,
                slot,
                easy_distance,
                quality_distance,
                &mut quality_used,
                ladder,
            );
            if let Some(workout) = workout {
                workouts.push(workout);
            }
        }

        let quality_sessions =
            workouts.iter().filter(|w| w.category == WorkoutCategory::Quality).count() as u8;
        PlanWeek {
            number: ctx.number,
            start_date: ctx.start,
            phase: ctx.phase,
            target_miles: ctx.target_miles,
            long_run_miles: ctx.long_run,
            quality_sessions,
            is_down_week: ctx.is_down_week,
            workouts,
        }
    }

    /// Reserve the long run, then split what remains across quality days
    /// (easy + 2) and easy days (capped at 9).
    fn daily_distances(structure: &WeeklyStructure, ctx: &WeekContext) -> (Decimal, Decimal) {
        let quality_days =
            Decimal::from((structure.quality_days().len() as u8).min(ctx.quality_quota));
        let run_days = Decimal::from(structure.run_days() as u32);
        let easy_days = (run_days - Decimal::ONE - quality_days).max(Decimal::ONE);

        let remaining = (ctx.target_miles - ctx.long_run).max(Decimal::ZERO);
        let divisor = quality_days + easy_days;
        let easy = if divisor > Decimal::ZERO {
            ((remaining - QUALITY_DAY_SURPLUS * quality_days) / divisor)
                .max(dec!(2))
                .min(EASY_DAY_CAP)
                .round_dp(1)
        } else {
            dec!(2)
        };
        (easy, (easy + QUALITY_DAY_SURPLUS).round_dp(1))
    }

    #[allow(clippy::too_many_arguments)]
    fn day_workout(
        request: &PlanRequest,
        ctx: &WeekContext,
        date: NaiveDate,
        slot: DaySlot,
        easy_distance: Decimal,
        quality_distance: Decimal,
        quality_used: &mut u8,
        ladder: Option<&PaceLadder>,
    ) -> Option<PlannedWorkout> {
        let days_to_goal = (request.race_date - date).num_days();

        // (a) goal race day
        if days_to_goal == 0 {
            return Some(Self::race_workout(
                date,
                request.race_distance_meters,
                ctx.race_pace,
                None,
            ));
        }

        // (b) goal-race week overrides
        if days_to_goal <= 7 {
            if slot == DaySlot::Rest {
                return None;
            }
            return Some(Self::race_week_workout(ctx, date, days_to_goal, ladder));
        }

        // (c) intermediate race overrides
        if let Some(workout) = Self::intermediate_race_workout(request, date, slot, ladder) {
            return Some(workout);
        }

        match slot {
            DaySlot::Rest => None,
            DaySlot::Long => Some(Self::long_or_downgraded(request, ctx, date, ladder)),
            DaySlot::Quality if *quality_used < ctx.quality_quota => {
                *quality_used += 1;
                Some(Self::quality_workout(
                    request,
                    ctx,
                    date,
                    *quality_used,
                    quality_distance,
                    easy_distance,
                    ladder,
                ))
            }
            DaySlot::Quality | DaySlot::Easy => Some(Self::easy_workout(
                request, ctx, date, easy_distance, ladder,
            )),
        }
    }

    fn race_workout(
        date: NaiveDate,
        distance_meters: f64,
        pace: Option<u32>,
        priority: Option<RacePriority>,
    ) -> PlannedWorkout {
        let miles = Decimal::from_f64(distance_meters / METERS_PER_MILE)
            .unwrap_or(Decimal::ZERO)
            .round_dp(1);
        let rationale = match priority {
            None => "Goal race. Trust the training and execute your plan.".to_string(),
            Some(RacePriority::B) => {
                "B race: an honest effort and a fitness check, not the goal.".to_string()
            }
            Some(RacePriority::C) => {
                "C race: treat as a hard workout with a bib on.".to_string()
            }
        };
        PlannedWorkout {
            date,
            weekday: date.weekday(),
            category: WorkoutCategory::Race,
            kind: None,
            distance_miles: miles,
            duration_minutes: pace.map(|p| Self::duration_minutes(miles, p)),
            target_pace_seconds: pace,
            structure: None,
            rationale,
            is_key_workout: true,
            alternatives: Vec::new(),
        }
    }

    fn race_week_workout(
        ctx: &WeekContext,
        date: NaiveDate,
        days_to_goal: i64,
        ladder: Option<&PaceLadder>,
    ) -> PlannedWorkout {
        let easy_pace = ladder.map(|l| l.easy);
        match days_to_goal {
            1 => Self::basic_workout(
                date,
                WorkoutCategory::Easy,
                dec!(2),
                easy_pace,
                "Shakeout jog to stay loose the day before the race.",
                false,
            ),
            2 => Self::basic_workout(
                date,
                WorkoutCategory::Easy,
                dec!(3),
                easy_pace,
                "Short easy run two days out; nothing that costs anything.",
                false,
            ),
            3..=5 if date.weekday() == ctx.tune_up_day => {
                let mut workout = Self::basic_workout(
                    date,
                    WorkoutCategory::Quality,
                    dec!(4),
                    ctx.race_pace,
                    "Race-pace tune-up: a few miles at goal rhythm to sharpen up.",
                    true,
                );
                workout.kind = Some(QualityKind::RacePace);
                workout.alternatives =
                    WorkoutSelector::alternatives(WorkoutCategory::Quality, workout.kind);
                workout
            }
            _ => {
                let capped = dec!(5).min(ctx.target_miles / dec!(5)).round_dp(1);
                Self::basic_workout(
                    date,
                    WorkoutCategory::Easy,
                    capped,
                    easy_pace,
                    "Easy running only inside race week.",
                    false,
                )
            }
        }
    }

    fn intermediate_race_workout(
        request: &PlanRequest,
        date: NaiveDate,
        slot: DaySlot,
        ladder: Option<&PaceLadder>,
    ) -> Option<PlannedWorkout> {
        for race in &request.intermediate_races {
            let delta = (race.date - date).num_days();
            if delta == 0 {
                let pace = Self::goal_pace(request.vdot, race.distance_meters);
                return Some(Self::race_workout(
                    date,
                    race.distance_meters,
                    pace,
                    Some(race.priority),
                ));
            }
            // Two-day mini-taper going in, recovery day coming out
            if (1..=2).contains(&delta) && slot != DaySlot::Rest {
                return Some(Self::basic_workout(
                    date,
                    WorkoutCategory::Easy,
                    dec!(3),
                    ladder.map(|l| l.easy),
                    "Mini-taper: easy running into the tune-up race.",
                    false,
                ));
            }
            if delta == -1 && slot != DaySlot::Rest {
                return Some(Self::basic_workout(
                    date,
                    WorkoutCategory::Recovery,
                    dec!(2),
                    ladder.map(|l| l.recovery),
                    "Recovery jog the day after racing.",
                    false,
                ));
            }
        }
        None
    }

    fn long_or_downgraded(
        request: &PlanRequest,
        ctx: &WeekContext,
        date: NaiveDate,
        ladder: Option<&PaceLadder>,
    ) -> PlannedWorkout {
        let near_race = request
            .intermediate_races
            .iter()
            .map(|r| r.date)
            .chain(std::iter::once(request.race_date))
            .any(|race_date| (race_date - date).num_days().abs() <= 2);

        if near_race {
            let capped = dec!(5).min(ctx.target_miles / dec!(5)).round_dp(1);
            return Self::basic_workout(
                date,
                WorkoutCategory::Easy,
                capped,
                ladder.map(|l| l.easy),
                "Long run shortened to an easy run this close to a race.",
                false,
            );
        }

        let mut workout = Self::basic_workout(
            date,
            WorkoutCategory::Long,
            ctx.long_run,
            ladder.map(|l| l.easy),
            &format!(
                "Long run anchoring week {}: steady endurance in the {} phase.",
                ctx.number,
                ctx.phase.name().to_lowercase()
            ),
            true,
        );
        workout.alternatives = WorkoutSelector::alternatives(WorkoutCategory::Long, None);
        workout
    }

    fn quality_workout(
        request: &PlanRequest,
        ctx: &WeekContext,
        date: NaiveDate,
        session_number: u8,
        quality_distance: Decimal,
        easy_distance: Decimal,
        ladder: Option<&PaceLadder>,
    ) -> PlannedWorkout {
        let base = WorkoutSelector::workout_type_for_phase(
            ctx.phase,
            ctx.week_in_phase,
            request.race_distance_meters,
            session_number,
        );
        let kind =
            WorkoutSelector::effective_quality(base, &request.profile, ctx.week_in_phase);

        let pace = Self::quality_pace(kind, ctx.race_pace, ladder);
        let distance = match kind {
            // Strides ride on an easy run; they add no real distance
            QualityKind::Strides => easy_distance,
            _ => quality_distance,
        };

        let mut workout = Self::basic_workout(
            date,
            WorkoutCategory::Quality,
            distance,
            pace,
            &Self::quality_rationale(kind, ctx.phase),
            true,
        );
        workout.kind = Some(kind);
        workout.structure = Self::interval_structure(kind, distance, pace);
        workout.alternatives = WorkoutSelector::alternatives(WorkoutCategory::Quality, Some(kind));
        workout
    }

    fn quality_pace(
        kind: QualityKind,
        race_pace: Option<u32>,
        ladder: Option<&PaceLadder>,
    ) -> Option<u32> {
        let ladder = match ladder {
            Some(l) => l,
            None => return if kind == QualityKind::RacePace { race_pace } else { None },
        };
        Some(match kind {
            QualityKind::Fartlek | QualityKind::Progression => ladder.general_aerobic,
            QualityKind::HillRepeats | QualityKind::Strides => ladder.easy,
            QualityKind::Tempo => ladder.tempo,
            QualityKind::Threshold => ladder.threshold,
            QualityKind::Vo2max => ladder.vo2max,
            QualityKind::RacePace => race_pace.unwrap_or(ladder.tempo),
        })
    }

    /// Interval prescriptions for the structured sessions; everything else is
    /// a continuous run and carries no rep structure.
    fn interval_structure(
        kind: QualityKind,
        distance: Decimal,
        pace: Option<u32>,
    ) -> Option<WorkoutStructure> {
        let pace = pace?;
        let work_miles = (distance * dec!(0.5)).max(dec!(1));
        match kind {
            QualityKind::Vo2max => {
                let rep = dec!(0.75);
                let reps = (work_miles / rep).round().to_u32().unwrap_or(4).clamp(3, 8);
                Some(WorkoutStructure {
                    reps,
                    rep_distance_miles: rep,
                    rep_pace_seconds: pace,
                    recovery_seconds: 180,
                })
            }
            QualityKind::Threshold => {
                let rep = dec!(1);
                let reps = (work_miles / rep).round().to_u32().unwrap_or(3).clamp(2, 6);
                Some(WorkoutStructure {
                    reps,
                    rep_distance_miles: rep,
                    rep_pace_seconds: pace,
                    recovery_seconds: 120,
                })
            }
            _ => None,
        }
    }

    fn quality_rationale(kind: QualityKind, phase: Phase) -> String {
        let session = kind.label();
        match phase {
            Phase::Base => format!(
                "Base-phase {}: variety and leg speed without heavy stress.",
                session
            ),
            Phase::Build => format!(
                "Build-phase {}: raising the ceiling for race-specific work.",
                session
            ),
            Phase::Peak => format!("Peak-phase {}: rehearsing race demands.", session),
            Phase::Taper => format!("Taper {}: staying sharp while the volume drops.", session),
        }
    }

    fn easy_workout(
        request: &PlanRequest,
        ctx: &WeekContext,
        date: NaiveDate,
        easy_distance: Decimal,
        ladder: Option<&PaceLadder>,
    ) -> PlannedWorkout {
        let pace = ladder.map(|l| l.easy);
        let distance = Self::apply_time_budget(
            easy_distance,
            date,
            &request.profile,
            pace.unwrap_or(600),
        );
        let mut workout = Self::basic_workout(
            date,
            WorkoutCategory::Easy,
            distance,
            pace,
            "Easy aerobic running between the key sessions.",
            false,
        );
        workout.alternatives = WorkoutSelector::alternatives(WorkoutCategory::Easy, None);
        workout
    }

    /// Cap an easy run by the athlete's time budget, converted to distance at
    /// easy pace and rounded down to the half mile.
    fn apply_time_budget(
        distance: Decimal,
        date: NaiveDate,
        profile: &AthleteProfile,
        easy_pace_seconds: u32,
    ) -> Decimal {
        let Some(availability) = &profile.availability else {
            return distance;
        };
        let minutes = match date.weekday() {
            Weekday::Sat | Weekday::Sun => availability.weekend_minutes,
            _ => availability.weekday_minutes,
        };
        let budget_miles = f64::from(minutes) * 60.0 / f64::from(easy_pace_seconds);
        let budget = Decimal::from_f64((budget_miles * 2.0).floor() / 2.0)
            .unwrap_or(distance);
        distance.min(budget)
    }

    fn basic_workout(
        date: NaiveDate,
        category: WorkoutCategory,
        distance: Decimal,
        pace: Option<u32>,
        rationale: &str,
        is_key: bool,
    ) -> PlannedWorkout {
        PlannedWorkout {
            date,
            weekday: date.weekday(),
            category,
            kind: None,
            distance_miles: distance,
            duration_minutes: pace.map(|p| Self::duration_minutes(distance, p)),
            target_pace_seconds: pace,
            structure: None,
            rationale: rationale.to_string(),
            is_key_workout: is_key,
            alternatives: Vec::new(),
        }
    }

    fn duration_minutes(distance: Decimal, pace_seconds: u32) -> u32 {
        (distance * Decimal::from(pace_seconds) / dec!(60))
            .round()
            .to_u32()
            .unwrap_or(0)
    }

    fn phase_summaries(phase_weeks: &crate::periodization::PhaseWeeks) -> Vec<PhaseSummary> {
        let mix = |phase: Phase| match phase {
            Phase::Base => IntensityMix {
                easy_pct: 60,
                quality_pct: 10,
                long_pct: 30,
            },
            Phase::Build => IntensityMix {
                easy_pct: 50,
                quality_pct: 20,
                long_pct: 30,
            },
            Phase::Peak => IntensityMix {
                easy_pct: 45,
                quality_pct: 25,
                long_pct: 30,
            },
            Phase::Taper => IntensityMix {
                easy_pct: 60,
                quality_pct: 15,
                long_pct: 25,
            },
        };
        [
            (Phase::Base, phase_weeks.base),
            (Phase::Build, phase_weeks.build),
            (Phase::Peak, phase_weeks.peak),
            (Phase::Taper, phase_weeks.taper),
        ]
        .into_iter()
        .filter(|(_, weeks)| *weeks > 0)
        .map(|(phase, weeks)| PhaseSummary {
            phase,
            weeks,
            focus: phase.focus().to_string(),
            intensity: mix(phase),
        })
        .collect()
    }

    fn summarize(weeks: &[PlanWeek]) -> PlanSummary {
        let total_miles: Decimal = weeks
            .iter()
            .flat_map(|w| w.workouts.iter())
            .map(|w| w.distance_miles)
            .sum();
        let (peak_week, peak_week_miles) = weeks
            .iter()
            .max_by_key(|w| w.target_miles)
            .map(|w| (w.number, w.target_miles))
            .unwrap_or((1, Decimal::ZERO));
        let quality_sessions = weeks
            .iter()
            .flat_map(|w| w.workouts.iter())
            .filter(|w| w.category == WorkoutCategory::Quality)
            .count() as u32;
        let long_runs = weeks
            .iter()
            .flat_map(|w| w.workouts.iter())
            .filter(|w| w.category == WorkoutCategory::Long)
            .count() as u32;
        PlanSummary {
            total_miles: total_miles.round_dp(1),
            peak_week,
            peak_week_miles,
            quality_sessions,
            long_runs,
        }
    }
}

struct WeekContext {
    number: u32,
    start: NaiveDate,
    phase: Phase,
    week_in_phase: u32,
    target_miles: Decimal,
    long_run: Decimal,
    is_down_week: bool,
    quality_quota: u8,
    race_pace: Option<u32>,
    tune_up_day: Weekday,
}

impl TrainingPlan {
    fn workout_mut(&mut self, date: NaiveDate) -> Option<&mut PlannedWorkout> {
        self.weeks
            .iter_mut()
            .flat_map(|w| w.workouts.iter_mut())
            .find(|w| w.date == date)
    }

    /// Scale one workout's distance in place. Race days are immutable.
    pub fn scale_workout(&mut self, date: NaiveDate, factor: Decimal) -> bool {
        match self.workout_mut(date) {
            Some(workout) if workout.category != WorkoutCategory::Race => {
                workout.distance_miles = (workout.distance_miles * factor).round_dp(1);
                if let (Some(pace), Some(_)) =
                    (workout.target_pace_seconds, workout.duration_minutes)
                {
                    workout.duration_minutes =
                        Some(PlanGenerator::duration_minutes(workout.distance_miles, pace));
                }
                true
            }
            _ => false,
        }
    }

    /// Mark one workout skipped without regenerating the plan.
    pub fn skip_workout(&mut self, date: NaiveDate) -> bool {
        match self.workout_mut(date) {
            Some(workout) if workout.category != WorkoutCategory::Race => {
                workout.distance_miles = Decimal::ZERO;
                workout.duration_minutes = None;
                workout.is_key_workout = false;
                workout.rationale = "Skipped by athlete.".to_string();
                true
            }
            _ => false,
        }
    }

    /// Swap one workout for one of its listed alternatives.
    pub fn substitute_workout(&mut self, date: NaiveDate, alternative: usize) -> bool {
        match self.workout_mut(date) {
            Some(workout) if alternative < workout.alternatives.len() => {
                workout.rationale = format!(
                    "Substituted: {}",
                    workout.alternatives[alternative]
                );
                workout.structure = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Aggressiveness, IntermediateRace};

    fn marathon_request() -> PlanRequest {
        PlanRequest {
            race_date: NaiveDate::from_ymd_opt(2026, 10, 11).unwrap(),
            race_distance_meters: 42_195.0,
            start_date: NaiveDate::from_ymd_opt(2026, 6, 22).unwrap(),
            profile: AthleteProfile {
                current_weekly_miles: dec!(30),
                target_peak_miles: dec!(50),
                current_runs_per_week: 5,
                target_runs_per_week: 6,
                long_run_day: Weekday::Sun,
                preferred_hard_days: vec![Weekday::Tue, Weekday::Thu],
                rest_days: vec![Weekday::Mon],
                aggressiveness: Aggressiveness::Moderate,
                quality_sessions_per_week: 2,
                current_long_run_miles: dec!(10),
                comfort: None,
                experience: None,
                availability: None,
                injury_history: Vec::new(),
            },
            vdot: Some(48.0),
            intermediate_races: Vec::new(),
        }
    }

    #[test]
    fn test_sixteen_week_marathon_shape() {
        let plan = PlanGenerator::generate(&marathon_request()).unwrap();
        assert_eq!(plan.total_weeks, 16);
        assert_eq!(plan.weeks.len(), 16);

        let phase_total: u32 = plan.phases.iter().map(|p| p.weeks).sum();
        assert_eq!(phase_total, 16);
    }

    #[test]
    fn test_exactly_one_race_on_goal_date() {
        let request = marathon_request();
        let plan = PlanGenerator::generate(&request).unwrap();
        let races: Vec<&PlannedWorkout> = plan
            .weeks
            .iter()
            .flat_map(|w| w.workouts.iter())
            .filter(|w| w.category == WorkoutCategory::Race)
            .collect();
        assert_eq!(races.len(), 1);
        assert_eq!(races[0].date, request.race_date);
        assert!(races[0].is_key_workout);
    }

    #[test]
    fn test_no_adjacent_key_workouts() {
        let plan = PlanGenerator::generate(&marathon_request()).unwrap();
        let key_dates: Vec<NaiveDate> = plan
            .weeks
            .iter()
            .flat_map(|w| w.workouts.iter())
            .filter(|w| w.is_key_workout)
            .map(|w| w.date)
            .collect();
        for pair in key_dates.windows(2) {
            assert!(
                (pair[1] - pair[0]).num_days() >= 2,
                "key workouts on adjacent days: {} and {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_at_most_one_long_run_per_week() {
        let plan = PlanGenerator::generate(&marathon_request()).unwrap();
        for week in &plan.weeks {
            let longs = week
                .workouts
                .iter()
                .filter(|w| w.category == WorkoutCategory::Long)
                .count();
            assert!(longs <= 1, "week {} has {} long runs", week.number, longs);
        }
    }

    #[test]
    fn test_phases_advance_forward_only() {
        let plan = PlanGenerator::generate(&marathon_request()).unwrap();
        let order = |p: Phase| match p {
            Phase::Base => 0,
            Phase::Build => 1,
            Phase::Peak => 2,
            Phase::Taper => 3,
        };
        for pair in plan.weeks.windows(2) {
            assert!(order(pair[0].phase) <= order(pair[1].phase));
        }
    }

    #[test]
    fn test_under_four_weeks_is_fatal() {
        let mut request = marathon_request();
        request.start_date = NaiveDate::from_ymd_opt(2026, 9, 20).unwrap();
        let err = PlanGenerator::generate(&request).unwrap_err();
        assert!(matches!(err, PlanError::InsufficientTime { available_weeks: 3 }));
    }

    #[test]
    fn test_race_week_is_gentle() {
        let request = marathon_request();
        let plan = PlanGenerator::generate(&request).unwrap();
        let final_week = plan.weeks.last().unwrap();

        for workout in &final_week.workouts {
            if workout.category == WorkoutCategory::Race {
                continue;
            }
            assert!(
                workout.distance_miles <= dec!(5),
                "race-week workout too long: {:?}",
                workout
            );
        }

        // Day before the race is a two-mile shakeout
        let shakeout = plan
            .weeks
            .iter()
            .flat_map(|w| w.workouts.iter())
            .find(|w| (request.race_date - w.date).num_days() == 1);
        if let Some(shakeout) = shakeout {
            assert_eq!(shakeout.distance_miles, dec!(2));
            assert!(!shakeout.is_key_workout);
        }
    }

    #[test]
    fn test_long_run_floor_and_cap() {
        let mut request = marathon_request();
        request.profile.current_long_run_miles = dec!(14);
        let plan = PlanGenerator::generate(&request).unwrap();

        for week in &plan.weeks {
            if week.phase == Phase::Taper {
                continue;
            }
            assert!(
                week.long_run_miles >= dec!(14),
                "week {} long run regressed below demonstrated ability",
                week.number
            );
            assert!(week.long_run_miles <= dec!(22));
        }
    }

    #[test]
    fn test_intermediate_race_gets_mini_taper_and_recovery() {
        let mut request = marathon_request();
        let b_race_date = NaiveDate::from_ymd_opt(2026, 8, 15).unwrap();
        request.intermediate_races = vec![IntermediateRace {
            date: b_race_date,
            distance_meters: 10_000.0,
            priority: RacePriority::B,
        }];
        let plan = PlanGenerator::generate(&request).unwrap();

        let workouts: Vec<&PlannedWorkout> = plan
            .weeks
            .iter()
            .flat_map(|w| w.workouts.iter())
            .collect();

        let race_day = workouts.iter().find(|w| w.date == b_race_date).unwrap();
        assert_eq!(race_day.category, WorkoutCategory::Race);

        for workout in &workouts {
            let delta = (b_race_date - workout.date).num_days();
            if (1..=2).contains(&delta) {
                assert_eq!(workout.category, WorkoutCategory::Easy);
                assert!(!workout.is_key_workout);
            }
            if delta == -1 {
                assert_eq!(workout.category, WorkoutCategory::Recovery);
            }
        }
    }

    #[test]
    fn test_down_weeks_marked() {
        let plan = PlanGenerator::generate(&marathon_request()).unwrap();
        assert!(plan.weeks.iter().any(|w| w.is_down_week));
        // Taper weeks are never down weeks
        for week in &plan.weeks {
            if week.phase == Phase::Taper {
                assert!(!week.is_down_week);
            }
        }
    }

    #[test]
    fn test_rest_days_honored() {
        let plan = PlanGenerator::generate(&marathon_request()).unwrap();
        for week in &plan.weeks {
            for workout in &week.workouts {
                if workout.category == WorkoutCategory::Race {
                    continue;
                }
                assert_ne!(workout.weekday, Weekday::Mon, "workout on a rest day");
            }
        }
    }

    #[test]
    fn test_time_budget_caps_easy_days() {
        let mut request = marathon_request();
        request.profile.availability = Some(crate::models::TimeAvailability {
            weekday_minutes: 30,
            weekend_minutes: 180,
        });
        let plan = PlanGenerator::generate(&request).unwrap();

        // 30 minutes at roughly 9:20 easy pace is at most 3 miles.
        // Race week follows its own fixed schedule, so it is exempt.
        for week in &plan.weeks {
            if week.number == plan.total_weeks {
                continue;
            }
            for workout in &week.workouts {
                if workout.category == WorkoutCategory::Easy
                    && !matches!(workout.weekday, Weekday::Sat | Weekday::Sun)
                {
                    assert!(
                        workout.distance_miles <= dec!(3.5),
                        "easy day over budget: {:?}",
                        workout
                    );
                }
            }
        }
    }

    #[test]
    fn test_workouts_carry_rationale_and_alternatives() {
        let plan = PlanGenerator::generate(&marathon_request()).unwrap();
        for week in &plan.weeks {
            for workout in &week.workouts {
                assert!(!workout.rationale.is_empty());
                if workout.category == WorkoutCategory::Quality {
                    assert!(!workout.alternatives.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_summary_totals() {
        let plan = PlanGenerator::generate(&marathon_request()).unwrap();
        assert!(plan.summary.total_miles > dec!(300));
        assert_eq!(plan.summary.peak_week_miles, dec!(50));
        assert!(plan.summary.long_runs >= 10);
        assert!(plan.summary.quality_sessions >= 10);
    }

    #[test]
    fn test_scale_and_skip_workout() {
        let mut plan = PlanGenerator::generate(&marathon_request()).unwrap();
        let easy_date = plan
            .weeks
            .iter()
            .flat_map(|w| w.workouts.iter())
            .find(|w| w.category == WorkoutCategory::Easy)
            .map(|w| w.date)
            .unwrap();
        let before = plan
            .weeks
            .iter()
            .flat_map(|w| w.workouts.iter())
            .find(|w| w.date == easy_date)
            .unwrap()
            .distance_miles;

        assert!(plan.scale_workout(easy_date, dec!(0.5)));
        let after = plan
            .weeks
            .iter()
            .flat_map(|w| w.workouts.iter())
            .find(|w| w.date == easy_date)
            .unwrap()
            .distance_miles;
        assert_eq!(after, (before * dec!(0.5)).round_dp(1));

        assert!(plan.skip_workout(easy_date));

        // Race day refuses modification
        let race_date = plan.race_date;
        assert!(!plan.scale_workout(race_date, dec!(0.5)));
        assert!(!plan.skip_workout(race_date));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let request = marathon_request();
        let a = PlanGenerator::generate(&request).unwrap();
        let b = PlanGenerator::generate(&request).unwrap();
        assert_eq!(a, b);
    }
}
