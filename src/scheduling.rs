//! Weekly structure and workout-type selection rules
//!
//! Assigns the seven days of a training week to long/quality/easy/rest slots
//! around the athlete's preferences, and selects the specific quality session
//! for a phase and week. Profile-driven substitution is a pure function
//! composed before the scheduler commits a day, so downgrade logic stays out
//! of day-placement logic.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::models::{AthleteProfile, Phase, QualityKind, WorkoutCategory};

/// What a day of the template week is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DaySlot {
    Rest,
    Easy,
    Quality,
    Long,
}

/// Template assignment for one week, indexed Monday through Sunday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStructure {
    slots: [DaySlot; 7],
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Fallback order for quality days when preferences cannot be honored
const QUALITY_FALLBACK: [Weekday; 4] = [Weekday::Tue, Weekday::Thu, Weekday::Wed, Weekday::Fri];

fn adjacent(a: Weekday, b: Weekday) -> bool {
    // Cyclic adjacency so the template also holds across week boundaries
    a.succ() == b || a.pred() == b
}

impl WeeklyStructure {
    pub fn slot(&self, day: Weekday) -> DaySlot {
        self.slots[day.num_days_from_monday() as usize]
    }

    fn set(&mut self, day: Weekday, slot: DaySlot) {
        self.slots[day.num_days_from_monday() as usize] = slot;
    }

    /// The day carrying the long run
    pub fn long_run_day(&self) -> Weekday {
        WEEK.iter()
            .copied()
            .find(|d| self.slot(*d) == DaySlot::Long)
            .unwrap_or(Weekday::Sun)
    }

    pub fn quality_days(&self) -> Vec<Weekday> {
        WEEK.iter()
            .copied()
            .filter(|d| self.slot(*d) == DaySlot::Quality)
            .collect()
    }

    pub fn run_days(&self) -> usize {
        WEEK.iter().filter(|d| self.slot(**d) != DaySlot::Rest).count()
    }

    /// Build the weekly template.
    ///
    /// The long run takes the preferred day unless that day is forced rest.
    /// Quality sessions go on preferred days first, never adjacent to the
    /// long run or to each other, with a Tue/Thu/Wed/Fri fallback. Remaining
    /// run slots fill with easy days. Finally the day before the long run is
    /// forced down to easy or rest, whatever was there.
    pub fn assign(
        runs_per_week: u8,
        long_run_day: Weekday,
        preferred_hard_days: &[Weekday],
        rest_days: &[Weekday],
        quality_sessions: u8,
    ) -> Self {
        let mut structure = WeeklyStructure {
            slots: [DaySlot::Rest; 7],
        };
        let is_rest = |d: Weekday| rest_days.contains(&d);

        let long_day = if !is_rest(long_run_day) {
            long_run_day
        } else {
            [Weekday::Sat, Weekday::Sun]
                .into_iter()
                .chain(WEEK)
                .find(|d| !is_rest(*d))
                .unwrap_or(long_run_day)
        };
        structure.set(long_day, DaySlot::Long);

        let mut placed: Vec<Weekday> = Vec::new();
        let candidates = preferred_hard_days
            .iter()
            .copied()
            .chain(QUALITY_FALLBACK.into_iter());
        for day in candidates {
            if placed.len() >= quality_sessions as usize {
                break;
            }
            if is_rest(day)
                || day == long_day
                || adjacent(day, long_day)
                || structure.slot(day) != DaySlot::Rest
                || placed.iter().any(|q| adjacent(day, *q))
            {
                continue;
            }
            structure.set(day, DaySlot::Quality);
            placed.push(day);
        }

        let mut run_days = 1 + placed.len();
        for day in WEEK {
            if run_days >= runs_per_week as usize {
                break;
            }
            if structure.slot(day) == DaySlot::Rest && !is_rest(day) {
                structure.set(day, DaySlot::Easy);
                run_days += 1;
            }
        }

        // The day into the long run stays easy no matter what
        let day_before_long = long_day.pred();
        if structure.slot(day_before_long) == DaySlot::Quality {
            structure.set(day_before_long, DaySlot::Easy);
        }

        structure
    }
}

/// Workout-type rule tables and profile substitution
pub struct WorkoutSelector;

impl WorkoutSelector {
    /// Quality session for a phase, week within the phase (0-based), race
    /// distance, and session number within the week (1-based).
    pub fn workout_type_for_phase(
        phase: Phase,
        week_in_phase: u32,
        race_distance_meters: f64,
        session_number: u8,
    ) -> QualityKind {
        match phase {
            Phase::Base => match session_number {
                1 => {
                    if week_in_phase % 2 == 0 {
                        QualityKind::Fartlek
                    } else {
                        QualityKind::HillRepeats
                    }
                }
                _ => QualityKind::Strides,
            },
            Phase::Build => match session_number {
                1 => match week_in_phase % 3 {
                    0 => QualityKind::Tempo,
                    1 => QualityKind::Threshold,
                    _ => QualityKind::Vo2max,
                },
                _ => QualityKind::Fartlek,
            },
            Phase::Peak => Self::peak_session(race_distance_meters, session_number),
            Phase::Taper => match session_number {
                1 => QualityKind::Tempo,
                _ => QualityKind::Strides,
            },
        }
    }

    fn peak_session(race_distance_meters: f64, session_number: u8) -> QualityKind {
        if race_distance_meters >= 40_000.0 {
            match session_number {
                1 => QualityKind::RacePace,
                _ => QualityKind::Tempo,
            }
        } else if race_distance_meters >= 20_000.0 {
            match session_number {
                1 => QualityKind::RacePace,
                _ => QualityKind::Threshold,
            }
        } else if race_distance_meters >= 10_000.0 {
            match session_number {
                1 => QualityKind::RacePace,
                _ => QualityKind::Vo2max,
            }
        } else {
            match session_number {
                1 => QualityKind::Vo2max,
                _ => QualityKind::RacePace,
            }
        }
    }

    /// Substitute a session the athlete is not ready for.
    ///
    /// Experience limits delay VO2max work early in a phase; comfort ratings
    /// below 3 downgrade through a fixed table. Applied before the scheduler
    /// commits the day.
    pub fn effective_quality(
        base_choice: QualityKind,
        profile: &AthleteProfile,
        week_in_phase: u32,
    ) -> QualityKind {
        let mut choice = base_choice;

        if choice == QualityKind::Vo2max {
            let limited = profile
                .experience
                .as_ref()
                .map(|e| e.years_running < 2 || !e.has_speedwork_background)
                .unwrap_or(false);
            if limited && week_in_phase < 2 {
                choice = QualityKind::Threshold;
            }
        }

        if let Some(comfort) = &profile.comfort {
            choice = match choice {
                QualityKind::Vo2max if comfort.vo2max < 3 => QualityKind::Fartlek,
                QualityKind::Tempo if comfort.tempo < 3 => QualityKind::Progression,
                QualityKind::HillRepeats if comfort.hills < 3 => QualityKind::Strides,
                other => other,
            };
        }

        choice
    }

    /// Substitutions that preserve the intent of a workout
    pub fn alternatives(category: WorkoutCategory, kind: Option<QualityKind>) -> Vec<String> {
        match (category, kind) {
            (WorkoutCategory::Quality, Some(QualityKind::Vo2max)) => vec![
                "Fartlek with 6-8 hard surges of 2 minutes".to_string(),
                "Shorter hill repeats at hard effort".to_string(),
            ],
            (WorkoutCategory::Quality, Some(QualityKind::Threshold)) => vec![
                "Continuous tempo at the slower end of the zone".to_string(),
                "Cruise intervals with short floats".to_string(),
            ],
            (WorkoutCategory::Quality, Some(QualityKind::Tempo)) => vec![
                "Progression run finishing at tempo effort".to_string(),
                "Two shorter tempo blocks with a recovery jog".to_string(),
            ],
            (WorkoutCategory::Quality, Some(QualityKind::HillRepeats)) => vec![
                "Strides on a gentle grade".to_string(),
                "Fartlek surges on rolling terrain".to_string(),
            ],
            (WorkoutCategory::Quality, Some(QualityKind::RacePace)) => vec![
                "Split the race-pace volume into two blocks".to_string(),
            ],
            (WorkoutCategory::Quality, _) => {
                vec!["Easy run with 6 x 20s strides".to_string()]
            }
            (WorkoutCategory::Long, _) => vec![
                "Split into a morning and evening run if needed".to_string(),
                "Time-based long run at the same effort".to_string(),
            ],
            (WorkoutCategory::Easy, _) => {
                vec!["Rest or cross-train if unusually fatigued".to_string()]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Aggressiveness, ComfortRatings, ExperienceProfile};
    use rust_decimal_macros::dec;

    fn profile() -> AthleteProfile {
        AthleteProfile {
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
        }
    }

    #[test]
    fn test_long_run_on_preferred_day() {
        let structure = WeeklyStructure::assign(5, Weekday::Sun, &[Weekday::Tue], &[], 1);
        assert_eq!(structure.slot(Weekday::Sun), DaySlot::Long);
        assert_eq!(structure.long_run_day(), Weekday::Sun);
    }

    #[test]
    fn test_long_run_moves_off_forced_rest() {
        let structure =
            WeeklyStructure::assign(5, Weekday::Sun, &[Weekday::Tue], &[Weekday::Sun], 1);
        assert_ne!(structure.long_run_day(), Weekday::Sun);
        assert_eq!(structure.long_run_day(), Weekday::Sat);
    }

    #[test]
    fn test_quality_respects_preferences() {
        let structure =
            WeeklyStructure::assign(6, Weekday::Sun, &[Weekday::Tue, Weekday::Thu], &[], 2);
        assert_eq!(structure.slot(Weekday::Tue), DaySlot::Quality);
        assert_eq!(structure.slot(Weekday::Thu), DaySlot::Quality);
    }

    #[test]
    fn test_quality_never_adjacent_to_long_run() {
        // Saturday long run: Friday and Sunday are off-limits for quality
        let structure = WeeklyStructure::assign(
            6,
            Weekday::Sat,
            &[Weekday::Fri, Weekday::Tue],
            &[],
            2,
        );
        assert_ne!(structure.slot(Weekday::Fri), DaySlot::Quality);
        assert_ne!(structure.slot(Weekday::Sun), DaySlot::Quality);
        assert_eq!(structure.slot(Weekday::Tue), DaySlot::Quality);
    }

    #[test]
    fn test_quality_days_never_adjacent_to_each_other() {
        let structure = WeeklyStructure::assign(
            6,
            Weekday::Sun,
            &[Weekday::Tue, Weekday::Wed, Weekday::Thu],
            &[],
            3,
        );
        let quality = structure.quality_days();
        for a in &quality {
            for b in &quality {
                if a != b {
                    assert!(!adjacent(*a, *b), "adjacent quality days {a} and {b}");
                }
            }
        }
    }

    #[test]
    fn test_rest_days_stay_free() {
        let structure = WeeklyStructure::assign(
            4,
            Weekday::Sun,
            &[Weekday::Mon],
            &[Weekday::Mon, Weekday::Fri],
            1,
        );
        assert_eq!(structure.slot(Weekday::Mon), DaySlot::Rest);
        assert_eq!(structure.slot(Weekday::Fri), DaySlot::Rest);
        assert_eq!(structure.run_days(), 4);
    }

    #[test]
    fn test_run_count_matches_request() {
        for runs in 3..=7 {
            let structure =
                WeeklyStructure::assign(runs, Weekday::Sun, &[Weekday::Tue], &[], 2);
            assert!(structure.run_days() <= runs as usize);
            assert!(structure.run_days() >= 3.min(runs as usize));
        }
    }

    #[test]
    fn test_base_alternates_fartlek_and_hills() {
        assert_eq!(
            WorkoutSelector::workout_type_for_phase(Phase::Base, 0, 42_195.0, 1),
            QualityKind::Fartlek
        );
        assert_eq!(
            WorkoutSelector::workout_type_for_phase(Phase::Base, 1, 42_195.0, 1),
            QualityKind::HillRepeats
        );
        assert_eq!(
            WorkoutSelector::workout_type_for_phase(Phase::Base, 0, 42_195.0, 2),
            QualityKind::Strides
        );
    }

    #[test]
    fn test_build_cadence_cycles_to_vo2max() {
        let kinds: Vec<QualityKind> = (0..6)
            .map(|w| WorkoutSelector::workout_type_for_phase(Phase::Build, w, 10_000.0, 1))
            .collect();
        assert_eq!(kinds[0], QualityKind::Tempo);
        assert_eq!(kinds[1], QualityKind::Threshold);
        assert_eq!(kinds[2], QualityKind::Vo2max);
        assert_eq!(kinds[5], QualityKind::Vo2max);
    }

    #[test]
    fn test_peak_is_race_specific() {
        assert_eq!(
            WorkoutSelector::workout_type_for_phase(Phase::Peak, 0, 42_195.0, 1),
            QualityKind::RacePace
        );
        assert_eq!(
            WorkoutSelector::workout_type_for_phase(Phase::Peak, 0, 5_000.0, 1),
            QualityKind::Vo2max
        );
    }

    #[test]
    fn test_taper_stays_light() {
        assert_eq!(
            WorkoutSelector::workout_type_for_phase(Phase::Taper, 0, 42_195.0, 1),
            QualityKind::Tempo
        );
        assert_eq!(
            WorkoutSelector::workout_type_for_phase(Phase::Taper, 0, 42_195.0, 2),
            QualityKind::Strides
        );
    }

    #[test]
    fn test_comfort_substitution_table() {
        let mut athlete = profile();
        athlete.comfort = Some(ComfortRatings {
            vo2max: 2,
            tempo: 2,
            hills: 2,
        });
        assert_eq!(
            WorkoutSelector::effective_quality(QualityKind::Vo2max, &athlete, 4),
            QualityKind::Fartlek
        );
        assert_eq!(
            WorkoutSelector::effective_quality(QualityKind::Tempo, &athlete, 4),
            QualityKind::Progression
        );
        assert_eq!(
            WorkoutSelector::effective_quality(QualityKind::HillRepeats, &athlete, 4),
            QualityKind::Strides
        );
        // Comfortable sessions pass through untouched
        assert_eq!(
            WorkoutSelector::effective_quality(QualityKind::Threshold, &athlete, 4),
            QualityKind::Threshold
        );
    }

    #[test]
    fn test_experience_delays_vo2max() {
        let mut athlete = profile();
        athlete.experience = Some(ExperienceProfile {
            years_running: 1,
            has_speedwork_background: false,
            peak_weekly_miles: None,
        });
        assert_eq!(
            WorkoutSelector::effective_quality(QualityKind::Vo2max, &athlete, 0),
            QualityKind::Threshold
        );
        // Later in the phase the session goes ahead
        assert_eq!(
            WorkoutSelector::effective_quality(QualityKind::Vo2max, &athlete, 3),
            QualityKind::Vo2max
        );
    }

    #[test]
    fn test_alternatives_exist_for_key_sessions() {
        assert!(!WorkoutSelector::alternatives(
            WorkoutCategory::Quality,
            Some(QualityKind::Vo2max)
        )
        .is_empty());
        assert!(!WorkoutSelector::alternatives(WorkoutCategory::Long, None).is_empty());
        assert!(WorkoutSelector::alternatives(WorkoutCategory::Race, None).is_empty());
    }
}
