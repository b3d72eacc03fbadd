use chrono::{NaiveDate, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use coachrs::models::{
    AthleteProfile, Aggressiveness, CompletedWorkout, IntermediateRace, PaceSettings, PlanRequest,
    RacePriority, SegmentKind, WorkoutCategory, WorkoutSegment,
};
use coachrs::plan::PlanGenerator;
use coachrs::scoring::ExecutionScorer;
use coachrs::trend::{TrendAnalyzer, FormState};
use coachrs::vdot::VdotCalculator;
use coachrs::zones::{PaceLadder, PaceZone};

/// End-to-end workflows across the whole engine

fn athlete() -> AthleteProfile {
    AthleteProfile {
        current_weekly_miles: dec!(32),
        target_peak_miles: dec!(52),
        current_runs_per_week: 5,
        target_runs_per_week: 6,
        long_run_day: Weekday::Sun,
        preferred_hard_days: vec![Weekday::Tue, Weekday::Thu],
        rest_days: vec![Weekday::Mon],
        aggressiveness: Aggressiveness::Moderate,
        quality_sessions_per_week: 2,
        current_long_run_miles: dec!(11),
        comfort: None,
        experience: None,
        availability: None,
        injury_history: Vec::new(),
    }
}

fn marathon_request() -> PlanRequest {
    PlanRequest {
        race_date: NaiveDate::from_ymd_opt(2026, 10, 11).unwrap(),
        race_distance_meters: 42_195.0,
        start_date: NaiveDate::from_ymd_opt(2026, 6, 22).unwrap(),
        profile: athlete(),
        vdot: Some(49.8),
        intermediate_races: Vec::new(),
    }
}

#[test]
fn marathon_plan_satisfies_structural_invariants() {
    let request = marathon_request();
    let plan = PlanGenerator::generate(&request).unwrap();

    // Phase weeks sum exactly to the plan length
    assert_eq!(plan.total_weeks, 16);
    let phase_sum: u32 = plan.phases.iter().map(|p| p.weeks).sum();
    assert_eq!(phase_sum, plan.total_weeks);

    // Exactly one race workout, pinned to the goal date
    let races: Vec<_> = plan
        .weeks
        .iter()
        .flat_map(|w| w.workouts.iter())
        .filter(|w| w.category == WorkoutCategory::Race)
        .collect();
    assert_eq!(races.len(), 1);
    assert_eq!(races[0].date, request.race_date);

    // Key workouts never land on adjacent days
    let key_dates: Vec<NaiveDate> = plan
        .weeks
        .iter()
        .flat_map(|w| w.workouts.iter())
        .filter(|w| w.is_key_workout)
        .map(|w| w.date)
        .collect();
    for pair in key_dates.windows(2) {
        assert!((pair[1] - pair[0]).num_days() >= 2);
    }

    // At most one long run per week
    for week in &plan.weeks {
        assert!(
            week.workouts
                .iter()
                .filter(|w| w.category == WorkoutCategory::Long)
                .count()
                <= 1
        );
    }
}

#[test]
fn plan_with_b_race_still_pins_goal_race() {
    let mut request = marathon_request();
    request.intermediate_races = vec![IntermediateRace {
        date: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
        distance_meters: 21_097.5,
        priority: RacePriority::B,
    }];
    let plan = PlanGenerator::generate(&request).unwrap();

    let goal_races: Vec<_> = plan
        .weeks
        .iter()
        .flat_map(|w| w.workouts.iter())
        .filter(|w| w.category == WorkoutCategory::Race && w.date == request.race_date)
        .collect();
    assert_eq!(goal_races.len(), 1);

    // The B race exists, with easy days going in and a recovery day after
    let b_date = request.intermediate_races[0].date;
    let around: Vec<_> = plan
        .weeks
        .iter()
        .flat_map(|w| w.workouts.iter())
        .filter(|w| (w.date - b_date).num_days().abs() <= 2)
        .collect();
    assert!(around.iter().any(|w| w.date == b_date && w.category == WorkoutCategory::Race));
    for workout in around {
        if workout.date < b_date {
            assert!(!workout.is_key_workout, "hard work inside the mini-taper");
        }
    }
}

#[test]
fn too_short_runway_is_a_distinct_error() {
    let mut request = marathon_request();
    request.start_date = request.race_date - chrono::Duration::days(20);
    let err = PlanGenerator::generate(&request).unwrap_err();
    let coach_err = coachrs::CoachError::from(err);
    assert!(coach_err.is_fatal());
    assert!(coach_err.user_message().contains("at least 4"));
}

#[test]
fn planned_paces_come_from_the_fitness_score() {
    let request = marathon_request();
    let plan = PlanGenerator::generate(&request).unwrap();
    let ladder = PaceLadder::from_vdot(49.8).unwrap();

    let easy_paces: Vec<u32> = plan
        .weeks
        .iter()
        .flat_map(|w| w.workouts.iter())
        .filter(|w| w.category == WorkoutCategory::Easy)
        .filter_map(|w| w.target_pace_seconds)
        .collect();
    assert!(!easy_paces.is_empty());
    assert!(easy_paces.iter().all(|p| *p == ladder.easy));
}

#[test]
fn scoring_a_planned_workout_end_to_end() {
    let plan = PlanGenerator::generate(&marathon_request()).unwrap();
    let tempo = plan
        .weeks
        .iter()
        .flat_map(|w| w.workouts.iter())
        .find(|w| w.category == WorkoutCategory::Quality && w.target_pace_seconds.is_some())
        .expect("plan contains quality work");

    let pace = tempo.target_pace_seconds.unwrap();
    let miles = tempo.distance_miles.to_f64().unwrap();
    let actual = CompletedWorkout {
        date: tempo.date,
        distance_miles: miles,
        duration_seconds: (miles * f64::from(pace)) as u32,
        avg_pace_seconds: pace,
        segments: vec![
            WorkoutSegment {
                kind: SegmentKind::Work,
                distance_miles: miles / 2.0,
                duration_seconds: (miles / 2.0 * f64::from(pace)) as u32,
                pace_seconds: pace,
                heart_rate: Some(168),
            },
            WorkoutSegment {
                kind: SegmentKind::Work,
                distance_miles: miles / 2.0,
                duration_seconds: (miles / 2.0 * f64::from(pace + 4)) as u32,
                pace_seconds: pace + 4,
                heart_rate: Some(171),
            },
        ],
    };

    let ladder = PaceLadder::from_vdot(49.8).unwrap();
    let paces = PaceSettings {
        easy_pace_seconds: ladder.easy,
        tempo_pace_seconds: ladder.tempo,
        threshold_pace_seconds: ladder.threshold,
    };
    let score = ExecutionScorer::new()
        .score(tempo, &actual, None, Some(&paces))
        .unwrap();

    assert!(score.overall >= 90, "faithful execution scored {}", score.overall);
    assert!(score.concerns.is_empty());
}

#[test]
fn trend_pipeline_from_completed_workouts() {
    let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    let analyzer = TrendAnalyzer::new();

    // Six weeks of five easy runs per week
    let mut workouts = Vec::new();
    for week in 0..6 {
        for day in [0, 1, 3, 4, 5] {
            let date = start + chrono::Duration::days(week * 7 + day);
            workouts.push((
                WorkoutCategory::Easy,
                CompletedWorkout {
                    date,
                    distance_miles: 6.0,
                    duration_seconds: 3300,
                    avg_pace_seconds: 550,
                    segments: Vec::new(),
                },
            ));
        }
    }

    let daily = TrendAnalyzer::aggregate_daily_load(&workouts);
    let series: Vec<(NaiveDate, Decimal)> = daily.into_iter().collect();
    let points = analyzer.compute_series(&series).unwrap();

    // Rest days were zero-filled into the walk
    assert_eq!(points.len() as i64, (points.last().unwrap().date - start).num_days() + 1);
    let zero_days = points.iter().filter(|p| p.load == Decimal::ZERO).count();
    assert!(zero_days >= 10);

    let last = points.last().unwrap();
    assert!(last.chronic > Decimal::ZERO);
    // Still absorbing the training: fatigue leads fitness
    assert!(matches!(
        FormState::from_form(last.form),
        FormState::Neutral | FormState::Fatigued
    ));

    let ramp = analyzer.ramp_rate(&points).unwrap();
    assert!(ramp.rate > Decimal::ZERO);
}

#[test]
fn adjusted_score_feeds_a_usable_ladder() {
    // A hot, hilly 10K should yield a slightly better score, and the ladder
    // derived from it must stay strictly ordered
    let weather = coachrs::models::WeatherSnapshot {
        temperature_f: 84.0,
        humidity_pct: 65.0,
        dew_point_f: Some(64.0),
    };
    let raw = VdotCalculator::score_from_result(10_000.0, 2_760.0).unwrap();
    let adjusted =
        VdotCalculator::adjusted_score(10_000.0, 2_760.0, Some(&weather), Some(350.0)).unwrap();
    assert!(adjusted > raw);

    let ladder = PaceLadder::from_vdot(adjusted).unwrap();
    let ordered = ladder.ordered();
    for pair in ordered.windows(2) {
        assert!(pair[0].1 > pair[1].1);
    }
    assert_eq!(ordered[0].0, PaceZone::Recovery);
    assert_eq!(ordered[9].0, PaceZone::Repetition);
}
