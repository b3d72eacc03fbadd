use proptest::prelude::*;

use coachrs::periodization::Periodizer;
use coachrs::vdot::VdotCalculator;
use coachrs::zones::PaceLadder;

/// Property tests for the numeric laws the fitness model guarantees

proptest! {
    /// For a fixed distance, a faster time never lowers the score
    #[test]
    fn score_monotone_in_time(
        distance in 1_500.0_f64..50_000.0,
        time in 300.0_f64..18_000.0,
        delta in 1.0_f64..600.0,
    ) {
        let slower = VdotCalculator::score_from_result(distance, time + delta).unwrap();
        let faster = VdotCalculator::score_from_result(distance, time).unwrap();
        prop_assert!(faster >= slower);
    }

    /// Scores always land inside the clamped range, rounded to one decimal
    #[test]
    fn score_always_in_range(
        distance in 800.0_f64..100_000.0,
        time in 60.0_f64..50_000.0,
    ) {
        let score = VdotCalculator::score_from_result(distance, time).unwrap();
        prop_assert!((15.0..=85.0).contains(&score));
        prop_assert_eq!(score, (score * 10.0).round() / 10.0);
    }

    /// predict_time inverts score_from_result to within 1.0
    #[test]
    fn predict_round_trip(
        score in 20.0_f64..80.0,
        distance in prop::sample::select(vec![1_609.0, 5_000.0, 10_000.0, 21_097.5, 42_195.0]),
    ) {
        let time = VdotCalculator::predict_time(score, distance).unwrap();
        let recovered = VdotCalculator::score_from_result(distance, time).unwrap();
        prop_assert!(
            (recovered - score).abs() <= 1.0,
            "{} -> {} at {}m", score, recovered, distance
        );
    }

    /// The ten-zone ladder is strictly ordered for every valid score
    #[test]
    fn ladder_strictly_ordered(vdot in 15.0_f64..85.0) {
        let ladder = PaceLadder::from_vdot(vdot).unwrap();
        let paces = ladder.ordered();
        for pair in paces.windows(2) {
            prop_assert!(pair[0].1 > pair[1].1, "collision at vdot {}: {:?}", vdot, paces);
        }
    }

    /// Weather penalty is monotone non-decreasing in temperature above the
    /// sweet spot, for any humidity
    #[test]
    fn weather_monotone_in_heat(
        temp in 45.0_f64..110.0,
        bump in 0.5_f64..20.0,
        humidity in 0.0_f64..100.0,
    ) {
        let cooler = VdotCalculator::weather_pace_adjustment(temp, humidity, None);
        let hotter = VdotCalculator::weather_pace_adjustment(temp + bump, humidity, None);
        prop_assert!(hotter >= cooler);
    }

    /// Elevation correction is linear in gain and never negative
    #[test]
    fn elevation_correction_sane(
        gain in -500.0_f64..5_000.0,
        distance in 0.5_f64..30.0,
    ) {
        let correction = VdotCalculator::elevation_pace_correction(gain, distance);
        prop_assert!(correction >= 0.0);
        if gain > 0.0 {
            let doubled = VdotCalculator::elevation_pace_correction(gain * 2.0, distance);
            prop_assert!((doubled - correction * 2.0).abs() < 1e-9);
        }
    }

    /// Phase week allocation always sums exactly and respects the clamps
    #[test]
    fn phase_weeks_always_sum(
        total in 4u32..30,
        distance in prop::sample::select(vec![5_000.0, 10_000.0, 21_097.5, 42_195.0]),
    ) {
        let split = Periodizer::phase_split(distance);
        let weeks = Periodizer::phase_weeks(&split, total, distance);
        prop_assert_eq!(weeks.total(), total);
        prop_assert!(weeks.base >= 1);
        prop_assert!(weeks.taper >= 1);
        prop_assert!(weeks.taper <= 3);
    }
}
