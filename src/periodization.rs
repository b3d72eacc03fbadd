//! Phase structure and weekly volume rules
//!
//! Pure rule tables for macro-periodization: how a plan's weeks divide into
//! base/build/peak/taper for a given race distance, and how weekly mileage
//! progresses through those phases. All tables are explicit and immutable so
//! each band can be audited and tested on its own.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{Aggressiveness, Phase};

/// Distance thresholds separating the periodization bands, in meters
const MARATHON_CLASS: f64 = 40_000.0;
const HALF_CLASS: f64 = 20_000.0;
const TEN_K_CLASS: f64 = 10_000.0;

/// Phase length distribution as fractions of the total plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSplit {
    pub base: f64,
    pub build: f64,
    pub peak: f64,
    pub taper: f64,
}

/// Integer week allocation per phase; always sums to the requested total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseWeeks {
    pub base: u32,
    pub build: u32,
    pub peak: u32,
    pub taper: u32,
}

impl PhaseWeeks {
    pub fn total(&self) -> u32 {
        self.base + self.build + self.peak + self.taper
    }

    /// Phase and 0-based week-within-phase for a 0-based plan week.
    /// Phases only ever advance; a later week is never in an earlier phase.
    pub fn phase_for_week(&self, week: u32) -> (Phase, u32) {
        if week < self.base {
            (Phase::Base, week)
        } else if week < self.base + self.build {
            (Phase::Build, week - self.base)
        } else if week < self.base + self.build + self.peak {
            (Phase::Peak, week - self.base - self.build)
        } else {
            (Phase::Taper, week - self.base - self.build - self.peak)
        }
    }
}

/// One week's volume target with its down-week marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekVolume {
    pub miles: Decimal,
    pub is_down_week: bool,
}

/// Periodization rule tables
pub struct Periodizer;

impl Periodizer {
    /// Phase length distribution by race-distance band.
    ///
    /// Longer races shift weeks toward base building and taper; shorter races
    /// spend proportionally more of the plan on build and peak work.
    pub fn phase_split(race_distance_meters: f64) -> PhaseSplit {
        if race_distance_meters >= MARATHON_CLASS {
            PhaseSplit {
                base: 0.40,
                build: 0.30,
                peak: 0.15,
                taper: 0.15,
            }
        } else if race_distance_meters >= HALF_CLASS {
            PhaseSplit {
                base: 0.35,
                build: 0.30,
                peak: 0.20,
                taper: 0.15,
            }
        } else if race_distance_meters >= TEN_K_CLASS {
            PhaseSplit {
                base: 0.30,
                build: 0.35,
                peak: 0.25,
                taper: 0.10,
            }
        } else {
            PhaseSplit {
                base: 0.25,
                build: 0.35,
                peak: 0.30,
                taper: 0.10,
            }
        }
    }

    /// Allocate integer weeks to each phase.
    ///
    /// Taper is floored at 1 and capped by race class (3 marathon, 2 half,
    /// 2 shorter); peak is clamped to [2, 4]; build takes its proportional
    /// share of the remainder and base absorbs the rest, floored at 1. The
    /// four allocations always sum exactly to `total_weeks`.
    pub fn phase_weeks(
        split: &PhaseSplit,
        total_weeks: u32,
        race_distance_meters: f64,
    ) -> PhaseWeeks {
        let taper_cap = if race_distance_meters >= MARATHON_CLASS {
            3
        } else {
            2
        };
        let taper = ((total_weeks as f64 * split.taper).round() as u32).clamp(1, taper_cap);

        let peak_raw = (total_weeks as f64 * split.peak).round() as u32;
        let mut peak = peak_raw.clamp(2, 4);
        // A very short plan cannot afford the full peak clamp
        if taper + peak + 1 > total_weeks {
            peak = total_weeks.saturating_sub(taper + 1).max(1);
        }

        let remaining = total_weeks - taper - peak;
        let build_share = split.build / (split.base + split.build);
        let mut build = (remaining as f64 * build_share).round() as u32;
        let mut base = remaining.saturating_sub(build);
        if base < 1 && remaining >= 1 {
            base = 1;
            build = remaining - 1;
        }

        PhaseWeeks {
            base,
            build,
            peak,
            taper,
        }
    }

    /// Taper volume factors relative to peak mileage, race week last
    pub fn taper_schedule(taper_weeks: u32) -> Vec<Decimal> {
        match taper_weeks {
            0 => Vec::new(),
            1 => vec![dec!(0.50)],
            2 => vec![dec!(0.75), dec!(0.50)],
            3 => vec![dec!(0.80), dec!(0.65), dec!(0.50)],
            4 => vec![dec!(0.85), dec!(0.75), dec!(0.60), dec!(0.50)],
            n => (0..n)
                .map(|i| {
                    let fraction = 0.90 - 0.40 * (i as f64) / ((n - 1) as f64);
                    Decimal::from_f64(fraction).unwrap_or(dec!(0.50)).round_dp(2)
                })
                .collect(),
        }
    }

    /// Weekly growth rate during base, by ramp aggressiveness
    fn base_growth(aggressiveness: Aggressiveness) -> Decimal {
        match aggressiveness {
            Aggressiveness::Conservative => dec!(1.08),
            Aggressiveness::Moderate => dec!(1.10),
            Aggressiveness::Aggressive => dec!(1.12),
        }
    }

    /// Down weeks recur on this cadence within base/build/peak
    fn down_week_cadence(aggressiveness: Aggressiveness) -> u32 {
        match aggressiveness {
            Aggressiveness::Conservative => 3,
            _ => 4,
        }
    }

    /// Volume reduction applied on a down week
    fn down_week_reduction(aggressiveness: Aggressiveness) -> Decimal {
        match aggressiveness {
            Aggressiveness::Conservative => dec!(0.30),
            Aggressiveness::Moderate => dec!(0.25),
            Aggressiveness::Aggressive => dec!(0.20),
        }
    }

    /// Weekly mileage targets across the whole plan.
    ///
    /// Base grows geometrically from the starting volume, capped at 85% of
    /// peak; build interpolates linearly from the end of base to 95% of peak;
    /// peak holds; taper follows the fixed reduction schedule. Down weeks are
    /// applied on top within base/build/peak, skipping the final peak week.
    pub fn mileage_progression(
        start_miles: Decimal,
        peak_miles: Decimal,
        weeks: &PhaseWeeks,
        aggressiveness: Aggressiveness,
    ) -> Vec<WeekVolume> {
        let total = weeks.total();
        let mut volumes = Vec::with_capacity(total as usize);

        let growth = Self::base_growth(aggressiveness);
        let base_cap = peak_miles * dec!(0.85);
        let build_target = peak_miles * dec!(0.95);

        let mut current = start_miles.min(base_cap);
        for week in 0..weeks.base {
            if week > 0 {
                current = (current * growth).min(base_cap);
            }
            volumes.push(current);
        }
        let base_end = volumes.last().copied().unwrap_or(start_miles);

        for week in 0..weeks.build {
            let step = Decimal::from(week + 1) / Decimal::from(weeks.build);
            volumes.push(base_end + (build_target - base_end) * step);
        }

        for _ in 0..weeks.peak {
            volumes.push(peak_miles);
        }

        for factor in Self::taper_schedule(weeks.taper) {
            volumes.push(peak_miles * factor);
        }

        let cadence = Self::down_week_cadence(aggressiveness);
        let reduction = Decimal::ONE - Self::down_week_reduction(aggressiveness);
        let pre_taper_weeks = weeks.base + weeks.build + weeks.peak;

        volumes
            .into_iter()
            .enumerate()
            .map(|(index, miles)| {
                let week_number = index as u32 + 1;
                let in_loading_phases = week_number <= pre_taper_weeks;
                let is_final_peak_week = week_number == pre_taper_weeks;
                let is_down_week = in_loading_phases
                    && !is_final_peak_week
                    && week_number % cadence == 0;

                let miles = if is_down_week {
                    (miles * reduction).round_dp(1)
                } else {
                    miles.round_dp(1)
                };
                WeekVolume {
                    miles,
                    is_down_week,
                }
            })
            .collect()
    }

    /// Long-run cap for the race distance band, in miles
    pub fn long_run_cap(race_distance_meters: f64) -> Decimal {
        if race_distance_meters >= MARATHON_CLASS {
            dec!(22)
        } else if race_distance_meters >= HALF_CLASS {
            dec!(16)
        } else {
            dec!(12)
        }
    }

    /// Long-run share of the weekly target for a phase
    pub fn long_run_fraction(phase: Phase) -> Decimal {
        match phase {
            Phase::Taper => dec!(0.25),
            _ => dec!(0.30),
        }
    }
}
