//! Training pace zones derived from the fitness score
//!
//! Ten named intensities, each evaluated at a fixed fraction of maximal
//! aerobic power and converted to a per-mile pace. The ladder is strictly
//! ordered slow to fast and is always derived from the score on demand; it is
//! never stored independently, so it cannot go stale.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::vdot::VdotCalculator;

/// Named training intensities, ordered slow to fast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaceZone {
    Recovery,
    Easy,
    GeneralAerobic,
    Marathon,
    HalfMarathon,
    Tempo,
    Threshold,
    Vo2max,
    Interval,
    Repetition,
}

impl PaceZone {
    /// All zones in ladder order, slow to fast
    pub const ORDERED: [PaceZone; 10] = [
        PaceZone::Recovery,
        PaceZone::Easy,
        PaceZone::GeneralAerobic,
        PaceZone::Marathon,
        PaceZone::HalfMarathon,
        PaceZone::Tempo,
        PaceZone::Threshold,
        PaceZone::Vo2max,
        PaceZone::Interval,
        PaceZone::Repetition,
    ];

    /// Fraction of maximal aerobic power this zone targets
    pub fn power_fraction(&self) -> f64 {
        match self {
            PaceZone::Recovery => 0.55,
            PaceZone::Easy => 0.62,
            PaceZone::GeneralAerobic => 0.66,
            PaceZone::Marathon => 0.75,
            PaceZone::HalfMarathon => 0.80,
            PaceZone::Tempo => 0.84,
            PaceZone::Threshold => 0.88,
            PaceZone::Vo2max => 0.95,
            PaceZone::Interval => 1.00,
            PaceZone::Repetition => 1.05,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaceZone::Recovery => "recovery",
            PaceZone::Easy => "easy",
            PaceZone::GeneralAerobic => "general aerobic",
            PaceZone::Marathon => "marathon",
            PaceZone::HalfMarathon => "half marathon",
            PaceZone::Tempo => "tempo",
            PaceZone::Threshold => "threshold",
            PaceZone::Vo2max => "VO2max",
            PaceZone::Interval => "interval",
            PaceZone::Repetition => "repetition",
        }
    }

    /// What this zone is for, in coaching terms
    pub fn purpose(&self) -> &'static str {
        match self {
            PaceZone::Recovery => "Active recovery between hard days",
            PaceZone::Easy => "Conversational aerobic running",
            PaceZone::GeneralAerobic => "Steady aerobic volume",
            PaceZone::Marathon => "Goal marathon rhythm",
            PaceZone::HalfMarathon => "Sustained half-marathon effort",
            PaceZone::Tempo => "Comfortably hard sustained running",
            PaceZone::Threshold => "Lactate threshold development",
            PaceZone::Vo2max => "Maximal aerobic power intervals",
            PaceZone::Interval => "Hard intervals at full aerobic power",
            PaceZone::Repetition => "Short fast reps for economy and speed",
        }
    }
}

/// Full ten-zone pace ladder, paces in seconds per mile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceLadder {
    /// Fitness score the ladder was derived from
    pub vdot: f64,
    pub recovery: u32,
    pub easy: u32,
    pub general_aerobic: u32,
    pub marathon: u32,
    pub half_marathon: u32,
    pub tempo: u32,
    pub threshold: u32,
    pub vo2max: u32,
    pub interval: u32,
    pub repetition: u32,
}

impl PaceLadder {
    /// Derive the ladder from a fitness score
    pub fn from_vdot(vdot: f64) -> Result<Self, ModelError> {
        if !(1.0..=120.0).contains(&vdot) {
            return Err(ModelError::ScoreOutOfRange { score: vdot });
        }

        let pace = |zone: PaceZone| -> u32 {
            let velocity = VdotCalculator::velocity_at_power(vdot * zone.power_fraction());
            VdotCalculator::velocity_to_pace(velocity).round() as u32
        };

        Ok(Self {
            vdot,
            recovery: pace(PaceZone::Recovery),
            easy: pace(PaceZone::Easy),
            general_aerobic: pace(PaceZone::GeneralAerobic),
            marathon: pace(PaceZone::Marathon),
            half_marathon: pace(PaceZone::HalfMarathon),
            tempo: pace(PaceZone::Tempo),
            threshold: pace(PaceZone::Threshold),
            vo2max: pace(PaceZone::Vo2max),
            interval: pace(PaceZone::Interval),
            repetition: pace(PaceZone::Repetition),
        })
    }

    /// Pace for a zone, seconds per mile
    pub fn pace(&self, zone: PaceZone) -> u32 {
        match zone {
            PaceZone::Recovery => self.recovery,
            PaceZone::Easy => self.easy,
            PaceZone::GeneralAerobic => self.general_aerobic,
            PaceZone::Marathon => self.marathon,
            PaceZone::HalfMarathon => self.half_marathon,
            PaceZone::Tempo => self.tempo,
            PaceZone::Threshold => self.threshold,
            PaceZone::Vo2max => self.vo2max,
            PaceZone::Interval => self.interval,
            PaceZone::Repetition => self.repetition,
        }
    }

    /// Ladder in order, slow to fast
    pub fn ordered(&self) -> [(PaceZone, u32); 10] {
        PaceZone::ORDERED.map(|zone| (zone, self.pace(zone)))
    }

    /// Which zone an observed pace falls into.
    ///
    /// A pace slower than recovery classifies as Recovery; otherwise the
    /// slowest zone whose pace the observation has reached.
    pub fn classify(&self, pace_seconds: u32) -> PaceZone {
        let mut current = PaceZone::Recovery;
        for (zone, zone_pace) in self.ordered() {
            if pace_seconds <= zone_pace {
                current = zone;
            }
        }
        current
    }
}
