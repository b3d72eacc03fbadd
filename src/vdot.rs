//! Fitness score (VDOT) model
//!
//! Converts a race performance into a single aerobic-fitness score, inverts
//! the score back into predicted race times, and corrects raw times for
//! weather and elevation before scoring. The model pairs a quadratic
//! oxygen-cost-of-velocity fit with a two-term decaying-exponential estimate
//! of the fraction of maximal aerobic power sustainable for a given duration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ModelError;
use crate::models::WeatherSnapshot;

/// Valid fitness score range; results outside are clamped, not rejected
pub const VDOT_MIN: f64 = 15.0;
pub const VDOT_MAX: f64 = 85.0;

/// Meters per mile, used to convert velocities to per-mile paces
pub const METERS_PER_MILE: f64 = 1609.344;

const DROP_A: f64 = 0.8;
const DROP_B: f64 = 0.189_439_3;
const DROP_B_RATE: f64 = -0.012_778;
const DROP_C: f64 = 0.298_955_8;
const DROP_C_RATE: f64 = -0.193_260_5;

const COST_CONST: f64 = -4.60;
const COST_LINEAR: f64 = 0.182_258;
const COST_QUAD: f64 = 0.000_104;

/// Maximum iterations and convergence tolerance for time prediction.
/// The model has no closed-form inverse; both bounds are part of the contract.
const PREDICT_MAX_ITERATIONS: u32 = 10;
const PREDICT_TOLERANCE: f64 = 0.1;

/// Weather correction thresholds and slopes, reference scale Fahrenheit.
/// Held in one frozen config rather than scattered literals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherModel {
    /// No adjustment inside [sweet_spot_low, sweet_spot_high]
    pub sweet_spot_low: f64,
    pub sweet_spot_high: f64,
    /// Seconds per mile per degree below the sweet spot
    pub cold_slope: f64,
    /// First heat band upper bound and slope
    pub warm_limit: f64,
    pub warm_slope: f64,
    /// Second heat band upper bound and slope
    pub hot_limit: f64,
    pub hot_slope: f64,
    /// Slope above hot_limit
    pub extreme_slope: f64,
    /// Humidity surcharge applies only above this temperature
    pub humidity_active_above: f64,
    /// Humidity percentage where the surcharge starts
    pub humidity_floor: f64,
    /// Seconds per mile per percentage point over the floor
    pub humidity_slope: f64,
    /// Dew point where the surcharge starts
    pub dew_point_floor: f64,
    /// Seconds per mile per degree of dew point over the floor
    pub dew_point_slope: f64,
}

impl Default for WeatherModel {
    fn default() -> Self {
        Self {
            sweet_spot_low: 35.0,
            sweet_spot_high: 45.0,
            cold_slope: 0.2,
            warm_limit: 60.0,
            warm_slope: 0.25,
            hot_limit: 75.0,
            hot_slope: 0.75,
            extreme_slope: 1.5,
            humidity_active_above: 60.0,
            humidity_floor: 40.0,
            humidity_slope: 0.15,
            dew_point_floor: 60.0,
            dew_point_slope: 0.5,
        }
    }
}

/// Fitness model calculator
pub struct VdotCalculator;

impl VdotCalculator {
    /// Compute a fitness score from one race performance.
    ///
    /// Velocity in m/min feeds the quadratic aerobic-power fit; the duration
    /// feeds the sustainable-fraction estimate; their ratio is the score,
    /// clamped to [15, 85] and rounded to one decimal.
    ///
    /// Monotonic guarantee: for a fixed distance, a strictly faster time never
    /// produces a lower score.
    pub fn score_from_result(distance_meters: f64, time_seconds: f64) -> Result<f64, ModelError> {
        if distance_meters <= 0.0 {
            return Err(ModelError::InvalidResult {
                field: "distance",
                value: distance_meters,
            });
        }
        if time_seconds <= 0.0 {
            return Err(ModelError::InvalidResult {
                field: "time",
                value: time_seconds,
            });
        }

        let minutes = time_seconds / 60.0;
        let velocity = distance_meters / minutes;
        let fraction = Self::sustainable_fraction(minutes);
        let aerobic_power = Self::oxygen_cost(velocity);

        let raw = aerobic_power / fraction;
        let clamped = raw.clamp(VDOT_MIN, VDOT_MAX);
        if raw != clamped {
            debug!(raw, clamped, "fitness score clamped");
        }

        Ok((clamped * 10.0).round() / 10.0)
    }

    /// Predict a race time in seconds for a given score and distance.
    ///
    /// Seeds with the closed-form velocity at 100% of aerobic power, then
    /// refines the sustainable fraction by fixed-point iteration until the
    /// recovered score is within 0.1 of the target, bounded at 10 rounds.
    /// Round-trips through `score_from_result` to within 1.0.
    pub fn predict_time(score: f64, distance_meters: f64) -> Result<f64, ModelError> {
        if distance_meters <= 0.0 {
            return Err(ModelError::InvalidResult {
                field: "distance",
                value: distance_meters,
            });
        }
        let score = score.clamp(VDOT_MIN, VDOT_MAX);

        let mut minutes = distance_meters / Self::velocity_at_power(score);
        for _ in 0..PREDICT_MAX_ITERATIONS {
            let fraction = Self::sustainable_fraction(minutes);
            let velocity = Self::velocity_at_power(score * fraction);
            minutes = distance_meters / velocity;

            let recovered = Self::score_from_result(distance_meters, minutes * 60.0)?;
            if (recovered - score).abs() <= PREDICT_TOLERANCE {
                break;
            }
        }

        Ok(minutes * 60.0)
    }

    /// Predicted times for the standard race distances, in seconds
    pub fn race_predictions(score: f64) -> Result<RacePredictions, ModelError> {
        Ok(RacePredictions {
            time_5k: Self::predict_time(score, 5_000.0)?,
            time_10k: Self::predict_time(score, 10_000.0)?,
            time_half_marathon: Self::predict_time(score, 21_097.5)?,
            time_marathon: Self::predict_time(score, 42_195.0)?,
        })
    }

    /// Pace slowdown from weather, in whole seconds per mile.
    ///
    /// Zero inside the 35-45°F band; a small linear cold penalty below it; an
    /// escalating piecewise-linear heat penalty above it. Humidity adds on
    /// only once the temperature clears 60°F, and dew point adds on above
    /// 60°F. Monotonically non-decreasing in temperature above the band.
    pub fn weather_pace_adjustment(
        temperature_f: f64,
        humidity_pct: f64,
        dew_point_f: Option<f64>,
    ) -> i32 {
        Self::weather_pace_adjustment_with(
            &WeatherModel::default(),
            temperature_f,
            humidity_pct,
            dew_point_f,
        )
    }

    pub fn weather_pace_adjustment_with(
        model: &WeatherModel,
        temperature_f: f64,
        humidity_pct: f64,
        dew_point_f: Option<f64>,
    ) -> i32 {
        let mut penalty = 0.0;

        if temperature_f < model.sweet_spot_low {
            penalty += (model.sweet_spot_low - temperature_f) * model.cold_slope;
        } else if temperature_f > model.sweet_spot_high {
            let warm = temperature_f.min(model.warm_limit);
            penalty += (warm - model.sweet_spot_high) * model.warm_slope;

            if temperature_f > model.warm_limit {
                let hot = temperature_f.min(model.hot_limit);
                penalty += (hot - model.warm_limit) * model.hot_slope;
            }
            if temperature_f > model.hot_limit {
                penalty += (temperature_f - model.hot_limit) * model.extreme_slope;
            }
            if temperature_f > model.humidity_active_above && humidity_pct > model.humidity_floor {
                penalty += (humidity_pct - model.humidity_floor) * model.humidity_slope;
            }
        }

        if let Some(dew) = dew_point_f {
            if dew > model.dew_point_floor {
                penalty += (dew - model.dew_point_floor) * model.dew_point_slope;
            }
        }

        penalty.round() as i32
    }

    /// Pace slowdown from climbing, in seconds per mile.
    ///
    /// Proportional to gain per mile: 100 ft of gain per mile costs 12 s/mi.
    /// Zero for non-positive gain or distance.
    pub fn elevation_pace_correction(gain_feet: f64, distance_miles: f64) -> f64 {
        if gain_feet <= 0.0 || distance_miles <= 0.0 {
            return 0.0;
        }
        gain_feet / distance_miles * 12.0 / 100.0
    }

    /// Score a race result after crediting weather and elevation.
    ///
    /// The combined per-mile penalty is subtracted across the whole distance,
    /// but the corrected time never drops below 85% of the actual time, which
    /// bounds runaway credit from extreme condition inputs.
    pub fn adjusted_score(
        distance_meters: f64,
        time_seconds: f64,
        weather: Option<&WeatherSnapshot>,
        elevation_gain_feet: Option<f64>,
    ) -> Result<f64, ModelError> {
        if distance_meters <= 0.0 {
            return Err(ModelError::InvalidResult {
                field: "distance",
                value: distance_meters,
            });
        }
        if time_seconds <= 0.0 {
            return Err(ModelError::InvalidResult {
                field: "time",
                value: time_seconds,
            });
        }

        let miles = distance_meters / METERS_PER_MILE;
        let weather_penalty = weather
            .map(|w| {
                f64::from(Self::weather_pace_adjustment(
                    w.temperature_f,
                    w.humidity_pct,
                    w.dew_point_f,
                ))
            })
            .unwrap_or(0.0);
        let elevation_penalty = elevation_gain_feet
            .map(|gain| Self::elevation_pace_correction(gain, miles))
            .unwrap_or(0.0);

        let credit = (weather_penalty + elevation_penalty) * miles;
        let corrected = (time_seconds - credit).max(time_seconds * 0.85);
        if corrected > time_seconds - credit {
            debug!(
                credit,
                "condition credit clamped to 15% of the actual time"
            );
        }

        Self::score_from_result(distance_meters, corrected)
    }

    /// Fraction of maximal aerobic power sustainable for a duration in minutes
    pub(crate) fn sustainable_fraction(minutes: f64) -> f64 {
        DROP_A + DROP_B * (DROP_B_RATE * minutes).exp() + DROP_C * (DROP_C_RATE * minutes).exp()
    }

    /// Oxygen cost of running at a velocity in m/min
    pub(crate) fn oxygen_cost(velocity: f64) -> f64 {
        COST_CONST + COST_LINEAR * velocity + COST_QUAD * velocity * velocity
    }

    /// Invert the oxygen-cost quadratic: velocity in m/min at a given power
    pub(crate) fn velocity_at_power(power: f64) -> f64 {
        let discriminant = COST_LINEAR * COST_LINEAR - 4.0 * COST_QUAD * (COST_CONST - power);
        (-COST_LINEAR + discriminant.sqrt()) / (2.0 * COST_QUAD)
    }

    /// Convert a velocity in m/min to a pace in seconds per mile
    pub(crate) fn velocity_to_pace(velocity: f64) -> f64 {
        METERS_PER_MILE / velocity * 60.0
    }
}

/// Predicted race times for standard distances, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RacePredictions {
    pub time_5k: f64,
    pub time_10k: f64,
    pub time_half_marathon: f64,
    pub time_marathon: f64,
}
