// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calorie burn estimation from catalog rates.
//!
//! - duration mode: `rate_per_30_min * (minutes / 30) * intensity`
//! - count mode: `rate_per_rep * reps * sets * intensity * (weight / reference)`

use crate::error::EngineError;
use crate::models::{InputMode, Intensity, WorkoutCatalog};

/// Raw measurements for one workout.
#[derive(Debug, Clone)]
pub struct CalorieInput<'a> {
    pub activity_type: &'a str,
    pub mode: InputMode,
    pub duration_minutes: Option<u32>,
    pub reps: Option<u32>,
    pub sets: Option<u32>,
    pub intensity: Intensity,
    /// User body weight; count-mode rates scale with it
    pub user_weight_kg: Option<f64>,
}

/// Estimate calories burned, rounded to the nearest kcal.
pub fn estimate_calories(
    input: &CalorieInput<'_>,
    catalog: &WorkoutCatalog,
    reference_weight_kg: f64,
) -> Result<u32, EngineError> {
    let workout_type = catalog
        .get(input.activity_type)
        .ok_or_else(|| EngineError::UnknownActivityType(input.activity_type.to_string()))?;

    if workout_type.mode != input.mode {
        return Err(EngineError::InvalidInput(format!(
            "'{}' is logged by {}",
            workout_type.key,
            match workout_type.mode {
                InputMode::Duration => "duration",
                InputMode::Count => "reps and sets",
            }
        )));
    }

    let factor = input.intensity.factor();

    let calories = match input.mode {
        InputMode::Duration => {
            let minutes = positive(input.duration_minutes, "duration_minutes")?;
            let rate = workout_type.calories_per_30_min.ok_or_else(|| {
                EngineError::Configuration(format!("'{}' has no duration rate", workout_type.key))
            })?;
            rate * (minutes as f64 / 30.0) * factor
        }
        InputMode::Count => {
            let reps = positive(input.reps, "reps")?;
            let sets = positive(input.sets, "sets")?;
            let rate = workout_type.calories_per_rep.ok_or_else(|| {
                EngineError::Configuration(format!("'{}' has no per-rep rate", workout_type.key))
            })?;
            let weight_ratio = match input.user_weight_kg {
                Some(w) if w.is_finite() && w > 0.0 => w / reference_weight_kg,
                Some(_) => {
                    return Err(EngineError::InvalidInput(
                        "user weight must be positive".to_string(),
                    ))
                }
                None => 1.0,
            };
            rate * reps as f64 * sets as f64 * factor * weight_ratio
        }
    };

    Ok(calories.round() as u32)
}

/// Require a present, non-zero measurement.
fn positive(value: Option<u32>, field: &str) -> Result<u32, EngineError> {
    match value {
        Some(v) if v > 0 => Ok(v),
        Some(_) => Err(EngineError::InvalidInput(format!(
            "{} must be greater than 0",
            field
        ))),
        None => Err(EngineError::InvalidInput(format!("{} is required", field))),
    }
}
