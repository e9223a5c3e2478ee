// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Meal energy estimation and unit normalization.

use crate::error::EngineError;
use crate::models::FoodUnit;

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Macronutrients of a logged portion, in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Macros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl Macros {
    fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [
            ("protein_g", self.protein_g),
            ("carbs_g", self.carbs_g),
            ("fat_g", self.fat_g),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "{} must be a non-negative number",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Atwater estimate: 4 kcal/g protein and carbs, 9 kcal/g fat.
    pub fn calories(&self) -> f64 {
        self.protein_g * KCAL_PER_G_PROTEIN
            + self.carbs_g * KCAL_PER_G_CARBS
            + self.fat_g * KCAL_PER_G_FAT
    }
}

/// Calories for a meal: the explicit value when given, otherwise derived
/// from macros.
pub fn estimate_meal_calories(explicit: Option<u32>, macros: &Macros) -> Result<u32, EngineError> {
    macros.validate()?;
    Ok(match explicit {
        Some(kcal) => kcal,
        None => macros.calories().round() as u32,
    })
}

/// Quantity converted to grams or millilitres, when the unit has a fixed size.
pub fn normalize_quantity(quantity: f64, unit: FoodUnit) -> Result<Option<f64>, EngineError> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(EngineError::InvalidInput(
            "quantity must be greater than 0".to_string(),
        ));
    }
    Ok(unit
        .base_factor()
        .map(|factor| (quantity * factor * 100.0).round() / 100.0))
}
