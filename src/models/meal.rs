// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Meal record model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which meal of the day an entry belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

/// Unit a food quantity was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum FoodUnit {
    G,
    Kg,
    Oz,
    Lb,
    Ml,
    L,
    Serving,
    Piece,
}

impl FoodUnit {
    /// Factor converting one unit to grams (mass) or millilitres (volume).
    /// `None` for units with no fixed size.
    pub fn base_factor(self) -> Option<f64> {
        match self {
            FoodUnit::G | FoodUnit::Ml => Some(1.0),
            FoodUnit::Kg | FoodUnit::L => Some(1000.0),
            FoodUnit::Oz => Some(28.3495),
            FoodUnit::Lb => Some(453.592),
            FoodUnit::Serving | FoodUnit::Piece => None,
        }
    }
}

/// Stored meal record in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    /// Meal ID (UUID v4, also used as document ID)
    pub id: String,
    /// Owner
    pub user_id: String,
    pub name: String,
    pub meal_type: MealType,
    pub quantity: f64,
    pub unit: FoodUnit,
    /// Quantity in grams or millilitres, when the unit converts
    pub normalized_quantity: Option<f64>,
    /// Energy (kcal), fixed at creation
    pub calories: u32,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    /// When the meal was eaten
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub eaten_at: DateTime<Utc>,
    /// When the record was created
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
}
