// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout record model for storage and API.

use crate::models::catalog::InputMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Perceived effort of a workout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    #[default]
    Moderate,
    High,
}

impl Intensity {
    /// Multiplier applied to the catalog rate.
    pub fn factor(self) -> f64 {
        match self {
            Intensity::Low => 0.8,
            Intensity::Moderate => 1.0,
            Intensity::High => 1.2,
        }
    }
}

/// Stored workout record in Firestore.
///
/// Immutable once written: `calories` and `xp_earned` are snapshots taken at
/// creation and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Workout ID (UUID v4, also used as document ID)
    pub id: String,
    /// Owner
    pub user_id: String,
    /// Catalog key
    pub activity_type: String,
    pub mode: InputMode,
    pub duration_minutes: Option<u32>,
    pub reps: Option<u32>,
    pub sets: Option<u32>,
    pub intensity: Intensity,
    pub notes: Option<String>,
    /// Estimated calories burned (kcal)
    pub calories: u32,
    /// XP credited to the user for this workout
    pub xp_earned: u64,
    /// When the workout took place
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub performed_at: DateTime<Utc>,
    /// When the record was created
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
}
