// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout type catalog: static calorie-rate reference data.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How a workout of a given type is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Measured in minutes (running, cycling, ...)
    Duration,
    /// Measured in reps x sets (push-ups, squats, ...)
    Count,
}

/// One entry of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutType {
    /// Lookup key (e.g. "running", "push_ups")
    pub key: String,
    /// Human-readable name
    pub label: String,
    pub mode: InputMode,
    /// kcal per 30 minutes at moderate intensity (duration mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_per_30_min: Option<f64>,
    /// kcal per repetition at reference weight (count mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_per_rep: Option<f64>,
}

/// Built-in duration activities: (key, label, kcal per 30 min).
const DURATION_TYPES: &[(&str, &str, f64)] = &[
    ("running", "Running", 300.0),
    ("cycling", "Cycling", 240.0),
    ("swimming", "Swimming", 250.0),
    ("walking", "Walking", 120.0),
    ("hiking", "Hiking", 200.0),
    ("rowing", "Rowing", 260.0),
    ("elliptical", "Elliptical", 220.0),
    ("jump_rope", "Jump Rope", 340.0),
    ("hiit", "HIIT", 350.0),
    ("strength_training", "Strength Training", 180.0),
    ("yoga", "Yoga", 90.0),
    ("pilates", "Pilates", 110.0),
    ("dancing", "Dancing", 180.0),
    ("boxing", "Boxing", 330.0),
];

/// Built-in count activities: (key, label, kcal per rep).
const COUNT_TYPES: &[(&str, &str, f64)] = &[
    ("push_ups", "Push-ups", 0.3),
    ("pull_ups", "Pull-ups", 0.5),
    ("squats", "Squats", 0.32),
    ("lunges", "Lunges", 0.3),
    ("burpees", "Burpees", 0.5),
    ("sit_ups", "Sit-ups", 0.25),
    ("crunches", "Crunches", 0.2),
    ("jumping_jacks", "Jumping Jacks", 0.2),
    ("dips", "Dips", 0.4),
];

/// Read-only catalog of workout types, loaded once at startup.
#[derive(Debug, Clone)]
pub struct WorkoutCatalog {
    types: Vec<WorkoutType>,
}

impl Default for WorkoutCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WorkoutCatalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        let duration = DURATION_TYPES.iter().map(|&(key, label, rate)| WorkoutType {
            key: key.to_string(),
            label: label.to_string(),
            mode: InputMode::Duration,
            calories_per_30_min: Some(rate),
            calories_per_rep: None,
        });
        let count = COUNT_TYPES.iter().map(|&(key, label, rate)| WorkoutType {
            key: key.to_string(),
            label: label.to_string(),
            mode: InputMode::Count,
            calories_per_30_min: None,
            calories_per_rep: Some(rate),
        });

        Self {
            types: duration.chain(count).collect(),
        }
    }

    /// Load a catalog from a JSON file containing an array of workout types.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load a catalog from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let types: Vec<WorkoutType> = serde_json::from_str(json_data)
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;
        let catalog = Self::from_types(types)?;
        tracing::info!(count = catalog.types.len(), "Loaded workout catalog");
        Ok(catalog)
    }

    /// Build a catalog, checking keys are unique and each entry has a positive
    /// rate for its input mode.
    pub fn from_types(types: Vec<WorkoutType>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(types.len());

        for mut entry in types {
            entry.key = normalize_key(&entry.key);
            if entry.key.is_empty() {
                return Err(CatalogError::Invalid("empty workout type key".to_string()));
            }
            if !seen.insert(entry.key.clone()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate workout type '{}'",
                    entry.key
                )));
            }

            let rate = match entry.mode {
                InputMode::Duration => entry.calories_per_30_min,
                InputMode::Count => entry.calories_per_rep,
            };
            match rate {
                Some(r) if r.is_finite() && r > 0.0 => {}
                _ => {
                    return Err(CatalogError::Invalid(format!(
                        "workout type '{}' has no positive rate for its mode",
                        entry.key
                    )))
                }
            }

            normalized.push(entry);
        }

        Ok(Self { types: normalized })
    }

    /// Look up a workout type; keys are matched case-insensitively and spaces
    /// or hyphens are treated as underscores.
    pub fn get(&self, key: &str) -> Option<&WorkoutType> {
        let key = normalize_key(key);
        self.types.iter().find(|t| t.key == key)
    }

    /// All workout types in catalog order.
    pub fn types(&self) -> &[WorkoutType] {
        &self.types
    }
}

/// Canonical form of a workout type key.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse catalog JSON: {0}")]
    ParseError(String),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}
