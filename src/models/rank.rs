// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rank tier table: ordered XP thresholds.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A rank label and the XP needed to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RankTier {
    pub label: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub min_xp: u64,
}

impl RankTier {
    pub fn new(label: impl Into<String>, min_xp: u64) -> Self {
        Self {
            label: label.into(),
            min_xp,
        }
    }
}

/// Ordered rank tiers.
///
/// The first tier always has a zero threshold and thresholds are strictly
/// increasing, so every XP value maps to exactly one tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankTable {
    tiers: Vec<RankTier>,
}

impl Default for RankTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RankTable {
    /// Build a table from tiers in ascending order.
    pub fn new(tiers: Vec<RankTier>) -> Result<Self, EngineError> {
        match tiers.first() {
            Some(base) if base.min_xp == 0 => {}
            Some(_) => {
                return Err(EngineError::Configuration(
                    "rank table must start with a zero-threshold base tier".to_string(),
                ))
            }
            None => {
                return Err(EngineError::Configuration(
                    "rank table is empty".to_string(),
                ))
            }
        }

        if let Some(pair) = tiers.windows(2).find(|w| w[1].min_xp <= w[0].min_xp) {
            return Err(EngineError::Configuration(format!(
                "rank thresholds must be strictly increasing ('{}' at {} follows '{}' at {})",
                pair[1].label, pair[1].min_xp, pair[0].label, pair[0].min_xp
            )));
        }

        Ok(Self { tiers })
    }

    /// The built-in E..S ladder.
    pub fn builtin() -> Self {
        Self {
            tiers: vec![
                RankTier::new("E", 0),
                RankTier::new("D", 1_000),
                RankTier::new("C", 2_500),
                RankTier::new("B", 5_000),
                RankTier::new("A", 10_000),
                RankTier::new("S", 20_000),
            ],
        }
    }

    /// Load tiers from a JSON file containing `[{"label": .., "min_xp": ..}]`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let json_data = fs::read_to_string(path.as_ref()).map_err(|e| {
            EngineError::Configuration(format!("failed to read rank tiers: {}", e))
        })?;
        Self::load_from_json(&json_data)
    }

    /// Load tiers from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, EngineError> {
        let tiers: Vec<RankTier> = serde_json::from_str(json_data).map_err(|e| {
            EngineError::Configuration(format!("failed to parse rank tiers: {}", e))
        })?;
        Self::new(tiers)
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }
}
