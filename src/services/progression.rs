// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! XP rewards and rank derivation.

use crate::config::{Config, DEFAULT_XP_CALORIE_DIVISOR, DEFAULT_XP_MIN_REWARD};
use crate::models::{RankTable, RankTier};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How calories burned turn into XP.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XpPolicy {
    /// Every workout earns at least this much
    pub min_reward: u64,
    /// Calories per XP point
    pub calorie_divisor: f64,
}

impl Default for XpPolicy {
    fn default() -> Self {
        Self {
            min_reward: DEFAULT_XP_MIN_REWARD,
            calorie_divisor: DEFAULT_XP_CALORIE_DIVISOR,
        }
    }
}

impl XpPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_reward: config.xp_min_reward,
            calorie_divisor: config.xp_calorie_divisor,
        }
    }
}

/// XP earned for a workout: `max(min_reward, round(calories / divisor))`.
pub fn compute_xp_reward(calories: u32, policy: &XpPolicy) -> u64 {
    let scaled = (calories as f64 / policy.calorie_divisor).round() as u64;
    scaled.max(policy.min_reward)
}

/// The tier with the greatest threshold not exceeding `xp`.
pub fn compute_rank(xp: u64, table: &RankTable) -> &RankTier {
    let tiers = table.tiers();
    // Tiers are ascending and the first threshold is 0, so idx >= 1.
    let idx = tiers.partition_point(|t| t.min_xp <= xp);
    &tiers[idx.saturating_sub(1)]
}

/// Where a user stands on the rank ladder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RankProgress {
    pub rank: String,
    pub next_rank: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub xp: u64,
    /// XP still needed for the next tier (0 at the top tier)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub xp_to_next: u64,
    /// Progress through the current tier, 0-100
    pub progress_pct: f64,
}

pub fn rank_progress(xp: u64, table: &RankTable) -> RankProgress {
    let tiers = table.tiers();
    let idx = tiers.partition_point(|t| t.min_xp <= xp).saturating_sub(1);
    let current = &tiers[idx];

    match tiers.get(idx + 1) {
        Some(next) => {
            let span = (next.min_xp - current.min_xp) as f64;
            let into = (xp - current.min_xp) as f64;
            RankProgress {
                rank: current.label.clone(),
                next_rank: Some(next.label.clone()),
                xp,
                xp_to_next: next.min_xp - xp,
                progress_pct: (into / span * 1000.0).round() / 10.0,
            }
        }
        None => RankProgress {
            rank: current.label.clone(),
            next_rank: None,
            xp,
            xp_to_next: 0,
            progress_pct: 100.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RankTable {
        RankTable::new(vec![
            RankTier::new("base", 0),
            RankTier::new("D", 1000),
            RankTier::new("C", 2500),
        ])
        .unwrap()
    }

    #[test]
    fn test_rank_at_threshold() {
        let table = table();
        assert_eq!(compute_rank(1000, &table).label, "D");
        assert_eq!(compute_rank(999, &table).label, "base");
        assert_eq!(compute_rank(0, &table).label, "base");
        assert_eq!(compute_rank(2500, &table).label, "C");
        assert_eq!(compute_rank(u64::MAX, &table).label, "C");
    }

    #[test]
    fn test_rank_is_largest_threshold_not_exceeding_xp() {
        let table = table();
        for xp in (0..4000).step_by(7) {
            let rank = compute_rank(xp, &table);
            let expected = table
                .tiers()
                .iter()
                .filter(|t| t.min_xp <= xp)
                .map(|t| t.min_xp)
                .max()
                .unwrap();
            assert_eq!(rank.min_xp, expected, "xp = {}", xp);
        }
    }

    #[test]
    fn test_xp_reward_floor() {
        let policy = XpPolicy::default();
        assert_eq!(compute_xp_reward(0, &policy), 5);
        assert_eq!(compute_xp_reward(9, &policy), 5);
        for calories in 0..2000 {
            assert!(compute_xp_reward(calories, &policy) >= 5);
        }
    }

    #[test]
    fn test_xp_reward_scales_with_calories() {
        let policy = XpPolicy::default();
        assert_eq!(compute_xp_reward(540, &policy), 270);
        assert_eq!(compute_xp_reward(11, &policy), 6); // 5.5 rounds up
        assert_eq!(compute_xp_reward(18, &policy), 9);
    }

    #[test]
    fn test_rank_progress() {
        let table = table();

        let progress = rank_progress(1750, &table);
        assert_eq!(progress.rank, "D");
        assert_eq!(progress.next_rank.as_deref(), Some("C"));
        assert_eq!(progress.xp_to_next, 750);
        assert_eq!(progress.progress_pct, 50.0);

        let top = rank_progress(3000, &table);
        assert_eq!(top.rank, "C");
        assert_eq!(top.next_rank, None);
        assert_eq!(top.xp_to_next, 0);
        assert_eq!(top.progress_pct, 100.0);
    }
}
