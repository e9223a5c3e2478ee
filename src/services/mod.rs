// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.
//!
//! The engine modules (`calories`, `progression`, `streak`, `weekly`,
//! `insights`, `nutrition`) are pure; `workout` and `password` do I/O.

pub mod calories;
pub mod insights;
pub mod nutrition;
pub mod password;
pub mod progression;
pub mod streak;
pub mod weekly;
pub mod workout;

pub use calories::{estimate_calories, CalorieInput};
pub use insights::{generate_insights, Insight, Severity};
pub use nutrition::{estimate_meal_calories, normalize_quantity, Macros};
pub use progression::{compute_rank, compute_xp_reward, rank_progress, RankProgress, XpPolicy};
pub use streak::{apply_streak, correct_stale_streak, StreakState};
pub use weekly::{aggregate_week, MealEntry, WeeklySummary, WorkoutEntry};
pub use workout::{LogWorkoutRequest, LoggedWorkout, UserLocks, WorkoutLogger, WorkoutPlanner};
