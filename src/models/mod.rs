// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod catalog;
pub mod meal;
pub mod rank;
pub mod user;
pub mod workout;

pub use catalog::{InputMode, WorkoutCatalog, WorkoutType};
pub use meal::{FoodUnit, Meal, MealType};
pub use rank::{RankTable, RankTier};
pub use user::{BodyMetrics, Goals, User};
pub use workout::{Intensity, Workout};
