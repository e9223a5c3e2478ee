// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FitRank: gamified fitness and nutrition tracking.
//!
//! This crate provides the backend API for logging workouts and meals,
//! awarding XP and ranks, tracking daily streaks, and summarizing weekly
//! calorie balance with rule-based insights.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use models::{RankTable, WorkoutCatalog};
use services::{UserLocks, WorkoutLogger, WorkoutPlanner, XpPolicy};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub catalog: Arc<WorkoutCatalog>,
    pub ranks: Arc<RankTable>,
    pub workouts: WorkoutLogger,
}

impl AppState {
    /// Wire up services from configuration and loaded reference data.
    pub fn new(
        config: Config,
        db: FirestoreDb,
        catalog: WorkoutCatalog,
        ranks: RankTable,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let ranks = Arc::new(ranks);
        let locks: UserLocks = Arc::new(dashmap::DashMap::new());

        let planner = WorkoutPlanner::new(
            catalog.clone(),
            XpPolicy::from_config(&config),
            config.reference_weight_kg,
        );
        let workouts = WorkoutLogger::new(planner, ranks.clone(), locks);

        Self {
            config,
            db,
            catalog,
            ranks,
            workouts,
        }
    }
}
