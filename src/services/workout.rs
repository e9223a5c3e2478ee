// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout logging service.
//!
//! Handles the core workflow:
//! 1. Validate the request against the catalog (no database access)
//! 2. Serialize submissions for the same user within this instance
//! 3. In one Firestore transaction: read the user, estimate calories,
//!    award XP, advance the streak, write the workout and the user

use crate::db::FirestoreDb;
use crate::error::{EngineError, Result};
use crate::models::{InputMode, Intensity, RankTable, User, Workout, WorkoutCatalog};
use crate::services::calories::{estimate_calories, CalorieInput};
use crate::services::progression::{
    compute_rank, compute_xp_reward, rank_progress, RankProgress, XpPolicy,
};
use crate::services::streak::{apply_streak, StreakState};
use crate::time_utils::{check_event_time, local_date};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use validator::Validate;

/// Per-user locks serializing workout submissions within this instance.
pub type UserLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Body of `POST /api/workouts`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogWorkoutRequest {
    #[validate(length(min = 1, max = 64))]
    pub activity_type: String,
    /// Defaults to the catalog entry's mode
    pub mode: Option<InputMode>,
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: Option<u32>,
    #[validate(range(min = 1, max = 10000))]
    pub reps: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub sets: Option<u32>,
    #[serde(default)]
    pub intensity: Intensity,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    /// Defaults to now
    pub performed_at: Option<DateTime<Utc>>,
}

/// Result of a logged workout.
#[derive(Debug, Clone, Serialize)]
pub struct LoggedWorkout {
    pub workout: Workout,
    pub xp_earned: u64,
    pub total_xp: u64,
    pub rank: RankProgress,
    pub rank_changed: bool,
    pub streak: StreakState,
}

/// Pure part of logging: turns a user and a request into the new records.
#[derive(Debug, Clone)]
pub struct WorkoutPlanner {
    catalog: Arc<WorkoutCatalog>,
    policy: XpPolicy,
    reference_weight_kg: f64,
}

impl WorkoutPlanner {
    pub fn new(catalog: Arc<WorkoutCatalog>, policy: XpPolicy, reference_weight_kg: f64) -> Self {
        Self {
            catalog,
            policy,
            reference_weight_kg,
        }
    }

    /// Check the request without a user, at the reference weight.
    ///
    /// Catches unknown types, mode mismatches, and missing measurements
    /// before anything touches the database.
    pub fn validate(
        &self,
        req: &LogWorkoutRequest,
        now: DateTime<Utc>,
    ) -> std::result::Result<(), EngineError> {
        self.estimate(req, None)?;
        performed_at(req, now)?;
        Ok(())
    }

    /// Build the workout record and the updated user.
    pub fn plan(
        &self,
        user: &User,
        req: &LogWorkoutRequest,
        workout_id: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<(Workout, User), EngineError> {
        let (mode, calories) = self.estimate(req, user.body.weight_kg)?;
        let performed_at = performed_at(req, now)?;
        let xp_earned = compute_xp_reward(calories, &self.policy);

        let day = local_date(performed_at, user.utc_offset_minutes);
        let streak = apply_streak(
            StreakState::new(user.current_streak, user.last_activity_date),
            day,
        );

        let mut updated = user.clone();
        updated.xp = user.xp.saturating_add(xp_earned);
        updated.current_streak = streak.count;
        updated.last_activity_date = streak.last_activity_date;
        updated.updated_at = now;

        let workout = Workout {
            id: workout_id.to_string(),
            user_id: user.id.clone(),
            activity_type: crate::models::catalog::normalize_key(&req.activity_type),
            mode,
            duration_minutes: req.duration_minutes,
            reps: req.reps,
            sets: req.sets,
            intensity: req.intensity,
            notes: req.notes.clone(),
            calories,
            xp_earned,
            performed_at,
            created_at: now,
        };

        Ok((workout, updated))
    }

    fn estimate(
        &self,
        req: &LogWorkoutRequest,
        user_weight_kg: Option<f64>,
    ) -> std::result::Result<(InputMode, u32), EngineError> {
        let workout_type = self
            .catalog
            .get(&req.activity_type)
            .ok_or_else(|| EngineError::UnknownActivityType(req.activity_type.clone()))?;
        let mode = req.mode.unwrap_or(workout_type.mode);

        let calories = estimate_calories(
            &CalorieInput {
                activity_type: &req.activity_type,
                mode,
                duration_minutes: req.duration_minutes,
                reps: req.reps,
                sets: req.sets,
                intensity: req.intensity,
                user_weight_kg,
            },
            &self.catalog,
            self.reference_weight_kg,
        )?;

        Ok((mode, calories))
    }
}

fn performed_at(
    req: &LogWorkoutRequest,
    now: DateTime<Utc>,
) -> std::result::Result<DateTime<Utc>, EngineError> {
    match req.performed_at {
        Some(ts) => check_event_time("performed_at", ts, now),
        None => Ok(now),
    }
}

/// Logs workouts with atomic XP and streak updates.
pub struct WorkoutLogger {
    planner: WorkoutPlanner,
    ranks: Arc<RankTable>,
    locks: UserLocks,
}

impl WorkoutLogger {
    pub fn new(planner: WorkoutPlanner, ranks: Arc<RankTable>, locks: UserLocks) -> Self {
        Self {
            planner,
            ranks,
            locks,
        }
    }

    /// Log a workout for `user_id`.
    pub async fn log(
        &self,
        db: &FirestoreDb,
        user_id: &str,
        req: LogWorkoutRequest,
    ) -> Result<LoggedWorkout> {
        let now = Utc::now();
        self.planner.validate(&req, now)?;

        let lock = self
            .locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let result = {
            let _guard = lock.lock().await;
            self.log_locked(db, user_id, req, now).await
        };

        // Only the map and `lock` hold it when nobody else is waiting.
        self.locks
            .remove_if(user_id, |_, entry| Arc::strong_count(entry) == 2);

        result
    }

    async fn log_locked(
        &self,
        db: &FirestoreDb,
        user_id: &str,
        req: LogWorkoutRequest,
        now: DateTime<Utc>,
    ) -> Result<LoggedWorkout> {
        let workout_id = uuid::Uuid::new_v4().to_string();
        let planner = self.planner.clone();
        let (workout, user) = db
            .log_workout_atomic(user_id, move |user: &User| {
                planner.plan(user, &req, &workout_id, now)
            })
            .await?;

        let previous_xp = user.xp.saturating_sub(workout.xp_earned);
        let rank_changed =
            compute_rank(previous_xp, &self.ranks).label != compute_rank(user.xp, &self.ranks).label;

        tracing::info!(
            user_id,
            workout_id = %workout.id,
            activity_type = %workout.activity_type,
            calories = workout.calories,
            xp_earned = workout.xp_earned,
            total_xp = user.xp,
            streak = user.current_streak,
            rank_changed,
            "Workout logged"
        );

        Ok(LoggedWorkout {
            xp_earned: workout.xp_earned,
            total_xp: user.xp,
            rank: rank_progress(user.xp, &self.ranks),
            rank_changed,
            streak: StreakState::new(user.current_streak, user.last_activity_date),
            workout,
        })
    }
}
