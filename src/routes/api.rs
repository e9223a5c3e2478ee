// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::db::firestore::MAX_QUERY_LIMIT;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::meal::{FoodUnit, MealType};
use crate::models::user::{BodyMetrics, Gender, GoalType, Goals};
use crate::models::{Meal, RankTable, RankTier, User, Workout, WorkoutType};
use crate::services::insights::{generate_insights, Insight};
use crate::services::nutrition::{estimate_meal_calories, normalize_quantity, Macros};
use crate::services::progression::{rank_progress, RankProgress};
use crate::services::streak::{correct_stale_streak, StreakState};
use crate::services::weekly::{
    aggregate_week, week_start, DayBucket, MealEntry, WeekTotals, WeeklySummary, WorkoutEntry,
};
use crate::services::LogWorkoutRequest;
use crate::time_utils::{
    check_event_time, format_utc_rfc3339, local_day_start_utc, parse_date,
    MAX_UTC_OFFSET_MINUTES,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Default look-back for list endpoints without a `from` date.
const DEFAULT_LIST_DAYS: i64 = 30;
const DEFAULT_LIST_LIMIT: u32 = 100;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/profile", put(update_profile))
        .route("/api/workout-types", get(get_workout_types))
        .route("/api/ranks", get(get_ranks))
        .route("/api/workouts", get(list_workouts).post(log_workout))
        .route("/api/workouts/{id}", delete(delete_workout))
        .route("/api/meals", get(list_meals).post(log_meal))
        .route("/api/meals/{id}", delete(delete_meal))
        .route("/api/analytics/weekly", get(get_weekly))
        .route("/api/analytics/insights", get(get_insights))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub body: BodyMetrics,
    pub bmi: Option<f64>,
    pub bmi_category: Option<String>,
    pub goals: Goals,
    pub utc_offset_minutes: i32,
    pub progress: RankProgress,
    pub current_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub created_at: String,
}

impl UserResponse {
    pub fn new(user: &User, ranks: &RankTable) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            body: user.body.clone(),
            bmi: user.body.bmi(),
            bmi_category: user.body.bmi_category().map(str::to_string),
            goals: user.goals.clone(),
            utc_offset_minutes: user.utc_offset_minutes,
            progress: rank_progress(user.xp, ranks),
            current_streak: user.current_streak,
            last_activity_date: user.last_activity_date,
            created_at: format_utc_rfc3339(user.created_at),
        }
    }
}

/// Load a user, zeroing a lapsed streak on the way.
///
/// The correction is persisted through a transaction so it cannot overwrite
/// XP credited concurrently.
pub(crate) async fn load_user(state: &AppState, user_id: &str) -> Result<User> {
    let user = state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    let now = Utc::now();
    let stale = correct_stale_streak(
        StreakState::new(user.current_streak, user.last_activity_date),
        user.today(now),
    );
    if stale.is_none() {
        return Ok(user);
    }

    tracing::info!(
        user_id,
        streak = user.current_streak,
        last_activity_date = ?user.last_activity_date,
        "Resetting lapsed streak"
    );

    state
        .db
        .update_user(user_id, move |u: &mut User| {
            match correct_stale_streak(
                StreakState::new(u.current_streak, u.last_activity_date),
                u.today(now),
            ) {
                Some(corrected) => {
                    u.current_streak = corrected.count;
                    true
                }
                None => false,
            }
        })
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

/// Get current user profile and progress.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = load_user(&state, &user.user_id).await?;
    Ok(Json(UserResponse::new(&profile, &state.ranks)))
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    #[validate(range(min = 50.0, max = 300.0))]
    pub height_cm: Option<f64>,
    #[validate(range(min = 20.0, max = 500.0))]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 1.0, max = 75.0))]
    pub body_fat_pct: Option<f64>,
    pub gender: Option<Gender>,
    #[validate(range(min = 10, max = 120))]
    pub age: Option<u32>,
    #[validate(range(min = 500, max = 10000))]
    pub daily_calorie_goal: Option<u32>,
    #[validate(range(max = 5000))]
    pub daily_burn_goal: Option<u32>,
    #[validate(range(min = 20.0, max = 500.0))]
    pub goal_weight_kg: Option<f64>,
    pub goal_type: Option<GoalType>,
    #[validate(range(min = -840, max = 840))]
    pub utc_offset_minutes: Option<i32>,
}

impl UpdateProfileRequest {
    /// Apply the present fields; returns whether anything changed.
    fn apply(&self, user: &mut User) -> bool {
        let before = editable_fields(user);

        if let Some(name) = &self.name {
            user.name = name.trim().to_string();
        }
        let body = &mut user.body;
        body.height_cm = self.height_cm.or(body.height_cm);
        body.weight_kg = self.weight_kg.or(body.weight_kg);
        body.body_fat_pct = self.body_fat_pct.or(body.body_fat_pct);
        body.gender = self.gender.or(body.gender);
        body.age = self.age.or(body.age);

        let goals = &mut user.goals;
        goals.daily_calorie_goal = self
            .daily_calorie_goal
            .unwrap_or(goals.daily_calorie_goal);
        goals.daily_burn_goal = self.daily_burn_goal.unwrap_or(goals.daily_burn_goal);
        goals.goal_weight_kg = self.goal_weight_kg.or(goals.goal_weight_kg);
        goals.goal_type = self.goal_type.unwrap_or(goals.goal_type);

        if let Some(offset) = self.utc_offset_minutes {
            user.utc_offset_minutes =
                offset.clamp(-MAX_UTC_OFFSET_MINUTES, MAX_UTC_OFFSET_MINUTES);
        }

        before != editable_fields(user)
    }
}

fn editable_fields(user: &User) -> (String, BodyMetrics, Goals, i32) {
    (
        user.name.clone(),
        user.body.clone(),
        user.goals.clone(),
        user.utc_offset_minutes,
    )
}

/// Update body metrics, goals, and time zone offset.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    req.validate()?;

    let updated = state
        .db
        .update_user(&user.user_id, move |u: &mut User| req.apply(u))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    tracing::info!(user_id = %user.user_id, "Profile updated");
    Ok(Json(UserResponse::new(&updated, &state.ranks)))
}

// ─── Reference Data ──────────────────────────────────────────

/// Workout type catalog. Static for the lifetime of the process.
async fn get_workout_types(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let types: Vec<WorkoutType> = state.catalog.types().to_vec();
    ([(header::CACHE_CONTROL, "private, max-age=3600")], Json(types))
}

/// Rank tiers in ascending order.
async fn get_ranks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let tiers: Vec<RankTier> = state.ranks.tiers().to_vec();
    ([(header::CACHE_CONTROL, "private, max-age=3600")], Json(tiers))
}

// ─── Date Ranges ─────────────────────────────────────────────

/// Query parameters for list endpoints. Dates are the user's local
/// calendar days, both inclusive.
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<u32>,
}

/// Validated date range.
struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: u32,
}

impl RangeParams {
    /// Parse without touching the database.
    fn parse(&self) -> Result<DateRange> {
        let from = self.from.as_deref().map(parse_query_date).transpose()?;
        let to = self.to.as_deref().map(parse_query_date).transpose()?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::BadRequest(
                    "'from' must not be after 'to'".to_string(),
                ));
            }
        }
        let limit = match self.limit {
            Some(0) => return Err(AppError::BadRequest("limit must be positive".to_string())),
            Some(n) => n.min(MAX_QUERY_LIMIT),
            None => DEFAULT_LIST_LIMIT,
        };
        Ok(DateRange { from, to, limit })
    }
}

impl DateRange {
    /// UTC bounds `[start, end)` for a user.
    fn bounds(&self, user: &User) -> (DateTime<Utc>, DateTime<Utc>) {
        let to = self.to.unwrap_or_else(|| user.today(Utc::now()));
        let from = self.from.unwrap_or_else(|| {
            to.checked_sub_signed(Duration::days(DEFAULT_LIST_DAYS - 1))
                .unwrap_or(to)
        });
        let end = to.succ_opt().unwrap_or(to);
        (
            local_day_start_utc(from, user.utc_offset_minutes),
            local_day_start_utc(end, user.utc_offset_minutes),
        )
    }
}

fn parse_query_date(raw: &str) -> Result<NaiveDate> {
    parse_date(raw).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Invalid date '{}', expected YYYY-MM-DD between 1970 and 9999",
            raw
        ))
    })
}

// ─── Workouts ────────────────────────────────────────────────

/// Log a workout; XP and streak are updated atomically with the record.
async fn log_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<LogWorkoutRequest>,
) -> Result<impl IntoResponse> {
    req.validate()?;
    let logged = state.workouts.log(&state.db, &user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(logged)))
}

/// List the user's workouts in a date range, newest first.
async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<Workout>>> {
    let range = params.parse()?;
    let profile = load_user(&state, &user.user_id).await?;
    let (start, end) = range.bounds(&profile);

    let workouts = state
        .db
        .list_workouts(&user.user_id, start, end, range.limit)
        .await?;
    Ok(Json(workouts))
}

/// Delete one of the user's workouts. XP already earned is kept.
async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.db.delete_workout(&user.user_id, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Workout {} not found", id)))
    }
}

// ─── Meals ───────────────────────────────────────────────────

fn default_quantity() -> f64 {
    1.0
}

fn default_unit() -> FoodUnit {
    FoodUnit::Serving
}

/// Body of `POST /api/meals`.
#[derive(Debug, Deserialize, Validate)]
pub struct LogMealRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    pub meal_type: MealType,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: FoodUnit,
    /// Explicit energy; derived from macros when absent
    #[validate(range(max = 20000))]
    pub calories: Option<u32>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 2000.0))]
    pub protein_g: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 2000.0))]
    pub carbs_g: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 2000.0))]
    pub fat_g: f64,
    pub eaten_at: Option<DateTime<Utc>>,
}

impl LogMealRequest {
    /// Build the stored record.
    fn into_meal(self, user_id: &str, now: DateTime<Utc>) -> Result<Meal> {
        let macros = Macros {
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
        };
        let calories = estimate_meal_calories(self.calories, &macros)?;
        let normalized_quantity = normalize_quantity(self.quantity, self.unit)?;
        let eaten_at = match self.eaten_at {
            Some(ts) => check_event_time("eaten_at", ts, now)?,
            None => now,
        };

        Ok(Meal {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: self.name.trim().to_string(),
            meal_type: self.meal_type,
            quantity: self.quantity,
            unit: self.unit,
            normalized_quantity,
            calories,
            protein_g: macros.protein_g,
            carbs_g: macros.carbs_g,
            fat_g: macros.fat_g,
            eaten_at,
            created_at: now,
        })
    }
}

/// Log a meal.
async fn log_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<LogMealRequest>,
) -> Result<impl IntoResponse> {
    req.validate()?;
    let meal = req.into_meal(&user.user_id, Utc::now())?;

    state.db.create_meal(&meal).await?;

    tracing::info!(
        user_id = %user.user_id,
        meal_id = %meal.id,
        calories = meal.calories,
        "Meal logged"
    );
    Ok((StatusCode::CREATED, Json(meal)))
}

/// List the user's meals in a date range, newest first.
async fn list_meals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<Meal>>> {
    let range = params.parse()?;
    let profile = load_user(&state, &user.user_id).await?;
    let (start, end) = range.bounds(&profile);

    let meals = state
        .db
        .list_meals(&user.user_id, start, end, range.limit)
        .await?;
    Ok(Json(meals))
}

/// Delete one of the user's meals.
async fn delete_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.db.delete_meal(&user.user_id, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Meal {} not found", id)))
    }
}

// ─── Analytics ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WeeklyParams {
    /// Any day in the requested week (default: today)
    pub date: Option<String>,
}

/// Fetch and bucket the week containing `anchor`.
async fn summarize_week(
    state: &AppState,
    user: &User,
    anchor: NaiveDate,
) -> Result<WeeklySummary> {
    let offset = user.utc_offset_minutes;
    let start = local_day_start_utc(week_start(anchor), offset);
    let end = start
        .checked_add_signed(Duration::days(7))
        .ok_or_else(|| AppError::BadRequest(format!("No week around {}", anchor)))?;

    let (workouts, meals) = futures_util::future::try_join(
        state.db.list_workouts(&user.id, start, end, MAX_QUERY_LIMIT),
        state.db.list_meals(&user.id, start, end, MAX_QUERY_LIMIT),
    )
    .await?;
    warn_if_truncated("workouts", &user.id, anchor, workouts.len());
    warn_if_truncated("meals", &user.id, anchor, meals.len());

    let workouts: Vec<WorkoutEntry> = workouts
        .iter()
        .map(|w| WorkoutEntry::from_workout(w, offset))
        .collect();
    let meals: Vec<MealEntry> = meals
        .iter()
        .map(|m| MealEntry::from_meal(m, offset))
        .collect();

    Ok(aggregate_week(&workouts, &meals, anchor))
}

/// Week queries stop at `MAX_QUERY_LIMIT`; a full page means totals may be
/// missing the oldest records. Returns whether that happened.
fn warn_if_truncated(kind: &str, user_id: &str, anchor: NaiveDate, fetched: usize) -> bool {
    let truncated = fetched >= MAX_QUERY_LIMIT as usize;
    if truncated {
        tracing::warn!(
            user_id,
            kind,
            %anchor,
            limit = MAX_QUERY_LIMIT,
            "Weekly summary hit the query limit; totals are incomplete"
        );
    }
    truncated
}

/// Weekly intake/burn buckets for the week containing `date`.
async fn get_weekly(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<WeeklyParams>,
) -> Result<Json<WeeklySummary>> {
    let anchor = params.date.as_deref().map(parse_query_date).transpose()?;
    let profile = load_user(&state, &user.user_id).await?;
    let anchor = anchor.unwrap_or_else(|| profile.today(Utc::now()));

    Ok(Json(summarize_week(&state, &profile, anchor).await?))
}

/// Today's totals and insights.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct InsightsResponse {
    pub date: NaiveDate,
    pub today: DayBucket,
    pub week: WeekTotals,
    pub current_streak: u32,
    pub insights: Vec<Insight>,
}

async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<InsightsResponse>> {
    let profile = load_user(&state, &user.user_id).await?;
    let today = profile.today(Utc::now());

    let summary = summarize_week(&state, &profile, today).await?;
    let bucket = summary.day(today).cloned().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("Week summary is missing {}", today))
    })?;

    let insights = generate_insights(
        &bucket,
        &summary.totals,
        &profile.goals,
        profile.current_streak,
    );

    Ok(Json(InsightsResponse {
        date: today,
        today: bucket,
        week: summary.totals,
        current_streak: profile.current_streak,
        insights,
    }))
}
