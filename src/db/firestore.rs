// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile, progress) and the email uniqueness index
//! - Workouts (immutable records, written atomically with XP/streak)
//! - Meals (immutable records)

use crate::db::collections;
use crate::error::{AppError, EngineError};
use crate::models::user::EmailIndex;
use crate::models::{Meal, User, Workout};
use chrono::{DateTime, Utc};
use firestore::errors::{BackoffError, FirestoreError};
use firestore::{FirestoreQueryDirection, FirestoreTimestamp};

/// Upper bound on records returned by a range query.
pub const MAX_QUERY_LIMIT: u32 = 500;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Whether a real client is behind this handle.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user through the email index.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let index: Option<EmailIndex> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USER_EMAILS)
            .obj()
            .one(&email_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match index {
            Some(entry) => self.get_user(&entry.user_id).await,
            None => Ok(None),
        }
    }

    /// Create a user and claim their email in one transaction.
    ///
    /// Returns `false` without writing anything if the email is already taken.
    pub async fn create_user(&self, user: &User) -> Result<bool, AppError> {
        let created = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let user = user.clone();
                Box::pin(async move {
                    let email_id = email_doc_id(&user.email);
                    let existing: Option<EmailIndex> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USER_EMAILS)
                        .obj()
                        .one(&email_id)
                        .await?;

                    let created = if existing.is_some() {
                        false
                    } else {
                        db.fluent()
                            .update()
                            .in_col(collections::USER_EMAILS)
                            .document_id(&email_id)
                            .object(&EmailIndex {
                                user_id: user.id.clone(),
                            })
                            .add_to_transaction(transaction)?;

                        db.fluent()
                            .update()
                            .in_col(collections::USERS)
                            .document_id(&user.id)
                            .object(&user)
                            .add_to_transaction(transaction)?;
                        true
                    };

                    Ok::<_, BackoffError<FirestoreError>>(created)
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("User creation failed: {}", e)))?;

        if created {
            tracing::info!(user_id = %user.id, "User created");
        }
        Ok(created)
    }

    /// Read-modify-write a user inside a transaction.
    ///
    /// `modify` returns whether it changed anything; unchanged users are not
    /// written. Returns `None` if the user does not exist.
    pub async fn update_user<F>(&self, user_id: &str, modify: F) -> Result<Option<User>, AppError>
    where
        F: Fn(&mut User) -> bool + Clone + Send + Sync + 'static,
    {
        self.get_client()?
            .run_transaction(|db, transaction| {
                let user_id = user_id.to_string();
                let modify = modify.clone();
                Box::pin(async move {
                    let user: Option<User> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&user_id)
                        .await?;

                    let updated = match user {
                        Some(mut user) => {
                            if modify(&mut user) {
                                user.updated_at = Utc::now();
                                db.fluent()
                                    .update()
                                    .in_col(collections::USERS)
                                    .document_id(&user_id)
                                    .object(&user)
                                    .add_to_transaction(transaction)?;
                            }
                            Some(user)
                        }
                        None => None,
                    };

                    Ok::<_, BackoffError<FirestoreError>>(updated)
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("User update failed: {}", e)))
    }

    // ─── Atomic Workout Logging ───────────────────────────────────

    /// Atomically create a workout and credit the user's XP and streak.
    ///
    /// `plan` receives the user as read inside the transaction and returns the
    /// workout record together with the updated user. Both documents are
    /// committed together; on contention Firestore retries the transaction with
    /// fresh data, so concurrent submissions are all credited.
    pub async fn log_workout_atomic<F>(
        &self,
        user_id: &str,
        plan: F,
    ) -> Result<(Workout, User), AppError>
    where
        F: Fn(&User) -> Result<(Workout, User), EngineError> + Clone + Send + Sync + 'static,
    {
        let outcome = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let user_id = user_id.to_string();
                let plan = plan.clone();
                Box::pin(async move {
                    // Reading through the transaction registers the user
                    // document for conflict detection.
                    let user: Option<User> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&user_id)
                        .await?;

                    let outcome = match user.as_ref().map(|u| plan(u)) {
                        None => None,
                        Some(Err(e)) => Some(Err(e)),
                        Some(Ok((workout, updated_user))) => {
                            db.fluent()
                                .update()
                                .in_col(collections::WORKOUTS)
                                .document_id(&workout.id)
                                .object(&workout)
                                .add_to_transaction(transaction)?;

                            db.fluent()
                                .update()
                                .in_col(collections::USERS)
                                .document_id(&user_id)
                                .object(&updated_user)
                                .add_to_transaction(transaction)?;

                            Some(Ok((workout, updated_user)))
                        }
                    };

                    Ok::<_, BackoffError<FirestoreError>>(outcome)
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Workout transaction failed: {}", e)))?;

        match outcome {
            Some(Ok(written)) => Ok(written),
            Some(Err(e)) => Err(e.into()),
            None => Err(AppError::NotFound(format!("User {} not found", user_id))),
        }
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// Get a workout by ID.
    pub async fn get_workout(&self, workout_id: &str) -> Result<Option<Workout>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WORKOUTS)
            .obj()
            .one(workout_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Workouts performed in `[from, to)`, newest first.
    pub async fn list_workouts(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Workout>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("performed_at")
                        .greater_than_or_equal(FirestoreTimestamp(from)),
                    q.field("performed_at").less_than(FirestoreTimestamp(to)),
                ])
            })
            .order_by([("performed_at", FirestoreQueryDirection::Descending)])
            .limit(limit.min(MAX_QUERY_LIMIT))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a workout owned by `user_id`.
    ///
    /// Returns `false` if there is no such workout for this user. XP already
    /// credited is kept.
    pub async fn delete_workout(&self, user_id: &str, workout_id: &str) -> Result<bool, AppError> {
        match self.get_workout(workout_id).await? {
            Some(workout) if workout.user_id == user_id => {}
            _ => return Ok(false),
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::WORKOUTS)
            .document_id(workout_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(user_id, workout_id, "Workout deleted");
        Ok(true)
    }

    // ─── Meal Operations ─────────────────────────────────────────

    /// Store a new meal.
    pub async fn create_meal(&self, meal: &Meal) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::MEALS)
            .document_id(&meal.id)
            .object(meal)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a meal by ID.
    pub async fn get_meal(&self, meal_id: &str) -> Result<Option<Meal>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::MEALS)
            .obj()
            .one(meal_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Meals eaten in `[from, to)`, newest first.
    pub async fn list_meals(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Meal>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::MEALS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("eaten_at")
                        .greater_than_or_equal(FirestoreTimestamp(from)),
                    q.field("eaten_at").less_than(FirestoreTimestamp(to)),
                ])
            })
            .order_by([("eaten_at", FirestoreQueryDirection::Descending)])
            .limit(limit.min(MAX_QUERY_LIMIT))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a meal owned by `user_id`. Returns `false` if not found.
    pub async fn delete_meal(&self, user_id: &str, meal_id: &str) -> Result<bool, AppError> {
        match self.get_meal(meal_id).await? {
            Some(meal) if meal.user_id == user_id => {}
            _ => return Ok(false),
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::MEALS)
            .document_id(meal_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(user_id, meal_id, "Meal deleted");
        Ok(true)
    }
}

/// Document ID for the email index (emails may contain `/`).
fn email_doc_id(email: &str) -> String {
    urlencoding::encode(&email.trim().to_lowercase()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_doc_id_is_normalized_and_path_safe() {
        assert_eq!(email_doc_id(" Ada@Example.com "), "ada%40example.com");
        assert!(!email_doc_id("a/b@example.com").contains('/'));
    }

    #[tokio::test]
    async fn test_offline_mode_reports_database_error() {
        let db = FirestoreDb::new_mock();
        let err = db.get_user("missing").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
