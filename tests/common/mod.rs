// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use fitrank_tracker::config::Config;
use fitrank_tracker::db::FirestoreDb;
use fitrank_tracker::middleware::auth::create_jwt;
use fitrank_tracker::models::{RankTable, User, WorkoutCatalog};
use fitrank_tracker::routes::create_router;
use fitrank_tracker::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Shared state over a given database with built-in reference data.
#[allow(dead_code)]
pub fn test_state(config: Config, db: FirestoreDb) -> Arc<AppState> {
    Arc::new(AppState::new(
        config,
        db,
        WorkoutCatalog::builtin(),
        RankTable::builtin(),
    ))
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = test_state(Config::test_default(), test_db_offline());
    (create_router(state.clone()), state)
}

/// Create an offline test app with a specific frontend URL.
#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    let state = test_state(config, test_db_offline());
    (create_router(state.clone()), state)
}

/// Create a session token for a user ID.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key).expect("Failed to create JWT")
}

/// Unique ID for test isolation.
#[allow(dead_code)]
pub fn unique_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

/// A user with a unique ID and email (not stored).
#[allow(dead_code)]
pub fn test_user(prefix: &str) -> User {
    let id = unique_id(prefix);
    User::new(
        id.clone(),
        format!("{}@example.com", id),
        "not-a-real-hash".to_string(),
        "Test User".to_string(),
    )
}
