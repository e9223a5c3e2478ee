// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FitRank API Server
//!
//! Logs workouts and meals, awards XP and ranks, and serves weekly
//! calorie analytics.

use fitrank_tracker::{
    config::Config,
    db::FirestoreDb,
    models::{RankTable, WorkoutCatalog},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting FitRank API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    // Load reference data
    let catalog = match &config.workout_catalog_path {
        Some(path) => {
            tracing::info!(path = %path, "Loading workout catalog");
            WorkoutCatalog::load_from_file(path)?
        }
        None => WorkoutCatalog::builtin(),
    };
    let ranks = match &config.rank_tiers_path {
        Some(path) => {
            tracing::info!(path = %path, "Loading rank tiers");
            RankTable::load_from_file(path)?
        }
        None => RankTable::builtin(),
    };
    tracing::info!(
        workout_types = catalog.types().len(),
        rank_tiers = ranks.tiers().len(),
        "Reference data loaded"
    );

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db, catalog, ranks));

    // Build router
    let app = fitrank_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fitrank_tracker=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
