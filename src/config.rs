// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup. Gamification tunables have defaults
//! matching the production reward curve and can be overridden per deployment.

use std::env;

/// Default minimum XP awarded for any logged workout.
pub const DEFAULT_XP_MIN_REWARD: u64 = 5;
/// Default calories-per-XP divisor.
pub const DEFAULT_XP_CALORIE_DIVISOR: f64 = 2.0;
/// Default body weight that count-based calorie rates are calibrated for.
pub const DEFAULT_REFERENCE_WEIGHT_KG: f64 = 70.0;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL (CORS origin, cookie security)
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,
    /// Optional JSON file overriding the built-in workout catalog
    pub workout_catalog_path: Option<String>,
    /// Optional JSON file overriding the built-in rank tiers
    pub rank_tiers_path: Option<String>,
    /// Floor applied to every workout XP reward
    pub xp_min_reward: u64,
    /// Calories burned per XP point
    pub xp_calorie_divisor: f64,
    /// Reference body weight for count-based calorie rates
    pub reference_weight_kg: f64,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            bcrypt_cost: 4,
            workout_catalog_path: None,
            rank_tiers_path: None,
            xp_min_reward: DEFAULT_XP_MIN_REWARD,
            xp_calorie_divisor: DEFAULT_XP_CALORIE_DIVISOR,
            reference_weight_kg: DEFAULT_REFERENCE_WEIGHT_KG,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let config = Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: parse_or("PORT", 8080)?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            workout_catalog_path: env::var("WORKOUT_CATALOG_PATH").ok(),
            rank_tiers_path: env::var("RANK_TIERS_PATH").ok(),
            xp_min_reward: parse_or("XP_MIN_REWARD", DEFAULT_XP_MIN_REWARD)?,
            xp_calorie_divisor: parse_or("XP_CALORIE_DIVISOR", DEFAULT_XP_CALORIE_DIVISOR)?,
            reference_weight_kg: parse_or("REFERENCE_WEIGHT_KG", DEFAULT_REFERENCE_WEIGHT_KG)?,
        };

        if config.jwt_signing_key.len() < 32 {
            return Err(ConfigError::Invalid {
                name: "JWT_SIGNING_KEY",
                reason: "must be at least 32 bytes".to_string(),
            });
        }
        if !(config.xp_calorie_divisor.is_finite() && config.xp_calorie_divisor > 0.0) {
            return Err(ConfigError::Invalid {
                name: "XP_CALORIE_DIVISOR",
                reason: "must be a positive number".to_string(),
            });
        }
        if !(config.reference_weight_kg.is_finite() && config.reference_weight_kg > 0.0) {
            return Err(ConfigError::Invalid {
                name: "REFERENCE_WEIGHT_KG",
                reason: "must be a positive number".to_string(),
            });
        }

        Ok(config)
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

/// Parse an optional environment variable, falling back to `default` when unset.
fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            reason: format!("could not parse '{}'", raw),
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
