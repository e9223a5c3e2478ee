// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication routes.

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::auth::{
    create_jwt, LOGGED_IN_COOKIE, SESSION_COOKIE, SESSION_TTL_SECS,
};
use crate::models::User;
use crate::routes::api::{load_user, UserResponse};
use crate::services::password::{hash_password, verify_password, verify_unknown_user};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 80))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session token and profile returned by register and login.
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Create an account and start a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    req.validate()?;

    let email = req.email.trim().to_lowercase();
    let password_hash = hash_password(&req.password, state.config.bcrypt_cost).await?;
    let user = User::new(
        uuid::Uuid::new_v4().to_string(),
        email,
        password_hash,
        req.name.trim().to_string(),
    );

    if !state.db.create_user(&user).await? {
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }

    let token = issue_token(&state.config, &user.id)?;
    let jar = add_session_cookies(jar, &state.config, &token);

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            token,
            user: UserResponse::new(&user, &state.ranks),
        }),
    ))
}

/// Verify credentials and start a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let email = req.email.trim().to_lowercase();
    let Some(user) = state.db.find_user_by_email(&email).await? else {
        verify_unknown_user(&req.password, state.config.bcrypt_cost).await?;
        tracing::info!("Login for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&req.password, &user.password_hash).await? {
        tracing::info!(user_id = %user.id, "Login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let user = load_user(&state, &user.id).await?;
    let token = issue_token(&state.config, &user.id)?;
    let jar = add_session_cookies(jar, &state.config, &token);

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar,
        Json(AuthResponse {
            token,
            user: UserResponse::new(&user, &state.ranks),
        }),
    ))
}

/// End the session by expiring both cookies.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let secure = state.config.secure_cookies();
    let jar = jar
        .remove(session_cookie(SESSION_COOKIE, String::new(), true, secure))
        .remove(session_cookie(LOGGED_IN_COOKIE, String::new(), false, secure));

    (StatusCode::NO_CONTENT, jar)
}

fn issue_token(config: &Config, user_id: &str) -> Result<String> {
    create_jwt(user_id, &config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))
}

fn add_session_cookies(jar: CookieJar, config: &Config, token: &str) -> CookieJar {
    let secure = config.secure_cookies();
    let max_age = time::Duration::seconds(SESSION_TTL_SECS as i64);

    let mut token_cookie = session_cookie(SESSION_COOKIE, token.to_string(), true, secure);
    token_cookie.set_max_age(max_age);
    let mut hint_cookie = session_cookie(LOGGED_IN_COOKIE, "1".to_string(), false, secure);
    hint_cookie.set_max_age(max_age);

    jar.add(token_cookie).add(hint_cookie)
}

/// Cookies are removed with the same attributes they were created with.
fn session_cookie(
    name: &'static str,
    value: String,
    http_only: bool,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(http_only)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_request() -> RegisterRequest {
        RegisterRequest {
            email: "ada@example.com".to_string(),
            password: "long enough".to_string(),
            name: "Ada".to_string(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(ok_request().validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..ok_request()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..ok_request()
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(SESSION_COOKIE, "t".to_string(), true, true);
        let rendered = cookie.to_string();

        assert!(rendered.starts_with("fitrank_token=t"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Path=/"));
    }
}
