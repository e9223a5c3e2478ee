// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication tests.
//!
//! These tests verify that JWT tokens created by auth routes can be decoded
//! by the auth middleware, catching compatibility issues early.

use fitrank_tracker::middleware::auth::{create_jwt, verify_jwt};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims structure that must match what the middleware expects.
/// This is the canonical format - if either create_jwt or the middleware
/// changes, this test should catch the incompatibility.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

fn now() -> usize {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

#[test]
fn test_created_token_has_canonical_claims() {
    let token = create_jwt("4b7c9a1e-user", SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);
    let decoded = decode::<Claims>(&token, &key, &validation).unwrap();

    assert_eq!(decoded.claims.sub, "4b7c9a1e-user");
    // 30-day session
    assert_eq!(decoded.claims.exp - decoded.claims.iat, 30 * 24 * 60 * 60);
}

#[test]
fn test_expired_token_rejected() {
    let claims = Claims {
        sub: "user-1".to_string(),
        exp: now() - 3600,
        iat: now() - 7200,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .unwrap();

    assert_eq!(verify_jwt(&token, SIGNING_KEY), None);
}

#[test]
fn test_wrong_algorithm_rejected() {
    let claims = Claims {
        sub: "user-1".to_string(),
        exp: now() + 3600,
        iat: now(),
    };
    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .unwrap();

    assert_eq!(verify_jwt(&token, SIGNING_KEY), None);
}

#[test]
fn test_empty_subject_rejected() {
    let claims = Claims {
        sub: String::new(),
        exp: now() + 3600,
        iat: now(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .unwrap();

    assert_eq!(verify_jwt(&token, SIGNING_KEY), None);
}
