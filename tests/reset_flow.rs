//! Password recovery edge cases
//!
//! The happy path lives in the lifecycle test; this file covers the
//! failure modes: unknown email, external-only accounts, delivery
//! failures, replay, expiry, and supersession.

mod common;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

use organicshop_auth::auth::accounts;
use organicshop_auth::auth::handlers::types::{ForgotPasswordRequest, ResetPasswordRequest};
use organicshop_auth::auth::handlers::{forgot_password, reset_password};
use organicshop_auth::auth::reset::hash_reset_token;
use organicshop_auth::error::AuthError;
use organicshop_auth::server::state::AppState;

use common::{reset_token_from_email, test_app, test_config, test_pool, TestApp};

async fn seed_account(app: &TestApp, email: &str) {
    accounts::create_local_account(
        &app.state.pool,
        email.to_string(),
        "Test Account".to_string(),
        "$2b$12$invalidinvalidinvalidinvalidinvalidinvalidinvalidinv".to_string(),
    )
    .await
    .unwrap();
}

fn forgot_request(email: &str) -> Json<ForgotPasswordRequest> {
    Json(ForgotPasswordRequest {
        email: email.to_string(),
    })
}

fn reset_request(password: &str) -> Json<ResetPasswordRequest> {
    Json(ResetPasswordRequest {
        password: password.to_string(),
    })
}

#[tokio::test]
async fn forgot_password_discloses_unknown_email() {
    let app = test_app().await;

    let error = forgot_password(State(app.state.clone()), forgot_request("nobody@example.com"))
        .await
        .unwrap_err();

    assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(error.message(), "No account found with that email address");
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn forgot_password_rejects_external_only_account() {
    let app = test_app().await;
    accounts::create_external_account(
        &app.state.pool,
        "carol@example.com".to_string(),
        "Carol".to_string(),
        "google".to_string(),
        "google-uid-1".to_string(),
    )
    .await
    .unwrap();

    let error = forgot_password(State(app.state.clone()), forgot_request("carol@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(error, AuthError::NotLinked(_)));
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn forgot_password_without_mailer_is_a_server_error() {
    let state = AppState {
        pool: test_pool().await,
        config: Arc::new(test_config()),
        mailer: None,
        google: None,
    };
    accounts::create_local_account(
        &state.pool,
        "alice@example.com".to_string(),
        "Alice".to_string(),
        "digest".to_string(),
    )
    .await
    .unwrap();

    let error = forgot_password(State(state.clone()), forgot_request("alice@example.com"))
        .await
        .unwrap_err();

    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error.message(),
        "Email could not be sent. Please try again later."
    );

    // No token may stay outstanding when nothing was sent.
    let account = accounts::find_by_email(&state.pool, "alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(account.reset_token_hash.is_none());
}

#[tokio::test]
async fn send_failure_clears_the_stored_token() {
    let app = test_app().await;
    seed_account(&app, "alice@example.com").await;

    app.mailer.fail_next_send();
    let error = forgot_password(State(app.state.clone()), forgot_request("alice@example.com"))
        .await
        .unwrap_err();
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let account = accounts::find_by_email(&app.state.pool, "alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(account.reset_token_hash.is_none());
    assert!(account.reset_token_expires_at.is_none());
}

#[tokio::test]
async fn reset_token_is_single_use() {
    let app = test_app().await;
    seed_account(&app, "alice@example.com").await;

    forgot_password(State(app.state.clone()), forgot_request("alice@example.com"))
        .await
        .unwrap();
    let token = reset_token_from_email(&app.mailer.sent()[0]);

    reset_password(
        State(app.state.clone()),
        Path(token.clone()),
        reset_request("secret2"),
    )
    .await
    .unwrap();

    // Replay with the same token finds no matching digest.
    let error = reset_password(
        State(app.state.clone()),
        Path(token),
        reset_request("secret3"),
    )
    .await
    .unwrap_err();

    assert!(matches!(error, AuthError::InvalidResetToken(_)));
    assert_eq!(error.message(), "Invalid or expired reset token");
}

#[tokio::test]
async fn expired_reset_token_is_rejected() {
    let app = test_app().await;
    seed_account(&app, "alice@example.com").await;
    let account = accounts::find_by_email(&app.state.pool, "alice@example.com")
        .await
        .unwrap()
        .unwrap();

    // Plant a token whose window has already closed.
    accounts::set_reset_token(
        &app.state.pool,
        account.id,
        &hash_reset_token("stale-token"),
        Utc::now() - Duration::minutes(1),
    )
    .await
    .unwrap();

    let error = reset_password(
        State(app.state.clone()),
        Path("stale-token".to_string()),
        reset_request("secret2"),
    )
    .await
    .unwrap_err();

    assert!(matches!(error, AuthError::InvalidResetToken(_)));
}

#[tokio::test]
async fn new_reset_request_invalidates_the_previous_token() {
    let app = test_app().await;
    seed_account(&app, "alice@example.com").await;

    forgot_password(State(app.state.clone()), forgot_request("alice@example.com"))
        .await
        .unwrap();
    forgot_password(State(app.state.clone()), forgot_request("alice@example.com"))
        .await
        .unwrap();

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 2);
    let first = reset_token_from_email(&sent[0]);
    let second = reset_token_from_email(&sent[1]);
    assert_ne!(first, second);

    let error = reset_password(
        State(app.state.clone()),
        Path(first),
        reset_request("secret2"),
    )
    .await
    .unwrap_err();
    assert!(matches!(error, AuthError::InvalidResetToken(_)));

    reset_password(
        State(app.state.clone()),
        Path(second),
        reset_request("secret2"),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn reset_validates_the_new_password_first() {
    let app = test_app().await;

    // A short password is rejected before the token is even looked at.
    let error = reset_password(
        State(app.state.clone()),
        Path("irrelevant".to_string()),
        reset_request("abc"),
    )
    .await
    .unwrap_err();

    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error.message(), "Password must be at least 6 characters");
}
