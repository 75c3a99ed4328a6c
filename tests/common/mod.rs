//! Shared test fixtures
//!
//! In-memory database, test configuration, and a recording mailer so the
//! flows can run end to end without SMTP or a database server.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use organicshop_auth::email::{MailError, Mailer};
use organicshop_auth::server::config::AppConfig;
use organicshop_auth::server::state::AppState;

/// A captured outbound email
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Recording mailer; can be told to fail the next send
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<SentEmail>>,
    fail_next: AtomicBool,
}

impl MemoryMailer {
    pub fn fail_next_send(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(MailError::Other("simulated send failure".to_string()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

/// Configuration for tests: fixed secret, no SMTP/Google from env
pub fn test_config() -> AppConfig {
    AppConfig {
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        session_ttl_days: 7,
        reset_ttl_minutes: 10,
        frontend_url: "http://localhost:5173".to_string(),
        secure_cookies: false,
        smtp: None,
        google: None,
    }
}

/// Open a migrated in-memory database
///
/// A single connection keeps every query on the same in-memory store.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");
    pool
}

/// Application fixture with a recording mailer
pub struct TestApp {
    pub state: AppState,
    pub mailer: Arc<MemoryMailer>,
}

/// Build a full application state over an in-memory database
pub async fn test_app() -> TestApp {
    let mailer = Arc::new(MemoryMailer::default());
    let state = AppState {
        pool: test_pool().await,
        config: Arc::new(test_config()),
        mailer: Some(mailer.clone() as Arc<dyn Mailer>),
        google: None,
    };
    TestApp { state, mailer }
}

/// Read a response body back as the JSON envelope
pub async fn envelope(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

/// Pull the plaintext reset token out of a captured reset email
pub fn reset_token_from_email(email: &SentEmail) -> String {
    let marker = "/reset-password/";
    let start = email
        .html_body
        .find(marker)
        .expect("reset email carried no reset link")
        + marker.len();
    email.html_body[start..]
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect()
}
