/**
 * Application State Management
 *
 * The `AppState` struct is the central state container handed to every
 * handler. `FromRef` implementations let handlers extract just the piece
 * they need instead of the whole state.
 *
 * # Thread Safety
 *
 * All fields are cheaply cloneable handles: the sqlx pool is internally
 * shared, configuration and the optional collaborators sit behind `Arc`.
 * Optional services are `Option<T>` - an absent capability, not a
 * scattered conditional.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::auth::oauth::GoogleClient;
use crate::email::Mailer;
use crate::server::config::AppConfig;

/// Application state for the authentication server
///
/// # Fields
///
/// * `pool` - SQLite connection pool (the storage collaborator)
/// * `config` - startup configuration, shared read-only
/// * `mailer` - email collaborator; `None` when SMTP is not configured
/// * `google` - Google OAuth client; `None` when credentials are absent
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub mailer: Option<Arc<dyn Mailer>>,
    pub google: Option<Arc<GoogleClient>>,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
