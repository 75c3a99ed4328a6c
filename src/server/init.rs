/**
 * Server Initialization
 *
 * Builds the application: configuration, database pool and migrations,
 * optional collaborators, and the router. The database is required -
 * every operation in this core needs the store, so startup fails fast
 * rather than serving degraded.
 */

use std::sync::Arc;

use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::auth::oauth::GoogleClient;
use crate::email::{Mailer, SmtpMailer};
use crate::routes::create_router;
use crate::server::config::AppConfig;
use crate::server::state::AppState;

/// Connect to the database and run migrations
pub async fn connect_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("connecting to database");
    let pool = SqlitePoolOptions::new().connect(database_url).await?;

    tracing::info!("running database migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Build the application state from configuration
pub async fn build_state(config: AppConfig) -> Result<AppState, sqlx::Error> {
    let pool = connect_database(&config.database_url).await?;

    let mailer: Option<Arc<dyn Mailer>> = match &config.smtp {
        Some(smtp) => match SmtpMailer::new(smtp) {
            Ok(mailer) => {
                tracing::info!("SMTP mailer configured for {}", smtp.host);
                Some(Arc::new(mailer))
            }
            Err(e) => {
                tracing::error!("failed to build SMTP mailer: {}", e);
                None
            }
        },
        None => None,
    };

    let google = config.google.as_ref().map(|g| {
        tracing::info!("Google OAuth configured");
        Arc::new(GoogleClient::new(g))
    });

    Ok(AppState {
        pool,
        config: Arc::new(config),
        mailer,
        google,
    })
}

/// Create the Axum application
pub async fn create_app(config: AppConfig) -> Result<Router, sqlx::Error> {
    let state = build_state(config).await?;
    Ok(create_router(state))
}
