/**
 * Server Configuration
 *
 * Loads every runtime setting from the environment once at startup.
 * Handlers never read the environment; they see an `Arc<AppConfig>`
 * through application state. Optional capabilities (SMTP delivery,
 * Google OAuth) resolve to `Option`s here rather than being probed ad
 * hoc at call sites.
 */

use chrono::Duration;

/// SMTP transport settings for the email collaborator
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender, e.g. `OrganicShop <no-reply@organicshop.example>`
    pub from: String,
}

/// Google OAuth credentials
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds to
    pub port: u16,
    /// SQLite database URL
    pub database_url: String,
    /// Server-held secret for signing session tokens
    pub jwt_secret: String,
    /// Session token lifetime in days
    pub session_ttl_days: i64,
    /// Reset token lifetime in minutes
    pub reset_ttl_minutes: i64,
    /// Front-end origin used for reset links and OAuth redirects
    pub frontend_url: String,
    /// Whether session cookies carry the `Secure` attribute
    pub secure_cookies: bool,
    /// SMTP settings; `None` disables outbound email
    pub smtp: Option<SmtpConfig>,
    /// Google OAuth credentials; `None` disables the external-identity path
    pub google: Option<GoogleConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Missing optional sections are logged and left unset; a missing
    /// `JWT_SECRET` falls back to a development-only value with a loud
    /// warning.
    pub fn from_env() -> Self {
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:auth.db?mode=rwc".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using a development-only secret");
            "dev-secret-change-in-production".to_string()
        });

        let session_ttl_days = std::env::var("JWT_EXPIRE_DAYS")
            .ok()
            .and_then(|d| d.parse().ok())
            .unwrap_or(7);

        let reset_ttl_minutes = std::env::var("RESET_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|m| m.parse().ok())
            .unwrap_or(10);

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let secure_cookies = std::env::var("APP_ENV")
            .map(|env| env == "production")
            .unwrap_or(false);

        let smtp = match std::env::var("SMTP_HOST") {
            Ok(host) => Some(SmtpConfig {
                host,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587),
                username: std::env::var("SMTP_USER").ok(),
                password: std::env::var("SMTP_PASS").ok(),
                from: std::env::var("FROM_EMAIL")
                    .unwrap_or_else(|_| "no-reply@localhost".to_string()),
            }),
            Err(_) => {
                tracing::warn!("SMTP_HOST not set; outbound email disabled");
                None
            }
        };

        let google = match (
            std::env::var("GOOGLE_CLIENT_ID"),
            std::env::var("GOOGLE_CLIENT_SECRET"),
        ) {
            (Ok(client_id), Ok(client_secret)) if !client_id.is_empty() => Some(GoogleConfig {
                client_id,
                client_secret,
                redirect_uri: std::env::var("GOOGLE_REDIRECT_URI").unwrap_or_else(|_| {
                    format!("http://localhost:{}/api/auth/google/callback", port)
                }),
            }),
            _ => {
                tracing::warn!("Google OAuth not configured; external identity login disabled");
                None
            }
        };

        Self {
            port,
            database_url,
            jwt_secret,
            session_ttl_days,
            reset_ttl_minutes,
            frontend_url,
            secure_cookies,
            smtp,
            google,
        }
    }

    /// Session token lifetime
    pub fn session_ttl(&self) -> Duration {
        Duration::days(self.session_ttl_days)
    }

    /// Reset token lifetime
    pub fn reset_ttl(&self) -> Duration {
        Duration::minutes(self.reset_ttl_minutes)
    }
}
