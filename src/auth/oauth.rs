/**
 * External Identity Linker
 *
 * Reconciles a third-party-authenticated identity with existing or new
 * local accounts, and holds the Google OAuth client that performs the
 * authorization-code exchange.
 *
 * # Resolution order
 *
 * 1. An account already linked to this exact (provider, provider user id)
 *    is used as-is.
 * 2. Otherwise an account whose email equals the claimed email gains the
 *    external identity as a second authentication method.
 * 3. Otherwise a new account is created with the external identity and no
 *    local password.
 *
 * The client is constructed once at startup from configuration and passed
 * in explicitly; there is no global strategy registry. When the provider
 * credentials are absent the whole capability is absent.
 */

use serde::Deserialize;
use sqlx::SqlitePool;

use crate::auth::accounts::{
    self, is_unique_violation, normalize_email, Account,
};
use crate::error::AuthError;
use crate::server::config::GoogleConfig;

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Provider label stored on linked accounts
pub const GOOGLE_PROVIDER: &str = "google";

/// Identity claims handed back by a provider after it authenticated the user
#[derive(Debug, Clone)]
pub struct ExternalProfile {
    /// Stable provider-scoped user id
    pub provider_user_id: String,
    /// Email claim
    pub email: String,
    /// Display name claim
    pub display_name: String,
}

/// Google OAuth client
///
/// Performs the authorization-code exchange and userinfo fetch. The rest
/// of the core only consumes the resulting `ExternalProfile`.
#[derive(Debug, Clone)]
pub struct GoogleClient {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfoResponse {
    sub: String,
    email: Option<String>,
    name: Option<String>,
}

impl GoogleClient {
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            http: reqwest::Client::new(),
        }
    }

    /// Build the consent-screen URL the browser is sent to
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope=openid%20email%20profile",
            GOOGLE_AUTHORIZE_URL, self.client_id, self.redirect_uri
        )
    }

    /// Exchange an authorization code for the user's identity claims
    ///
    /// # Errors
    ///
    /// Any upstream failure (exchange rejected, userinfo unreachable,
    /// missing email claim) is surfaced as `Unauthorized`; the callback
    /// handler turns it into the failure redirect.
    pub async fn exchange_code(&self, code: &str) -> Result<ExternalProfile, AuthError> {
        let token: TokenResponse = self
            .http
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!("google code exchange failed: {:?}", e);
                AuthError::unauthorized("External authentication failed")
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::warn!("google token response malformed: {:?}", e);
                AuthError::unauthorized("External authentication failed")
            })?;

        let info: UserInfoResponse = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!("google userinfo fetch failed: {:?}", e);
                AuthError::unauthorized("External authentication failed")
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::warn!("google userinfo response malformed: {:?}", e);
                AuthError::unauthorized("External authentication failed")
            })?;

        let email = info.email.ok_or_else(|| {
            tracing::warn!("google profile carried no email claim");
            AuthError::unauthorized("External authentication failed")
        })?;

        let display_name = info
            .name
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        Ok(ExternalProfile {
            provider_user_id: info.sub,
            email,
            display_name,
        })
    }
}

/// Resolve an external profile to exactly one account
///
/// Each step short-circuits on match: existing link, then email claim,
/// then a fresh external-only account. A creation race against a
/// concurrent registration with the same email falls back to the
/// email-link branch instead of failing.
pub async fn resolve_external_identity(
    pool: &SqlitePool,
    provider: &str,
    profile: &ExternalProfile,
) -> Result<Account, AuthError> {
    if let Some(account) =
        accounts::find_by_external_identity(pool, provider, &profile.provider_user_id).await?
    {
        tracing::info!("external identity resolved to linked account {}", account.id);
        return Ok(account);
    }

    let email = normalize_email(&profile.email);

    if let Some(account) = accounts::find_by_email(pool, &email).await? {
        tracing::info!(
            "linking {} identity onto existing account {}",
            provider,
            account.id
        );
        let linked =
            accounts::link_external_identity(pool, account.id, provider, &profile.provider_user_id)
                .await?;
        return Ok(linked);
    }

    match accounts::create_external_account(
        pool,
        email.clone(),
        profile.display_name.clone(),
        provider.to_string(),
        profile.provider_user_id.clone(),
    )
    .await
    {
        Ok(account) => {
            tracing::info!("created account {} from {} identity", account.id, provider);
            Ok(account)
        }
        Err(e) if is_unique_violation(&e) => {
            // Lost a race to a concurrent registration with this email.
            let existing = accounts::find_by_email(pool, &email)
                .await?
                .ok_or_else(|| AuthError::server("Server error. Please try again later."))?;
            let linked = accounts::link_external_identity(
                pool,
                existing.id,
                provider,
                &profile.provider_user_id,
            )
            .await?;
            Ok(linked)
        }
        Err(e) => Err(e.into()),
    }
}
