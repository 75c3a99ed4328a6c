/**
 * Account Model and Database Operations
 *
 * The credential store: durable account records and every query the
 * authentication flows need. All lookups key on the normalized email or
 * the immutable account id; uniqueness races resolve at the storage
 * layer, not here.
 *
 * # Invariants
 *
 * - `email` is unique (enforced by the UNIQUE constraint; creation under
 *   a race yields exactly one success and one unique violation).
 * - Every account has `password_hash`, an external identity, or both
 *   (CHECK constraint).
 * - `password_hash` never leaves the store/hashing boundary; response
 *   projections are built from the other fields only.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Default role label assigned at creation
///
/// Opaque to this core and never settable by the account holder.
pub const DEFAULT_ROLE: &str = "user";

/// Account record as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID (UUID), immutable
    pub id: Uuid,
    /// Email address, stored normalized (trimmed, lowercased), unique
    pub email: String,
    /// Display name, mutable and non-authoritative
    pub display_name: String,
    /// bcrypt digest; `None` for accounts created purely via an external identity
    pub password_hash: Option<String>,
    /// External identity provider label (e.g. "google")
    pub provider: Option<String>,
    /// Provider-scoped stable user id
    pub provider_user_id: Option<String>,
    /// Opaque role label
    pub role: String,
    /// SHA-256 digest of an outstanding reset token
    pub reset_token_hash: Option<String>,
    /// Expiry of the outstanding reset token
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    /// Created at timestamp, immutable
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether this account is linked to an external identity
    pub fn has_external_identity(&self) -> bool {
        self.provider_user_id.is_some()
    }

    /// Whether this account can authenticate with a local password
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Normalize an email for storage and lookup
///
/// Trimmed and lowercased; every code path that touches the email column
/// goes through this so casing and whitespace variants collide.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether a storage error is the email/identity uniqueness constraint firing
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

const ACCOUNT_COLUMNS: &str = "id, email, display_name, password_hash, provider, \
     provider_user_id, role, reset_token_hash, reset_token_expires_at, created_at, updated_at";

/// Create an account with local credentials
///
/// # Arguments
/// * `email` - normalized email
/// * `display_name` - display name
/// * `password_hash` - bcrypt digest (never the plaintext)
///
/// # Errors
/// A duplicate email surfaces as a unique-violation database error;
/// callers translate it to a Conflict.
pub async fn create_local_account(
    pool: &SqlitePool,
    email: String,
    display_name: String,
    password_hash: String,
) -> Result<Account, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let account = sqlx::query_as::<_, Account>(&format!(
        r#"
        INSERT INTO accounts (id, email, display_name, password_hash, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&email)
    .bind(&display_name)
    .bind(&password_hash)
    .bind(DEFAULT_ROLE)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(account)
}

/// Create an account from an external identity, with no local password
pub async fn create_external_account(
    pool: &SqlitePool,
    email: String,
    display_name: String,
    provider: String,
    provider_user_id: String,
) -> Result<Account, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let account = sqlx::query_as::<_, Account>(&format!(
        r#"
        INSERT INTO accounts (id, email, display_name, provider, provider_user_id, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&email)
    .bind(&display_name)
    .bind(&provider)
    .bind(&provider_user_id)
    .bind(DEFAULT_ROLE)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(account)
}

/// Get an account by normalized email
pub async fn find_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        r#"
        SELECT {ACCOUNT_COLUMNS}
        FROM accounts
        WHERE email = ?
        "#
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Get an account by ID
pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        r#"
        SELECT {ACCOUNT_COLUMNS}
        FROM accounts
        WHERE id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Get an account by its linked external identity
pub async fn find_by_external_identity(
    pool: &SqlitePool,
    provider: &str,
    provider_user_id: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        r#"
        SELECT {ACCOUNT_COLUMNS}
        FROM accounts
        WHERE provider = ? AND provider_user_id = ?
        "#
    ))
    .bind(provider)
    .bind(provider_user_id)
    .fetch_optional(pool)
    .await
}

/// Link an external identity onto an existing account
///
/// Any existing `password_hash` is left untouched, so the account gains a
/// second authentication method.
pub async fn link_external_identity(
    pool: &SqlitePool,
    id: Uuid,
    provider: &str,
    provider_user_id: &str,
) -> Result<Account, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        r#"
        UPDATE accounts
        SET provider = ?, provider_user_id = ?, updated_at = ?
        WHERE id = ?
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(provider)
    .bind(provider_user_id)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(pool)
    .await
}

/// Replace an account's password hash
///
/// Also clears any outstanding reset token: a password change invalidates
/// a pending recovery.
pub async fn update_password(
    pool: &SqlitePool,
    id: Uuid,
    password_hash: String,
) -> Result<Account, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        r#"
        UPDATE accounts
        SET password_hash = ?, reset_token_hash = NULL, reset_token_expires_at = NULL, updated_at = ?
        WHERE id = ?
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(&password_hash)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(pool)
    .await
}

/// Store a reset-token digest and expiry on an account
///
/// Overwrites any prior outstanding token, which invalidates the old
/// reset link immediately.
pub async fn set_reset_token(
    pool: &SqlitePool,
    id: Uuid,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE accounts
        SET reset_token_hash = ?, reset_token_expires_at = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(token_hash)
    .bind(expires_at)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Clear the reset-token fields on an account
pub async fn clear_reset_token(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE accounts
        SET reset_token_hash = NULL, reset_token_expires_at = NULL, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Atomically consume a reset token and set the new password
///
/// Matches the stored digest AND a still-future expiry, replaces the
/// password hash, and clears the token fields in one statement, so two
/// concurrent consumption attempts with the same token cannot both
/// succeed. Returns `None` when the token is wrong, already consumed, or
/// expired; the three causes are indistinguishable here by design.
pub async fn consume_reset_token(
    pool: &SqlitePool,
    token_hash: &str,
    new_password_hash: String,
    now: DateTime<Utc>,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        r#"
        UPDATE accounts
        SET password_hash = ?, reset_token_hash = NULL, reset_token_expires_at = NULL, updated_at = ?
        WHERE reset_token_hash = ? AND reset_token_expires_at > ?
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(&new_password_hash)
    .bind(now)
    .bind(token_hash)
    .bind(now)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
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

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("bob@example.com"), "bob@example.com");
    }

    #[tokio::test]
    async fn test_create_and_find_local_account() {
        let pool = test_pool().await;
        let account = create_local_account(
            &pool,
            "alice@example.com".to_string(),
            "Alice".to_string(),
            "digest".to_string(),
        )
        .await
        .unwrap();

        assert_eq!(account.role, DEFAULT_ROLE);
        assert!(account.has_password());
        assert!(!account.has_external_identity());

        let found = find_by_email(&pool, "alice@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, account.id);

        let by_id = find_by_id(&pool, account.id).await.unwrap();
        assert_eq!(by_id.unwrap().email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let pool = test_pool().await;
        create_local_account(
            &pool,
            "alice@example.com".to_string(),
            "Alice".to_string(),
            "digest".to_string(),
        )
        .await
        .unwrap();

        let error = create_local_account(
            &pool,
            "alice@example.com".to_string(),
            "Other Alice".to_string(),
            "digest2".to_string(),
        )
        .await
        .unwrap_err();

        assert!(is_unique_violation(&error));
    }

    #[tokio::test]
    async fn test_external_account_and_lookup() {
        let pool = test_pool().await;
        let account = create_external_account(
            &pool,
            "carol@example.com".to_string(),
            "Carol".to_string(),
            "google".to_string(),
            "google-uid-1".to_string(),
        )
        .await
        .unwrap();

        assert!(!account.has_password());
        assert!(account.has_external_identity());

        let found = find_by_external_identity(&pool, "google", "google-uid-1")
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, account.id);
    }

    #[tokio::test]
    async fn test_link_identity_keeps_password() {
        let pool = test_pool().await;
        let account = create_local_account(
            &pool,
            "dave@example.com".to_string(),
            "Dave".to_string(),
            "digest".to_string(),
        )
        .await
        .unwrap();

        let linked = link_external_identity(&pool, account.id, "google", "google-uid-2")
            .await
            .unwrap();
        assert!(linked.has_password());
        assert!(linked.has_external_identity());
    }

    #[tokio::test]
    async fn test_consume_reset_token_is_single_use() {
        let pool = test_pool().await;
        let account = create_local_account(
            &pool,
            "erin@example.com".to_string(),
            "Erin".to_string(),
            "digest".to_string(),
        )
        .await
        .unwrap();

        let expires_at = Utc::now() + chrono::Duration::minutes(10);
        set_reset_token(&pool, account.id, "token-digest", expires_at)
            .await
            .unwrap();

        let consumed =
            consume_reset_token(&pool, "token-digest", "new-digest".to_string(), Utc::now())
                .await
                .unwrap();
        let consumed = consumed.expect("first consumption should win");
        assert_eq!(consumed.password_hash.as_deref(), Some("new-digest"));
        assert!(consumed.reset_token_hash.is_none());
        assert!(consumed.reset_token_expires_at.is_none());

        // The token fields were cleared, so a replay finds nothing.
        let replay =
            consume_reset_token(&pool, "token-digest", "other-digest".to_string(), Utc::now())
                .await
                .unwrap();
        assert!(replay.is_none());
    }

    #[tokio::test]
    async fn test_consume_expired_reset_token_fails() {
        let pool = test_pool().await;
        let account = create_local_account(
            &pool,
            "frank@example.com".to_string(),
            "Frank".to_string(),
            "digest".to_string(),
        )
        .await
        .unwrap();

        let expired = Utc::now() - chrono::Duration::minutes(1);
        set_reset_token(&pool, account.id, "token-digest", expired)
            .await
            .unwrap();

        let consumed =
            consume_reset_token(&pool, "token-digest", "new-digest".to_string(), Utc::now())
                .await
                .unwrap();
        assert!(consumed.is_none());
    }

    #[tokio::test]
    async fn test_update_password_clears_reset_token() {
        let pool = test_pool().await;
        let account = create_local_account(
            &pool,
            "grace@example.com".to_string(),
            "Grace".to_string(),
            "digest".to_string(),
        )
        .await
        .unwrap();

        set_reset_token(
            &pool,
            account.id,
            "token-digest",
            Utc::now() + chrono::Duration::minutes(10),
        )
        .await
        .unwrap();

        let updated = update_password(&pool, account.id, "new-digest".to_string())
            .await
            .unwrap();
        assert_eq!(updated.password_hash.as_deref(), Some("new-digest"));
        assert!(updated.reset_token_hash.is_none());
    }
}
