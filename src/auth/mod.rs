//! Authentication Module
//!
//! The security core: credential storage, password hashing, session
//! token issuance, password recovery, external identity linking, and the
//! HTTP handlers that drive them.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs       - Module exports
//! ├── accounts.rs  - Account model and database operations
//! ├── passwords.rs - bcrypt hashing service
//! ├── sessions.rs  - Session token issuance and validation
//! ├── reset.rs     - Recovery token primitives
//! ├── oauth.rs     - Google client and identity linking
//! └── handlers/    - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: credentials validated → password hashed → account
//!    created → session token returned
//! 2. **Login**: account looked up by normalized email → password
//!    verified → session token returned
//! 3. **Reset**: random token mailed, digest stored → consumption swaps
//!    the password atomically → fresh session token
//! 4. **Google**: code exchange → identity resolved to one account →
//!    token handed back over a redirect
//!
//! # Security
//!
//! - Passwords are bcrypt-hashed on the blocking pool before storage
//! - Session tokens are signed and time-limited; signature and expiry
//!   checks are both mandatory
//! - Login failures are uniform to resist account enumeration
//! - Reset tokens are single-use, short-lived, and stored only as digests

/// Account model and database operations
pub mod accounts;

/// Password hashing service
pub mod passwords;

/// Session token issuance and validation
pub mod sessions;

/// Recovery token primitives
pub mod reset;

/// External identity linking
pub mod oauth;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use accounts::Account;
pub use handlers::{
    forgot_password, google_callback, google_start, login, logout, me, register,
    reset_password, update_password,
};
