//! Authentication Handlers Module
//!
//! Flow-level HTTP handlers. Each handler translates typed failures from
//! the store, hashing service, and token issuer into the uniform
//! envelope; none of those lower layers format user-facing messages.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports
//! ├── types.rs    - Request/response types and the envelope
//! ├── register.rs - POST /api/auth/register
//! ├── login.rs    - POST /api/auth/login
//! ├── me.rs       - GET  /api/auth/me (protected)
//! ├── logout.rs   - POST /api/auth/logout (protected)
//! ├── password.rs - PUT  /api/auth/updatepassword (protected)
//! ├── forgot.rs   - POST /api/auth/forgotpassword
//! ├── reset.rs    - PUT  /api/auth/resetpassword/{token}
//! └── google.rs   - GET  /api/auth/google, /api/auth/google/callback
//! ```

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Current account handler
pub mod me;

/// Logout handler
pub mod logout;

/// Update password handler
pub mod password;

/// Forgot password handler
pub mod forgot;

/// Reset password handler
pub mod reset;

/// Google OAuth handlers
pub mod google;

pub use types::{
    AccountResponse, ApiResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, UpdatePasswordRequest,
};

pub use forgot::forgot_password;
pub use google::{google_callback, google_start};
pub use login::login;
pub use logout::logout;
pub use me::me;
pub use password::update_password;
pub use register::register;
pub use reset::reset_password;
