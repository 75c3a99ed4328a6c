//! Middleware Module
//!
//! The authentication gateway: token extraction, validation, and subject
//! resolution for protected routes.

/// Authentication gateway middleware
pub mod auth;

pub use auth::{require_auth, AuthAccount, CurrentAccount};
