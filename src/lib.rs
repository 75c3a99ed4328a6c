//! OrganicShop Authentication Core
//!
//! The account authentication and session security core of the
//! OrganicShop backend: local credential registration and login, signed
//! time-limited session tokens, a single-use password recovery flow,
//! Google identity linking, and the gateway middleware that protects
//! everything downstream.
//!
//! Catalog, cart, and order services are external collaborators; this
//! crate owns only the security-sensitive state machines.

/// Authentication core: accounts, hashing, sessions, recovery, linking
pub mod auth;

/// Outbound email collaborator
pub mod email;

/// Error taxonomy and envelope conversion
pub mod error;

/// Authentication gateway middleware
pub mod middleware;

/// Router assembly
pub mod routes;

/// Configuration, state, and app construction
pub mod server;
