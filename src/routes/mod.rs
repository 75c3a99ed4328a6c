//! Routes Module
//!
//! Router assembly for the authentication server.

/// Router configuration
pub mod router;

pub use router::create_router;
