//! Error Module
//!
//! Error taxonomy for the authentication core and its conversion into
//! HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - AuthError taxonomy and status mapping
//! └── conversion.rs - IntoResponse and infrastructure conversions
//! ```
//!
//! All handlers return `Result<_, AuthError>`; the `IntoResponse`
//! implementation renders failures as the uniform `{ success, message }`
//! envelope with the status class defined by the taxonomy.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::AuthError;
