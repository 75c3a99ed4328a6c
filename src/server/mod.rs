//! Server Module
//!
//! Startup concerns: configuration loading, shared application state,
//! and application construction.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports
//! ├── config.rs - Environment configuration
//! ├── state.rs  - AppState and FromRef implementations
//! └── init.rs   - Database connection and app construction
//! ```

/// Environment configuration
pub mod config;

/// Application state
pub mod state;

/// Application construction
pub mod init;

pub use config::AppConfig;
pub use state::AppState;
