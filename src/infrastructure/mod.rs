//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite adapter for data storage
//! - HTTP: REST API routes
//! - Storage: Character photo files
//! - Verification: Registration codes and their delivery
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod http;
pub mod persistence;
pub mod state;
pub mod storage;
pub mod verification;
