//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: in-memory and REST character repositories
//! - Random: the thread-local random source
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod persistence;
pub mod random;
pub mod state;
