//! Application layer - Use cases over the domain
//!
//! This layer contains:
//! - Ports: the persistence contract infrastructure implements
//! - Services: character management, battles, pacing and progression

pub mod ports;
pub mod services;
