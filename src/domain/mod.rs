//! Domain layer - Combat rules and the characters they act on
//!
//! This layer contains:
//! - Entities: Character
//! - Value Objects: attributes, classes, special abilities, battle rules, ids
//! - Events: the structured record of a fight
//! - Services: attack resolution, the combat engine, character generation

pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;
