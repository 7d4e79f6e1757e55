//! Application services - Use case implementations
//!
//! Each service accepts its repository as a port and returns domain entities.

pub mod battle_service;
pub mod battle_stream;
pub mod character_service;
pub mod progression_service;

pub use battle_service::{BattleService, BattleSession};
pub use character_service::{CharacterService, CharacterServiceImpl, CreateCharacterRequest};
