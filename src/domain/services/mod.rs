//! Domain services - Pure combat and generation logic

pub mod attack_resolver;
pub mod character_factory;
pub mod combat_engine;
mod random;

pub use character_factory::CharacterFactory;
pub use combat_engine::{BattleError, BattleOutcome, BattleResult, CombatEngine, Side};
pub use random::RandomPort;
