//! Combat balance constants
//!
//! Every tunable number the combat engine and the progression bridge consult
//! lives here so balance changes never touch the resolution code.

use serde::{Deserialize, Serialize};

/// Tunable combat and progression constants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BattleRules {
    // Damage
    /// STR multiplier for physical damage
    pub physical_multiplier: f64,
    /// INT multiplier for magic damage
    pub magic_multiplier: f64,

    // Turn selection
    /// Probability that a turn uses the special ability
    pub special_ability_chance: f64,
    /// Probability that a basic attack is physical rather than magic
    pub physical_attack_chance: f64,
    /// Hit threshold before the accuracy difference is applied, out of 100
    pub base_hit_chance: f64,

    // Termination
    /// Rounds fought before the battle is called a tie
    pub max_rounds: u32,

    // Progression
    pub experience_on_win: i64,
    pub experience_on_loss: i64,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            physical_multiplier: 1.2,
            magic_multiplier: 1.5,
            special_ability_chance: 0.3,
            physical_attack_chance: 0.5,
            base_hit_chance: 50.0,
            max_rounds: 20,
            experience_on_win: 100,
            experience_on_loss: -50,
        }
    }
}

impl BattleRules {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            physical_multiplier: env_or(
                "ARENA_PHYSICAL_MULTIPLIER",
                defaults.physical_multiplier,
            ),
            magic_multiplier: env_or("ARENA_MAGIC_MULTIPLIER", defaults.magic_multiplier),
            special_ability_chance: env_or(
                "ARENA_SPECIAL_CHANCE",
                defaults.special_ability_chance,
            ),
            physical_attack_chance: env_or(
                "ARENA_PHYSICAL_CHANCE",
                defaults.physical_attack_chance,
            ),
            base_hit_chance: env_or("ARENA_BASE_HIT_CHANCE", defaults.base_hit_chance),
            max_rounds: env_or("ARENA_MAX_ROUNDS", defaults.max_rounds),
            experience_on_win: env_or("ARENA_XP_ON_WIN", defaults.experience_on_win),
            experience_on_loss: env_or("ARENA_XP_ON_LOSS", defaults.experience_on_loss),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
