//! Combat engine - Resolves one duel into an ordered list of narrated steps
//!
//! Resolution is eager and synchronous: the whole fight is simulated before any
//! step is delivered. The two characters are mutated in place; nothing else is.

use std::sync::Arc;

use super::{attack_resolver, RandomPort};
use crate::domain::entities::{Character, CharacterError};
use crate::domain::events::{BattleEvent, BattleStep};
use crate::domain::value_objects::{BattleRules, SpecialAbility};

/// One of the two combatants, by position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

/// Why a battle ended without a winner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieReason {
    /// Both sides fell in the same round
    MutualDefeat,
    /// The round cap was reached with both sides standing
    RoundLimit,
    /// A side was already at VIT <= 0 when the battle began
    DefeatedOnEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleResult {
    Winner(Side),
    Tie(TieReason),
}

/// Where a battle is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    Idle,
    Running { round: u32 },
    Concluded(BattleResult),
}

#[derive(Debug, thiserror::Error)]
pub enum BattleError {
    #[error("Invalid combatant: {0}")]
    InvalidCombatant(#[from] CharacterError),
}

/// The resolved battle
#[derive(Debug, Clone, PartialEq)]
pub struct BattleOutcome {
    pub result: BattleResult,
    /// Rounds actually fought
    pub rounds: u32,
    pub steps: Vec<BattleStep>,
}

impl BattleOutcome {
    pub fn winner(&self) -> Option<Side> {
        match self.result {
            BattleResult::Winner(side) => Some(side),
            BattleResult::Tie(_) => None,
        }
    }

    /// Every narration line, in order
    pub fn narration(&self) -> Vec<String> {
        self.steps.iter().flat_map(BattleStep::lines).collect()
    }

    /// Narration grouped by step, the unit the delivery channel paces
    pub fn chunks(&self) -> Vec<Vec<String>> {
        self.steps.iter().map(BattleStep::lines).collect()
    }

    /// Every event, in order
    pub fn events(&self) -> impl Iterator<Item = &BattleEvent> {
        self.steps.iter().flat_map(|step| step.events.iter())
    }
}

pub struct CombatEngine {
    rules: BattleRules,
    rng: Arc<dyn RandomPort>,
}

impl CombatEngine {
    pub fn new(rules: BattleRules, rng: Arc<dyn RandomPort>) -> Self {
        Self { rules, rng }
    }

    pub fn rules(&self) -> &BattleRules {
        &self.rules
    }

    /// Fight `first` against `second` until one falls, both fall, or the round
    /// cap is reached. `first` always acts first in a round.
    pub fn resolve(
        &self,
        first: &mut Character,
        second: &mut Character,
    ) -> Result<BattleOutcome, BattleError> {
        first.validate()?;
        second.validate()?;

        let mut steps = Vec::new();
        let mut rounds = 0;
        let mut phase = BattlePhase::Idle;
        loop {
            phase = match phase {
                BattlePhase::Idle => {
                    if first.is_alive() && second.is_alive() {
                        BattlePhase::Running { round: 1 }
                    } else {
                        BattlePhase::Concluded(BattleResult::Tie(TieReason::DefeatedOnEntry))
                    }
                }
                BattlePhase::Running { round } => {
                    if !(first.is_alive() && second.is_alive()) {
                        BattlePhase::Concluded(verdict(first, second))
                    } else if round > self.rules.max_rounds {
                        BattlePhase::Concluded(BattleResult::Tie(TieReason::RoundLimit))
                    } else {
                        rounds = round;
                        steps.push(BattleStep::single(BattleEvent::RoundStarted { round }));
                        steps.push(self.take_turn(first, second));
                        if second.is_alive() {
                            steps.push(self.take_turn(second, first));
                        }
                        BattlePhase::Running { round: round + 1 }
                    }
                }
                BattlePhase::Concluded(result) => {
                    let closing = match result {
                        BattleResult::Winner(Side::First) => BattleEvent::Victory {
                            winner: first.name.clone(),
                        },
                        BattleResult::Winner(Side::Second) => BattleEvent::Victory {
                            winner: second.name.clone(),
                        },
                        BattleResult::Tie(_) => BattleEvent::Tie,
                    };
                    steps.push(BattleStep::single(closing));
                    return Ok(BattleOutcome {
                        result,
                        rounds,
                        steps,
                    });
                }
            };
        }
    }

    /// One attack opportunity: special ability, else physical or magic.
    fn take_turn(&self, attacker: &mut Character, defender: &mut Character) -> BattleStep {
        let rng = self.rng.as_ref();
        let events = if rng.next_float() < self.rules.special_ability_chance {
            let ability = if attacker.special_ability.is_available_to(attacker.class) {
                attacker.special_ability
            } else {
                SpecialAbility::Unassigned
            };
            ability.execute(attacker, defender, &self.rules, rng)
        } else if rng.next_float() < self.rules.physical_attack_chance {
            vec![attack_resolver::physical_attack(attacker, defender, &self.rules, rng)]
        } else {
            vec![attack_resolver::magic_attack(attacker, defender, &self.rules, rng)]
        };
        BattleStep::new(events)
    }
}

fn verdict(first: &Character, second: &Character) -> BattleResult {
    match (first.is_alive(), second.is_alive()) {
        (true, false) => BattleResult::Winner(Side::First),
        (false, true) => BattleResult::Winner(Side::Second),
        _ => BattleResult::Tie(TieReason::MutualDefeat),
    }
}
