//! Battle events - What happened during a fight, one fact per event
//!
//! The combat engine records structured events; turning them into narration is
//! left to `Display`, which the delivery boundary calls when it renders a step.

use std::fmt;

use crate::domain::value_objects::{AttributeKind, SpecialAbility};

/// Which basic attack a turn used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Physical,
    Magic,
}

/// Whether a basic attack landed, and how hard
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackOutcome {
    Missed,
    Hit { damage: f64, critical: bool },
}

/// A single fact recorded by the combat engine
#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    RoundStarted {
        round: u32,
    },

    Attack {
        attacker: String,
        defender: String,
        kind: AttackKind,
        outcome: AttackOutcome,
    },

    /// An ability announced itself before its effects (Double Strike)
    AbilityActivated {
        actor: String,
        ability: SpecialAbility,
    },

    Healed {
        actor: String,
        ability: SpecialAbility,
        amount: f64,
    },

    AbilityDamage {
        attacker: String,
        defender: String,
        ability: SpecialAbility,
        damage: f64,
    },

    /// One attribute raised at the cost of another
    AttributeTrade {
        actor: String,
        ability: SpecialAbility,
        gained: AttributeKind,
        gain: f64,
        lost: AttributeKind,
        loss: f64,
    },

    NoAbility {
        actor: String,
    },

    Victory {
        winner: String,
    },

    Tie,
}

impl BattleEvent {
    /// Damage dealt by this event, if it dealt any
    pub fn damage(&self) -> Option<f64> {
        match self {
            BattleEvent::Attack {
                outcome: AttackOutcome::Hit { damage, .. },
                ..
            } => Some(*damage),
            BattleEvent::AbilityDamage { damage, .. } => Some(*damage),
            _ => None,
        }
    }

    pub fn is_verdict(&self) -> bool {
        matches!(self, BattleEvent::Victory { .. } | BattleEvent::Tie)
    }
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::RoundStarted { round } => write!(f, "Round {}:", round),
            BattleEvent::Attack {
                attacker,
                defender,
                kind,
                outcome,
            } => match (kind, outcome) {
                (AttackKind::Physical, AttackOutcome::Missed) => {
                    write!(f, "{} misses {}.", attacker, defender)
                }
                (AttackKind::Magic, AttackOutcome::Missed) => {
                    write!(f, "{}'s spell misses {}.", attacker, defender)
                }
                (AttackKind::Physical, AttackOutcome::Hit { damage, critical: true }) => write!(
                    f,
                    "{} hits a critical strike on {} for {} physical damage!",
                    attacker,
                    defender,
                    Amount(*damage)
                ),
                (AttackKind::Physical, AttackOutcome::Hit { damage, critical: false }) => write!(
                    f,
                    "{} hits {} for {} physical damage.",
                    attacker,
                    defender,
                    Amount(*damage)
                ),
                (AttackKind::Magic, AttackOutcome::Hit { damage, critical: true }) => write!(
                    f,
                    "{} casts a critical spell on {} for {} magic damage!",
                    attacker,
                    defender,
                    Amount(*damage)
                ),
                (AttackKind::Magic, AttackOutcome::Hit { damage, critical: false }) => write!(
                    f,
                    "{} casts a spell on {} for {} magic damage.",
                    attacker,
                    defender,
                    Amount(*damage)
                ),
            },
            BattleEvent::AbilityActivated { actor, ability } => {
                write!(f, "{} uses {}!", actor, ability.name())
            }
            BattleEvent::Healed {
                actor,
                ability,
                amount,
            } => write!(
                f,
                "{} uses {} and heals for {} health.",
                actor,
                ability.name(),
                Amount(*amount)
            ),
            BattleEvent::AbilityDamage {
                attacker,
                defender,
                ability,
                damage,
            } => write!(
                f,
                "{} casts {} on {} for {} magic damage.",
                attacker,
                ability.name(),
                defender,
                Amount(*damage)
            ),
            BattleEvent::AttributeTrade {
                actor,
                ability,
                gained,
                gain,
                lost,
                loss,
            } => write!(
                f,
                "{} uses {}, increasing {} by {} at the cost of {} {}.",
                actor,
                ability.name(),
                gained,
                Amount(*gain),
                Amount(*loss),
                lost
            ),
            BattleEvent::NoAbility { actor } => write!(f, "{} has no special ability.", actor),
            BattleEvent::Victory { winner } => write!(f, "{} Wins!", winner),
            BattleEvent::Tie => f.write_str("It's a Tie!"),
        }
    }
}

/// Round a damage, healing or trade amount to hundredths before it is applied,
/// so the narrated figure is exactly what the attributes moved by.
pub fn round_amount(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Renders an amount with at most two decimals and no trailing zeros.
struct Amount(f64);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{:.2}", self.0);
        f.write_str(text.trim_end_matches('0').trim_end_matches('.'))
    }
}

/// The events of one narrated step: a round marker, one turn, or the verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleStep {
    pub events: Vec<BattleEvent>,
}

impl BattleStep {
    pub fn new(events: Vec<BattleEvent>) -> Self {
        Self { events }
    }

    pub fn single(event: BattleEvent) -> Self {
        Self {
            events: vec![event],
        }
    }

    /// Narration lines for this step, one per event
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }
}
