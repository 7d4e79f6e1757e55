//! Basic attack resolution shared by the combat engine and Double Strike

use super::RandomPort;
use crate::domain::entities::Character;
use crate::domain::events::{round_amount, AttackKind, AttackOutcome, BattleEvent};
use crate::domain::value_objects::BattleRules;

pub fn physical_attack(
    attacker: &Character,
    defender: &mut Character,
    rules: &BattleRules,
    rng: &dyn RandomPort,
) -> BattleEvent {
    resolve(AttackKind::Physical, attacker, defender, rules, rng)
}

pub fn magic_attack(
    attacker: &Character,
    defender: &mut Character,
    rules: &BattleRules,
    rng: &dyn RandomPort,
) -> BattleEvent {
    resolve(AttackKind::Magic, attacker, defender, rules, rng)
}

/// Damage before any critical doubling; never negative.
pub fn base_damage(power: f64, resistance: f64, multiplier: f64) -> f64 {
    (power * multiplier - resistance / 2.0).max(0.0)
}

/// Hit roll, damage, crit roll, then apply to the defender's VIT.
///
/// Physical attacks compare DEX and resist with VIT; magic attacks use INT for
/// accuracy, power and resistance alike. The crit roll is only drawn on a hit.
fn resolve(
    kind: AttackKind,
    attacker: &Character,
    defender: &mut Character,
    rules: &BattleRules,
    rng: &dyn RandomPort,
) -> BattleEvent {
    let a = &attacker.attributes;
    let d = &defender.attributes;
    let (accuracy, evasion, power, resistance, multiplier) = match kind {
        AttackKind::Physical => (
            a.dexterity,
            d.dexterity,
            a.strength,
            d.vitality,
            rules.physical_multiplier,
        ),
        AttackKind::Magic => (
            a.intelligence,
            d.intelligence,
            a.intelligence,
            d.intelligence,
            rules.magic_multiplier,
        ),
    };

    let hit_chance = rng.next_float() * 100.0;
    let hit_threshold = rules.base_hit_chance + accuracy - evasion;
    let outcome = if hit_chance <= hit_threshold {
        let mut damage = base_damage(power, resistance, multiplier);
        let crit_chance = rng.next_float() * 100.0;
        let critical = crit_chance <= a.luck;
        if critical {
            damage *= 2.0;
        }
        let damage = round_amount(damage);
        defender.attributes.vitality -= damage;
        AttackOutcome::Hit { damage, critical }
    } else {
        AttackOutcome::Missed
    };

    BattleEvent::Attack {
        attacker: attacker.name.clone(),
        defender: defender.name.clone(),
        kind,
        outcome,
    }
}
