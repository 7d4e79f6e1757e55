//! Class-restricted special abilities
//!
//! A special ability replaces a basic attack on roughly a third of all turns.
//! Each variant is a fixed effect over the two combatants; Double Strike reuses
//! the shared attack resolver instead of reaching back into the engine.

use serde::{Deserialize, Serialize};

use super::{AttributeKind, BattleRules, CharacterClass};
use crate::domain::entities::Character;
use crate::domain::events::{round_amount, BattleEvent};
use crate::domain::services::{attack_resolver, RandomPort};

/// The special ability bound to a character.
///
/// `Unassigned` is the stand-in for characters with no eligible ability and
/// for records whose ability could not be recognised: it narrates and does
/// nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAbility {
    DoubleStrike,
    HealingLight,
    Fireball,
    AbsoluteDefense,
    ManaShield,
    DoubleSpeed,
    MaximumHealing,
    Unassigned,
}

impl SpecialAbility {
    /// Every assignable ability, in catalog order.
    pub const CATALOG: [SpecialAbility; 7] = [
        SpecialAbility::DoubleStrike,
        SpecialAbility::HealingLight,
        SpecialAbility::Fireball,
        SpecialAbility::AbsoluteDefense,
        SpecialAbility::ManaShield,
        SpecialAbility::DoubleSpeed,
        SpecialAbility::MaximumHealing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpecialAbility::DoubleStrike => "Double Strike",
            SpecialAbility::HealingLight => "Healing Light",
            SpecialAbility::Fireball => "Fireball",
            SpecialAbility::AbsoluteDefense => "Absolute Defense",
            SpecialAbility::ManaShield => "Mana Shield",
            SpecialAbility::DoubleSpeed => "Double Speed",
            SpecialAbility::MaximumHealing => "Maximum Healing",
            SpecialAbility::Unassigned => "No Special Ability",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SpecialAbility::DoubleStrike => "Attacks twice in one turn",
            SpecialAbility::HealingLight => "Heals the attacker for 50% of their INT",
            SpecialAbility::Fireball => "Deals INT*2 damage to the defender",
            SpecialAbility::AbsoluteDefense => "Greatly increases defense at the cost of STR",
            SpecialAbility::ManaShield => "Increases defense at the cost of INT",
            SpecialAbility::DoubleSpeed => "Greatly increases agility (DEX) at the cost of VIT",
            SpecialAbility::MaximumHealing => "Fully regenerates health, greatly increasing VIT",
            SpecialAbility::Unassigned => "Does nothing",
        }
    }

    /// Classes allowed to hold this ability.
    pub fn classes(&self) -> &'static [CharacterClass] {
        use CharacterClass::*;
        match self {
            SpecialAbility::DoubleStrike => &[Knight, Paladin],
            SpecialAbility::HealingLight => &[Druid, Paladin],
            SpecialAbility::Fireball => &[Sorcerer, Druid],
            SpecialAbility::AbsoluteDefense => &[Knight],
            SpecialAbility::ManaShield => &[Sorcerer],
            SpecialAbility::DoubleSpeed => &[Paladin],
            SpecialAbility::MaximumHealing => &[Druid],
            SpecialAbility::Unassigned => &[],
        }
    }

    /// `Unassigned` is available to everyone since it does nothing.
    pub fn is_available_to(&self, class: CharacterClass) -> bool {
        *self == SpecialAbility::Unassigned || self.classes().contains(&class)
    }

    pub fn eligible_for(class: CharacterClass) -> Vec<SpecialAbility> {
        SpecialAbility::CATALOG
            .into_iter()
            .filter(|ability| ability.classes().contains(&class))
            .collect()
    }

    /// Look an ability up by its display name, ignoring case.
    pub fn from_name(name: &str) -> Option<SpecialAbility> {
        SpecialAbility::CATALOG
            .into_iter()
            .find(|ability| ability.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Apply the ability's effect and describe what happened.
    pub fn execute(
        &self,
        attacker: &mut Character,
        defender: &mut Character,
        rules: &BattleRules,
        rng: &dyn RandomPort,
    ) -> Vec<BattleEvent> {
        let ability = *self;
        match ability {
            SpecialAbility::DoubleStrike => {
                let mut events = vec![BattleEvent::AbilityActivated {
                    actor: attacker.name.clone(),
                    ability,
                }];
                events.push(attack_resolver::physical_attack(attacker, defender, rules, rng));
                if defender.is_alive() {
                    events.push(attack_resolver::physical_attack(attacker, defender, rules, rng));
                }
                events
            }
            SpecialAbility::HealingLight => {
                let amount = round_amount(attacker.attributes.intelligence * 0.5);
                attacker.attributes.vitality += amount;
                vec![BattleEvent::Healed {
                    actor: attacker.name.clone(),
                    ability,
                    amount,
                }]
            }
            SpecialAbility::Fireball => {
                let damage = round_amount(
                    (attacker.attributes.intelligence * 2.0
                        - defender.attributes.intelligence / 2.0)
                        .max(0.0),
                );
                defender.attributes.vitality -= damage;
                vec![BattleEvent::AbilityDamage {
                    attacker: attacker.name.clone(),
                    defender: defender.name.clone(),
                    ability,
                    damage,
                }]
            }
            SpecialAbility::AbsoluteDefense => {
                let gain = round_amount(attacker.attributes.vitality * 0.5);
                let loss = round_amount(gain * 0.5);
                attacker.attributes.vitality += gain;
                attacker.attributes.strength -= loss;
                vec![BattleEvent::AttributeTrade {
                    actor: attacker.name.clone(),
                    ability,
                    gained: AttributeKind::Vit,
                    gain,
                    lost: AttributeKind::Str,
                    loss,
                }]
            }
            SpecialAbility::ManaShield => {
                let cost = round_amount(attacker.attributes.intelligence * 0.5);
                let gain = round_amount(cost * 0.5);
                attacker.attributes.vitality += gain;
                let before = attacker.attributes.intelligence;
                attacker.attributes.intelligence = (before - cost).max(0.0);
                vec![BattleEvent::AttributeTrade {
                    actor: attacker.name.clone(),
                    ability,
                    gained: AttributeKind::Vit,
                    gain,
                    lost: AttributeKind::Int,
                    loss: round_amount(before - attacker.attributes.intelligence),
                }]
            }
            SpecialAbility::DoubleSpeed => {
                let gain = round_amount(attacker.attributes.dexterity * 0.5);
                let loss = round_amount(gain * 0.5);
                attacker.attributes.dexterity += gain;
                attacker.attributes.vitality -= loss;
                vec![BattleEvent::AttributeTrade {
                    actor: attacker.name.clone(),
                    ability,
                    gained: AttributeKind::Dex,
                    gain,
                    lost: AttributeKind::Vit,
                    loss,
                }]
            }
            SpecialAbility::MaximumHealing => {
                let amount = round_amount(attacker.attributes.vitality * 2.0);
                attacker.attributes.vitality += amount;
                vec![BattleEvent::Healed {
                    actor: attacker.name.clone(),
                    ability,
                    amount,
                }]
            }
            SpecialAbility::Unassigned => vec![BattleEvent::NoAbility {
                actor: attacker.name.clone(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Attributes;
    use crate::infrastructure::random::ScriptedRandom;

    fn combatant(name: &str, class: CharacterClass, attributes: Attributes) -> Character {
        Character::new(name, class, attributes)
    }

    #[test]
    fn test_every_catalog_entry_has_classes() {
        for ability in SpecialAbility::CATALOG {
            assert!(
                !ability.classes().is_empty(),
                "{} has no classes",
                ability.name()
            );
        }
    }

    #[test]
    fn test_eligible_for_respects_allow_lists() {
        assert_eq!(
            SpecialAbility::eligible_for(CharacterClass::Knight),
            vec![SpecialAbility::DoubleStrike, SpecialAbility::AbsoluteDefense]
        );
        assert_eq!(
            SpecialAbility::eligible_for(CharacterClass::Druid),
            vec![
                SpecialAbility::HealingLight,
                SpecialAbility::Fireball,
                SpecialAbility::MaximumHealing
            ]
        );
        assert!(SpecialAbility::eligible_for(CharacterClass::Unclassed).is_empty());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            SpecialAbility::from_name("healing light"),
            Some(SpecialAbility::HealingLight)
        );
        assert_eq!(SpecialAbility::from_name("Smite"), None);
        assert_eq!(SpecialAbility::from_name("No Special Ability"), None);
    }

    #[test]
    fn test_healing_light_heals_attacker_only() {
        let rules = BattleRules::default();
        let rng = ScriptedRandom::cycle([0.5]);
        let mut healer = combatant(
            "Elm",
            CharacterClass::Druid,
            Attributes::new(5.0, 20.0, 30.0, 40.0, 5.0),
        );
        let mut foe = combatant(
            "Rook",
            CharacterClass::Knight,
            Attributes::new(50.0, 20.0, 60.0, 5.0, 5.0),
        );

        let events = SpecialAbility::HealingLight.execute(&mut healer, &mut foe, &rules, &rng);

        assert_eq!(healer.attributes.vitality, 50.0);
        assert_eq!(foe.attributes.vitality, 60.0);
        assert_eq!(
            events,
            vec![BattleEvent::Healed {
                actor: "Elm".to_string(),
                ability: SpecialAbility::HealingLight,
                amount: 20.0
            }]
        );
    }

    #[test]
    fn test_fireball_damage_never_negative() {
        let rules = BattleRules::default();
        let rng = ScriptedRandom::cycle([0.5]);
        let mut caster = combatant(
            "Ash",
            CharacterClass::Sorcerer,
            Attributes::new(1.0, 1.0, 10.0, 5.0, 1.0),
        );
        let mut sage = combatant(
            "Sage",
            CharacterClass::Sorcerer,
            Attributes::new(1.0, 1.0, 10.0, 100.0, 1.0),
        );

        let events = SpecialAbility::Fireball.execute(&mut caster, &mut sage, &rules, &rng);

        assert_eq!(sage.attributes.vitality, 10.0);
        assert_eq!(events[0].damage(), Some(0.0));
    }

    #[test]
    fn test_mana_shield_floors_intelligence() {
        let rules = BattleRules::default();
        let rng = ScriptedRandom::cycle([0.5]);
        let mut caster = combatant(
            "Ash",
            CharacterClass::Sorcerer,
            Attributes::new(1.0, 1.0, 10.0, 40.0, 1.0),
        );
        let mut foe = combatant(
            "Rook",
            CharacterClass::Knight,
            Attributes::new(1.0, 1.0, 10.0, 1.0, 1.0),
        );

        SpecialAbility::ManaShield.execute(&mut caster, &mut foe, &rules, &rng);

        assert_eq!(caster.attributes.intelligence, 20.0);
        assert_eq!(caster.attributes.vitality, 20.0);
        assert!(caster.attributes.intelligence >= 0.0);
    }

    #[test]
    fn test_absolute_defense_and_double_speed_trade_attributes() {
        let rules = BattleRules::default();
        let rng = ScriptedRandom::cycle([0.5]);
        let mut knight = combatant(
            "Rook",
            CharacterClass::Knight,
            Attributes::new(40.0, 20.0, 60.0, 5.0, 5.0),
        );
        let mut foe = combatant(
            "Elm",
            CharacterClass::Druid,
            Attributes::new(5.0, 20.0, 30.0, 40.0, 5.0),
        );

        SpecialAbility::AbsoluteDefense.execute(&mut knight, &mut foe, &rules, &rng);
        assert_eq!(knight.attributes.vitality, 90.0);
        assert_eq!(knight.attributes.strength, 25.0);

        let mut paladin = combatant(
            "Lux",
            CharacterClass::Paladin,
            Attributes::new(20.0, 40.0, 30.0, 20.0, 5.0),
        );
        SpecialAbility::DoubleSpeed.execute(&mut paladin, &mut foe, &rules, &rng);
        assert_eq!(paladin.attributes.dexterity, 60.0);
        assert_eq!(paladin.attributes.vitality, 20.0);
    }

    #[test]
    fn test_trade_narration_matches_applied_amounts() {
        let rules = BattleRules::default();
        let rng = ScriptedRandom::cycle([0.5]);
        let mut paladin = combatant(
            "Lux",
            CharacterClass::Paladin,
            Attributes::new(20.0, 33.0, 30.0, 20.0, 5.0),
        );
        let mut foe = combatant(
            "Elm",
            CharacterClass::Druid,
            Attributes::new(5.0, 20.0, 30.0, 40.0, 5.0),
        );

        let events = SpecialAbility::DoubleSpeed.execute(&mut paladin, &mut foe, &rules, &rng);

        assert_eq!(paladin.attributes.dexterity, 49.5);
        assert_eq!(paladin.attributes.vitality, 30.0 - 8.25);
        assert_eq!(
            events[0].to_string(),
            "Lux uses Double Speed, increasing DEX by 16.5 at the cost of 8.25 VIT."
        );
    }

    #[test]
    fn test_maximum_healing_triples_vitality() {
        let rules = BattleRules::default();
        let rng = ScriptedRandom::cycle([0.5]);
        let mut druid = combatant(
            "Elm",
            CharacterClass::Druid,
            Attributes::new(5.0, 20.0, 10.0, 40.0, 5.0),
        );
        let mut foe = combatant(
            "Rook",
            CharacterClass::Knight,
            Attributes::new(50.0, 20.0, 60.0, 5.0, 5.0),
        );

        SpecialAbility::MaximumHealing.execute(&mut druid, &mut foe, &rules, &rng);

        assert_eq!(druid.attributes.vitality, 30.0);
    }

    #[test]
    fn test_double_strike_skips_second_hit_on_fallen_defender() {
        let rules = BattleRules::default();
        // hit roll, crit roll (no crit)
        let rng = ScriptedRandom::cycle([0.0, 0.99]);
        let mut knight = combatant(
            "Rook",
            CharacterClass::Knight,
            Attributes::new(50.0, 20.0, 60.0, 5.0, 10.0),
        );
        let mut foe = combatant(
            "Ash",
            CharacterClass::Sorcerer,
            Attributes::new(5.0, 30.0, 20.0, 70.0, 10.0),
        );

        let events = SpecialAbility::DoubleStrike.execute(&mut knight, &mut foe, &rules, &rng);

        // 50 * 1.2 - 20 / 2 = 50 damage drops the defender on the first swing
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], BattleEvent::AbilityActivated { .. }));
        assert_eq!(events[1].damage(), Some(50.0));
        assert!(!foe.is_alive());
    }

    #[test]
    fn test_unassigned_changes_nothing() {
        let rules = BattleRules::default();
        let rng = ScriptedRandom::cycle([0.5]);
        let mut a = combatant(
            "A",
            CharacterClass::Unclassed,
            Attributes::new(1.0, 2.0, 3.0, 4.0, 5.0),
        );
        let mut b = combatant(
            "B",
            CharacterClass::Unclassed,
            Attributes::new(5.0, 4.0, 3.0, 2.0, 1.0),
        );
        let (before_a, before_b) = (a.attributes, b.attributes);

        let events = SpecialAbility::Unassigned.execute(&mut a, &mut b, &rules, &rng);

        assert_eq!(a.attributes, before_a);
        assert_eq!(b.attributes, before_b);
        assert_eq!(
            events,
            vec![BattleEvent::NoAbility {
                actor: "A".to_string()
            }]
        );
    }
}
