//! Character factory - Rolls class-appropriate combatants
//!
//! Two generation modes exist. Quick play rolls each attribute from a wide
//! per-class range. Levelled generation spends a fixed point budget so that
//! matched opponents have the same total as the player they face.

use std::sync::Arc;

use super::RandomPort;
use crate::domain::entities::Character;
use crate::domain::value_objects::{AttributeKind, Attributes, CharacterClass, SpecialAbility};

/// Points granted at level 1
const BASE_POINTS: u32 = 20;
/// Extra points per level above 1
const POINTS_PER_LEVEL: u32 = 4;

/// `(base, spread)` per attribute in STR, DEX, VIT, INT, LUK order; a roll is
/// `base + [0, spread)`.
type RollTable = [(u32, u32); 5];

/// `(min, max)` per attribute in STR, DEX, VIT, INT, LUK order, inclusive.
type BudgetTable = [(u32, u32); 5];

fn roll_table(class: CharacterClass) -> RollTable {
    match class {
        CharacterClass::Sorcerer => [(1, 30), (20, 60), (1, 30), (50, 50), (0, 100)],
        CharacterClass::Druid => [(1, 30), (20, 60), (20, 50), (50, 50), (0, 100)],
        CharacterClass::Paladin => [(20, 50), (20, 80), (20, 50), (20, 50), (0, 100)],
        CharacterClass::Knight => [(50, 50), (20, 60), (50, 50), (1, 30), (0, 100)],
        CharacterClass::Unclassed => [(0, 100); 5],
    }
}

fn budget_table(class: CharacterClass) -> BudgetTable {
    match class {
        CharacterClass::Knight => [(4, 8), (2, 5), (4, 8), (1, 2), (1, 4)],
        CharacterClass::Sorcerer => [(1, 2), (2, 5), (1, 3), (5, 9), (1, 4)],
        CharacterClass::Paladin => [(2, 5), (4, 8), (2, 5), (2, 4), (1, 4)],
        CharacterClass::Druid => [(1, 2), (2, 4), (3, 7), (4, 8), (1, 4)],
        CharacterClass::Unclassed => [(1, 6); 5],
    }
}

/// Total attribute points a character of `level` is built with.
pub fn total_points(level: u32) -> u32 {
    BASE_POINTS + level.saturating_sub(1) * POINTS_PER_LEVEL
}

pub struct CharacterFactory {
    rng: Arc<dyn RandomPort>,
}

impl CharacterFactory {
    pub fn new(rng: Arc<dyn RandomPort>) -> Self {
        Self { rng }
    }

    /// Generate `Player{existing_count + 1}` with a random playable class.
    ///
    /// Without a level the attributes come from the quick-play ranges; with
    /// one they are spent from that level's point budget.
    pub fn generate(&self, existing_count: usize, level: Option<u32>) -> Character {
        let classes = CharacterClass::PLAYABLE;
        let class = classes[self.rng.next_int(classes.len() as u32) as usize];
        self.generate_for_class(format!("Player{}", existing_count + 1), class, level)
    }

    pub fn generate_for_class(
        &self,
        name: impl Into<String>,
        class: CharacterClass,
        level: Option<u32>,
    ) -> Character {
        let mut character = match level {
            Some(level) => {
                let level = level.max(1);
                Character::new(name, class, self.spend_budget(class, total_points(level)))
                    .with_level(level)
            }
            None => Character::new(name, class, self.roll_quick(class)),
        };
        character.special_ability = self.pick_ability(class);
        character
    }

    fn roll_quick(&self, class: CharacterClass) -> Attributes {
        let mut attributes = Attributes::default();
        for (kind, (base, spread)) in AttributeKind::ALL.into_iter().zip(roll_table(class)) {
            let value = (base + self.rng.next_int(spread)).max(1);
            attributes.set(kind, f64::from(value));
        }
        attributes
    }

    /// Spend exactly `total` points within the class's per-attribute ranges.
    ///
    /// Each draw is clamped so the attributes still to come can reach their
    /// minimums; whatever remains afterwards goes out one point at a time.
    fn spend_budget(&self, class: CharacterClass, total: u32) -> Attributes {
        let table = budget_table(class);
        let mut values = [0u32; 5];
        let mut remaining = total;

        for (i, (min, max)) in table.iter().copied().enumerate() {
            let reserved: u32 = table[i + 1..].iter().map(|(later_min, _)| later_min).sum();
            let drawn = min + self.rng.next_int(max - min + 1);
            let ceiling = remaining.saturating_sub(reserved).max(min);
            let value = drawn.min(ceiling);
            values[i] = value;
            remaining = remaining.saturating_sub(value);
        }

        while remaining > 0 {
            let i = self.rng.next_int(values.len() as u32) as usize;
            values[i] += 1;
            remaining -= 1;
        }

        let mut attributes = Attributes::default();
        for (kind, value) in AttributeKind::ALL.into_iter().zip(values) {
            attributes.set(kind, f64::from(value));
        }
        attributes
    }

    fn pick_ability(&self, class: CharacterClass) -> SpecialAbility {
        let eligible = SpecialAbility::eligible_for(class);
        if eligible.is_empty() {
            return SpecialAbility::Unassigned;
        }
        eligible[self.rng.next_int(eligible.len() as u32) as usize]
    }
}
