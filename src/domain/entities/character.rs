//! Character entity - A combatant with five attributes, a class and one ability

use crate::domain::value_objects::{
    AccountId, AttributeKind, Attributes, CharacterClass, CharacterId, SpecialAbility,
};

/// A character, either ephemeral (quick play) or reconstructed from a record
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Present once the character has been persisted
    pub id: Option<CharacterId>,
    pub account_id: Option<AccountId>,
    pub name: String,
    pub class: CharacterClass,

    // Combat stats
    /// STR/DEX/VIT/INT/LUK; VIT is current health during a fight
    pub attributes: Attributes,
    pub special_ability: SpecialAbility,

    // Progression
    /// Unallocated attribute budget
    pub free_points: u32,
    pub level: u32,
    pub experience: i64,
}

impl Character {
    pub const STARTING_FREE_POINTS: u32 = 20;

    pub fn new(name: impl Into<String>, class: CharacterClass, attributes: Attributes) -> Self {
        Self {
            id: None,
            account_id: None,
            name: name.into(),
            class,
            attributes,
            special_ability: SpecialAbility::Unassigned,
            free_points: Self::STARTING_FREE_POINTS,
            level: 1,
            experience: 0,
        }
    }

    /// Bind an ability. An ability the class may not hold binds as `Unassigned`.
    pub fn with_ability(mut self, ability: SpecialAbility) -> Self {
        self.special_ability = if ability.is_available_to(self.class) {
            ability
        } else {
            SpecialAbility::Unassigned
        };
        self
    }

    pub fn with_account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn attribute(&self, kind: AttributeKind) -> f64 {
        self.attributes.get(kind)
    }

    pub fn is_alive(&self) -> bool {
        self.attributes.vitality > 0.0
    }

    /// VIT as shown to players; never below zero
    pub fn displayed_vitality(&self) -> f64 {
        self.attributes.vitality.max(0.0)
    }

    /// Move `points` from the free budget into `kind`.
    pub fn allocate_points(
        &mut self,
        kind: AttributeKind,
        points: u32,
    ) -> Result<(), AllocationError> {
        if points == 0 {
            return Err(AllocationError::NothingToAllocate);
        }
        if points > self.free_points {
            return Err(AllocationError::InsufficientPoints {
                requested: points,
                available: self.free_points,
            });
        }
        self.attributes.add(kind, f64::from(points));
        self.free_points -= points;
        Ok(())
    }

    /// Check the fields combat depends on.
    pub fn validate(&self) -> Result<(), CharacterError> {
        if self.name.trim().is_empty() {
            return Err(CharacterError::EmptyName);
        }
        if let Some(attribute) = self.attributes.first_non_finite() {
            return Err(CharacterError::NonFiniteAttribute {
                name: self.name.clone(),
                attribute,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("At least one point must be allocated")]
    NothingToAllocate,
    #[error("Cannot allocate {requested} points, only {available} free")]
    InsufficientPoints { requested: u32, available: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharacterError {
    #[error("Character name cannot be empty")]
    EmptyName,
    #[error("Character {name} has a non-finite {attribute}")]
    NonFiniteAttribute {
        name: String,
        attribute: AttributeKind,
    },
}
