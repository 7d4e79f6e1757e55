//! Value objects - Immutable objects defined by their attributes

mod attribute;
mod battle_rules;
mod character_class;
mod ids;
mod special_ability;

pub use attribute::{AttributeKind, Attributes};
pub use battle_rules::BattleRules;
pub use character_class::CharacterClass;
pub use ids::*;
pub use special_ability::SpecialAbility;
