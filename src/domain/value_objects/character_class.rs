//! Character classes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AttributeKind;

/// The class a character belongs to.
///
/// `Unclassed` covers records whose class is missing or unrecognised; such
/// characters roll every attribute flat and have no eligible ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Knight,
    Paladin,
    Druid,
    Sorcerer,
    #[serde(other)]
    Unclassed,
}

impl CharacterClass {
    /// Classes a new character may be rolled into.
    pub const PLAYABLE: [CharacterClass; 4] = [
        CharacterClass::Sorcerer,
        CharacterClass::Druid,
        CharacterClass::Paladin,
        CharacterClass::Knight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Knight => "Knight",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Druid => "Druid",
            CharacterClass::Sorcerer => "Sorcerer",
            CharacterClass::Unclassed => "Unclassed",
        }
    }

    /// The attribute the class leans on hardest.
    pub fn primary_attribute(&self) -> AttributeKind {
        match self {
            CharacterClass::Knight => AttributeKind::Str,
            CharacterClass::Paladin => AttributeKind::Dex,
            CharacterClass::Druid | CharacterClass::Sorcerer => AttributeKind::Int,
            CharacterClass::Unclassed => AttributeKind::Vit,
        }
    }

    /// Parse a class name, mapping anything unrecognised to `Unclassed`.
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or(CharacterClass::Unclassed)
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown character class: {0}")]
pub struct ParseClassError(pub String);

impl FromStr for CharacterClass {
    type Err = ParseClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterClass::PLAYABLE
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseClassError(s.to_string()))
    }
}
