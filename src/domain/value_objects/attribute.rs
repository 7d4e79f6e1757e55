//! The five character attributes and the tagged accessor used to address them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Names one of the five attributes.
///
/// Point allocation and ability effects address attributes through this tag
/// rather than by field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Physical power
    Str,
    /// Accuracy
    Dex,
    /// Health; doubles as hit points during a fight
    Vit,
    /// Magic power
    Int,
    /// Critical strike chance
    Luk,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 5] = [
        AttributeKind::Str,
        AttributeKind::Dex,
        AttributeKind::Vit,
        AttributeKind::Int,
        AttributeKind::Luk,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            AttributeKind::Str => "STR",
            AttributeKind::Dex => "DEX",
            AttributeKind::Vit => "VIT",
            AttributeKind::Int => "INT",
            AttributeKind::Luk => "LUK",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttributeKind::Str => "Strength",
            AttributeKind::Dex => "Dexterity",
            AttributeKind::Vit => "Vitality",
            AttributeKind::Int => "Intelligence",
            AttributeKind::Luk => "Luck",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown attribute: {0}")]
pub struct ParseAttributeError(pub String);

impl FromStr for AttributeKind {
    type Err = ParseAttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeKind::ALL
            .into_iter()
            .find(|kind| {
                kind.abbreviation().eq_ignore_ascii_case(s) || kind.label().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| ParseAttributeError(s.to_string()))
    }
}

/// Attribute values of one character.
///
/// Values are floating point: ability effects scale attributes by fractions and
/// nothing rounds them back.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attributes {
    pub strength: f64,
    pub dexterity: f64,
    pub vitality: f64,
    pub intelligence: f64,
    pub luck: f64,
}

impl Attributes {
    pub fn new(strength: f64, dexterity: f64, vitality: f64, intelligence: f64, luck: f64) -> Self {
        Self {
            strength,
            dexterity,
            vitality,
            intelligence,
            luck,
        }
    }

    pub fn get(&self, kind: AttributeKind) -> f64 {
        match kind {
            AttributeKind::Str => self.strength,
            AttributeKind::Dex => self.dexterity,
            AttributeKind::Vit => self.vitality,
            AttributeKind::Int => self.intelligence,
            AttributeKind::Luk => self.luck,
        }
    }

    pub fn set(&mut self, kind: AttributeKind, value: f64) {
        let slot = match kind {
            AttributeKind::Str => &mut self.strength,
            AttributeKind::Dex => &mut self.dexterity,
            AttributeKind::Vit => &mut self.vitality,
            AttributeKind::Int => &mut self.intelligence,
            AttributeKind::Luk => &mut self.luck,
        };
        *slot = value;
    }

    pub fn add(&mut self, kind: AttributeKind, amount: f64) {
        self.set(kind, self.get(kind) + amount);
    }

    pub fn total(&self) -> f64 {
        AttributeKind::ALL.iter().map(|kind| self.get(*kind)).sum()
    }

    /// First attribute holding NaN or an infinity, if any.
    pub fn first_non_finite(&self) -> Option<AttributeKind> {
        AttributeKind::ALL
            .into_iter()
            .find(|kind| !self.get(*kind).is_finite())
    }
}
