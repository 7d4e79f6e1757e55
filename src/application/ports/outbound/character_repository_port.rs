//! Character repository port - Persistence contract for player characters
//!
//! The combat engine never touches this port; only the application services
//! load characters through it and report experience back.

use async_trait::async_trait;

use crate::domain::entities::Character;
use crate::domain::value_objects::{AccountId, CharacterId, SpecialAbility};

/// Errors a character repository can surface
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Character not found: {0}")]
    NotFound(String),
    #[error("Character has no id")]
    MissingId,
    #[error("Repository transport failed: {0}")]
    Transport(String),
    #[error("Malformed character record: {0}")]
    Serialization(String),
    /// The record exists under `id` but its stats or ability were not stored
    #[error("Character {id} was created but not fully stored: {reason}")]
    Incomplete { id: CharacterId, reason: String },
}

/// Repository port for Character operations
#[async_trait]
pub trait CharacterRepositoryPort: Send + Sync {
    /// Create a new character and return the id it was stored under
    async fn create(&self, character: &Character) -> Result<CharacterId, RepoError>;

    /// Get a character by ID
    async fn get(&self, id: &CharacterId) -> Result<Option<Character>, RepoError>;

    /// Get the character belonging to an account
    async fn get_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Character>, RepoError>;

    /// Overwrite a stored character's attributes and free points
    async fn update(&self, character: &Character) -> Result<(), RepoError>;

    /// Bind a special ability to a stored character
    async fn assign_ability(
        &self,
        id: &CharacterId,
        ability: SpecialAbility,
    ) -> Result<(), RepoError>;

    /// Add `delta` to a character's experience
    async fn patch_experience(&self, id: &CharacterId, delta: i64) -> Result<(), RepoError>;
}
