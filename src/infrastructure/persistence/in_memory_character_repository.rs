//! In-process character repository

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{CharacterRepositoryPort, RepoError};
use crate::domain::entities::Character;
use crate::domain::value_objects::{AccountId, CharacterId, SpecialAbility};

/// Keeps characters in a map for the lifetime of the process
#[derive(Default)]
pub struct InMemoryCharacterRepository {
    characters: RwLock<HashMap<CharacterId, Character>>,
}

impl InMemoryCharacterRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterRepositoryPort for InMemoryCharacterRepository {
    async fn create(&self, character: &Character) -> Result<CharacterId, RepoError> {
        let id = character.id.clone().unwrap_or_default();
        let mut stored = character.clone();
        stored.id = Some(id.clone());
        self.characters.write().await.insert(id.clone(), stored);
        tracing::debug!(character_id = %id, name = %character.name, "Created character");
        Ok(id)
    }

    async fn get(&self, id: &CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.characters.read().await.get(id).cloned())
    }

    async fn get_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Character>, RepoError> {
        Ok(self
            .characters
            .read()
            .await
            .values()
            .find(|character| character.account_id.as_ref() == Some(account_id))
            .cloned())
    }

    async fn update(&self, character: &Character) -> Result<(), RepoError> {
        let id = character.id.as_ref().ok_or(RepoError::MissingId)?;
        let mut characters = self.characters.write().await;
        let stored = characters
            .get_mut(id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        *stored = character.clone();
        Ok(())
    }

    async fn assign_ability(
        &self,
        id: &CharacterId,
        ability: SpecialAbility,
    ) -> Result<(), RepoError> {
        let mut characters = self.characters.write().await;
        let stored = characters
            .get_mut(id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        stored.special_ability = ability;
        Ok(())
    }

    async fn patch_experience(&self, id: &CharacterId, delta: i64) -> Result<(), RepoError> {
        let mut characters = self.characters.write().await;
        let stored = characters
            .get_mut(id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        stored.experience += delta;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Attributes, CharacterClass};

    fn knight() -> Character {
        let attributes = Attributes::new(8.0, 4.0, 6.0, 1.0, 1.0);
        Character::new("Rook", CharacterClass::Knight, attributes)
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_round_trips() {
        let repo = InMemoryCharacterRepository::new();
        let account = AccountId::from("acct-1");

        let id = repo.create(&knight().with_account(account.clone())).await.unwrap();

        let stored = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.id, Some(id.clone()));
        assert_eq!(stored.name, "Rook");
        let by_account = repo.get_by_account(&account).await.unwrap().unwrap();
        assert_eq!(by_account.id, Some(id));
        assert!(repo.get_by_account(&AccountId::from("other")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_patch_experience_accumulates() {
        let repo = InMemoryCharacterRepository::new();
        let id = repo.create(&knight()).await.unwrap();

        repo.patch_experience(&id, 100).await.unwrap();
        repo.patch_experience(&id, -50).await.unwrap();

        assert_eq!(repo.get(&id).await.unwrap().unwrap().experience, 50);
    }

    #[tokio::test]
    async fn test_assign_ability_replaces_stored_ability() {
        let repo = InMemoryCharacterRepository::new();
        let id = repo.create(&knight()).await.unwrap();

        repo.assign_ability(&id, SpecialAbility::DoubleStrike).await.unwrap();

        let stored = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.special_ability, SpecialAbility::DoubleStrike);
    }

    #[tokio::test]
    async fn test_missing_character_errors() {
        let repo = InMemoryCharacterRepository::new();
        let missing = CharacterId::from("nope");

        assert!(repo.get(&missing).await.unwrap().is_none());
        assert!(matches!(
            repo.patch_experience(&missing, 5).await,
            Err(RepoError::NotFound(_))
        ));
        assert!(matches!(repo.update(&knight()).await, Err(RepoError::MissingId)));
        assert!(matches!(
            repo.assign_ability(&missing, SpecialAbility::HealingLight).await,
            Err(RepoError::NotFound(_))
        ));
    }
}
