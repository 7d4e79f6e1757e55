//! Character Service - Application service for player characters
//!
//! Creates one character per account, fetches them and spends their free
//! attribute points.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::application::ports::outbound::{CharacterRepositoryPort, RepoError};
use crate::domain::entities::{AllocationError, Character};
use crate::domain::services::CharacterFactory;
use crate::domain::value_objects::{
    AccountId, AttributeKind, CharacterClass, CharacterId, SpecialAbility,
};

const MAX_NAME_LEN: usize = 64;

/// Request to create a new character
#[derive(Debug, Clone)]
pub struct CreateCharacterRequest {
    pub account_id: AccountId,
    pub name: String,
    pub class: CharacterClass,
}

/// Character service trait defining the application use cases
#[async_trait]
pub trait CharacterService: Send + Sync {
    /// Create a character for an account
    async fn create_character(&self, request: CreateCharacterRequest) -> Result<Character>;

    /// Get a character by ID
    async fn get_character(&self, id: &CharacterId) -> Result<Option<Character>>;

    /// Get the character belonging to an account
    async fn get_by_account(&self, account_id: &AccountId) -> Result<Option<Character>>;

    /// Move free points into one attribute
    async fn allocate_points(
        &self,
        id: &CharacterId,
        kind: AttributeKind,
        points: u32,
    ) -> Result<Character>;
}

/// Default implementation of CharacterService over a repository port
pub struct CharacterServiceImpl {
    repository: Arc<dyn CharacterRepositoryPort>,
    factory: CharacterFactory,
}

impl CharacterServiceImpl {
    pub fn new(repository: Arc<dyn CharacterRepositoryPort>, factory: CharacterFactory) -> Self {
        Self {
            repository,
            factory,
        }
    }

    /// Validate a character creation request
    fn validate_create_request(request: &CreateCharacterRequest) -> Result<()> {
        let name = request.name.trim();
        if name.is_empty() {
            anyhow::bail!("Character name cannot be empty");
        }
        if name.chars().count() > MAX_NAME_LEN {
            anyhow::bail!("Character name cannot exceed {} characters", MAX_NAME_LEN);
        }
        if request.class == CharacterClass::Unclassed {
            anyhow::bail!("Character class must be one of the playable classes");
        }
        Ok(())
    }

    /// A stored character whose stats or ability never reached the repository
    fn needs_provisioning(character: &Character) -> bool {
        let missing_ability = character.special_ability == SpecialAbility::Unassigned
            && !SpecialAbility::eligible_for(character.class).is_empty();
        character.attributes.total() == 0.0 || missing_ability
    }

    /// Store whatever `stored` is missing, taking it from `generated`.
    async fn provision(&self, mut stored: Character, generated: &Character) -> Result<Character> {
        let id = stored
            .id
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Stored character has no id"))?;

        if stored.attributes.total() == 0.0 {
            stored.attributes = generated.attributes;
            stored.free_points = generated.free_points;
            self.repository
                .update(&stored)
                .await
                .context("Failed to store character stats")?;
        }
        if stored.special_ability == SpecialAbility::Unassigned
            && generated.special_ability != SpecialAbility::Unassigned
        {
            self.repository
                .assign_ability(&id, generated.special_ability)
                .await
                .context("Failed to store character ability")?;
            stored.special_ability = generated.special_ability;
        }

        info!(character_id = %id, "Completed partially stored character");
        Ok(stored)
    }
}

#[async_trait]
impl CharacterService for CharacterServiceImpl {
    #[instrument(
        skip(self, request),
        fields(account_id = %request.account_id, name = %request.name)
    )]
    async fn create_character(&self, request: CreateCharacterRequest) -> Result<Character> {
        Self::validate_create_request(&request)?;

        let existing = self
            .repository
            .get_by_account(&request.account_id)
            .await
            .context("Failed to look up account's character")?;
        if let Some(existing) = existing {
            if !Self::needs_provisioning(&existing) {
                anyhow::bail!("Account {} already has a character", request.account_id);
            }
            warn!(name = %existing.name, "Account's character is incomplete, provisioning it");
            let generated = self.factory.generate_for_class(
                existing.name.clone(),
                existing.class,
                Some(existing.level),
            );
            return self.provision(existing, &generated).await;
        }

        let mut character = self
            .factory
            .generate_for_class(request.name.trim(), request.class, Some(1))
            .with_account(request.account_id);

        let id = match self.repository.create(&character).await {
            Ok(id) => id,
            Err(RepoError::Incomplete { id, reason }) => {
                warn!(character_id = %id, reason = %reason, "Character stored partially");
                let stored = self
                    .repository
                    .get(&id)
                    .await
                    .context("Failed to reload partially stored character")?
                    .ok_or_else(|| anyhow::anyhow!("Character not found: {}", id))?;
                character = self.provision(stored, &character).await?;
                id
            }
            Err(error) => {
                return Err(error).context("Failed to create character in repository");
            }
        };
        character.id = Some(id.clone());

        info!(
            character_id = %id,
            class = %character.class,
            ability = character.special_ability.name(),
            ability_effect = character.special_ability.description(),
            attribute_total = character.attributes.total(),
            "Created character: {}",
            character.name
        );
        Ok(character)
    }

    #[instrument(skip(self))]
    async fn get_character(&self, id: &CharacterId) -> Result<Option<Character>> {
        debug!(character_id = %id, "Fetching character");
        self.repository
            .get(id)
            .await
            .context("Failed to get character from repository")
    }

    #[instrument(skip(self))]
    async fn get_by_account(&self, account_id: &AccountId) -> Result<Option<Character>> {
        debug!(account_id = %account_id, "Fetching character for account");
        self.repository
            .get_by_account(account_id)
            .await
            .context("Failed to get character from repository")
    }

    #[instrument(skip(self, id, kind), fields(character_id = %id, attribute = %kind))]
    async fn allocate_points(
        &self,
        id: &CharacterId,
        kind: AttributeKind,
        points: u32,
    ) -> Result<Character> {
        let mut character = self
            .repository
            .get(id)
            .await
            .context("Failed to get character from repository")?
            .ok_or_else(|| anyhow::anyhow!("Character not found: {}", id))?;

        character
            .allocate_points(kind, points)
            .map_err(|error: AllocationError| {
                warn!(requested = points, error = %error, "Rejected point allocation");
                error
            })?;

        self.repository
            .update(&character)
            .await
            .context("Failed to update character in repository")?;

        info!(
            value = character.attribute(kind),
            free_points = character.free_points,
            "Allocated points"
        );
        Ok(character)
    }
}
