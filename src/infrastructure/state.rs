//! Shared application state

use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::outbound::CharacterRepositoryPort;
use crate::application::services::{BattleService, CharacterServiceImpl};
use crate::domain::services::{CharacterFactory, CombatEngine, RandomPort};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::{HttpCharacterRepository, InMemoryCharacterRepository};
use crate::infrastructure::random::ThreadRandom;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    // Application services
    pub character_service: CharacterServiceImpl,
    pub battle_service: BattleService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let repository: Arc<dyn CharacterRepositoryPort> = match &config.player_api_url {
            Some(url) => {
                tracing::info!("Using player records service at {}", url);
                Arc::new(HttpCharacterRepository::new(url))
            }
            None => {
                tracing::info!(
                    "No player records service configured, keeping characters in memory"
                );
                Arc::new(InMemoryCharacterRepository::new())
            }
        };
        let rng: Arc<dyn RandomPort> = Arc::new(ThreadRandom);

        let character_service =
            CharacterServiceImpl::new(repository.clone(), CharacterFactory::new(rng.clone()));
        let battle_service = BattleService::new(
            CombatEngine::new(config.rules.clone(), rng.clone()),
            CharacterFactory::new(rng),
            repository,
            config.step_delay,
        );

        Ok(Self {
            config,
            character_service,
            battle_service,
        })
    }
}
