//! Arena Engine - Turn-based duels between class-based characters
//!
//! The engine:
//! - Generates characters or loads them from the player records service
//! - Resolves a duel up front and paces its narration out step by step
//! - Reports the experience change for a tracked character

mod application;
mod domain;
mod infrastructure;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::services::{BattleSession, CharacterService, CreateCharacterRequest};
use crate::domain::entities::Character;
use crate::domain::services::Side;
use crate::domain::value_objects::{AccountId, CharacterClass, CharacterId};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arena_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Arena Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!(
        "  Player records: {}",
        config.player_api_url.as_deref().unwrap_or("in memory")
    );
    tracing::info!("  Step delay: {:?}", config.step_delay);
    tracing::info!("  Round cap: {}", config.rules.max_rounds);

    let state = AppState::new(config)?;

    let session = if state.config.quick_play {
        state.battle_service.quick_play()?
    } else {
        let player_id = match (state.config.player_id.clone(), state.config.account_id.clone()) {
            (Some(id), _) => verify_character(&state, id).await?,
            (None, Some(account_id)) => character_for_account(&state, account_id).await?,
            (None, None) => create_demo_character(&state, AccountId::new()).await?,
        };
        state.battle_service.fight_as(&player_id).await?
    };

    narrate(&state, &session).await;

    let winner = match session.outcome.winner() {
        Some(Side::First) => session.first.name.as_str(),
        Some(Side::Second) => session.second.name.as_str(),
        None => "nobody",
    };
    let verdict = session
        .outcome
        .events()
        .find(|event| event.is_verdict())
        .map(ToString::to_string)
        .unwrap_or_default();
    tracing::info!(winner, rounds = session.outcome.rounds, "{}", verdict);

    let (first_health, second_health) = session.final_health();
    tracing::info!(
        "{}: {} VIT, {}: {} VIT",
        session.first.name,
        first_health,
        session.second.name,
        second_health
    );

    if let Some(report) = session.experience_report {
        match report.await {
            Ok(true) => tracing::info!("Experience change recorded"),
            Ok(false) => tracing::warn!("Experience change was not recorded"),
            Err(e) => tracing::error!("Experience report task failed: {}", e),
        }
    }

    tracing::info!("Arena Engine stopped");
    Ok(())
}

/// Make sure the configured character exists before fighting as it.
async fn verify_character(state: &AppState, id: CharacterId) -> anyhow::Result<CharacterId> {
    let character = state
        .character_service
        .get_character(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No character stored under {}", id))?;
    tracing::info!("Fighting as {} the {}", character.name, character.class);
    Ok(id)
}

/// Fight as the account's character, creating or completing it first.
async fn character_for_account(
    state: &AppState,
    account_id: AccountId,
) -> anyhow::Result<CharacterId> {
    match state.character_service.get_by_account(&account_id).await? {
        Some(Character {
            id: Some(id),
            attributes,
            ..
        }) if attributes.total() > 0.0 => Ok(id),
        _ => create_demo_character(state, account_id).await,
    }
}

/// Create a Knight for `account_id` and spend its free points.
async fn create_demo_character(
    state: &AppState,
    account_id: AccountId,
) -> anyhow::Result<CharacterId> {
    let service = &state.character_service;
    let character = service
        .create_character(CreateCharacterRequest {
            account_id,
            name: "Challenger".to_string(),
            class: CharacterClass::Knight,
        })
        .await?;
    let id = character
        .id
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Created character has no id"))?;

    if character.free_points > 0 {
        service
            .allocate_points(&id, character.class.primary_attribute(), character.free_points)
            .await?;
    }
    Ok(id)
}

/// Log each step as it is delivered; Ctrl+C stops the narration early.
async fn narrate(state: &AppState, session: &BattleSession) {
    let mut stream = state.battle_service.stream(&session.outcome);
    loop {
        tokio::select! {
            chunk = stream.next_chunk() => match chunk {
                Some(lines) => {
                    for line in lines {
                        tracing::info!("{}", line);
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Narration cancelled");
                stream.cancel();
                break;
            }
        }
    }
}
