//! Battle Service - Application service for running duels
//!
//! Quick play pits two freshly generated characters against each other and
//! tracks nothing. Tracked play loads a stored character, matches it against a
//! generated opponent of the same level and reports the experience change.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use super::battle_stream::BattleStream;
use super::progression_service;
use crate::application::ports::outbound::CharacterRepositoryPort;
use crate::domain::entities::Character;
use crate::domain::events::BattleEvent;
use crate::domain::services::{
    BattleError, BattleOutcome, BattleResult, CharacterFactory, CombatEngine, Side,
};
use crate::domain::value_objects::CharacterId;

/// A finished battle with both combatants as they ended it
pub struct BattleSession {
    pub outcome: BattleOutcome,
    pub first: Character,
    pub second: Character,
    /// Pending experience report for a tracked character
    pub experience_report: Option<JoinHandle<bool>>,
}

impl BattleSession {
    /// VIT of each side for display, never below zero
    pub fn final_health(&self) -> (f64, f64) {
        (
            self.first.displayed_vitality(),
            self.second.displayed_vitality(),
        )
    }
}

pub struct BattleService {
    engine: CombatEngine,
    factory: CharacterFactory,
    repository: Arc<dyn CharacterRepositoryPort>,
    step_delay: Duration,
}

impl BattleService {
    pub fn new(
        engine: CombatEngine,
        factory: CharacterFactory,
        repository: Arc<dyn CharacterRepositoryPort>,
        step_delay: Duration,
    ) -> Self {
        Self {
            engine,
            factory,
            repository,
            step_delay,
        }
    }

    /// Resolve a duel between two caller-supplied characters.
    pub fn resolve(
        &self,
        first: &mut Character,
        second: &mut Character,
    ) -> Result<BattleOutcome, BattleError> {
        let outcome = self.engine.resolve(first, second)?;
        let damage_dealt: f64 = outcome.events().filter_map(BattleEvent::damage).sum();
        debug!(
            first = %first.name,
            second = %second.name,
            rounds = outcome.rounds,
            result = ?outcome.result,
            lines = outcome.narration().len(),
            damage_dealt,
            "Battle resolved"
        );
        Ok(outcome)
    }

    /// Two random characters, nothing persisted or reported
    #[instrument(skip(self))]
    pub fn quick_play(&self) -> Result<BattleSession> {
        let mut first = self.factory.generate(0, None);
        let mut second = self.factory.generate(1, None);
        info!(
            first = %first.name,
            first_class = %first.class,
            second = %second.name,
            second_class = %second.class,
            "Starting quick play"
        );

        let outcome = self.resolve(&mut first, &mut second)?;
        Ok(BattleSession {
            outcome,
            first,
            second,
            experience_report: None,
        })
    }

    /// Fight as a stored character against a generated opponent of its level.
    #[instrument(skip(self, id), fields(character_id = %id))]
    pub async fn fight_as(&self, id: &CharacterId) -> Result<BattleSession> {
        let mut player = self
            .repository
            .get(id)
            .await
            .context("Failed to load character")?
            .ok_or_else(|| anyhow::anyhow!("Character not found: {}", id))?;
        let mut opponent = self.factory.generate(1, Some(player.level));
        info!(
            player = %player.name,
            level = player.level,
            opponent = %opponent.name,
            opponent_class = %opponent.class,
            "Starting tracked battle"
        );

        let outcome = self.resolve(&mut player, &mut opponent)?;
        let experience_report =
            progression_service::delta_for(outcome.result, Side::First, self.engine.rules())
                .map(|delta| {
                    progression_service::spawn_report(self.repository.clone(), id.clone(), delta)
                });
        if matches!(outcome.result, BattleResult::Tie(_)) {
            debug!("Tie, no experience change");
        }

        Ok(BattleSession {
            outcome,
            first: player,
            second: opponent,
            experience_report,
        })
    }

    /// Deliver an outcome's narration at the configured pace.
    pub fn stream(&self, outcome: &BattleOutcome) -> BattleStream {
        BattleStream::spawn(outcome.chunks(), self.step_delay)
    }
}
