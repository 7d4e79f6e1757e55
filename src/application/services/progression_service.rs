//! Progression bridge - Reports a battle's experience change for tracked characters
//!
//! Reporting is fire-and-forget: a failure is logged and dropped, never retried,
//! and never changes the battle that produced it.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use crate::application::ports::outbound::CharacterRepositoryPort;
use crate::domain::services::{BattleResult, Side};
use crate::domain::value_objects::{BattleRules, CharacterId};

/// Experience change for the character on `side`; ties change nothing.
pub fn delta_for(result: BattleResult, side: Side, rules: &BattleRules) -> Option<i64> {
    match result {
        BattleResult::Winner(winner) if winner == side => Some(rules.experience_on_win),
        BattleResult::Winner(_) => Some(rules.experience_on_loss),
        BattleResult::Tie(_) => None,
    }
}

/// Send `delta` for `character_id`. Returns whether the repository acknowledged it.
#[instrument(skip(repository, character_id), fields(character_id = %character_id))]
pub async fn report_experience_delta(
    repository: &dyn CharacterRepositoryPort,
    character_id: &CharacterId,
    delta: i64,
) -> bool {
    match repository.patch_experience(character_id, delta).await {
        Ok(()) => {
            info!("Experience updated");
            true
        }
        Err(e) => {
            error!(error = %e, "Failed to update experience");
            false
        }
    }
}

/// Report on a background task; the handle may be awaited or dropped.
pub fn spawn_report(
    repository: Arc<dyn CharacterRepositoryPort>,
    character_id: CharacterId,
    delta: i64,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        report_experience_delta(repository.as_ref(), &character_id, delta).await
    })
}
