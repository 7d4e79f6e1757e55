//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::domain::value_objects::{AccountId, BattleRules, CharacterId};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Player records service base URL; characters stay in memory when unset
    pub player_api_url: Option<String>,

    /// Pause between narrated steps
    pub step_delay: Duration,

    /// Persisted character to fight as
    pub player_id: Option<CharacterId>,
    /// Account whose character to fight as when no character id is set
    pub account_id: Option<AccountId>,
    /// Fight two random characters instead of a persisted one
    pub quick_play: bool,

    /// Combat balance
    pub rules: BattleRules,
}

impl AppConfig {
    pub const DEFAULT_STEP_DELAY_MS: u64 = 1800;

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let step_delay_ms = match env::var("ARENA_STEP_DELAY_MS") {
            Ok(raw) => raw
                .parse()
                .context("ARENA_STEP_DELAY_MS must be a whole number of milliseconds")?,
            Err(_) => Self::DEFAULT_STEP_DELAY_MS,
        };

        let quick_play = match env::var("ARENA_QUICK_PLAY") {
            Ok(raw) => parse_flag(&raw).context("ARENA_QUICK_PLAY must be true or false")?,
            Err(_) => false,
        };

        Ok(Self {
            player_api_url: non_empty_var("ARENA_PLAYER_API_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            step_delay: Duration::from_millis(step_delay_ms),
            player_id: non_empty_var("ARENA_PLAYER_ID").map(CharacterId::from),
            account_id: non_empty_var("ARENA_ACCOUNT_ID").map(AccountId::from),
            quick_play,
            rules: BattleRules::from_env(),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognised flag value {:?}", other),
    }
}
