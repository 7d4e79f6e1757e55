//! Domain events - What happened during a battle

mod battle_events;

pub use battle_events::{round_amount, AttackKind, AttackOutcome, BattleEvent, BattleStep};
