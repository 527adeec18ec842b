use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::error::{GameError, Result};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Initializing,
    Day,
    Night,
    End,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Trigger {
    Start,
    AdvanceToNight,
    AdvanceToDay,
    Finish,
}

impl GamePhase {
    /// The whole transition table. `game_over` is the guard evaluated after the
    /// last elimination; it is ignored by `Start`.
    pub fn transition(self, trigger: Trigger, game_over: bool) -> Result<GamePhase> {
        use GamePhase::*;
        use Trigger::*;

        match (self, trigger) {
            (Initializing, Start) => Ok(Day),
            (Day, AdvanceToNight) if !game_over => Ok(Night),
            (Night, AdvanceToDay) if !game_over => Ok(Day),
            (Day | Night, Finish) if game_over => Ok(End),
            (from, trigger) => Err(GameError::InvalidTransition { from, trigger }),
        }
    }

    pub fn is_round_phase(self) -> bool {
        matches!(self, GamePhase::Day | GamePhase::Night)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    VillagerWin,
    WerewolfWin,
}

impl GameResult {
    /// Only meaningful once `is_game_over` holds for the same counts.
    pub fn from_counts(good: usize, evil: usize) -> Self {
        if evil == 0 && good > 0 {
            GameResult::VillagerWin
        } else {
            GameResult::WerewolfWin
        }
    }
}

pub fn is_game_over(good: usize, evil: usize) -> bool {
    good + evil <= 1 || good <= evil || evil == 0
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    pub phase: GamePhase,
    pub votes: Vec<(PlayerId, PlayerId)>, // (voter, target)
    pub abstentions: Vec<PlayerId>,
    pub eliminated: PlayerId,
    pub timestamp: DateTime<Utc>,
}
