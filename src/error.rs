use thiserror::Error;

use crate::models::game::{GamePhase, Trigger};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Communication error: {0}")]
    Communication(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Trigger {trigger:?} is not allowed from phase {from:?}")]
    InvalidTransition { from: GamePhase, trigger: Trigger },
    #[error("No voting round can be played in phase {0:?}")]
    NoRound(GamePhase),
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        GameError::Communication(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
