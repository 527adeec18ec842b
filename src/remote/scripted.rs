use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::RemoteEndpoint;
use crate::error::{GameError, Result};
use crate::models::{game::GameResult, player::PlayerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
    Vote(PlayerId),
    Disconnect,
    Garbage,
    // never answers
    Silent,
}

pub type NotificationLog = Arc<Mutex<Vec<Vec<PlayerId>>>>;

/// Answers from a fixed script, one reply per `request_choice`. Every target
/// set it receives is kept in a shared log so callers can inspect what was
/// offered each round.
#[derive(Debug, Default)]
pub struct ScriptedEndpoint {
    replies: VecDeque<Reply>,
    notified: NotificationLog,
    result: Arc<Mutex<Option<GameResult>>>,
}

impl ScriptedEndpoint {
    pub fn new(votes: impl IntoIterator<Item = PlayerId>) -> Self {
        Self::from_replies(votes.into_iter().map(Reply::Vote))
    }

    pub fn from_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn notifications(&self) -> NotificationLog {
        self.notified.clone()
    }

    pub fn result_slot(&self) -> Arc<Mutex<Option<GameResult>>> {
        self.result.clone()
    }
}

#[async_trait]
impl RemoteEndpoint for ScriptedEndpoint {
    async fn notify_eligible_targets(&mut self, targets: &[PlayerId]) -> Result<()> {
        if let Ok(mut notified) = self.notified.lock() {
            notified.push(targets.to_vec());
        }
        Ok(())
    }

    async fn request_choice(&mut self) -> Result<PlayerId> {
        match self.replies.pop_front() {
            Some(Reply::Vote(id)) => Ok(id),
            Some(Reply::Disconnect) => Err(GameError::Communication("scripted disconnect".into())),
            Some(Reply::Garbage) => Err(GameError::InvalidResponse("scripted garbage".into())),
            Some(Reply::Silent) => std::future::pending().await,
            None => Err(GameError::Communication("script exhausted".into())),
        }
    }

    async fn notify_result(&mut self, result: GameResult) -> Result<()> {
        if let Ok(mut slot) = self.result.lock() {
            *slot = Some(result);
        }
        Ok(())
    }
}
