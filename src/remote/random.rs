use async_trait::async_trait;
use rand::seq::SliceRandom;

use super::RemoteEndpoint;
use crate::error::{GameError, Result};
use crate::models::player::PlayerId;

/// In-process endpoint that picks uniformly at random from the last target
/// set it was told about.
#[derive(Debug, Default)]
pub struct RandomEndpoint {
    targets: Vec<PlayerId>,
}

impl RandomEndpoint {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RemoteEndpoint for RandomEndpoint {
    async fn notify_eligible_targets(&mut self, targets: &[PlayerId]) -> Result<()> {
        self.targets = targets.to_vec();
        Ok(())
    }

    async fn request_choice(&mut self) -> Result<PlayerId> {
        let mut rng = rand::thread_rng();
        self.targets
            .choose(&mut rng)
            .copied()
            .ok_or_else(|| GameError::InvalidResponse("no eligible targets to choose from".into()))
    }
}
