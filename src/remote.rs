pub mod random;
pub mod scripted;
pub mod stream;

pub use random::*;
pub use scripted::*;
pub use stream::*;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{game::GameResult, player::PlayerId};

/// Channel between a seat at the table and whoever controls it: a human
/// client, a bot, or a test double. Both calls may suspend for as long as the
/// remote side takes to answer.
#[async_trait]
pub trait RemoteEndpoint: Send {
    /// Tells the remote side which ids it may vote for this round. Always
    /// delivered before the matching `request_choice`.
    async fn notify_eligible_targets(&mut self, targets: &[PlayerId]) -> Result<()>;

    /// Waits for exactly one id. The id is not checked against the notified
    /// targets here.
    async fn request_choice(&mut self) -> Result<PlayerId>;

    async fn notify_result(&mut self, _result: GameResult) -> Result<()> {
        Ok(())
    }
}
