use std::fmt;

use serde::{Deserialize, Serialize};

use super::role::Role;
use crate::error::Result;
use crate::remote::RemoteEndpoint;

pub type PlayerId = u32;

pub struct Player {
    pub id: PlayerId,
    pub role: Role,
    pub alive: bool,
    endpoint: Box<dyn RemoteEndpoint>,
}

impl Player {
    pub fn new(id: PlayerId, role: Role, endpoint: impl RemoteEndpoint + 'static) -> Self {
        Self {
            id,
            role,
            alive: true,
            endpoint: Box::new(endpoint),
        }
    }

    /// Pushes the legal targets to the remote side, then waits for its pick.
    /// Whether the pick is legal is checked by the engine, not here.
    pub async fn cast_vote(&mut self, eligible: &[PlayerId]) -> Result<PlayerId> {
        self.endpoint.notify_eligible_targets(eligible).await?;
        self.endpoint.request_choice().await
    }

    pub(crate) fn endpoint_mut(&mut self) -> &mut dyn RemoteEndpoint {
        self.endpoint.as_mut()
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            role: self.role,
            alive: self.alive,
        }
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("alive", &self.alive)
            .finish_non_exhaustive()
    }
}

/// Seats one player per role with ids `1..=n` in the given order.
pub fn seat_players<E, F>(roles: &[Role], mut make_endpoint: F) -> Vec<Player>
where
    E: RemoteEndpoint + 'static,
    F: FnMut(PlayerId, Role) -> E,
{
    roles
        .iter()
        .zip(1..)
        .map(|(&role, id)| Player::new(id, role, make_endpoint(id, role)))
        .collect()
}

/// Read-only roster entry handed out to callers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub role: Role,
    pub alive: bool,
}
