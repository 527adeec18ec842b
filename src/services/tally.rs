use std::collections::HashMap;

use crate::models::{game::GamePhase, player::PlayerId, player::PlayerView};

/// Ids that can be voted out this phase, in roster order. By day that is
/// every living player; by night only living good players.
pub fn target_pool(phase: GamePhase, roster: &[PlayerView]) -> Vec<PlayerId> {
    roster
        .iter()
        .filter(|p| p.alive)
        .filter(|p| phase != GamePhase::Night || p.role.is_good())
        .map(|p| p.id)
        .collect()
}

pub fn eligible_for(pool: &[PlayerId], voter: PlayerId) -> Vec<PlayerId> {
    pool.iter().copied().filter(|&id| id != voter).collect()
}

/// Vote counts over a target pool, kept in pool order so the tie-break does
/// not depend on the order votes arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    counts: Vec<(PlayerId, usize)>,
}

impl Tally {
    /// Votes for ids outside `pool` are dropped.
    pub fn count(pool: &[PlayerId], votes: impl IntoIterator<Item = PlayerId>) -> Self {
        let mut per_target: HashMap<PlayerId, usize> = HashMap::new();
        for target in votes {
            *per_target.entry(target).or_insert(0) += 1;
        }
        Self {
            counts: pool
                .iter()
                .map(|id| (*id, per_target.get(id).copied().unwrap_or(0)))
                .collect(),
        }
    }

    /// Most voted id; on a tie, the one earliest in the pool.
    pub fn winner(&self) -> Option<PlayerId> {
        let mut best: Option<(PlayerId, usize)> = None;
        for &(id, count) in &self.counts {
            match best {
                Some((_, top)) if count <= top => {}
                _ => best = Some((id, count)),
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn counts(&self) -> &[(PlayerId, usize)] {
        &self.counts
    }
}
