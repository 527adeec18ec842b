use std::collections::HashSet;

use chrono::Utc;
use futures::future::join_all;
use log::{debug, info, warn};
use uuid::Uuid;

use super::tally::{self, Tally};
use crate::error::{GameError, Result};
use crate::models::{
    config::EngineConfig,
    game::{is_game_over, GamePhase, GameResult, RoundRecord, Trigger},
    player::{Player, PlayerId, PlayerView},
    role::Alignment,
};

/// Runs one game: owns the roster, drives day/night rounds and decides when
/// the game is over. Votes within a round are collected concurrently; every
/// elimination and phase change happens here, after all votes are in.
#[derive(Debug)]
pub struct GameEngine {
    id: Uuid,
    players: Vec<Player>,
    phase: GamePhase,
    history: Vec<RoundRecord>,
    config: EngineConfig,
}

impl GameEngine {
    pub fn new(players: Vec<Player>) -> Result<Self> {
        Self::with_config(players, EngineConfig::default())
    }

    pub fn with_config(players: Vec<Player>, config: EngineConfig) -> Result<Self> {
        validate_roster(&players)?;
        let engine = Self {
            id: Uuid::new_v4(),
            players,
            phase: GamePhase::Initializing,
            history: Vec::new(),
            config,
        };
        info!(
            "[{}] Game created with {} players ({} good / {} evil)",
            engine.id,
            engine.players.len(),
            engine.alive_count(Alignment::Good),
            engine.alive_count(Alignment::Evil)
        );
        Ok(engine)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn roster(&self) -> Vec<PlayerView> {
        self.players.iter().map(Player::view).collect()
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn alive_count(&self, alignment: Alignment) -> usize {
        self.players
            .iter()
            .filter(|p| p.alive && p.role.alignment() == alignment)
            .count()
    }

    pub fn is_game_over(&self) -> bool {
        is_game_over(
            self.alive_count(Alignment::Good),
            self.alive_count(Alignment::Evil),
        )
    }

    /// Winner of the game; `None` until the engine has reached `End`.
    pub fn result(&self) -> Option<GameResult> {
        (self.phase == GamePhase::End).then(|| self.current_result())
    }

    pub fn start(&mut self) -> Result<()> {
        self.fire(Trigger::Start)
    }

    /// Starts the game if needed and plays rounds until it ends.
    pub async fn run(&mut self) -> Result<GameResult> {
        if self.phase == GamePhase::Initializing {
            self.start()?;
        }
        while self.phase != GamePhase::End {
            self.play_round().await?;
        }
        Ok(self.current_result())
    }

    /// Plays one round of the current phase. Returns `None` when the game was
    /// already decided and the engine moved straight to `End` without voting.
    pub async fn play_round(&mut self) -> Result<Option<RoundRecord>> {
        let phase = self.phase;
        if !phase.is_round_phase() {
            return Err(GameError::NoRound(phase));
        }
        if self.is_game_over() {
            self.finish().await?;
            return Ok(None);
        }

        let pool = tally::target_pool(phase, &self.roster());
        let results = self.collect_votes(&pool).await;

        let mut votes = Vec::new();
        let mut abstentions = Vec::new();
        for (voter, vote) in results {
            match vote {
                Ok(target) => {
                    debug!("[{}] Player {} voted for {}", self.id, voter, target);
                    votes.push((voter, target));
                }
                Err(e) => {
                    warn!(
                        "[{}] Player {} abstains from the {:?} vote: {}",
                        self.id, voter, phase, e
                    );
                    abstentions.push(voter);
                }
            }
        }

        let tally = Tally::count(&pool, votes.iter().map(|&(_, target)| target));
        debug!("[{}] {:?} tally: {:?}", self.id, phase, tally.counts());
        let Some(eliminated) = tally.winner() else {
            self.finish().await?;
            return Ok(None);
        };
        self.eliminate(eliminated);

        let record = RoundRecord {
            round: self.history.len() + 1,
            phase,
            votes,
            abstentions,
            eliminated,
            timestamp: Utc::now(),
        };
        self.history.push(record.clone());

        if self.is_game_over() {
            self.finish().await?;
        } else {
            self.fire(match phase {
                GamePhase::Day => Trigger::AdvanceToNight,
                _ => Trigger::AdvanceToDay,
            })?;
        }
        Ok(Some(record))
    }
}

impl GameEngine {
    /// Asks every living player at once and waits for all of them.
    async fn collect_votes(&mut self, pool: &[PlayerId]) -> Vec<(PlayerId, Result<PlayerId>)> {
        let game_id = self.id;
        let timeout = self.config.vote_timeout;

        let ballots = self.players.iter_mut().filter(|p| p.alive).map(|player| {
            let eligible = tally::eligible_for(pool, player.id);
            async move {
                debug!(
                    "[{}] Asking player {} to vote among {:?}",
                    game_id, player.id, eligible
                );
                let vote = match timeout {
                    Some(limit) => tokio::time::timeout(limit, player.cast_vote(&eligible))
                        .await
                        .unwrap_or_else(|_| {
                            Err(GameError::Communication(format!(
                                "no vote within {:?}",
                                limit
                            )))
                        }),
                    None => player.cast_vote(&eligible).await,
                };
                let vote = vote.and_then(|target| {
                    if eligible.contains(&target) {
                        Ok(target)
                    } else {
                        Err(GameError::InvalidResponse(format!(
                            "{} is not an eligible target",
                            target
                        )))
                    }
                });
                (player.id, vote)
            }
        });

        join_all(ballots).await
    }

    fn eliminate(&mut self, id: PlayerId) {
        let reveal = self.config.reveal_roles;
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id && p.alive) {
            player.alive = false;
            if reveal {
                info!("[{}] Player {} ({}) was eliminated", self.id, id, player.role);
            } else {
                info!("[{}] Player {} was eliminated", self.id, id);
            }
        }
    }

    fn fire(&mut self, trigger: Trigger) -> Result<()> {
        let next = self.phase.transition(trigger, self.is_game_over())?;
        info!("[{}] Phase {:?} -> {:?}", self.id, self.phase, next);
        self.phase = next;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.fire(Trigger::Finish)?;
        let result = self.current_result();
        info!(
            "[{}] Game over after {} rounds: {:?}",
            self.id,
            self.history.len(),
            result
        );

        let game_id = self.id;
        let timeout = self.config.vote_timeout;
        let notices = self.players.iter_mut().map(|player| async move {
            let id = player.id;
            let notice = player.endpoint_mut().notify_result(result);
            let delivered = match timeout {
                Some(limit) => match tokio::time::timeout(limit, notice).await {
                    Ok(delivered) => delivered,
                    Err(_) => {
                        warn!(
                            "[{}] Player {} did not take the result within {:?}",
                            game_id, id, limit
                        );
                        return;
                    }
                },
                None => notice.await,
            };
            if let Err(e) = delivered {
                warn!(
                    "[{}] Could not deliver the result to player {}: {}",
                    game_id, id, e
                );
            }
        });
        join_all(notices).await;
        Ok(())
    }

    fn current_result(&self) -> GameResult {
        GameResult::from_counts(
            self.alive_count(Alignment::Good),
            self.alive_count(Alignment::Evil),
        )
    }
}

fn validate_roster(players: &[Player]) -> Result<()> {
    if players.is_empty() {
        return Err(GameError::Configuration("roster is empty".into()));
    }

    let mut ids = HashSet::new();
    for player in players {
        if !ids.insert(player.id) {
            return Err(GameError::Configuration(format!(
                "duplicate player id {}",
                player.id
            )));
        }
        if !player.alive {
            return Err(GameError::Configuration(format!(
                "player {} is already dead",
                player.id
            )));
        }
    }

    let good = players.iter().filter(|p| p.role.is_good()).count();
    let evil = players.len() - good;
    if is_game_over(good, evil) {
        return Err(GameError::Configuration(format!(
            "roster is decided before the first round ({} good / {} evil)",
            good, evil
        )));
    }
    Ok(())
}
