use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;
use werewolf_engine::{
    utils::test_setup::setup_test_env, Alignment, EngineConfig, GameEngine, GameError, GamePhase,
    GameResult, Player, PlayerId, RandomEndpoint, RemoteEndpoint, Reply, Result, Role,
    ScriptedEndpoint,
};

/// 全員の投票依頼が届くまで回答しないエンドポイント
struct BarrierEndpoint {
    barrier: Arc<Barrier>,
    vote: PlayerId,
}

#[async_trait]
impl RemoteEndpoint for BarrierEndpoint {
    async fn notify_eligible_targets(&mut self, _targets: &[PlayerId]) -> Result<()> {
        Ok(())
    }

    async fn request_choice(&mut self) -> Result<PlayerId> {
        self.barrier.wait().await;
        Ok(self.vote)
    }
}

/// 投票には答えるが、結果通知には応答しないエンドポイント
struct DeafToResult(ScriptedEndpoint);

#[async_trait]
impl RemoteEndpoint for DeafToResult {
    async fn notify_eligible_targets(&mut self, targets: &[PlayerId]) -> Result<()> {
        self.0.notify_eligible_targets(targets).await
    }

    async fn request_choice(&mut self) -> Result<PlayerId> {
        self.0.request_choice().await
    }

    async fn notify_result(&mut self, _result: GameResult) -> Result<()> {
        std::future::pending().await
    }
}

/// ロールと投票スクリプトからプレイヤーを作成（IDは1から）
fn scripted_players(seats: Vec<(Role, Vec<Reply>)>) -> Vec<Player> {
    seats
        .into_iter()
        .zip(1 as PlayerId..)
        .map(|((role, replies), id)| Player::new(id, role, ScriptedEndpoint::from_replies(replies)))
        .collect()
}

fn votes(ids: &[PlayerId]) -> Vec<Reply> {
    ids.iter().copied().map(Reply::Vote).collect()
}

#[tokio::test]
async fn test_game_machine_init() {
    setup_test_env();
    let players = werewolf_engine::seat_players(
        &[Role::Villager, Role::Werewolf, Role::Seer],
        |_, _| RandomEndpoint::new(),
    );
    let mut engine = GameEngine::new(players).unwrap();
    assert_eq!(engine.phase(), GamePhase::Initializing);
    assert_eq!(engine.result(), None);

    engine.run().await.unwrap();

    assert_eq!(engine.phase(), GamePhase::End);
    assert_eq!(engine.roster().len(), 3);
    assert!(engine.result().is_some());
}

#[tokio::test]
async fn test_lynching_the_villager_hands_wolves_the_game() {
    setup_test_env();
    // votes cast: [1, 1, 2]
    let players = scripted_players(vec![
        (Role::Villager, votes(&[2])),
        (Role::Werewolf, votes(&[1])),
        (Role::Seer, votes(&[1])),
    ]);
    let mut engine = GameEngine::new(players).unwrap();
    engine.start().unwrap();
    assert_eq!(engine.phase(), GamePhase::Day);

    let record = engine.play_round().await.unwrap().unwrap();

    assert_eq!(record.eliminated, 1);
    assert_eq!(engine.phase(), GamePhase::End);
    assert_eq!(engine.result(), Some(GameResult::WerewolfWin));
    let alive: Vec<bool> = engine.roster().iter().map(|p| p.alive).collect();
    assert_eq!(alive, vec![false, true, true]);
}

#[tokio::test]
async fn test_lynching_the_only_wolf_ends_the_game() {
    setup_test_env();
    // the wolf votes for itself, which is outside its pool and is discarded
    let players = scripted_players(vec![
        (Role::Villager, votes(&[3])),
        (Role::Villager, votes(&[3])),
        (Role::Werewolf, votes(&[3])),
    ]);
    let mut engine = GameEngine::new(players).unwrap();

    let result = engine.run().await.unwrap();

    assert_eq!(result, GameResult::VillagerWin);
    assert_eq!(engine.phase(), GamePhase::End);
    assert_eq!(engine.history().len(), 1);
    let round = &engine.history()[0];
    assert_eq!(round.eliminated, 3);
    assert_eq!(round.votes, vec![(1, 3), (2, 3)]);
    assert_eq!(round.abstentions, vec![3]);
    assert_eq!(engine.alive_count(Alignment::Evil), 0);
}

#[tokio::test]
async fn test_night_targets_never_include_wolves() {
    setup_test_env();
    let endpoints: Vec<ScriptedEndpoint> = vec![
        ScriptedEndpoint::new([5, 2]),
        ScriptedEndpoint::new([5, 3]),
        ScriptedEndpoint::new([5, 2]),
        ScriptedEndpoint::new([1, 2]),
        ScriptedEndpoint::new([1, 2]),
        ScriptedEndpoint::new([1, 2]),
    ];
    let logs: Vec<_> = endpoints.iter().map(ScriptedEndpoint::notifications).collect();
    let roles = [
        Role::Villager,
        Role::Villager,
        Role::Seer,
        Role::Werewolf,
        Role::Villager,
        Role::Werewolf,
    ];
    let players = roles
        .iter()
        .zip(endpoints)
        .zip(1 as PlayerId..)
        .map(|((role, endpoint), id)| Player::new(id, *role, endpoint))
        .collect();
    let mut engine = GameEngine::new(players).unwrap();
    engine.start().unwrap();

    // day: 1 and 5 tie on three votes each, 1 comes first in the pool
    let day = engine.play_round().await.unwrap().unwrap();
    assert_eq!(day.phase, GamePhase::Day);
    assert_eq!(day.eliminated, 1);
    assert_eq!(engine.phase(), GamePhase::Night);

    let night = engine.play_round().await.unwrap().unwrap();
    assert_eq!(night.phase, GamePhase::Night);
    assert_eq!(night.eliminated, 2);
    assert_eq!(engine.result(), Some(GameResult::WerewolfWin));
    assert!(engine
        .roster()
        .iter()
        .any(|p| p.id == night.eliminated && p.role.is_good()));

    for (log, role) in logs.iter().zip(roles) {
        let rounds = log.lock().unwrap();
        if let Some(night_targets) = rounds.get(1) {
            assert!(!night_targets.contains(&4), "{} saw wolf 4", role);
            assert!(!night_targets.contains(&6), "{} saw wolf 6", role);
        }
    }
}

#[tokio::test]
async fn test_tie_break_is_deterministic() {
    setup_test_env();
    for _ in 0..5 {
        // 2 votes for 4, 2 votes for 2, one abstention; 2 comes first in the pool
        let players = scripted_players(vec![
            (Role::Villager, votes(&[4])),
            (Role::Villager, votes(&[4])),
            (Role::Villager, votes(&[2])),
            (Role::Seer, vec![Reply::Garbage]),
            (Role::Werewolf, votes(&[2])),
        ]);
        let mut engine = GameEngine::new(players).unwrap();
        engine.start().unwrap();
        let record = engine.play_round().await.unwrap().unwrap();
        assert_eq!(record.eliminated, 2);
        assert_eq!(record.abstentions, vec![4]);
    }
}

#[tokio::test]
async fn test_failed_votes_count_as_abstentions() {
    setup_test_env();
    let players = scripted_players(vec![
        (Role::Villager, vec![Reply::Disconnect]),
        (Role::Villager, votes(&[99])),
        (Role::Villager, vec![Reply::Garbage]),
        (Role::Seer, votes(&[5])),
        (Role::Werewolf, votes(&[1])),
    ]);
    let mut engine = GameEngine::new(players).unwrap();
    engine.start().unwrap();

    let record = engine.play_round().await.unwrap().unwrap();

    assert_eq!(record.abstentions, vec![1, 2, 3]);
    assert_eq!(record.votes, vec![(4, 5), (5, 1)]);
    // 1 and 5 tie on one vote each; 1 is earlier in the roster
    assert_eq!(record.eliminated, 1);
    assert_eq!(engine.phase(), GamePhase::Night);
}

#[tokio::test]
async fn test_silent_player_times_out() {
    setup_test_env();
    let players = scripted_players(vec![
        (Role::Villager, votes(&[4])),
        (Role::Villager, votes(&[4])),
        (Role::Seer, vec![Reply::Silent]),
        (Role::Werewolf, votes(&[1])),
    ]);
    let config = EngineConfig::default().with_vote_timeout(Duration::from_millis(50));
    let mut engine = GameEngine::with_config(players, config).unwrap();
    engine.start().unwrap();

    let record = engine.play_round().await.unwrap().unwrap();

    assert_eq!(record.abstentions, vec![3]);
    assert_eq!(record.eliminated, 4);
    assert_eq!(engine.result(), Some(GameResult::VillagerWin));
}

#[tokio::test]
async fn test_result_is_sent_to_every_player() {
    setup_test_env();
    let endpoints = vec![
        ScriptedEndpoint::new([3]),
        ScriptedEndpoint::new([3]),
        ScriptedEndpoint::new([1]),
    ];
    let slots: Vec<_> = endpoints.iter().map(ScriptedEndpoint::result_slot).collect();
    let players = [Role::Villager, Role::Seer, Role::Werewolf]
        .into_iter()
        .zip(endpoints)
        .zip(1 as PlayerId..)
        .map(|((role, endpoint), id)| Player::new(id, role, endpoint))
        .collect();
    let mut engine = GameEngine::new(players).unwrap();

    engine.run().await.unwrap();

    for slot in slots {
        assert_eq!(*slot.lock().unwrap(), Some(GameResult::VillagerWin));
    }
}

#[tokio::test]
async fn test_no_rounds_after_end() {
    setup_test_env();
    let players = scripted_players(vec![
        (Role::Villager, votes(&[3])),
        (Role::Villager, votes(&[3])),
        (Role::Werewolf, votes(&[1])),
    ]);
    let mut engine = GameEngine::new(players).unwrap();
    engine.run().await.unwrap();

    assert!(matches!(
        engine.play_round().await,
        Err(GameError::NoRound(GamePhase::End))
    ));
    assert_eq!(engine.history().len(), 1);
}

#[tokio::test]
async fn test_random_games_always_terminate() {
    setup_test_env();
    let rosters: [&[Role]; 4] = [
        &[Role::Villager, Role::Werewolf, Role::Seer],
        &[Role::Villager, Role::Villager, Role::Werewolf],
        &[
            Role::Villager,
            Role::Villager,
            Role::Villager,
            Role::Seer,
            Role::Werewolf,
            Role::Werewolf,
            Role::Villager,
        ],
        &[
            Role::Villager,
            Role::Villager,
            Role::Villager,
            Role::Villager,
            Role::Seer,
            Role::Werewolf,
        ],
    ];

    for roles in rosters {
        for _ in 0..20 {
            let players = werewolf_engine::seat_players(roles, |_, _| RandomEndpoint::new());
            let mut engine = GameEngine::new(players).unwrap();
            let result = engine.run().await.unwrap();

            let roster = engine.roster();
            let history = engine.history();
            assert!(history.len() <= roles.len());

            // one distinct elimination per round, and the dead are exactly those
            let mut eliminated: Vec<PlayerId> = history.iter().map(|r| r.eliminated).collect();
            let mut dead: Vec<PlayerId> =
                roster.iter().filter(|p| !p.alive).map(|p| p.id).collect();
            eliminated.sort_unstable();
            dead.sort_unstable();
            assert_eq!(eliminated, dead);

            for round in history.iter().filter(|r| r.phase == GamePhase::Night) {
                let victim = roster.iter().find(|p| p.id == round.eliminated).unwrap();
                assert!(victim.role.is_good());
            }

            let expected = if engine.alive_count(Alignment::Evil) == 0 {
                GameResult::VillagerWin
            } else {
                GameResult::WerewolfWin
            };
            assert_eq!(result, expected);
        }
    }
}

#[tokio::test]
async fn test_votes_are_requested_concurrently() {
    setup_test_env();
    // every voter waits until all four requests are in flight
    let barrier = Arc::new(Barrier::new(4));
    let seats = [
        (Role::Villager, 4),
        (Role::Villager, 4),
        (Role::Seer, 4),
        (Role::Werewolf, 1),
    ];
    let players = seats
        .into_iter()
        .zip(1 as PlayerId..)
        .map(|((role, vote), id)| {
            Player::new(
                id,
                role,
                BarrierEndpoint {
                    barrier: barrier.clone(),
                    vote,
                },
            )
        })
        .collect();
    let mut engine = GameEngine::new(players).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), engine.run())
        .await
        .expect("round stalled: votes were not requested concurrently")
        .unwrap();

    assert_eq!(result, GameResult::VillagerWin);
    assert_eq!(engine.history()[0].votes.len(), 4);
}

#[tokio::test]
async fn test_unanswered_result_notice_does_not_block_the_end() {
    setup_test_env();
    let players = [(Role::Villager, 3), (Role::Villager, 3), (Role::Werewolf, 1)]
        .into_iter()
        .zip(1 as PlayerId..)
        .map(|((role, vote), id)| {
            Player::new(id, role, DeafToResult(ScriptedEndpoint::new([vote])))
        })
        .collect();
    let config = EngineConfig::default().with_vote_timeout(Duration::from_millis(50));
    let mut engine = GameEngine::with_config(players, config).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(2), engine.run())
        .await
        .expect("run() did not return after the game ended")
        .unwrap();

    assert_eq!(result, GameResult::VillagerWin);
    assert_eq!(engine.phase(), GamePhase::End);
}
