use anyhow::Context;
use dotenvy::dotenv;
use log::info;
use serde_json::json;
use tokio::net::TcpListener;

use werewolf_engine::{
    models::role::parse_roster,
    utils::{config::CONFIG, logger::init_logger},
    GameEngine, Player, PlayerId, RandomEndpoint, StreamEndpoint,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 環境変数をロード
    if let Err(e) = dotenv() {
        eprintln!("Warning: .env could not be loaded: {}", e);
    }

    init_logger(CONFIG.engine.verbose_logging);

    let roles = parse_roster(&CONFIG.roster).context("invalid WEREWOLF_ROSTER")?;

    let players = match &CONFIG.listen_addr {
        Some(addr) => {
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {}", addr))?;
            info!("Waiting for {} players on {}", roles.len(), addr);

            let mut players = Vec::with_capacity(roles.len());
            for (role, id) in roles.iter().zip(1 as PlayerId..) {
                let (socket, peer) = listener.accept().await?;
                info!("Player {} connected from {}", id, peer);
                players.push(Player::new(id, *role, StreamEndpoint::from_tcp(socket)));
            }
            players
        }
        None => werewolf_engine::seat_players(&roles, |_, _| RandomEndpoint::new()),
    };

    let mut engine = GameEngine::with_config(players, CONFIG.engine.clone())?;
    let result = engine.run().await?;

    let summary = json!({
        "game_id": engine.id(),
        "result": result,
        "rounds": engine.history(),
        "roster": engine.roster(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
