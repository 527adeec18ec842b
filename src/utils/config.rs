use once_cell::sync::Lazy;
use std::env;

use crate::models::config::EngineConfig;

pub static CONFIG: Lazy<Config> = Lazy::new(Config::new);

pub struct Config {
    pub roster: String,
    pub listen_addr: Option<String>,
    pub engine: EngineConfig,
}

impl Config {
    fn new() -> Self {
        Self {
            roster: env::var("WEREWOLF_ROSTER")
                .unwrap_or_else(|_| "villager,villager,seer,wolf".to_string()),
            listen_addr: env::var("WEREWOLF_LISTEN_ADDR").ok(),
            engine: EngineConfig::from_env(),
        }
    }
}
