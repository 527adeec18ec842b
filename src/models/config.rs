use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    // 未設定なら投票を無期限に待つ
    pub vote_timeout: Option<Duration>,
    // ログに役職を出すかどうか
    pub reveal_roles: bool,
    pub verbose_logging: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vote_timeout: None,
            reveal_roles: false,
            verbose_logging: cfg!(debug_assertions),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let vote_timeout = env::var("WEREWOLF_VOTE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis);
        let reveal_roles = env::var("WEREWOLF_REVEAL_ROLES")
            .map(|v| v == "true")
            .unwrap_or(defaults.reveal_roles);
        let verbose_logging = env::var("WEREWOLF_VERBOSE_LOGGING")
            .map(|v| v == "true")
            .unwrap_or(defaults.verbose_logging);

        Self {
            vote_timeout,
            reveal_roles,
            verbose_logging,
        }
    }

    pub fn with_vote_timeout(mut self, timeout: Duration) -> Self {
        self.vote_timeout = Some(timeout);
        self
    }
}
