use env_logger::{Builder, Env};
use log::LevelFilter;

// ログ設定
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));
    builder
        .filter_module("tokio", LevelFilter::Warn)
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .format_target(true)
        .init();
}
