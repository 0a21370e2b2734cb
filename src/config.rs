use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;
pub const DEFAULT_PURGE_DAYS: i64 = 30;
pub const DEFAULT_MIN_SYNERGY_GAMES: u64 = 75;
pub const RANKED_SOLO_QUEUE: i64 = 420;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub output: PathBuf,
    pub lookback_days: i64,
    pub purge_days: i64,
    pub min_synergy_games: u64,
    pub queue_id: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("game_data"),
            output: PathBuf::from("game_data.json"),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            purge_days: DEFAULT_PURGE_DAYS,
            min_synergy_games: DEFAULT_MIN_SYNERGY_GAMES,
            queue_id: RANKED_SOLO_QUEUE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();
        let config = Config {
            data_dir: env::var("GAME_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            output: env::var("GAME_DATA_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output),
            lookback_days: parse_var("LOOKBACK_DAYS", defaults.lookback_days)?,
            purge_days: parse_var("PURGE_DAYS", defaults.purge_days)?,
            min_synergy_games: parse_var("MIN_SYNERGY_GAMES", defaults.min_synergy_games)?,
            queue_id: parse_var("RANKED_QUEUE_ID", defaults.queue_id)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.lookback_days <= 0 {
            return Err(AppError::ConfigError(format!(
                "LOOKBACK_DAYS must be positive, got {}",
                self.lookback_days
            )));
        }
        if self.purge_days < self.lookback_days {
            return Err(AppError::ConfigError(format!(
                "PURGE_DAYS ({}) must be at least LOOKBACK_DAYS ({})",
                self.purge_days, self.lookback_days
            )));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            AppError::ConfigError(format!("{} is not a valid number: {:?}", name, raw))
        }),
        Err(_) => Ok(default),
    }
}
