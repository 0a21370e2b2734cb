//! Daily win/loss logs: the on-disk format shared by the recorder and the loader.
//!
//! Each stream (`winrate`, `synergy`) is one JSON file per UTC day, named
//! `{stream}_{YYYY-MM-DD}.json`, mapping a string key to `{"wins", "losses"}`.

pub mod loader;
pub mod recorder;

use crate::error::AppError;
use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const WINRATE_PREFIX: &str = "winrate";
pub const SYNERGY_PREFIX: &str = "synergy";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLoss {
    #[serde(default)]
    pub wins: u64,
    #[serde(default)]
    pub losses: u64,
}

impl WinLoss {
    /// Starting value for every accumulation site.
    pub fn zero() -> Self {
        WinLoss { wins: 0, losses: 0 }
    }

    pub fn new(wins: u64, losses: u64) -> Self {
        WinLoss { wins, losses }
    }

    pub fn games(&self) -> u64 {
        self.wins.saturating_add(self.losses)
    }

    pub fn win_rate(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            0.0
        } else {
            self.wins as f64 / games as f64
        }
    }

    /// Sum of both counts, or `None` if either overflows.
    pub fn checked_add(&self, other: WinLoss) -> Option<WinLoss> {
        Some(WinLoss {
            wins: self.wins.checked_add(other.wins)?,
            losses: self.losses.checked_add(other.losses)?,
        })
    }

    pub fn record(&mut self, won: bool) {
        if won {
            self.wins = self.wins.saturating_add(1);
        } else {
            self.losses = self.losses.saturating_add(1);
        }
    }
}

/// Merged counts for one stream, keyed by the raw log key.
pub type CountTable = BTreeMap<String, WinLoss>;

pub fn winrate_key(champion: &str, role: Role) -> String {
    format!("{}+{}", champion, role)
}

/// Key for an unordered teammate pair. The `(role, champion)` tuple that
/// sorts first (by wire name) always comes first.
pub fn canonical_synergy_key(champion1: &str, champion2: &str, role1: Role, role2: Role) -> String {
    if (role1.as_str(), champion1) <= (role2.as_str(), champion2) {
        format!("{}+{}+{}+{}", champion1, champion2, role1, role2)
    } else {
        format!("{}+{}+{}+{}", champion2, champion1, role2, role1)
    }
}

/// Splits `champion+ROLE`. Keys with an unknown or empty role yield `None`.
pub fn parse_winrate_key(key: &str) -> Option<(&str, Role)> {
    let (champion, role) = key.split_once('+')?;
    if champion.is_empty() || role.contains('+') {
        return None;
    }
    Some((champion, role.parse().ok()?))
}

/// Raw parts of a synergy key, roles still unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynergyKey<'a> {
    pub champion1: &'a str,
    pub champion2: &'a str,
    pub role1: &'a str,
    pub role2: &'a str,
}

pub fn parse_synergy_key(key: &str) -> Option<SynergyKey<'_>> {
    let mut parts = key.split('+');
    let parsed = SynergyKey {
        champion1: parts.next()?,
        champion2: parts.next()?,
        role1: parts.next()?,
        role2: parts.next()?,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(parsed)
}

pub fn log_file_name(prefix: &str, date: chrono::NaiveDate) -> String {
    format!("{}_{}.json", prefix, date.format(DATE_FORMAT))
}

/// Serializes to a temporary sibling and renames it over `path`, so readers
/// never observe a half-written file.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), AppError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| AppError::JsonError(format!("Failed to serialize {}: {}", path.display(), e)))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    fs::write(tmp, json)
        .map_err(|e| AppError::IoError(format!("Failed to write {}: {}", tmp.display(), e)))?;
    if let Err(e) = fs::rename(tmp, path) {
        let _ = fs::remove_file(tmp);
        return Err(AppError::IoError(format!(
            "Failed to replace {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}
