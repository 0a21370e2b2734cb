use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

/// Matches already folded into the daily logs are remembered up to this many.
pub const MAX_RECORDED_MATCHES: usize = 2000;

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordedMatches {
    pub last_updated: DateTime<Utc>,
    /// Oldest first.
    pub match_ids: VecDeque<String>,
    #[serde(skip)]
    known: HashSet<String>,
}

impl RecordedMatches {
    pub fn new() -> Self {
        RecordedMatches {
            last_updated: Utc::now(),
            match_ids: VecDeque::new(),
            known: HashSet::new(),
        }
    }

    pub fn get_cache_path() -> PathBuf {
        let cache_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".league_synergy");

        cache_dir.join("recorded_matches.json")
    }

    pub fn load() -> Result<Self, AppError> {
        Self::load_from(&Self::get_cache_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let mut cache: RecordedMatches = serde_json::from_str(&content).map_err(|e| {
                    AppError::JsonError(format!("Failed to parse match cache: {}", e))
                })?;
                cache.known = cache.match_ids.iter().cloned().collect();
                Ok(cache)
            }
            // Cache doesn't exist yet
            Err(_) => Ok(RecordedMatches::new()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::IoError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            AppError::JsonError(format!("Failed to serialize match cache: {}", e))
        })?;

        fs::write(path, json).map_err(|e| {
            AppError::IoError(format!("Failed to write match cache: {}", e))
        })?;

        Ok(())
    }

    pub fn contains(&self, match_id: &str) -> bool {
        self.known.contains(match_id)
    }

    /// Remembers a match id, evicting the oldest past the cap.
    /// Returns false if it was already known.
    pub fn insert(&mut self, match_id: &str) -> bool {
        if !self.known.insert(match_id.to_string()) {
            return false;
        }
        self.match_ids.push_back(match_id.to_string());
        while self.match_ids.len() > MAX_RECORDED_MATCHES {
            if let Some(old) = self.match_ids.pop_front() {
                self.known.remove(&old);
            }
        }
        self.last_updated = Utc::now();
        true
    }

}

impl Default for RecordedMatches {
    fn default() -> Self {
        RecordedMatches::new()
    }
}
