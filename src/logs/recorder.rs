use super::{
    canonical_synergy_key, log_file_name, winrate_key, write_json_atomic, CountTable, WinLoss,
    SYNERGY_PREFIX, WINRATE_PREFIX,
};
use crate::api::models::MatchDto;
use crate::cache::RecordedMatches;
use crate::error::AppError;
use crate::role::Role;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

/// One day's worth of counts for both streams.
#[derive(Debug, Default)]
pub struct DailyLog {
    pub winrates: CountTable,
    pub synergy: CountTable,
}

impl DailyLog {
    pub fn new() -> Self {
        DailyLog::default()
    }

    /// Reads the day's files if they exist, so recording resumes where it left off.
    pub fn load(dir: &Path, date: NaiveDate) -> Result<Self, AppError> {
        Ok(DailyLog {
            winrates: read_or_empty(&dir.join(log_file_name(WINRATE_PREFIX, date)))?,
            synergy: read_or_empty(&dir.join(log_file_name(SYNERGY_PREFIX, date)))?,
        })
    }

    pub fn save(&self, dir: &Path, date: NaiveDate) -> Result<(), AppError> {
        fs::create_dir_all(dir).map_err(|e| {
            AppError::IoError(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        write_json_atomic(&dir.join(log_file_name(WINRATE_PREFIX, date)), &self.winrates, false)?;
        write_json_atomic(&dir.join(log_file_name(SYNERGY_PREFIX, date)), &self.synergy, false)?;
        Ok(())
    }

    /// Persists the recorded-match cache, then the logs. A failed cache write
    /// leaves the logs untouched, so a retry cannot count a match twice.
    pub fn save_with_cache(
        &self,
        dir: &Path,
        date: NaiveDate,
        recorded: &RecordedMatches,
        cache_path: &Path,
    ) -> Result<(), AppError> {
        recorded.save_to(cache_path)?;
        self.save(dir, date)
    }

    /// Folds one match into the counts. Returns false for matches from other queues.
    ///
    /// Participants without a recognised team position are left out of both
    /// streams.
    pub fn record_match(&mut self, match_data: &MatchDto, queue_id: i64) -> bool {
        if match_data.info.queue_id != queue_id {
            return false;
        }

        let placed: Vec<(i32, &str, Role, bool)> = match_data
            .info
            .participants
            .iter()
            .filter_map(|p| {
                let role = p.team_position.parse::<Role>().ok()?;
                Some((p.team_id, p.champion_name.as_str(), role, p.win))
            })
            .collect();

        for &(_, champion, role, won) in &placed {
            self.winrates
                .entry(winrate_key(champion, role))
                .or_insert_with(WinLoss::zero)
                .record(won);
        }

        for (i, &(team1, champion1, role1, won)) in placed.iter().enumerate() {
            for &(team2, champion2, role2, _) in &placed[i + 1..] {
                if team1 != team2 {
                    continue;
                }
                self.synergy
                    .entry(canonical_synergy_key(champion1, champion2, role1, role2))
                    .or_insert_with(WinLoss::zero)
                    .record(won);
            }
        }

        true
    }
}

fn read_or_empty(path: &Path) -> Result<CountTable, AppError> {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).map_err(|e| {
            AppError::JsonError(format!("Failed to parse {}: {}", path.display(), e))
        }),
        Err(_) => Ok(CountTable::new()),
    }
}
