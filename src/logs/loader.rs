use super::{CountTable, WinLoss, DATE_FORMAT};
use crate::error::AppError;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Which dated files take part in aggregation and which get purged.
#[derive(Debug, Clone, Copy)]
pub struct LogWindow {
    /// Files younger than this many days are aggregated.
    pub lookback_days: i64,
    /// Files this many days old or older are deleted.
    pub purge_days: i64,
    pub purge: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub retained: usize,
    pub deleted: usize,
    pub delete_failed: usize,
    pub skipped: Vec<String>,
}

impl LoadReport {
    pub fn merge(&mut self, other: LoadReport) {
        self.loaded += other.loaded;
        self.retained += other.retained;
        self.deleted += other.deleted;
        self.delete_failed += other.delete_failed;
        self.skipped.extend(other.skipped);
    }
}

pub struct LogLoader<'a> {
    dir: &'a Path,
    window: LogWindow,
    today: NaiveDate,
}

impl<'a> LogLoader<'a> {
    pub fn new(dir: &'a Path, window: LogWindow) -> Self {
        LogLoader {
            dir,
            window,
            today: Utc::now().date_naive(),
        }
    }

    /// Pins "today" so window boundaries are reproducible.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Merges every `{prefix}_{date}.json` inside the lookback window.
    ///
    /// Per-file problems (bad date, bad JSON, failed delete) are logged and
    /// counted in the report; only an unreadable directory is an error.
    pub fn load(&self, prefix: &str) -> Result<(CountTable, LoadReport), AppError> {
        let mut merged = CountTable::new();
        let mut report = LoadReport::default();

        for (path, name, date_part) in self.matching_files(prefix)? {
            let file_date = match NaiveDate::parse_from_str(&date_part, DATE_FORMAT) {
                Ok(date) => date,
                Err(_) => {
                    tracing::warn!("Skipping {}: date not parseable", name);
                    report.skipped.push(name);
                    continue;
                }
            };

            let age_days = (self.today - file_date).num_days();

            if age_days >= self.window.purge_days {
                if self.window.purge {
                    match fs::remove_file(&path) {
                        Ok(()) => {
                            tracing::info!("Deleted outdated file {}", name);
                            report.deleted += 1;
                        }
                        Err(e) => {
                            tracing::warn!("Could not delete {}: {}", name, e);
                            report.delete_failed += 1;
                        }
                    }
                } else {
                    report.retained += 1;
                }
                continue;
            }

            if age_days >= self.window.lookback_days {
                tracing::debug!("Keeping {} on disk, outside lookback window", name);
                report.retained += 1;
                continue;
            }

            match read_counts(&path).and_then(|counts| merge_counts(&mut merged, counts)) {
                Ok(()) => report.loaded += 1,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", name, e);
                    report.skipped.push(name);
                }
            }
        }

        tracing::debug!(
            prefix,
            loaded = report.loaded,
            keys = merged.len(),
            "Merged daily logs"
        );

        Ok((merged, report))
    }

    /// `(path, file name, trailing date token)` for every candidate, sorted by name.
    fn matching_files(&self, prefix: &str) -> Result<Vec<(PathBuf, String, String)>, AppError> {
        let entries = fs::read_dir(self.dir).map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", self.dir.display(), e))
        })?;

        let head = format!("{}_", prefix);
        let mut files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(stem) = name.strip_suffix(".json") else {
                continue;
            };
            if !stem.starts_with(&head) {
                continue;
            }
            let date_part = stem.rsplit('_').next().unwrap_or_default().to_string();
            files.push((path, name, date_part));
        }

        files.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(files)
    }
}

/// Adds a file's counts into `merged`, all or nothing: if any key would
/// overflow, `merged` is left untouched.
fn merge_counts(merged: &mut CountTable, counts: BTreeMap<String, WinLoss>) -> Result<(), AppError> {
    let mut sums = Vec::with_capacity(counts.len());
    for (key, value) in counts {
        let current = merged.get(&key).copied().unwrap_or_else(WinLoss::zero);
        let sum = current
            .checked_add(value)
            .ok_or_else(|| AppError::JsonError(format!("count for {} overflows", key)))?;
        sums.push((key, sum));
    }
    merged.extend(sums);
    Ok(())
}

fn read_counts(path: &Path) -> Result<BTreeMap<String, WinLoss>, AppError> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content).map_err(|e| AppError::JsonError(e.to_string()))
}
