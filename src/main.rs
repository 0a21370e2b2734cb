use anyhow::Context;
use chrono::Utc;
use clap::{Args as ClapArgs, Parser, Subcommand};
use indicatif::ProgressBar;
use league_synergy::api::models::MatchDto;
use league_synergy::cache::RecordedMatches;
use league_synergy::config::Config;
use league_synergy::display::output::{
    display_build_summary, display_error, display_info, display_success,
};
use league_synergy::logs::recorder::DailyLog;
use league_synergy::pipeline::run_build;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "League Synergy")]
#[command(about = "Build champion and duo ratings from daily match logs", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild game_data.json from the logs in the lookback window
    Build(BuildArgs),
    /// Add saved match-v5 payloads to today's logs
    Record(RecordArgs),
}

#[derive(ClapArgs, Debug)]
struct BuildArgs {
    /// Directory holding winrate_*.json and synergy_*.json (default: GAME_DATA_DIR or game_data)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Artifact path (default: GAME_DATA_OUTPUT or game_data.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Days of logs to aggregate
    #[arg(long)]
    lookback_days: Option<i64>,

    /// Logs this many days old are deleted
    #[arg(long)]
    purge_days: Option<i64>,

    /// Minimum games for a synergy pair to count
    #[arg(long)]
    min_games: Option<u64>,

    /// Keep outdated logs on disk
    #[arg(long)]
    no_purge: bool,

    /// Rows to show in each summary table (default: 10)
    #[arg(short, long, default_value = "10")]
    top: usize,
}

#[derive(ClapArgs, Debug)]
struct RecordArgs {
    /// Match JSON files as returned by match-v5
    #[arg(required = true)]
    matches: Vec<PathBuf>,

    /// Directory holding the daily logs (default: GAME_DATA_DIR or game_data)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Ignore the recorded-match cache
    #[arg(long)]
    refresh: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;

    match args.command {
        Command::Build(build) => {
            if let Some(dir) = build.data_dir {
                config.data_dir = dir;
            }
            if let Some(output) = build.output {
                config.output = output;
            }
            if let Some(days) = build.lookback_days {
                config.lookback_days = days;
            }
            if let Some(days) = build.purge_days {
                config.purge_days = days;
            }
            if let Some(games) = build.min_games {
                config.min_synergy_games = games;
            }
            config.validate()?;
            run_build_command(&config, !build.no_purge, build.top)
        }
        Command::Record(record) => {
            if let Some(dir) = record.data_dir {
                config.data_dir = dir;
            }
            run_record_command(&config, &record.matches, record.refresh)
        }
    }
}

fn run_build_command(config: &Config, purge: bool, top_n: usize) -> anyhow::Result<()> {
    display_info(&format!(
        "Building ratings from {} (last {} days)",
        config.data_dir.display(),
        config.lookback_days
    ));

    let output = run_build(config, purge, None).context("Rating build failed, artifact left unchanged")?;
    output
        .data
        .write(&config.output)
        .with_context(|| format!("Could not write {}", config.output.display()))?;

    display_success(&format!("Wrote {}", config.output.display()));
    display_build_summary(&output, top_n);
    Ok(())
}

fn run_record_command(config: &Config, files: &[PathBuf], refresh: bool) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let mut log = DailyLog::load(&config.data_dir, today)?;
    let mut recorded = if refresh {
        RecordedMatches::new()
    } else {
        RecordedMatches::load()?
    };

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_message("Recording matches");

    let (mut counted, mut duplicates, mut other_queue, mut unreadable) = (0, 0, 0, 0);
    for path in files {
        pb.inc(1);

        let parsed = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))
            .and_then(|body| {
                serde_json::from_str::<MatchDto>(&body)
                    .with_context(|| format!("{} is not a match payload", path.display()))
            });
        let match_data = match parsed {
            Ok(match_data) => match_data,
            Err(e) => {
                tracing::warn!("Skipping {:#}", e);
                unreadable += 1;
                continue;
            }
        };

        if recorded.contains(&match_data.metadata.match_id) {
            duplicates += 1;
            continue;
        }
        if log.record_match(&match_data, config.queue_id) {
            counted += 1;
        } else {
            other_queue += 1;
        }
        recorded.insert(&match_data.metadata.match_id);
    }

    pb.finish_with_message("✓ Matches recorded");

    log.save_with_cache(
        &config.data_dir,
        today,
        &recorded,
        &RecordedMatches::get_cache_path(),
    )?;

    display_success(&format!(
        "Recorded {} matches into {} ({} already known, {} other queues, {} unreadable)",
        counted,
        config.data_dir.display(),
        duplicates,
        other_queue,
        unreadable
    ));
    Ok(())
}
