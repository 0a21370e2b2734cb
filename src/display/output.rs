use crate::analysis::power::DuoStrength;
use crate::logs::loader::LoadReport;
use crate::pipeline::BuildOutput;
use colored::*;
use std::collections::BTreeMap;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct PowerRow {
    rank: String,
    champion: String,
    power: String,
}

#[derive(Tabled)]
struct DuoRow {
    rank: String,
    duo: String,
    strength: String,
}

#[derive(Tabled)]
struct RemovedRow {
    champion: String,
    games: String,
    missing: String,
}

#[derive(Tabled)]
struct DistributionRow {
    bucket: String,
    champions: String,
    synergies: String,
}

pub fn display_build_summary(output: &BuildOutput, top_n: usize) {
    let report = &output.report;
    let meta = &output.data.meta;

    println!("\n{}", "📊 RATING BUILD".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());
    println!(
        "{} {}",
        "📁 Logs:".bold(),
        load_summary(&report.load)
    );
    println!(
        "{} {} kept of {} ({} removed), {} synergy pairs, ~{} matches\n",
        "🎮 Champions:".bold(),
        report.champions_after.to_string().green(),
        report.champions_before,
        report.enforcement.removed.len().to_string().red(),
        report.edges,
        meta.match_count
    );

    display_distribution(&meta.score_distribution, &meta.synergy_distribution);

    if !report.enforcement.removed.is_empty() {
        println!("{}", "Removed for incomplete synergy data".bold().yellow());
        let rows: Vec<RemovedRow> = report
            .enforcement
            .removed
            .iter()
            .take(top_n)
            .map(|r| RemovedRow {
                champion: format!("{} ({})", r.name, r.role),
                games: r.games.to_string(),
                missing: r.unsatisfied.to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
        if report.enforcement.removed.len() > top_n {
            println!("  ...{} more not shown", report.enforcement.removed.len() - top_n);
        }
        println!();
    }

    display_top_powers(&meta.champion_powers, top_n);
    display_top_duos(&meta.synergy_powers, top_n);
}

fn load_summary(load: &LoadReport) -> String {
    let mut line = format!(
        "{} files loaded, {} kept on disk, {} deleted, {} skipped",
        load.loaded,
        load.retained,
        load.deleted,
        load.skipped.len()
    );
    if load.delete_failed > 0 {
        line.push_str(&format!(", {} could not be deleted", load.delete_failed));
    }
    line
}

fn display_distribution(scores: &BTreeMap<u8, usize>, synergies: &BTreeMap<u8, usize>) {
    let rows: Vec<DistributionRow> = scores
        .iter()
        .map(|(bucket, count)| DistributionRow {
            bucket: bucket.to_string(),
            champions: count.to_string(),
            synergies: synergies.get(bucket).copied().unwrap_or(0).to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn display_top_powers(powers: &[(String, f64)], top_n: usize) {
    if powers.is_empty() {
        return;
    }

    println!("{}", "🔥 Strongest Champions".bold().cyan());
    // Sorted ascending, so the strongest are at the end
    let rows: Vec<PowerRow> = powers
        .iter()
        .rev()
        .take(top_n)
        .enumerate()
        .map(|(idx, (label, power))| PowerRow {
            rank: format!("#{}", idx + 1),
            champion: label.clone(),
            power: format!("{:.2}", power),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn display_top_duos(duos: &[DuoStrength], top_n: usize) {
    if duos.is_empty() {
        return;
    }

    println!("{}", "👥 Strongest Duos".bold().cyan());
    let rows: Vec<DuoRow> = duos
        .iter()
        .rev()
        .take(top_n)
        .enumerate()
        .map(|(idx, duo)| DuoRow {
            rank: format!("#{}", idx + 1),
            duo: format!("{} + {}", duo.champ1, duo.champ2),
            strength: format!("{:.2}", duo.strength),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
