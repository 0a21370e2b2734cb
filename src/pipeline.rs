//! Load, normalize, enforce coverage, classify, aggregate.

use crate::analysis::classifier::RatingClassifier;
use crate::analysis::coverage::{enforce_coverage, verify_coverage, EnforcementReport};
use crate::analysis::graph::SynergyGraph;
use crate::analysis::normalizer::build_graph;
use crate::analysis::power::{assign_powers, duo_strengths};
use crate::artifact::GameData;
use crate::config::Config;
use crate::error::AppError;
use crate::logs::loader::{LoadReport, LogLoader, LogWindow};
use crate::logs::{CountTable, SYNERGY_PREFIX, WINRATE_PREFIX};
use chrono::NaiveDate;

/// Players per match; solo counts record each of them once.
const PARTICIPANTS_PER_MATCH: u64 = 10;

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub load: LoadReport,
    pub champions_before: usize,
    pub champions_after: usize,
    pub edges: usize,
    pub enforcement: EnforcementReport,
}

#[derive(Debug)]
pub struct BuildOutput {
    pub data: GameData,
    pub report: BuildReport,
}

/// Loads both log streams from `config.data_dir` and builds the artifact.
/// `today` pins the window for reproducible runs.
pub fn run_build(config: &Config, purge: bool, today: Option<NaiveDate>) -> Result<BuildOutput, AppError> {
    let window = LogWindow {
        lookback_days: config.lookback_days,
        purge_days: config.purge_days,
        purge,
    };
    let mut loader = LogLoader::new(&config.data_dir, window);
    if let Some(today) = today {
        loader = loader.with_today(today);
    }

    let (winrates, mut load) = loader.load(WINRATE_PREFIX)?;
    let (synergy, synergy_load) = loader.load(SYNERGY_PREFIX)?;
    load.merge(synergy_load);
    tracing::info!(
        files = load.loaded,
        winrate_keys = winrates.len(),
        synergy_keys = synergy.len(),
        "Data load success"
    );

    let mut output = build_game_data(&winrates, &synergy, config.min_synergy_games)?;
    output.report.load = load;
    Ok(output)
}

/// Pure build from merged count tables.
///
/// Fails with `NoData` when no champion record can be built, and with
/// `CoverageViolation` if enforcement leaves a gap; nothing is written in
/// either case.
pub fn build_game_data(
    winrates: &CountTable,
    synergy: &CountTable,
    min_synergy_games: u64,
) -> Result<BuildOutput, AppError> {
    let mut graph = build_graph(winrates, synergy, min_synergy_games);
    if graph.live_count() == 0 {
        return Err(AppError::NoData);
    }

    let champions_before = graph.live_count();
    let total_games: u64 = graph
        .live_nodes()
        .into_iter()
        .map(|node| graph.node(node).games)
        .sum();

    let enforcement = enforce_coverage(&mut graph);
    verify_coverage(&graph)?;

    classify(&mut graph);
    let champion_powers = assign_powers(&mut graph);
    let synergy_powers = duo_strengths(&graph);

    let data = GameData::from_graph(
        &graph,
        total_games / PARTICIPANTS_PER_MATCH,
        champion_powers,
        synergy_powers,
    );

    Ok(BuildOutput {
        data,
        report: BuildReport {
            load: LoadReport::default(),
            champions_before,
            champions_after: graph.live_count(),
            edges: graph.edge_count(),
            enforcement,
        },
    })
}

/// Assigns champion buckets from solo win-rates and edge buckets from
/// synergy deltas, each with its own population statistics.
fn classify(graph: &mut SynergyGraph) {
    let nodes = graph.live_nodes();

    let champion_samples: Vec<(f64, f64)> = nodes
        .iter()
        .map(|&node| (graph.node(node).win_rate, graph.node(node).error))
        .collect();
    let champion_classifier = RatingClassifier::fit(&champion_samples);
    for &node in &nodes {
        let record = graph.node_mut(node);
        record.bucket = champion_classifier.classify(record.win_rate, record.error);
    }

    let synergy_samples: Vec<(f64, f64)> = graph.edges().map(|edge| (edge.delta, edge.error)).collect();
    let synergy_classifier = RatingClassifier::fit(&synergy_samples);
    for edge in graph.edges_mut() {
        edge.bucket = synergy_classifier.classify(edge.delta, edge.error);
    }

    tracing::debug!(
        champion_mean = champion_classifier.mean(),
        champion_spread = champion_classifier.between_variance().sqrt(),
        synergy_mean = synergy_classifier.mean(),
        synergy_spread = synergy_classifier.between_variance().sqrt(),
        thresholds = ?champion_classifier.thresholds(),
        "Fitted rating classifiers"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::WinLoss;
    use crate::role::Role;

    fn table(entries: &[(&str, u64, u64)]) -> CountTable {
        entries
            .iter()
            .map(|&(key, wins, losses)| (key.to_string(), WinLoss::new(wins, losses)))
            .collect()
    }

    #[test]
    fn empty_input_is_no_data() {
        let result = build_game_data(&CountTable::new(), &CountTable::new(), 75);
        assert!(matches!(result, Err(AppError::NoData)));
    }

    #[test]
    fn unsupported_champion_is_removed() {
        let winrates = table(&[("A+TOP", 60, 40), ("B+JUNGLE", 40, 60), ("C+MIDDLE", 3, 7)]);
        let synergy = table(&[("B+A+JUNGLE+TOP", 44, 36), ("A+C+TOP+MIDDLE", 5, 5)]);

        let output = build_game_data(&winrates, &synergy, 75).unwrap();
        assert_eq!(output.report.champions_before, 3);
        assert_eq!(output.report.champions_after, 2);
        assert_eq!(output.report.enforcement.removed[0].name, "C");
        assert!(output.data.lanes[&Role::Middle].is_empty());
        assert_eq!(output.data.meta.match_count, 21);
    }
}
