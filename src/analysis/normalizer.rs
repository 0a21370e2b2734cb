use super::graph::{ChampionRoleRecord, SynergyGraph};
use super::stats::{normalized_winrate, sampling_error};
use crate::logs::{parse_synergy_key, parse_winrate_key, CountTable};
use crate::role::Role;

/// Builds champion-role records from solo counts and attaches a synergy edge
/// for every qualifying pair.
///
/// A pair entry is dropped when a role is missing or repeated, both sides are
/// the same champion, either side has no solo record, or it has fewer than
/// `min_games` games. Edge delta is the observed pair win-rate minus the
/// log-odds average of the two solo win-rates.
pub fn build_graph(winrates: &CountTable, synergy: &CountTable, min_games: u64) -> SynergyGraph {
    let mut graph = SynergyGraph::new();

    for (key, counts) in winrates {
        let Some((champion, role)) = parse_winrate_key(key) else {
            continue;
        };
        let games = counts.games();
        if games == 0 {
            continue;
        }
        graph.add_record(ChampionRoleRecord {
            name: champion.to_string(),
            role,
            games,
            win_rate: counts.win_rate(),
            error: sampling_error(counts.wins, counts.losses),
            bucket: Default::default(),
            power: 0.0,
        });
    }

    let mut dropped = 0usize;
    for (key, counts) in synergy {
        let Some(parts) = parse_synergy_key(key) else {
            dropped += 1;
            continue;
        };
        let (Ok(role1), Ok(role2)) = (parts.role1.parse::<Role>(), parts.role2.parse::<Role>())
        else {
            dropped += 1;
            continue;
        };
        if role1 == role2 || parts.champion1 == parts.champion2 {
            dropped += 1;
            continue;
        }
        let (Some(a), Some(b)) = (
            graph.find(role1, parts.champion1),
            graph.find(role2, parts.champion2),
        ) else {
            dropped += 1;
            continue;
        };

        let games = counts.games();
        if games < min_games || games == 0 {
            dropped += 1;
            continue;
        }

        let expected = normalized_winrate(graph.node(a).win_rate, graph.node(b).win_rate);
        let delta = counts.win_rate() - expected;
        graph.set_edge(a, b, games, delta, sampling_error(counts.wins, counts.losses));
    }

    tracing::debug!(
        champions = graph.live_count(),
        edges = graph.edge_count(),
        dropped,
        "Built synergy graph"
    );

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::WinLoss;

    fn table(entries: &[(&str, u64, u64)]) -> CountTable {
        entries
            .iter()
            .map(|&(key, wins, losses)| (key.to_string(), WinLoss::new(wins, losses)))
            .collect()
    }

    #[test]
    fn delta_is_relative_to_log_odds_baseline() {
        let winrates = table(&[("A+TOP", 60, 40), ("B+JUNGLE", 40, 60)]);
        let synergy = table(&[("A+B+TOP+JUNGLE", 44, 36)]);

        let graph = build_graph(&winrates, &synergy, 75);
        let a = graph.find(Role::Top, "A").unwrap();
        let b = graph.find(Role::Jungle, "B").unwrap();
        let edge = graph.edge_between(a, b).unwrap();

        assert_eq!(edge.games, 80);
        assert!((edge.delta - 0.05).abs() < 1e-9);
        assert!((edge.error - sampling_error(44, 36)).abs() < 1e-12);
        assert!(std::ptr::eq(edge, graph.edge_between(b, a).unwrap()));
    }

    #[test]
    fn invalid_pairs_are_dropped() {
        let winrates = table(&[
            ("A+TOP", 50, 50),
            ("A+JUNGLE", 50, 50),
            ("B+JUNGLE", 50, 50),
            ("C+JUNGLE", 50, 50),
            ("D+MIDDLE", 0, 0),
        ]);
        let synergy = table(&[
            ("A+B++JUNGLE", 50, 50),       // empty role
            ("A+C+JUNGLE+JUNGLE", 50, 50), // same role
            ("A+A+JUNGLE+TOP", 50, 50),    // same champion
            ("A+Z+TOP+JUNGLE", 50, 50),    // no solo record
            ("A+D+TOP+MIDDLE", 50, 50),    // zero-game solo record never created
            ("A+C+TOP+JUNGLE", 30, 30),    // below threshold
            ("A+B+TOP+JUNGLE", 50, 50),
        ]);

        let graph = build_graph(&winrates, &synergy, 75);
        assert_eq!(graph.live_count(), 4);
        assert!(graph.find(Role::Middle, "D").is_none());
        assert_eq!(graph.edge_count(), 1);

        let a = graph.find(Role::Top, "A").unwrap();
        let b = graph.find(Role::Jungle, "B").unwrap();
        assert!(graph.edge_between(a, b).is_some());
    }

    #[test]
    fn threshold_is_inclusive() {
        let winrates = table(&[("A+TOP", 50, 50), ("B+JUNGLE", 50, 50)]);
        let synergy = table(&[("A+B+TOP+JUNGLE", 40, 35)]);

        let graph = build_graph(&winrates, &synergy, 75);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn solo_records_carry_rate_and_error() {
        let winrates = table(&[("A+TOP", 30, 70)]);
        let graph = build_graph(&winrates, &CountTable::new(), 75);
        let node = graph.node(graph.find(Role::Top, "A").unwrap());

        assert_eq!(node.games, 100);
        assert!((node.win_rate - 0.3).abs() < 1e-12);
        assert!((node.error - sampling_error(30, 70)).abs() < 1e-12);
    }
}
