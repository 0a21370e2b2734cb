//! `game_data.json`: the rating artifact read by the client.

use crate::analysis::classifier::Bucket;
use crate::analysis::graph::SynergyGraph;
use crate::analysis::power::DuoStrength;
use crate::error::AppError;
use crate::logs::write_json_atomic;
use crate::role::Role;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionEntry {
    pub name: String,
    pub lane: Role,
    pub points: Bucket,
    pub power: f64,
    pub winrate: f64,
    pub synergy: BTreeMap<Role, BTreeMap<String, Bucket>>,
    pub delta: BTreeMap<Role, BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meta {
    pub champ_count: usize,
    pub score_distribution: BTreeMap<u8, usize>,
    pub synergy_distribution: BTreeMap<u8, usize>,
    pub match_count: u64,
    pub champion_powers: Vec<(String, f64)>,
    pub synergy_powers: Vec<DuoStrength>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameData {
    #[serde(flatten)]
    pub lanes: BTreeMap<Role, Vec<ChampionEntry>>,
    #[serde(rename = "_meta")]
    pub meta: Meta,
}

impl GameData {
    /// Snapshots a classified, power-annotated graph.
    pub fn from_graph(
        graph: &SynergyGraph,
        match_count: u64,
        champion_powers: Vec<(String, f64)>,
        synergy_powers: Vec<DuoStrength>,
    ) -> Self {
        let mut lanes = BTreeMap::new();
        for role in Role::ALL {
            let entries = graph
                .nodes_in_role(role)
                .into_iter()
                .map(|node| {
                    let record = graph.node(node);
                    let mut synergy: BTreeMap<Role, BTreeMap<String, Bucket>> =
                        Role::ALL.iter().map(|&r| (r, BTreeMap::new())).collect();
                    let mut delta: BTreeMap<Role, BTreeMap<String, f64>> =
                        Role::ALL.iter().map(|&r| (r, BTreeMap::new())).collect();

                    for (other, edge) in graph.neighbors(node) {
                        let partner = graph.node(other);
                        synergy
                            .entry(partner.role)
                            .or_default()
                            .insert(partner.name.clone(), edge.bucket);
                        delta
                            .entry(partner.role)
                            .or_default()
                            .insert(partner.name.clone(), edge.delta);
                    }

                    ChampionEntry {
                        name: record.name.clone(),
                        lane: record.role,
                        points: record.bucket,
                        power: record.power,
                        winrate: record.win_rate,
                        synergy,
                        delta,
                    }
                })
                .collect();
            lanes.insert(role, entries);
        }

        GameData {
            lanes,
            meta: Meta {
                champ_count: graph.live_count(),
                score_distribution: distribution(graph.live_nodes().into_iter().map(|n| graph.node(n).bucket)),
                synergy_distribution: distribution(graph.edges().map(|edge| edge.bucket)),
                match_count,
                champion_powers,
                synergy_powers,
            },
        }
    }

    /// Replaces `path` atomically; an existing artifact survives any failure.
    pub fn write(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::IoError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        write_json_atomic(path, self, true)
    }
}

/// Count per bucket score, with every bucket present.
fn distribution(buckets: impl Iterator<Item = Bucket>) -> BTreeMap<u8, usize> {
    let mut counts: BTreeMap<u8, usize> = Bucket::ALL.iter().map(|b| (b.score(), 0)).collect();
    for bucket in buckets {
        *counts.entry(bucket.score()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::graph::tests::record;
    use tempfile::TempDir;

    fn sample_graph() -> SynergyGraph {
        let mut graph = SynergyGraph::new();
        let garen = graph.add_record(record("Garen", Role::Top, 100, 0.52));
        let ahri = graph.add_record(record("Ahri", Role::Middle, 100, 0.48));
        graph.node_mut(garen).bucket = Bucket::Two;
        graph.set_edge(garen, ahri, 80, 0.031, 0.05);
        for edge in graph.edges_mut() {
            edge.bucket = Bucket::Four;
        }
        graph
    }

    #[test]
    fn entries_mirror_edges_on_both_sides() {
        let graph = sample_graph();
        let data = GameData::from_graph(&graph, 20, Vec::new(), Vec::new());

        let garen = &data.lanes[&Role::Top][0];
        let ahri = &data.lanes[&Role::Middle][0];
        assert_eq!(garen.points, Bucket::Two);
        assert_eq!(garen.synergy[&Role::Middle]["Ahri"], Bucket::Four);
        assert_eq!(ahri.synergy[&Role::Top]["Garen"], Bucket::Four);
        assert_eq!(garen.delta[&Role::Middle]["Ahri"], ahri.delta[&Role::Top]["Garen"]);
        assert_eq!(garen.synergy.len(), 5);
        assert!(garen.synergy[&Role::Top].is_empty());
        assert!(data.lanes[&Role::Utility].is_empty());
    }

    #[test]
    fn meta_counts_buckets() {
        let graph = sample_graph();
        let data = GameData::from_graph(&graph, 20, Vec::new(), Vec::new());

        assert_eq!(data.meta.champ_count, 2);
        assert_eq!(data.meta.score_distribution[&0], 1);
        assert_eq!(data.meta.score_distribution[&2], 1);
        assert_eq!(data.meta.score_distribution[&8], 0);
        assert_eq!(data.meta.synergy_distribution[&4], 1);
    }

    #[test]
    fn json_layout_matches_client_format() {
        let graph = sample_graph();
        let data = GameData::from_graph(
            &graph,
            20,
            vec![("Ahri (MIDDLE)".to_string(), 4.0)],
            vec![DuoStrength {
                champ1: "Garen (TOP)".to_string(),
                champ2: "Ahri (MIDDLE)".to_string(),
                strength: 6.0,
            }],
        );
        let json = serde_json::to_value(&data).unwrap();

        assert_eq!(json["TOP"][0]["name"], "Garen");
        assert_eq!(json["TOP"][0]["lane"], "TOP");
        assert_eq!(json["TOP"][0]["points"], 2);
        assert_eq!(json["TOP"][0]["synergy"]["MIDDLE"]["Ahri"], 4);
        assert_eq!(json["_meta"]["score_distribution"]["2"], 1);
        assert_eq!(json["_meta"]["champion_powers"][0][0], "Ahri (MIDDLE)");
        assert_eq!(json["_meta"]["synergy_powers"][0]["strength"], 6.0);
        assert_eq!(json["_meta"]["match_count"], 20);
    }

    #[test]
    fn write_replaces_file_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("game_data.json");
        let data = GameData::from_graph(&sample_graph(), 0, Vec::new(), Vec::new());

        data.write(&path).unwrap();
        data.write(&path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["_meta"]["champ_count"], 2);
        assert!(!dir.path().join("out").join("game_data.json.tmp").exists());
    }
}
