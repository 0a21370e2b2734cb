//! Champion-role records and the synergy edges between them.
//!
//! Records live in an arena addressed by [`NodeId`]. Edges are owned by a
//! separate list and referenced from both endpoints through a per-node
//! adjacency index, so each undirected edge carries exactly one set of
//! games/delta/error/bucket values no matter which side reads it.

use super::classifier::Bucket;
use crate::role::Role;
use std::collections::BTreeMap;

pub type NodeId = usize;
type EdgeId = usize;

#[derive(Debug, Clone)]
pub struct ChampionRoleRecord {
    pub name: String,
    pub role: Role,
    pub games: u64,
    pub win_rate: f64,
    pub error: f64,
    /// Set by the champion classifier.
    pub bucket: Bucket,
    /// Set by the power aggregator.
    pub power: f64,
}

impl ChampionRoleRecord {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.role)
    }
}

#[derive(Debug, Clone)]
pub struct SynergyEdge {
    pub a: NodeId,
    pub b: NodeId,
    pub games: u64,
    /// Observed pair win-rate minus the log-odds baseline.
    pub delta: f64,
    pub error: f64,
    pub bucket: Bucket,
}

#[derive(Debug, Default)]
pub struct SynergyGraph {
    nodes: Vec<ChampionRoleRecord>,
    alive: Vec<bool>,
    index: BTreeMap<(Role, String), NodeId>,
    edges: Vec<SynergyEdge>,
    adjacency: Vec<BTreeMap<NodeId, EdgeId>>,
}

impl SynergyGraph {
    pub fn new() -> Self {
        SynergyGraph::default()
    }

    pub fn add_record(&mut self, record: ChampionRoleRecord) -> NodeId {
        let key = (record.role, record.name.clone());
        if let Some(&id) = self.index.get(&key) {
            self.nodes[id] = record;
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(record);
        self.alive.push(true);
        self.adjacency.push(BTreeMap::new());
        self.index.insert(key, id);
        id
    }

    /// Inserts or replaces the undirected edge between `a` and `b`.
    pub fn set_edge(&mut self, a: NodeId, b: NodeId, games: u64, delta: f64, error: f64) {
        if let Some(&edge_id) = self.adjacency[a].get(&b) {
            let edge = &mut self.edges[edge_id];
            edge.games = games;
            edge.delta = delta;
            edge.error = error;
            return;
        }
        let edge_id = self.edges.len();
        self.edges.push(SynergyEdge {
            a,
            b,
            games,
            delta,
            error,
            bucket: Bucket::default(),
        });
        self.adjacency[a].insert(b, edge_id);
        self.adjacency[b].insert(a, edge_id);
    }

    pub fn find(&self, role: Role, name: &str) -> Option<NodeId> {
        self.index.get(&(role, name.to_string())).copied()
    }

    pub fn node(&self, id: NodeId) -> &ChampionRoleRecord {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ChampionRoleRecord {
        &mut self.nodes[id]
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.alive.get(id).copied().unwrap_or(false)
    }

    /// Live node ids ordered by (role, name).
    pub fn live_nodes(&self) -> Vec<NodeId> {
        self.index.values().copied().collect()
    }

    pub fn nodes_in_role(&self, role: Role) -> Vec<NodeId> {
        self.index
            .range((role, String::new())..)
            .take_while(|((r, _), _)| *r == role)
            .map(|(_, &id)| id)
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.index.len()
    }

    /// Edge between two live nodes, if any.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&SynergyEdge> {
        if !self.is_alive(a) || !self.is_alive(b) {
            return None;
        }
        self.adjacency[a].get(&b).map(|&edge_id| &self.edges[edge_id])
    }

    /// Edges from `node` to live neighbours, ordered by neighbour id.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &SynergyEdge)> + '_ {
        self.adjacency[node]
            .iter()
            .filter(move |(other, _)| self.is_alive(**other))
            .map(move |(&other, &edge_id)| (other, &self.edges[edge_id]))
    }

    /// Every edge whose endpoints are both live.
    pub fn edges(&self) -> impl Iterator<Item = &SynergyEdge> + '_ {
        self.edges
            .iter()
            .filter(move |edge| self.is_alive(edge.a) && self.is_alive(edge.b))
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut SynergyEdge> + '_ {
        let alive = &self.alive;
        self.edges
            .iter_mut()
            .filter(move |edge| alive[edge.a] && alive[edge.b])
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Deletes a record. Its edges stay until [`prune_dangling`](Self::prune_dangling).
    pub fn remove_node(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.alive[id] = false;
        let key = (self.nodes[id].role, self.nodes[id].name.clone());
        self.index.remove(&key);
    }

    /// Drops edges touching removed records and rebuilds the adjacency index.
    /// Returns how many edges were dropped.
    pub fn prune_dangling(&mut self) -> usize {
        let before = self.edges.len();
        let alive = &self.alive;
        self.edges.retain(|edge| alive[edge.a] && alive[edge.b]);

        for adjacency in &mut self.adjacency {
            adjacency.clear();
        }
        for (edge_id, edge) in self.edges.iter().enumerate() {
            self.adjacency[edge.a].insert(edge.b, edge_id);
            self.adjacency[edge.b].insert(edge.a, edge_id);
        }

        before - self.edges.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(name: &str, role: Role, games: u64, win_rate: f64) -> ChampionRoleRecord {
        ChampionRoleRecord {
            name: name.to_string(),
            role,
            games,
            win_rate,
            error: 0.0,
            bucket: Bucket::default(),
            power: 0.0,
        }
    }

    #[test]
    fn edges_are_shared_by_both_endpoints() {
        let mut graph = SynergyGraph::new();
        let a = graph.add_record(record("Ahri", Role::Middle, 100, 0.5));
        let b = graph.add_record(record("Leona", Role::Utility, 100, 0.5));
        graph.set_edge(a, b, 80, 0.02, 0.05);

        let ab = graph.edge_between(a, b).unwrap();
        let ba = graph.edge_between(b, a).unwrap();
        assert!(std::ptr::eq(ab, ba));
        assert_eq!((ab.a, ab.b), (a, b));

        graph.set_edge(b, a, 90, 0.03, 0.04);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_between(a, b).unwrap().games, 90);
    }

    #[test]
    fn removal_hides_edges_until_pruned() {
        let mut graph = SynergyGraph::new();
        let a = graph.add_record(record("Ahri", Role::Middle, 100, 0.5));
        let b = graph.add_record(record("Leona", Role::Utility, 100, 0.5));
        let c = graph.add_record(record("Garen", Role::Top, 100, 0.5));
        graph.set_edge(a, b, 80, 0.0, 0.0);
        graph.set_edge(a, c, 80, 0.0, 0.0);

        graph.remove_node(c);
        assert_eq!(graph.live_count(), 2);
        assert!(graph.find(Role::Top, "Garen").is_none());
        assert!(graph.edge_between(a, c).is_none());
        assert_eq!(graph.neighbors(a).count(), 1);

        assert_eq!(graph.prune_dangling(), 1);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edge_between(a, b).is_some());
    }

    #[test]
    fn nodes_in_role_are_sorted_by_name() {
        let mut graph = SynergyGraph::new();
        graph.add_record(record("Zed", Role::Middle, 10, 0.5));
        graph.add_record(record("Garen", Role::Top, 10, 0.5));
        graph.add_record(record("Ahri", Role::Middle, 10, 0.5));

        let names: Vec<_> = graph
            .nodes_in_role(Role::Middle)
            .into_iter()
            .map(|id| graph.node(id).name.clone())
            .collect();
        assert_eq!(names, vec!["Ahri", "Zed"]);
        assert!(graph.nodes_in_role(Role::Utility).is_empty());
    }
}
