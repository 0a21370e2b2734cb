use super::graph::{NodeId, SynergyGraph};
use super::stats::floor2;
use crate::role::Role;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuoStrength {
    pub champ1: String,
    pub champ2: String,
    pub strength: f64,
}

/// Own bucket score plus, for each other role with at least one edge, the
/// mean edge bucket toward that role. Floored to two decimals.
pub fn champion_power(graph: &SynergyGraph, node: NodeId) -> f64 {
    let record = graph.node(node);
    let mut power = record.bucket.points();

    for role in Role::ALL {
        if role == record.role {
            continue;
        }
        let (sum, count) = graph
            .neighbors(node)
            .filter(|(other, _)| graph.node(*other).role == role)
            .fold((0.0, 0usize), |(sum, count), (_, edge)| {
                (sum + edge.bucket.points(), count + 1)
            });
        if count > 0 {
            power += sum / count as f64;
        }
    }

    floor2(power)
}

/// Stores each record's power and returns `(label, power)` sorted ascending.
pub fn assign_powers(graph: &mut SynergyGraph) -> Vec<(String, f64)> {
    let mut powers = Vec::with_capacity(graph.live_count());
    for node in graph.live_nodes() {
        let power = champion_power(graph, node);
        graph.node_mut(node).power = power;
        powers.push((graph.node(node).label(), power));
    }

    powers.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    powers
}

/// Strength of a cross-role pair with a typical teammate in every other role.
///
/// Both own bucket scores plus the pair's synergy bucket, plus for each third
/// role the mean over eligible third-role champions of their synergy toward
/// both halves. A third role with no eligible champion adds nothing.
pub fn duo_strength(graph: &SynergyGraph, a: NodeId, b: NodeId) -> Option<f64> {
    let edge = graph.edge_between(a, b)?;
    let (first, second) = (graph.node(a), graph.node(b));
    let mut strength = first.bucket.points() + second.bucket.points() + edge.bucket.points();

    for role in Role::ALL {
        if role == first.role || role == second.role {
            continue;
        }
        let mut sum = 0.0;
        let mut candidates = 0usize;
        for third in graph.nodes_in_role(role) {
            let name = &graph.node(third).name;
            if *name == first.name || *name == second.name {
                continue;
            }
            let (Some(to_first), Some(to_second)) =
                (graph.edge_between(third, a), graph.edge_between(third, b))
            else {
                continue;
            };
            sum += to_first.bucket.points() + to_second.bucket.points();
            candidates += 1;
        }
        if candidates > 0 {
            strength += sum / candidates as f64;
        }
    }

    Some(floor2(strength))
}

/// Every synergy edge as a duo, sorted ascending by strength.
pub fn duo_strengths(graph: &SynergyGraph) -> Vec<DuoStrength> {
    let mut duos: Vec<DuoStrength> = graph
        .edges()
        .filter_map(|edge| {
            let (a, b) = ordered_pair(graph, edge.a, edge.b);
            let strength = duo_strength(graph, a, b)?;
            Some(DuoStrength {
                champ1: graph.node(a).label(),
                champ2: graph.node(b).label(),
                strength,
            })
        })
        .collect();

    duos.sort_by(|x, y| {
        x.strength
            .total_cmp(&y.strength)
            .then_with(|| x.champ1.cmp(&y.champ1))
            .then_with(|| x.champ2.cmp(&y.champ2))
    });
    duos
}

fn ordered_pair(graph: &SynergyGraph, a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    let (x, y) = (graph.node(a), graph.node(b));
    if (x.role, &x.name) <= (y.role, &y.name) {
        (a, b)
    } else {
        (b, a)
    }
}
