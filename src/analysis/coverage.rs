//! Restores full synergy coverage between surviving champion-role records.
//!
//! Every two live records in different roles (and with different champion
//! names, since a champion never teams with itself) must share an edge.
//! Finding the smallest set of records to delete is a hitting-set problem,
//! so this removes the worst offender greedily until nothing is missing.

use super::graph::{NodeId, SynergyGraph};
use crate::error::AppError;
use crate::role::Role;
use std::cmp::Ordering;
use std::collections::BTreeSet;

const MISSING_SAMPLE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedRecord {
    pub name: String,
    pub role: Role,
    pub games: u64,
    pub unsatisfied: usize,
}

#[derive(Debug, Clone, Default)]
pub struct EnforcementReport {
    pub initial_required: usize,
    pub initial_unsatisfied: usize,
    /// Records in the order they were deleted.
    pub removed: Vec<RemovedRecord>,
    /// Size of the required-pair set after each deletion.
    pub required_history: Vec<usize>,
    pub dangling_edges_dropped: usize,
}

/// Whether two records must share a synergy edge.
pub fn requires_synergy(graph: &SynergyGraph, a: NodeId, b: NodeId) -> bool {
    let (x, y) = (graph.node(a), graph.node(b));
    x.role != y.role && x.name != y.name
}

type Pair = (usize, usize);

/// Deletes records until every required pair among survivors has an edge.
///
/// Picks the record with the most unsatisfied pairs; ties go to the record
/// with fewer games, then to the lexicographically smaller (name, role).
pub fn enforce_coverage(graph: &mut SynergyGraph) -> EnforcementReport {
    let nodes = graph.live_nodes();
    let n = nodes.len();

    let mut required: BTreeSet<Pair> = BTreeSet::new();
    let mut unsatisfied: BTreeSet<Pair> = BTreeSet::new();
    let mut touching: Vec<BTreeSet<Pair>> = vec![BTreeSet::new(); n];
    let mut unsatisfied_count = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            if !requires_synergy(graph, nodes[i], nodes[j]) {
                continue;
            }
            let pair = (i, j);
            required.insert(pair);
            touching[i].insert(pair);
            touching[j].insert(pair);
            if graph.edge_between(nodes[i], nodes[j]).is_none() {
                unsatisfied.insert(pair);
                unsatisfied_count[i] += 1;
                unsatisfied_count[j] += 1;
            }
        }
    }

    let mut report = EnforcementReport {
        initial_required: required.len(),
        initial_unsatisfied: unsatisfied.len(),
        ..EnforcementReport::default()
    };
    let mut removed = vec![false; n];

    while !unsatisfied.is_empty() {
        let worst = (0..n)
            .filter(|&i| !removed[i] && unsatisfied_count[i] > 0)
            .max_by(|&x, &y| removal_order(graph, nodes[x], nodes[y], &unsatisfied_count, x, y));
        let Some(worst) = worst else {
            break;
        };

        let record = graph.node(nodes[worst]);
        tracing::debug!(
            champion = %record.label(),
            games = record.games,
            unsatisfied = unsatisfied_count[worst],
            "Removing champion with incomplete synergy data"
        );
        report.removed.push(RemovedRecord {
            name: record.name.clone(),
            role: record.role,
            games: record.games,
            unsatisfied: unsatisfied_count[worst],
        });

        graph.remove_node(nodes[worst]);
        removed[worst] = true;

        for pair in std::mem::take(&mut touching[worst]) {
            if !required.remove(&pair) {
                continue;
            }
            let other = if pair.0 == worst { pair.1 } else { pair.0 };
            touching[other].remove(&pair);
            if unsatisfied.remove(&pair) {
                unsatisfied_count[other] = unsatisfied_count[other].saturating_sub(1);
            }
        }
        unsatisfied_count[worst] = 0;
        report.required_history.push(required.len());
    }

    report.dangling_edges_dropped = graph.prune_dangling();

    tracing::info!(
        removed = report.removed.len(),
        remaining = graph.live_count(),
        "Synergy coverage restored"
    );

    report
}

/// `Greater` means `x` should be removed before `y`.
fn removal_order(
    graph: &SynergyGraph,
    x_node: NodeId,
    y_node: NodeId,
    counts: &[usize],
    x: usize,
    y: usize,
) -> Ordering {
    let (rx, ry) = (graph.node(x_node), graph.node(y_node));
    counts[x]
        .cmp(&counts[y])
        .then_with(|| ry.games.cmp(&rx.games))
        .then_with(|| ry.name.cmp(&rx.name))
        .then_with(|| ry.role.cmp(&rx.role))
}

/// Exhaustive pairwise check that every required pair has an edge both ways.
pub fn verify_coverage(graph: &SynergyGraph) -> Result<(), AppError> {
    let nodes = graph.live_nodes();
    let mut missing = 0usize;
    let mut sample = Vec::new();

    for (i, &a) in nodes.iter().enumerate() {
        for &b in &nodes[i + 1..] {
            if !requires_synergy(graph, a, b) {
                continue;
            }
            if graph.edge_between(a, b).is_none() || graph.edge_between(b, a).is_none() {
                missing += 1;
                if sample.len() < MISSING_SAMPLE {
                    sample.push(format!("{} / {}", graph.node(a).label(), graph.node(b).label()));
                }
            }
        }
    }

    if missing == 0 {
        tracing::info!("Full synergy coverage verified");
        Ok(())
    } else {
        tracing::error!(missing, "Synergy coverage check failed");
        Err(AppError::CoverageViolation { missing, sample })
    }
}
