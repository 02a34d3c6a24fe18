use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::seq::index;

use crate::analysis::{FlaggedAccount, TransactionGraph};

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct RenderNode {
    pub(in crate::app) id: String,
    pub(in crate::app) is_suspicious: bool,
    pub(in crate::app) ring_id: Option<String>,
    pub(in crate::app) account: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct RenderEdge {
    pub(in crate::app) source: usize,
    pub(in crate::app) target: usize,
}

#[derive(Clone, Debug, Default)]
pub(in crate::app) struct ReducedGraph {
    pub(in crate::app) nodes: Vec<RenderNode>,
    pub(in crate::app) edges: Vec<RenderEdge>,
    pub(in crate::app) index_by_id: HashMap<String, usize>,
    pub(in crate::app) total_nodes: usize,
    pub(in crate::app) sampled: bool,
}

impl ReducedGraph {
    pub(in crate::app) fn suspicious_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_suspicious).count()
    }
}

/// Picks the nodes worth drawing. Flagged accounts are always kept, even when
/// there are more of them than `cap`; boundary nodes come next and a random
/// sample of the remaining accounts fills whatever capacity is left.
pub(in crate::app) fn reduce_graph<R: Rng + ?Sized>(
    graph: &TransactionGraph,
    flagged: &[FlaggedAccount],
    cap: usize,
    sample_fraction: f64,
    rng: &mut R,
) -> ReducedGraph {
    let account_by_id = flagged
        .iter()
        .enumerate()
        .fold(HashMap::new(), |mut map, (position, account)| {
            map.entry(account.account_id.as_str()).or_insert(position);
            map
        });

    let mut unique_ids = Vec::with_capacity(graph.nodes.len());
    let mut seen = HashSet::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        if seen.insert(node.id.as_str()) {
            unique_ids.push(node.id.as_str());
        }
    }

    let total_nodes = unique_ids.len();
    let sampled = total_nodes > cap;

    let keep: HashSet<&str> = if sampled {
        select_nodes(graph, &unique_ids, &account_by_id, cap, sample_fraction, rng)
    } else {
        unique_ids.iter().copied().collect()
    };

    let mut nodes = Vec::with_capacity(keep.len());
    let mut index_by_id = HashMap::with_capacity(keep.len());
    for id in unique_ids.iter().copied().filter(|id| keep.contains(id)) {
        let account = account_by_id.get(id).copied();
        index_by_id.insert(id.to_owned(), nodes.len());
        nodes.push(RenderNode {
            id: id.to_owned(),
            is_suspicious: account.is_some(),
            ring_id: account.and_then(|position| flagged[position].ring_id.clone()),
            account,
        });
    }

    let edges = graph
        .edges
        .iter()
        .filter_map(|edge| {
            let source = *index_by_id.get(&edge.source)?;
            let target = *index_by_id.get(&edge.target)?;
            Some(RenderEdge { source, target })
        })
        .collect::<Vec<_>>();

    tracing::info!(
        total = total_nodes,
        kept = nodes.len(),
        edges = edges.len(),
        sampled,
        "reduced transaction graph"
    );

    ReducedGraph {
        nodes,
        edges,
        index_by_id,
        total_nodes,
        sampled,
    }
}

fn select_nodes<'a, R: Rng + ?Sized>(
    graph: &'a TransactionGraph,
    unique_ids: &[&'a str],
    account_by_id: &HashMap<&str, usize>,
    cap: usize,
    sample_fraction: f64,
    rng: &mut R,
) -> HashSet<&'a str> {
    let mut keep = unique_ids
        .iter()
        .copied()
        .filter(|id| account_by_id.contains_key(id))
        .collect::<HashSet<_>>();

    let mut remaining = cap.saturating_sub(keep.len());
    let known = unique_ids.iter().copied().collect::<HashSet<_>>();

    for edge in &graph.edges {
        if remaining == 0 {
            break;
        }

        let source_flagged = account_by_id.contains_key(edge.source.as_str());
        let target_flagged = account_by_id.contains_key(edge.target.as_str());
        let boundary = match (source_flagged, target_flagged) {
            (true, false) => edge.target.as_str(),
            (false, true) => edge.source.as_str(),
            _ => continue,
        };

        if known.contains(boundary) && keep.insert(boundary) {
            remaining -= 1;
        }
    }

    if remaining == 0 {
        return keep;
    }

    let rest = unique_ids
        .iter()
        .copied()
        .filter(|id| !keep.contains(id))
        .collect::<Vec<_>>();
    let fraction = sample_fraction.clamp(0.0, 1.0);
    let wanted = ((rest.len() as f64) * fraction).ceil() as usize;
    let amount = wanted.min(remaining).min(rest.len());

    for position in index::sample(rng, rest.len(), amount) {
        keep.insert(rest[position]);
    }

    keep
}
