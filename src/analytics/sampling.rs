//! Random picks of nodes, alters and ties.
//!
//! All functions take the generator from the caller, so a seeded
//! `StdRng` gives repeatable draws.
//!
//! ## Two-mode random edges
//!
//! A projected tie is sampled in two phases:
//!
//! 1. up to `max_attempts` probes of a uniform node pair, accepted when the
//!    pair shares a hyperedge;
//! 2. otherwise a hyperedge is drawn with weight C(k, 2) for its `k`
//!    members, then two distinct members of it.
//!
//! Phase 2 favours pairs that share many hyperedges. It is not a uniform
//! sample over projected ties.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;

use crate::layer::{Layer, LayerOneMode, LayerTwoMode};
use crate::model::{NodeId, Traversal};
use crate::network::Network;
use crate::outcome::OperationResult;
use crate::{Error, Result};

/// Uniform node from the node-set.
pub fn random_node<R: Rng + ?Sized>(network: &Network, rng: &mut R) -> OperationResult<NodeId> {
    let ids = network.nodeset().node_ids();
    match ids.choose(rng) {
        Some(&id) => OperationResult::ok_with(id, format!("Random node {id}")),
        None => Error::NodeNotFound(format!("network '{}' has no nodes", network.name())).into(),
    }
}

fn try_random_alter<R: Rng + ?Sized>(
    network: &Network,
    layer: &str,
    node: NodeId,
    traversal: Traversal,
    rng: &mut R,
) -> Result<NodeId> {
    let layer = network.layer_ref(layer)?;
    if !network.nodeset().contains(node) {
        return Err(Error::NodeNotFound(format!("Node {node}")));
    }
    layer
        .get_alter_ids(node, traversal)
        .choose(rng)
        .copied()
        .ok_or_else(|| Error::EdgeNotFound(format!("node {node} has no alters in '{}'", layer.name())))
}

/// Uniform alter of `node` in one layer.
pub fn random_alter<R: Rng + ?Sized>(
    network: &Network,
    layer: &str,
    node: NodeId,
    traversal: Traversal,
    rng: &mut R,
) -> OperationResult<NodeId> {
    OperationResult::from_result(try_random_alter(network, layer, node, traversal, rng), |alter| {
        format!("Random alter of {node}: {alter}")
    })
}

/// A node with outbound ties, then one of its outbound alters.
fn one_mode_edge<R: Rng + ?Sized>(layer: &LayerOneMode, rng: &mut R) -> Result<(NodeId, NodeId)> {
    let no_ties = || Error::EdgeNotFound(format!("layer '{}' has no ties", layer.name()));
    let from = *layer.nodes_with_outbound().choose(rng).ok_or_else(no_ties)?;
    let to = *layer
        .get_alter_ids(from, Traversal::Out)
        .choose(rng)
        .ok_or_else(no_ties)?;
    Ok((from, to))
}

fn two_mode_edge<R: Rng + ?Sized>(
    layer: &LayerTwoMode,
    nodes: &[NodeId],
    max_attempts: usize,
    rng: &mut R,
) -> Result<(NodeId, NodeId)> {
    if nodes.len() >= 2 {
        for _ in 0..max_attempts {
            let a = nodes[rng.gen_range(0..nodes.len())];
            let b = nodes[rng.gen_range(0..nodes.len())];
            if a != b && layer.check_edge_exists(a, b) {
                return Ok((a, b));
            }
        }
    }

    let names = layer.hyperedge_names();
    let weights: Vec<u64> = names
        .iter()
        .map(|name| layer.hyperedge(name).map_or(0, |h| h.projected_pairs()))
        .collect();
    let no_ties = || Error::EdgeNotFound(format!("layer '{}' has no projected ties", layer.name()));
    let picker = WeightedIndex::new(&weights).map_err(|_| no_ties())?;
    let hyperedge = layer.hyperedge(names[picker.sample(rng)]).ok_or_else(no_ties)?;
    let pair: Vec<NodeId> = hyperedge.members().choose_multiple(rng, 2).copied().collect();
    match pair.as_slice() {
        &[a, b] => Ok((a, b)),
        _ => Err(no_ties()),
    }
}

fn try_random_edge<R: Rng + ?Sized>(network: &Network, layer: &str, max_attempts: usize, rng: &mut R) -> Result<(NodeId, NodeId)> {
    match network.layer_ref(layer)? {
        Layer::OneMode(l) => one_mode_edge(l, rng),
        Layer::TwoMode(l) => two_mode_edge(l, &network.nodeset().node_ids(), max_attempts, rng),
    }
}

/// A random tie of one layer. `max_attempts` bounds the pair probing phase
/// on two-mode layers and is ignored on one-mode layers.
pub fn random_edge<R: Rng + ?Sized>(
    network: &Network,
    layer: &str,
    max_attempts: usize,
    rng: &mut R,
) -> OperationResult<(NodeId, NodeId)> {
    OperationResult::from_result(try_random_edge(network, layer, max_attempts, rng), |(a, b)| {
        format!("Random edge {a} -> {b}")
    })
}
