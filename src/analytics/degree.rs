//! Degree centrality.

use tracing::debug;

use super::{as_int, int_attribute};
use crate::model::{AttributeValue, NodeId, Traversal};
use crate::network::Network;
use crate::outcome::OperationResult;
use crate::Result;

/// Degree of every node in the node-set, ascending by id.
///
/// One-mode layers count alters in the given direction (`Both` counts
/// distinct alters). Two-mode layers ignore `traversal` and count
/// shared-hyperedge partners.
pub fn degrees(network: &Network, layer: &str, traversal: Traversal) -> Result<Vec<(NodeId, usize)>> {
    let layer = network.layer_ref(layer)?;
    Ok(network
        .nodeset()
        .node_ids()
        .iter()
        .map(|&id| (id, layer.get_alter_ids(id, traversal).len()))
        .collect())
}

fn try_degree_centrality(network: &mut Network, layer: &str, traversal: Traversal, attr_name: &str) -> Result<usize> {
    let scores = degrees(network, layer, traversal)?;
    let nodeset = network.nodeset_mut();
    let index = int_attribute(nodeset, attr_name)?;
    for &(id, degree) in &scores {
        nodeset.store_value(id, index, AttributeValue::Int(as_int(degree)));
    }
    debug!(layer, attribute = attr_name, nodes = scores.len(), "degree centrality stored");
    Ok(scores.len())
}

/// Compute degrees and store them in the `int` attribute `attr_name`,
/// defining it when absent. Payload: number of nodes scored.
pub fn degree_centrality(network: &mut Network, layer: &str, traversal: Traversal, attr_name: &str) -> OperationResult<usize> {
    OperationResult::from_result(try_degree_centrality(network, layer, traversal, attr_name), |n| {
        format!("Degree ({traversal:?}) stored in '{attr_name}' for {n} nodes")
    })
}
