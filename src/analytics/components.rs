//! Connected components, treating every tie as undirected.

use std::collections::VecDeque;

use hashbrown::HashSet;
use tracing::debug;

use super::{as_int, int_attribute};
use crate::model::{AttributeValue, NodeId, Traversal};
use crate::network::Network;
use crate::outcome::OperationResult;
use crate::Result;

/// Components of the node-set under one layer. Each component is sorted;
/// components are ordered by their smallest node. Isolated nodes form
/// components of one.
pub fn component_groups(network: &Network, layer: &str) -> Result<Vec<Vec<NodeId>>> {
    let layer = network.layer_ref(layer)?;
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut components = Vec::new();
    for &start in network.nodeset().node_ids().iter() {
        if !visited.insert(start) {
            continue;
        }
        let mut queue = VecDeque::from([start]);
        let mut component = Vec::new();
        while let Some(node) = queue.pop_front() {
            component.push(node);
            for next in layer.get_alter_ids(node, Traversal::Both) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    Ok(components)
}

fn try_connected_components(network: &mut Network, layer: &str, attr_name: &str) -> Result<usize> {
    let components = component_groups(network, layer)?;
    let nodeset = network.nodeset_mut();
    let index = int_attribute(nodeset, attr_name)?;
    for (component_id, members) in components.iter().enumerate() {
        let value = AttributeValue::Int(as_int(component_id));
        for &id in members {
            nodeset.store_value(id, index, value);
        }
    }
    debug!(layer, attribute = attr_name, components = components.len(), "components stored");
    Ok(components.len())
}

/// Label every node with a 0-based component id in the `int` attribute
/// `attr_name`. Payload: number of components.
pub fn connected_components(network: &mut Network, layer: &str, attr_name: &str) -> OperationResult<usize> {
    OperationResult::from_result(try_connected_components(network, layer, attr_name), |n| {
        format!("{n} components in '{layer}' stored in '{attr_name}'")
    })
}
