//! Unweighted shortest paths.

use std::collections::VecDeque;

use hashbrown::HashSet;

use crate::layer::Layer;
use crate::model::{NodeId, Traversal};
use crate::network::Network;
use crate::outcome::OperationResult;
use crate::{Error, Result};

/// Breadth-first hop count from `source` to `target`, ignoring direction.
fn bfs_hops(layers: &[&Layer], source: NodeId, target: NodeId) -> Option<usize> {
    if source == target {
        return Some(0);
    }
    let mut seen: HashSet<NodeId> = HashSet::from([source]);
    let mut queue = VecDeque::from([(source, 0usize)]);
    while let Some((node, depth)) = queue.pop_front() {
        for layer in layers {
            for next in layer.get_alter_ids(node, Traversal::Both) {
                if next == target {
                    return Some(depth + 1);
                }
                if seen.insert(next) {
                    queue.push_back((next, depth + 1));
                }
            }
        }
    }
    None
}

fn try_shortest_path(network: &Network, layer: Option<&str>, source: NodeId, target: NodeId) -> Result<usize> {
    let layers = network.resolve_layers(layer)?;
    for id in [source, target] {
        if !network.nodeset().contains(id) {
            return Err(Error::NodeNotFound(format!("Node {id}")));
        }
    }
    bfs_hops(&layers, source, target)
        .ok_or_else(|| Error::PathNotFound(format!("{target} is unreachable from {source}")))
}

/// Hop count between two nodes within one layer, or across all layers
/// when `layer` is `None`.
pub fn shortest_path(network: &Network, layer: Option<&str>, source: NodeId, target: NodeId) -> OperationResult<usize> {
    OperationResult::from_result(try_shortest_path(network, layer, source, target), |hops| {
        format!("Shortest path {source} -> {target}: {hops} hops")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::model::{Directionality, ValueType};
    use crate::outcome::ResultCode;

    fn chain() -> Network {
        let mut net = Network::new("n", EngineConfig::default());
        net.add_layer_one_mode("a", Directionality::Directed, ValueType::Binary, false);
        net.add_layer_two_mode("b");
        net.add_edge("a", NodeId(1), NodeId(2), 1.0, true);
        net.add_hyperedge("b", "H", &[NodeId(2), NodeId(3)], true);
        net.add_node(NodeId(9));
        net
    }

    #[test]
    fn test_direct_tie_is_one_hop() {
        let net = chain();
        assert_eq!(shortest_path(&net, Some("a"), NodeId(1), NodeId(2)).payload, Some(1));
        assert_eq!(shortest_path(&net, Some("a"), NodeId(2), NodeId(1)).payload, Some(1));
        assert_eq!(shortest_path(&net, Some("a"), NodeId(1), NodeId(1)).payload, Some(0));
    }

    #[test]
    fn test_union_across_layers() {
        let net = chain();
        assert_eq!(shortest_path(&net, Some("a"), NodeId(1), NodeId(3)).code, ResultCode::PathNotFound);
        assert_eq!(shortest_path(&net, None, NodeId(1), NodeId(3)).payload, Some(2));
    }

    #[test]
    fn test_unreachable_and_missing() {
        let net = chain();
        assert_eq!(shortest_path(&net, None, NodeId(1), NodeId(9)).code, ResultCode::PathNotFound);
        assert_eq!(shortest_path(&net, None, NodeId(1), NodeId(42)).code, ResultCode::NodeNotFound);
        assert_eq!(shortest_path(&net, Some("zz"), NodeId(1), NodeId(2)).code, ResultCode::LayerNotFound);
    }
}
