//! Layers: the relational planes of a network.
//!
//! A [`Layer`] is either one-mode (dyadic ties held in per-node edge-sets)
//! or two-mode (named hyperedges). Both answer the same projected-tie
//! queries, which is what the analytics walk over.

pub mod edgeset;
pub mod one_mode;
pub mod two_mode;

pub use edgeset::{
    BinaryDirectional, BinarySymmetric, EdgeSet, EdgeSetKind, ValuedDirectional, ValuedSymmetric,
};
pub use one_mode::LayerOneMode;
pub use two_mode::{Hyperedge, LayerTwoMode};

use serde::Serialize;

use crate::model::{Directionality, NodeId, Traversal, ValueType};
use crate::{Error, Result};

// ============================================================================
// Layer
// ============================================================================

#[derive(Debug)]
pub enum Layer {
    OneMode(LayerOneMode),
    TwoMode(LayerTwoMode),
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Layer::OneMode(l) => l.name(),
            Layer::TwoMode(l) => l.name(),
        }
    }

    /// 1 for dyadic layers, 2 for hypergraph layers.
    pub fn mode(&self) -> u8 {
        match self {
            Layer::OneMode(_) => 1,
            Layer::TwoMode(_) => 2,
        }
    }

    pub fn as_one_mode(&self) -> Result<&LayerOneMode> {
        match self {
            Layer::OneMode(l) => Ok(l),
            Layer::TwoMode(l) => Err(Error::LayerNotOneMode(l.name().to_string())),
        }
    }

    pub fn as_one_mode_mut(&mut self) -> Result<&mut LayerOneMode> {
        match self {
            Layer::OneMode(l) => Ok(l),
            Layer::TwoMode(l) => Err(Error::LayerNotOneMode(l.name().to_string())),
        }
    }

    pub fn as_two_mode(&self) -> Result<&LayerTwoMode> {
        match self {
            Layer::TwoMode(l) => Ok(l),
            Layer::OneMode(l) => Err(Error::LayerNotTwoMode(l.name().to_string())),
        }
    }

    pub fn as_two_mode_mut(&mut self) -> Result<&mut LayerTwoMode> {
        match self {
            Layer::TwoMode(l) => Ok(l),
            Layer::OneMode(l) => Err(Error::LayerNotTwoMode(l.name().to_string())),
        }
    }

    // ========================================================================
    // Projected ties
    // ========================================================================

    pub fn check_edge_exists(&self, a: NodeId, b: NodeId) -> bool {
        match self {
            Layer::OneMode(l) => l.check_edge_exists(a, b),
            Layer::TwoMode(l) => l.check_edge_exists(a, b),
        }
    }

    pub fn get_edge_value(&self, a: NodeId, b: NodeId) -> f32 {
        match self {
            Layer::OneMode(l) => l.get_edge_value(a, b),
            Layer::TwoMode(l) => l.get_edge_value(a, b),
        }
    }

    /// Two-mode layers have no direction; `traversal` is ignored there.
    pub fn get_alter_ids(&self, node: NodeId, traversal: Traversal) -> Vec<NodeId> {
        match self {
            Layer::OneMode(l) => l.get_alter_ids(node, traversal),
            Layer::TwoMode(l) => l.get_node_alters(node),
        }
    }

    // ========================================================================
    // Whole-layer operations
    // ========================================================================

    pub fn remove_node(&mut self, node: NodeId) -> usize {
        match self {
            Layer::OneMode(l) => l.remove_node(node),
            Layer::TwoMode(l) => l.remove_node(node),
        }
    }

    pub fn clear(&mut self) {
        match self {
            Layer::OneMode(l) => l.clear(),
            Layer::TwoMode(l) => l.clear(),
        }
    }

    pub fn mentioned_node_ids(&self) -> Vec<NodeId> {
        match self {
            Layer::OneMode(l) => l.mentioned_node_ids(),
            Layer::TwoMode(l) => l.mentioned_node_ids(),
        }
    }

    pub fn info(&self) -> LayerInfo {
        match self {
            Layer::OneMode(l) => LayerInfo {
                name: l.name().to_string(),
                mode: 1,
                directionality: Some(l.directionality()),
                value_type: Some(l.value_type()),
                selfties: Some(l.selfties()),
                nbr_edges: l.nbr_edges(),
                nbr_hyperedges: None,
                nbr_nodes: l.mentioned_node_ids().len(),
            },
            Layer::TwoMode(l) => LayerInfo {
                name: l.name().to_string(),
                mode: 2,
                directionality: None,
                value_type: None,
                selfties: None,
                nbr_edges: l.nbr_affiliations(),
                nbr_hyperedges: Some(l.nbr_hyperedges()),
                nbr_nodes: l.mentioned_node_ids().len(),
            },
        }
    }
}

/// Summary of one layer. For two-mode layers `nbr_edges` counts
/// node–hyperedge affiliations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerInfo {
    pub name: String,
    pub mode: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directionality: Option<Directionality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selfties: Option<bool>,
    pub nbr_edges: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbr_hyperedges: Option<usize>,
    pub nbr_nodes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgePolicy;

    #[test]
    fn test_kind_mismatch_errors() {
        let mut one = Layer::OneMode(LayerOneMode::new(
            "a",
            Directionality::Directed,
            ValueType::Binary,
            false,
            EdgePolicy::default(),
        ));
        let two = Layer::TwoMode(LayerTwoMode::new("b"));
        assert!(matches!(one.as_two_mode_mut(), Err(Error::LayerNotTwoMode(_))));
        assert!(matches!(two.as_one_mode(), Err(Error::LayerNotOneMode(_))));
        assert_eq!(one.mode(), 1);
        assert_eq!(two.mode(), 2);
    }

    #[test]
    fn test_info_two_mode() {
        let mut l = LayerTwoMode::new("clubs");
        l.add_hyperedge("H1", &[NodeId(1), NodeId(2)]).unwrap();
        let info = Layer::TwoMode(l).info();
        assert_eq!(info.mode, 2);
        assert_eq!(info.nbr_hyperedges, Some(1));
        assert_eq!(info.nbr_edges, 2);
        assert_eq!(info.nbr_nodes, 2);
        assert!(info.directionality.is_none());
    }
}
