//! One-mode layer: dyadic ties stored in per-node edge-sets.
//!
//! ## Limitations
//!
//! - **Undirected + outbound-only**: the outbound-only policy only applies to
//!   directed layers. A symmetric tie is always written at both endpoints,
//!   otherwise `b` would not see a tie that `a` sees.
//! - **Multi-edges**: with `block_multi_edges` off, repeated ties are stored
//!   as repeated entries; value lookups return the first one.

use hashbrown::HashMap;
use tracing::{debug, warn};

use super::edgeset::{EdgeSet, EdgeSetKind};
use crate::config::EdgePolicy;
use crate::model::{Directionality, NodeId, Traversal, ValueType};
use crate::{Error, Result};

/// A layer of dyadic ties with fixed directionality, value type and
/// self-tie policy.
#[derive(Debug)]
pub struct LayerOneMode {
    name: String,
    directionality: Directionality,
    value_type: ValueType,
    selfties: bool,
    policy: EdgePolicy,
    /// Factory binding, derived from `directionality` and `value_type`.
    kind: EdgeSetKind,
    edgesets: HashMap<NodeId, Box<dyn EdgeSet>>,
}

impl LayerOneMode {
    pub fn new(
        name: impl Into<String>,
        directionality: Directionality,
        value_type: ValueType,
        selfties: bool,
        policy: EdgePolicy,
    ) -> Self {
        Self {
            name: name.into(),
            directionality,
            value_type,
            selfties,
            policy,
            kind: EdgeSetKind::from_meta(directionality, value_type),
            edgesets: HashMap::new(),
        }
    }

    /// Re-derive the edge-set shape from the layer metadata.
    pub fn rebind(&mut self) {
        self.kind = EdgeSetKind::from_meta(self.directionality, self.value_type);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directionality(&self) -> Directionality {
        self.directionality
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn selfties(&self) -> bool {
        self.selfties
    }

    pub fn is_directed(&self) -> bool {
        self.directionality == Directionality::Directed
    }

    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    pub fn edgeset_kind(&self) -> EdgeSetKind {
        self.kind
    }

    pub fn edgeset(&self, node: NodeId) -> Option<&dyn EdgeSet> {
        self.edgesets.get(&node).map(|es| es.as_ref())
    }

    fn edgeset_mut(&mut self, node: NodeId) -> &mut Box<dyn EdgeSet> {
        let kind = self.kind;
        self.edgesets.entry(node).or_insert_with(|| kind.create())
    }

    /// Whether the inbound side of `a → b` is written.
    fn writes_inbound(&self, a: NodeId, b: NodeId) -> bool {
        if self.kind.is_symmetric() {
            a != b
        } else {
            !self.policy.outbound_only
        }
    }

    // ========================================================================
    // Ties
    // ========================================================================

    /// Add the tie `a → b`. Binary layers ignore `value` and store 1.
    ///
    /// Both slots are checked before either is written, so a rejected tie
    /// leaves the layer untouched.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, value: f32) -> Result<()> {
        if a == b && !self.selfties {
            return Err(Error::SelftiesNotAllowed(format!(
                "node {a} in layer '{}'",
                self.name
            )));
        }
        let value = match self.value_type {
            ValueType::Binary => 1.0,
            ValueType::Valued => value,
        };
        let inbound = self.writes_inbound(a, b);
        let block = self.policy.block_multi_edges;
        let label = format!("{a} -> {b} in layer '{}'", self.name);

        if block {
            let out_taken = self.edgesets.get(&a).is_some_and(|es| es.has_outbound(b));
            let in_taken = inbound && self.edgesets.get(&b).is_some_and(|es| es.has_inbound(a));
            if out_taken || in_taken {
                return Err(Error::EdgeAlreadyExists(label));
            }
        }
        self.edgeset_mut(a)
            .add_outbound(b, value, block)
            .map_err(|_| Error::EdgeAlreadyExists(label.clone()))?;
        if inbound {
            self.edgeset_mut(b)
                .add_inbound(a, value, block)
                .map_err(|_| Error::EdgeAlreadyExists(label))?;
        }
        Ok(())
    }

    /// Remove the tie `a → b` from both sides.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        let not_found = || Error::EdgeNotFound(format!("{a} -> {b} in layer '{}'", self.name));
        if !self.check_edge_exists(a, b) {
            return Err(not_found());
        }
        let inbound = self.writes_inbound(a, b);
        if let Some(es) = self.edgesets.get_mut(&a) {
            es.remove_outbound(b)?;
        }
        if inbound {
            let removed = match self.edgesets.get_mut(&b) {
                Some(es) => es.remove_inbound(a),
                None => Err(not_found()),
            };
            if let Err(err) = removed {
                warn!(layer = %self.name, %a, %b, %err, "inbound side of removed tie was already missing");
            }
        }
        self.drop_empty(&[a, b]);
        Ok(())
    }

    fn drop_empty(&mut self, nodes: &[NodeId]) {
        for node in nodes {
            if self.edgesets.get(node).is_some_and(|es| es.is_empty()) {
                self.edgesets.remove(node);
            }
        }
    }

    pub fn get_edge_value(&self, a: NodeId, b: NodeId) -> f32 {
        self.edgesets.get(&a).map_or(0.0, |es| es.outbound_value(b))
    }

    pub fn check_edge_exists(&self, a: NodeId, b: NodeId) -> bool {
        self.edgesets.get(&a).is_some_and(|es| es.has_outbound(b))
    }

    pub fn get_alter_ids(&self, node: NodeId, traversal: Traversal) -> Vec<NodeId> {
        self.edgesets
            .get(&node)
            .map(|es| es.alter_ids(traversal))
            .unwrap_or_default()
    }

    // ========================================================================
    // Whole-layer operations
    // ========================================================================

    /// Clear and drop every edge-set.
    pub fn clear(&mut self) {
        for es in self.edgesets.values_mut() {
            es.clear();
        }
        self.edgesets.clear();
        debug!(layer = %self.name, "one-mode layer cleared");
    }

    /// Drop a node's edge-set and every tie pointing at it.
    pub fn remove_node(&mut self, node: NodeId) -> usize {
        let mut removed = self.edgesets.remove(&node).map_or(0, |es| es.nbr_outbound());
        for es in self.edgesets.values_mut() {
            removed += es.remove_partner(node);
        }
        self.edgesets.retain(|_, es| !es.is_empty());
        removed
    }

    /// Every node id referenced by this layer, ascending.
    pub fn mentioned_node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = Vec::with_capacity(self.edgesets.len());
        for (&node, es) in &self.edgesets {
            ids.push(node);
            ids.extend(es.alter_ids(Traversal::Both));
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Nodes holding at least one outbound tie, ascending.
    pub fn nodes_with_outbound(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .edgesets
            .iter()
            .filter(|(_, es)| es.nbr_outbound() > 0)
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Every tie once, as `(from, to, value)`, ordered by `from`. Undirected
    /// ties are reported from their smaller endpoint.
    pub fn edges(&self) -> Vec<(NodeId, NodeId, f32)> {
        let symmetric = self.kind.is_symmetric();
        let mut nodes: Vec<NodeId> = self.edgesets.keys().copied().collect();
        nodes.sort_unstable();
        let mut out = Vec::new();
        for node in nodes {
            let Some(es) = self.edgesets.get(&node) else { continue };
            for conn in es.outbound_connections() {
                if !symmetric || conn.partner >= node {
                    out.push((node, conn.partner, conn.value));
                }
            }
        }
        out
    }

    /// Number of realized ties (undirected ties count once).
    pub fn nbr_edges(&self) -> usize {
        self.edges().len()
    }

    /// Persisted rows `(node, rendered alters)`, ascending by node, skipping
    /// nodes with nothing to write.
    pub fn rows(&self) -> Vec<(NodeId, String)> {
        let mut rows: Vec<(NodeId, String)> = self
            .edgesets
            .iter()
            .map(|(&node, es)| (node, es.render_alter_row(node)))
            .filter(|(_, row)| !row.is_empty())
            .collect();
        rows.sort_unstable_by_key(|(node, _)| *node);
        rows
    }
}

// ============================================================================
// Tests
// ============================================================================
