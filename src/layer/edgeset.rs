//! # Edge-set contract
//!
//! Per-node adjacency storage for one-mode layers. Every node mentioned in a
//! one-mode layer owns one boxed [`EdgeSet`]; its concrete shape is chosen
//! once, from the layer's metadata, through [`EdgeSetKind`].
//!
//! ## Shapes
//!
//! | Shape | Storage | Outbound / inbound |
//! |-------|---------|--------------------|
//! | `BinaryDirectional` | partner ids | two lists |
//! | `BinarySymmetric` | partner ids | one shared list |
//! | `ValuedDirectional` | (partner, value) | two lists |
//! | `ValuedSymmetric` | (partner, value) | one shared list |
//!
//! A symmetric tie is held once at each endpoint, so row rendering only
//! emits partners whose id is not smaller than the owner's id.

use std::fmt;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::model::{Connection, Directionality, NodeId, Traversal, ValueType};
use crate::{Error, Result};

// ============================================================================
// EdgeSet Trait
// ============================================================================

/// The contract every adjacency shape implements.
pub trait EdgeSet: fmt::Debug {
    /// Which of the four shapes this is.
    fn kind(&self) -> EdgeSetKind;

    fn nbr_outbound(&self) -> usize;

    fn nbr_inbound(&self) -> usize;

    /// Stored tie entries (a symmetric list counts once).
    fn nbr_edges(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.nbr_edges() == 0
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Fails with `EdgeExists` if `block_multi_edges` is set and the tie is present.
    fn add_outbound(&mut self, partner: NodeId, value: f32, block_multi_edges: bool) -> Result<()>;

    fn add_inbound(&mut self, partner: NodeId, value: f32, block_multi_edges: bool) -> Result<()>;

    fn remove_outbound(&mut self, partner: NodeId) -> Result<()>;

    fn remove_inbound(&mut self, partner: NodeId) -> Result<()>;

    /// Drop every tie to `partner`, in both directions. Returns how many went.
    fn remove_partner(&mut self, partner: NodeId) -> usize;

    fn clear(&mut self);

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tie value, or 0 when there is no tie. Binary ties are worth 1.
    fn outbound_value(&self, partner: NodeId) -> f32;

    fn has_outbound(&self, partner: NodeId) -> bool;

    fn has_inbound(&self, partner: NodeId) -> bool;

    /// Raw ids for `In`/`Out`, deduplicated union for `Both`.
    fn alter_ids(&self, traversal: Traversal) -> Vec<NodeId>;

    fn outbound_connections(&self) -> Vec<Connection>;

    /// Persisted form of this node's outbound ties: `alter[;value]` cells
    /// joined by TAB. Empty when nothing is to be written from this node.
    fn render_alter_row(&self, self_id: NodeId) -> String;
}

// ============================================================================
// Factory
// ============================================================================

/// Selects one of the four edge-set shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeSetKind {
    BinaryDirectional,
    BinarySymmetric,
    ValuedDirectional,
    ValuedSymmetric,
}

impl EdgeSetKind {
    pub fn from_meta(directionality: Directionality, value_type: ValueType) -> Self {
        match (value_type, directionality) {
            (ValueType::Binary, Directionality::Directed) => EdgeSetKind::BinaryDirectional,
            (ValueType::Binary, Directionality::Undirected) => EdgeSetKind::BinarySymmetric,
            (ValueType::Valued, Directionality::Directed) => EdgeSetKind::ValuedDirectional,
            (ValueType::Valued, Directionality::Undirected) => EdgeSetKind::ValuedSymmetric,
        }
    }

    /// Build an empty edge-set of this shape.
    pub fn create(&self) -> Box<dyn EdgeSet> {
        match self {
            EdgeSetKind::BinaryDirectional => Box::new(BinaryDirectional::default()),
            EdgeSetKind::BinarySymmetric => Box::new(BinarySymmetric::default()),
            EdgeSetKind::ValuedDirectional => Box::new(ValuedDirectional::default()),
            EdgeSetKind::ValuedSymmetric => Box::new(ValuedSymmetric::default()),
        }
    }

    pub fn is_symmetric(&self) -> bool {
        matches!(self, EdgeSetKind::BinarySymmetric | EdgeSetKind::ValuedSymmetric)
    }

    pub fn is_valued(&self) -> bool {
        matches!(self, EdgeSetKind::ValuedDirectional | EdgeSetKind::ValuedSymmetric)
    }
}

// ============================================================================
// Tie representations
// ============================================================================

/// What one adjacency list entry holds: a bare id or a valued connection.
pub trait Tie: Copy + fmt::Debug + 'static {
    const VALUED: bool;

    fn make(partner: NodeId, value: f32) -> Self;

    fn partner(&self) -> NodeId;

    fn value(&self) -> f32;

    fn render(&self) -> String {
        if Self::VALUED {
            format!("{};{}", self.partner(), self.value())
        } else {
            self.partner().to_string()
        }
    }
}

impl Tie for NodeId {
    const VALUED: bool = false;

    fn make(partner: NodeId, _value: f32) -> Self {
        partner
    }

    fn partner(&self) -> NodeId {
        *self
    }

    fn value(&self) -> f32 {
        1.0
    }
}

impl Tie for Connection {
    const VALUED: bool = true;

    fn make(partner: NodeId, value: f32) -> Self {
        Connection::new(partner, value)
    }

    fn partner(&self) -> NodeId {
        self.partner
    }

    fn value(&self) -> f32 {
        self.value
    }
}

fn find<T: Tie>(list: &[T], partner: NodeId) -> Option<usize> {
    list.iter().position(|t| t.partner() == partner)
}

fn push_tie<T: Tie>(list: &mut Vec<T>, partner: NodeId, value: f32, block: bool) -> Result<()> {
    if block && find(list, partner).is_some() {
        return Err(Error::EdgeExists(format!("tie to node {partner}")));
    }
    list.push(T::make(partner, value));
    Ok(())
}

fn take_tie<T: Tie>(list: &mut Vec<T>, partner: NodeId) -> Result<()> {
    match find(list, partner) {
        Some(pos) => {
            list.remove(pos);
            Ok(())
        }
        None => Err(Error::EdgeNotFound(format!("no tie to node {partner}"))),
    }
}

fn purge<T: Tie>(list: &mut Vec<T>, partner: NodeId) -> usize {
    let before = list.len();
    list.retain(|t| t.partner() != partner);
    before - list.len()
}

fn ids<T: Tie>(list: &[T]) -> Vec<NodeId> {
    list.iter().map(T::partner).collect()
}

fn dedup_ids<'a, T: Tie>(lists: impl IntoIterator<Item = &'a [T]>) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for list in lists {
        for tie in list {
            if seen.insert(tie.partner()) {
                out.push(tie.partner());
            }
        }
    }
    out
}

fn connections<T: Tie>(list: &[T]) -> Vec<Connection> {
    list.iter().map(|t| Connection::new(t.partner(), t.value())).collect()
}

// ============================================================================
// Directional shape
// ============================================================================

/// Separate outbound and inbound lists.
#[derive(Debug, Clone)]
pub struct Directional<T: Tie> {
    outbound: Vec<T>,
    inbound: Vec<T>,
}

impl<T: Tie> Default for Directional<T> {
    fn default() -> Self {
        Self { outbound: Vec::new(), inbound: Vec::new() }
    }
}

pub type BinaryDirectional = Directional<NodeId>;
pub type ValuedDirectional = Directional<Connection>;

impl<T: Tie> EdgeSet for Directional<T> {
    fn kind(&self) -> EdgeSetKind {
        if T::VALUED { EdgeSetKind::ValuedDirectional } else { EdgeSetKind::BinaryDirectional }
    }

    fn nbr_outbound(&self) -> usize {
        self.outbound.len()
    }

    fn nbr_inbound(&self) -> usize {
        self.inbound.len()
    }

    fn nbr_edges(&self) -> usize {
        self.outbound.len() + self.inbound.len()
    }

    fn add_outbound(&mut self, partner: NodeId, value: f32, block_multi_edges: bool) -> Result<()> {
        push_tie(&mut self.outbound, partner, value, block_multi_edges)
    }

    fn add_inbound(&mut self, partner: NodeId, value: f32, block_multi_edges: bool) -> Result<()> {
        push_tie(&mut self.inbound, partner, value, block_multi_edges)
    }

    fn remove_outbound(&mut self, partner: NodeId) -> Result<()> {
        take_tie(&mut self.outbound, partner)
    }

    fn remove_inbound(&mut self, partner: NodeId) -> Result<()> {
        take_tie(&mut self.inbound, partner)
    }

    fn remove_partner(&mut self, partner: NodeId) -> usize {
        purge(&mut self.outbound, partner) + purge(&mut self.inbound, partner)
    }

    fn clear(&mut self) {
        self.outbound.clear();
        self.inbound.clear();
    }

    fn outbound_value(&self, partner: NodeId) -> f32 {
        find(&self.outbound, partner).map_or(0.0, |pos| self.outbound[pos].value())
    }

    fn has_outbound(&self, partner: NodeId) -> bool {
        find(&self.outbound, partner).is_some()
    }

    fn has_inbound(&self, partner: NodeId) -> bool {
        find(&self.inbound, partner).is_some()
    }

    fn alter_ids(&self, traversal: Traversal) -> Vec<NodeId> {
        match traversal {
            Traversal::Out => ids(&self.outbound),
            Traversal::In => ids(&self.inbound),
            Traversal::Both => dedup_ids([self.outbound.as_slice(), self.inbound.as_slice()]),
        }
    }

    fn outbound_connections(&self) -> Vec<Connection> {
        connections(&self.outbound)
    }

    fn render_alter_row(&self, _self_id: NodeId) -> String {
        self.outbound.iter().map(T::render).collect::<Vec<_>>().join("\t")
    }
}

// ============================================================================
// Symmetric shape
// ============================================================================

/// One list serving as both the outbound and the inbound side.
#[derive(Debug, Clone)]
pub struct Symmetric<T: Tie> {
    ties: Vec<T>,
}

impl<T: Tie> Default for Symmetric<T> {
    fn default() -> Self {
        Self { ties: Vec::new() }
    }
}

pub type BinarySymmetric = Symmetric<NodeId>;
pub type ValuedSymmetric = Symmetric<Connection>;

impl<T: Tie> EdgeSet for Symmetric<T> {
    fn kind(&self) -> EdgeSetKind {
        if T::VALUED { EdgeSetKind::ValuedSymmetric } else { EdgeSetKind::BinarySymmetric }
    }

    fn nbr_outbound(&self) -> usize {
        self.ties.len()
    }

    fn nbr_inbound(&self) -> usize {
        self.ties.len()
    }

    fn nbr_edges(&self) -> usize {
        self.ties.len()
    }

    fn add_outbound(&mut self, partner: NodeId, value: f32, block_multi_edges: bool) -> Result<()> {
        push_tie(&mut self.ties, partner, value, block_multi_edges)
    }

    fn add_inbound(&mut self, partner: NodeId, value: f32, block_multi_edges: bool) -> Result<()> {
        push_tie(&mut self.ties, partner, value, block_multi_edges)
    }

    fn remove_outbound(&mut self, partner: NodeId) -> Result<()> {
        take_tie(&mut self.ties, partner)
    }

    fn remove_inbound(&mut self, partner: NodeId) -> Result<()> {
        take_tie(&mut self.ties, partner)
    }

    fn remove_partner(&mut self, partner: NodeId) -> usize {
        purge(&mut self.ties, partner)
    }

    fn clear(&mut self) {
        self.ties.clear();
    }

    fn outbound_value(&self, partner: NodeId) -> f32 {
        find(&self.ties, partner).map_or(0.0, |pos| self.ties[pos].value())
    }

    fn has_outbound(&self, partner: NodeId) -> bool {
        find(&self.ties, partner).is_some()
    }

    fn has_inbound(&self, partner: NodeId) -> bool {
        self.has_outbound(partner)
    }

    fn alter_ids(&self, traversal: Traversal) -> Vec<NodeId> {
        match traversal {
            Traversal::Both => dedup_ids([self.ties.as_slice()]),
            Traversal::In | Traversal::Out => ids(&self.ties),
        }
    }

    fn outbound_connections(&self) -> Vec<Connection> {
        connections(&self.ties)
    }

    fn render_alter_row(&self, self_id: NodeId) -> String {
        self.ties
            .iter()
            .filter(|t| t.partner() >= self_id)
            .map(T::render)
            .collect::<Vec<_>>()
            .join("\t")
    }
}

// ============================================================================
// Tests
// ============================================================================
