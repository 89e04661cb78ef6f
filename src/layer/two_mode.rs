//! Two-mode layer: named hyperedges (affiliations) and the per-node
//! reverse index.
//!
//! Two indices are kept in step:
//!
//! - hyperedge name → [`Hyperedge`] (its member list)
//! - node id → set of hyperedge names the node belongs to
//!
//! Every write touches both, so a node is listed in a hyperedge exactly when
//! the hyperedge is listed for that node.

use hashbrown::{HashMap, HashSet};
use serde::Serialize;
use tracing::debug;

use crate::model::NodeId;
use crate::{Error, Result};

// ============================================================================
// Hyperedge
// ============================================================================

/// A named set of member nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hyperedge {
    name: String,
    members: Vec<NodeId>,
}

impl Hyperedge {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), members: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    pub fn nbr_members(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    /// Number of node pairs this hyperedge projects: C(k, 2).
    pub fn projected_pairs(&self) -> u64 {
        let k = self.members.len() as u64;
        k * k.saturating_sub(1) / 2
    }

    fn add_member(&mut self, node: NodeId) -> bool {
        if self.contains(node) {
            return false;
        }
        self.members.push(node);
        true
    }

    fn remove_member(&mut self, node: NodeId) -> bool {
        match self.members.iter().position(|&m| m == node) {
            Some(pos) => {
                self.members.swap_remove(pos);
                true
            }
            None => false,
        }
    }
}

fn validate_hyperedge_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.contains(['\t', '\n', '\r']) {
        return Err(Error::InvalidArgument(format!("'{name}' is not a valid hyperedge name")));
    }
    Ok(())
}

// ============================================================================
// LayerTwoMode
// ============================================================================

#[derive(Debug, Clone)]
pub struct LayerTwoMode {
    name: String,
    hyperedges: HashMap<String, Hyperedge>,
    affiliations: HashMap<NodeId, HashSet<String>>,
}

impl LayerTwoMode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hyperedges: HashMap::new(),
            affiliations: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nbr_hyperedges(&self) -> usize {
        self.hyperedges.len()
    }

    /// Total node–hyperedge memberships.
    pub fn nbr_affiliations(&self) -> usize {
        self.hyperedges.values().map(Hyperedge::nbr_members).sum()
    }

    pub fn hyperedge(&self, name: &str) -> Option<&Hyperedge> {
        self.hyperedges.get(name)
    }

    pub fn hyperedges(&self) -> impl Iterator<Item = &Hyperedge> {
        self.hyperedges.values()
    }

    /// Hyperedge names, ascending.
    pub fn hyperedge_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hyperedges.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    // ========================================================================
    // Hyperedges and affiliations
    // ========================================================================

    /// Create a hyperedge, replacing any existing one of that name.
    /// Duplicate member ids are ignored. Returns the member count.
    pub fn add_hyperedge(&mut self, name: &str, members: &[NodeId]) -> Result<usize> {
        validate_hyperedge_name(name)?;
        if self.hyperedges.contains_key(name) {
            self.remove_hyperedge(name)?;
        }
        let mut hyperedge = Hyperedge::new(name);
        for &node in members {
            if hyperedge.add_member(node) {
                self.affiliations.entry(node).or_default().insert(name.to_string());
            }
        }
        let count = hyperedge.nbr_members();
        self.hyperedges.insert(name.to_string(), hyperedge);
        debug!(layer = %self.name, hyperedge = name, members = count, "hyperedge added");
        Ok(count)
    }

    pub fn remove_hyperedge(&mut self, name: &str) -> Result<()> {
        let hyperedge = self
            .hyperedges
            .remove(name)
            .ok_or_else(|| Error::HyperedgeNotFound(format!("'{name}' in layer '{}'", self.name)))?;
        for node in hyperedge.members {
            self.detach(node, name);
        }
        Ok(())
    }

    /// Drop `hyper` from a node's collection, dropping the collection when empty.
    fn detach(&mut self, node: NodeId, hyper: &str) {
        if let Some(set) = self.affiliations.get_mut(&node) {
            set.remove(hyper);
            if set.is_empty() {
                self.affiliations.remove(&node);
            }
        }
    }

    /// Affiliate `node` with `hyper`. Returns false if it already was.
    pub fn add_affiliation(&mut self, node: NodeId, hyper: &str, add_missing_hyperedge: bool) -> Result<bool> {
        if !self.hyperedges.contains_key(hyper) {
            if !add_missing_hyperedge {
                return Err(Error::HyperedgeNotFound(format!("'{hyper}' in layer '{}'", self.name)));
            }
            validate_hyperedge_name(hyper)?;
            self.hyperedges.insert(hyper.to_string(), Hyperedge::new(hyper));
        }
        let Some(hyperedge) = self.hyperedges.get_mut(hyper) else {
            return Err(Error::HyperedgeNotFound(hyper.to_string()));
        };
        if !hyperedge.add_member(node) {
            return Ok(false);
        }
        self.affiliations.entry(node).or_default().insert(hyper.to_string());
        Ok(true)
    }

    pub fn remove_affiliation(&mut self, node: NodeId, hyper: &str) -> Result<()> {
        let hyperedge = self
            .hyperedges
            .get_mut(hyper)
            .ok_or_else(|| Error::HyperedgeNotFound(format!("'{hyper}' in layer '{}'", self.name)))?;
        if !hyperedge.remove_member(node) {
            return Err(Error::NodeNotAffiliated(format!("node {node} is not in '{hyper}'")));
        }
        self.detach(node, hyper);
        Ok(())
    }

    /// Hyperedges a node belongs to, ascending by name.
    pub fn node_hyperedges(&self, node: NodeId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .affiliations
            .get(&node)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    // ========================================================================
    // Projected ties
    // ========================================================================

    /// Number of hyperedges both nodes belong to.
    pub fn shared_hyperedges(&self, a: NodeId, b: NodeId) -> usize {
        match (self.affiliations.get(&a), self.affiliations.get(&b)) {
            (Some(sa), Some(sb)) => {
                let (small, large) = if sa.len() <= sb.len() { (sa, sb) } else { (sb, sa) };
                small.iter().filter(|h| large.contains(*h)).count()
            }
            _ => 0,
        }
    }

    /// Projected tie weight: the shared hyperedge count.
    pub fn get_edge_value(&self, a: NodeId, b: NodeId) -> f32 {
        self.shared_hyperedges(a, b) as f32
    }

    pub fn check_edge_exists(&self, a: NodeId, b: NodeId) -> bool {
        self.shared_hyperedges(a, b) > 0
    }

    /// Every co-member of every hyperedge the node belongs to, itself
    /// excluded, ascending.
    pub fn get_node_alters(&self, node: NodeId) -> Vec<NodeId> {
        let Some(set) = self.affiliations.get(&node) else {
            return Vec::new();
        };
        let mut alters: HashSet<NodeId> = HashSet::new();
        for name in set {
            if let Some(h) = self.hyperedges.get(name) {
                alters.extend(h.members.iter().copied().filter(|&m| m != node));
            }
        }
        let mut out: Vec<NodeId> = alters.into_iter().collect();
        out.sort_unstable();
        out
    }

    // ========================================================================
    // Whole-layer operations
    // ========================================================================

    /// Strip a node from every hyperedge it belongs to.
    pub fn remove_node(&mut self, node: NodeId) -> usize {
        let Some(set) = self.affiliations.remove(&node) else {
            return 0;
        };
        for name in &set {
            if let Some(h) = self.hyperedges.get_mut(name) {
                h.remove_member(node);
            }
        }
        set.len()
    }

    pub fn clear(&mut self) {
        self.hyperedges.clear();
        self.affiliations.clear();
        debug!(layer = %self.name, "two-mode layer cleared");
    }

    /// Every affiliated node id, ascending.
    pub fn mentioned_node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.affiliations.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Persisted rows `(hyperedge, members)`, ascending by name, members ascending.
    pub fn rows(&self) -> Vec<(&str, Vec<NodeId>)> {
        self.hyperedge_names()
            .into_iter()
            .filter_map(|name| {
                self.hyperedges.get(name).map(|h| {
                    let mut members = h.members.clone();
                    members.sort_unstable();
                    (name, members)
                })
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
