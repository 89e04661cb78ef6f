//! Engine policy configuration.
//!
//! The switches are captured per instance when a node-set, layer or network
//! is constructed.

use serde::{Deserialize, Serialize};

/// Policy switches for node-sets, layers and networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reject adding a tie that already exists (no multigraph semantics).
    pub block_multi_edges: bool,
    /// Keep a sorted id array for O(1) indexed node access.
    pub cache_node_ids: bool,
    /// Only store outbound ties; inbound lists stay empty.
    pub outbound_only: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_multi_edges: true,
            cache_node_ids: true,
            outbound_only: false,
        }
    }
}

impl EngineConfig {
    pub fn with_block_multi_edges(mut self, on: bool) -> Self {
        self.block_multi_edges = on;
        self
    }

    pub fn with_cache_node_ids(mut self, on: bool) -> Self {
        self.cache_node_ids = on;
        self
    }

    pub fn with_outbound_only(mut self, on: bool) -> Self {
        self.outbound_only = on;
        self
    }

    /// The subset of the configuration a one-mode layer captures.
    pub fn edge_policy(&self) -> EdgePolicy {
        EdgePolicy {
            block_multi_edges: self.block_multi_edges,
            outbound_only: self.outbound_only,
        }
    }
}

/// Per-layer edge storage policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgePolicy {
    pub block_multi_edges: bool,
    pub outbound_only: bool,
}

impl Default for EdgePolicy {
    fn default() -> Self {
        EngineConfig::default().edge_policy()
    }
}
