//! # Network
//!
//! The composition root: one owned [`Nodeset`] and a name-keyed map of
//! [`Layer`]s. Every public operation resolves its layer by name, checks the
//! layer kind, validates endpoints against the node-set and reports through
//! an [`OperationResult`].
//!
//! Layers are kept in a `BTreeMap`, so listing and persistence see them in
//! name order.

use std::collections::BTreeMap;

use hashbrown::HashSet;
use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::layer::{Layer, LayerInfo, LayerOneMode, LayerTwoMode};
use crate::model::{Directionality, NodeId, Traversal, ValueType, validate_name};
use crate::nodeset::Nodeset;
use crate::outcome::OperationResult;
use crate::{Error, Result};

/// Summary payload returned by [`Network::info`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkInfo {
    pub name: String,
    pub nodeset: String,
    pub nbr_nodes: usize,
    pub layers: Vec<LayerInfo>,
    pub modified: bool,
}

#[derive(Debug)]
pub struct Network {
    name: String,
    nodeset: Nodeset,
    layers: BTreeMap<String, Layer>,
    config: EngineConfig,
    modified: bool,
}

impl Network {
    /// An empty network with a fresh node-set of the same name. The name is
    /// checked when the network is saved.
    pub fn new(name: impl Into<String>, config: EngineConfig) -> Self {
        let name = name.into();
        let nodeset = Nodeset::with_config(name.clone(), &config);
        Self::with_nodeset(name, nodeset, config)
    }

    pub fn with_nodeset(name: impl Into<String>, nodeset: Nodeset, config: EngineConfig) -> Self {
        Self {
            name: name.into(),
            nodeset,
            layers: BTreeMap::new(),
            config,
            modified: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the network. The name must fit on the file's `Name:` line.
    pub fn set_name(&mut self, name: impl Into<String>) -> OperationResult {
        let name = name.into();
        let res = validate_name("network", &name).map(|()| {
            self.name = name.clone();
            self.modified = true;
        });
        OperationResult::from_unit(res, format!("Network renamed to '{name}'"))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn nodeset(&self) -> &Nodeset {
        &self.nodeset
    }

    /// Direct node-set access. Removing nodes through it bypasses the layer
    /// cleanup of [`Network::remove_node`].
    pub fn nodeset_mut(&mut self) -> &mut Nodeset {
        self.modified = true;
        &mut self.nodeset
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Layers in name order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    pub fn nbr_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    // ========================================================================
    // Internal resolution
    // ========================================================================

    pub(crate) fn layer_ref(&self, name: &str) -> Result<&Layer> {
        self.layers
            .get(name)
            .ok_or_else(|| Error::LayerNotFound(format!("'{name}' in network '{}'", self.name)))
    }

    fn layer_mut(&mut self, name: &str) -> Result<&mut Layer> {
        let network = &self.name;
        self.layers
            .get_mut(name)
            .ok_or_else(|| Error::LayerNotFound(format!("'{name}' in network '{network}'")))
    }

    /// Layers to walk: one by name, or all of them.
    pub(crate) fn resolve_layers(&self, layer: Option<&str>) -> Result<Vec<&Layer>> {
        match layer {
            Some(name) => Ok(vec![self.layer_ref(name)?]),
            None => Ok(self.layers.values().collect()),
        }
    }

    fn require_node(&self, id: NodeId) -> Result<()> {
        if self.nodeset.contains(id) {
            Ok(())
        } else {
            Err(Error::NodeNotFound(format!("Node {id}")))
        }
    }

    /// Fail on the first absent id unless missing nodes may be created.
    fn check_endpoints(&self, ids: &[NodeId], add_missing: bool) -> Result<()> {
        if add_missing {
            return Ok(());
        }
        ids.iter().try_for_each(|&id| self.require_node(id))
    }

    fn ensure_nodes(&mut self, ids: &[NodeId]) {
        for &id in ids {
            if self.nodeset.ensure_node(id) {
                debug!(network = %self.name, node = %id, "node added on demand");
            }
        }
    }

    /// Attach a fully built layer. Used by the loader.
    pub(crate) fn insert_layer(&mut self, layer: Layer) -> Result<()> {
        validate_name("layer", layer.name())?;
        if self.layers.contains_key(layer.name()) {
            return Err(Error::LayerAlreadyExists(layer.name().to_string()));
        }
        self.layers.insert(layer.name().to_string(), layer);
        self.modified = true;
        Ok(())
    }

    // ========================================================================
    // Layers
    // ========================================================================

    pub fn add_layer_one_mode(
        &mut self,
        name: &str,
        directionality: Directionality,
        value_type: ValueType,
        selfties: bool,
    ) -> OperationResult {
        let layer = LayerOneMode::new(name, directionality, value_type, selfties, self.config.edge_policy());
        let res = self.insert_layer(Layer::OneMode(layer));
        if res.is_ok() {
            debug!(network = %self.name, layer = name, %directionality, %value_type, selfties, "one-mode layer added");
        }
        OperationResult::from_unit(res, format!("Layer '{name}' added"))
    }

    pub fn add_layer_two_mode(&mut self, name: &str) -> OperationResult {
        let res = self.insert_layer(Layer::TwoMode(LayerTwoMode::new(name)));
        if res.is_ok() {
            debug!(network = %self.name, layer = name, "two-mode layer added");
        }
        OperationResult::from_unit(res, format!("Layer '{name}' added"))
    }

    /// Clear a layer, then drop it.
    pub fn remove_layer(&mut self, name: &str) -> OperationResult {
        let res = self.layer_mut(name).map(Layer::clear).map(|()| {
            self.layers.remove(name);
            self.modified = true;
        });
        OperationResult::from_unit(res, format!("Layer '{name}' removed"))
    }

    pub fn clear_layer(&mut self, name: &str) -> OperationResult {
        let res = self.layer_mut(name).map(Layer::clear).map(|()| self.modified = true);
        OperationResult::from_unit(res, format!("Layer '{name}' cleared"))
    }

    pub fn layer_info(&self, name: &str) -> OperationResult<LayerInfo> {
        OperationResult::from_result(self.layer_ref(name).map(Layer::info), |i| {
            format!("Layer '{}' (mode {})", i.name, i.mode)
        })
    }

    pub fn layer_names(&self) -> OperationResult<Vec<String>> {
        let names: Vec<String> = self.layers.keys().cloned().collect();
        let msg = format!("Network '{}' has {} layers", self.name, names.len());
        OperationResult::ok_with(names, msg)
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    pub fn add_node(&mut self, id: NodeId) -> OperationResult {
        let res = self.nodeset.insert_node(id);
        if res.is_ok() {
            self.modified = true;
        }
        OperationResult::from_unit(res, format!("Node {id} added"))
    }

    /// Strip a node from every layer, then from the node-set.
    pub fn remove_node(&mut self, id: NodeId) -> OperationResult {
        if let Err(err) = self.require_node(id) {
            return err.into();
        }
        let stripped: usize = self.layers.values_mut().map(|l| l.remove_node(id)).sum();
        let res = self.nodeset.delete_node(id);
        if res.is_ok() {
            self.modified = true;
        }
        OperationResult::from_unit(res, format!("Node {id} removed ({stripped} ties/affiliations dropped)"))
    }

    // ========================================================================
    // One-mode ties
    // ========================================================================

    pub(crate) fn try_add_edge(&mut self, layer: &str, a: NodeId, b: NodeId, value: f32, add_missing: bool) -> Result<()> {
        self.layer_ref(layer)?.as_one_mode()?;
        self.check_endpoints(&[a, b], add_missing)?;
        self.layer_mut(layer)?.as_one_mode_mut()?.add_edge(a, b, value)?;
        self.ensure_nodes(&[a, b]);
        self.modified = true;
        Ok(())
    }

    /// Add the tie `a → b`. Missing endpoints fail with `NodeNotFound` unless
    /// `add_missing_nodes` is set, in which case they are created once the
    /// tie has been accepted.
    pub fn add_edge(&mut self, layer: &str, a: NodeId, b: NodeId, value: f32, add_missing_nodes: bool) -> OperationResult {
        let res = self.try_add_edge(layer, a, b, value, add_missing_nodes);
        OperationResult::from_unit(res, format!("Edge {a} -> {b} added to '{layer}'"))
    }

    pub fn remove_edge(&mut self, layer: &str, a: NodeId, b: NodeId) -> OperationResult {
        let res = self
            .layer_mut(layer)
            .and_then(|l| l.as_one_mode_mut())
            .and_then(|l| l.remove_edge(a, b));
        if res.is_ok() {
            self.modified = true;
        }
        OperationResult::from_unit(res, format!("Edge {a} -> {b} removed from '{layer}'"))
    }

    /// Works on both layer kinds; a two-mode tie exists when the nodes share
    /// a hyperedge.
    pub fn check_edge_exists(&self, layer: &str, a: NodeId, b: NodeId) -> OperationResult<bool> {
        let res = self.layer_ref(layer).and_then(|l| {
            self.require_node(a)?;
            self.require_node(b)?;
            Ok(l.check_edge_exists(a, b))
        });
        OperationResult::from_result(res, |&exists| {
            if exists {
                format!("Edge {a} -> {b} exists")
            } else {
                format!("Edge {a} -> {b} does not exist")
            }
        })
    }

    /// Stored value for one-mode layers, shared hyperedge count for two-mode.
    /// 0 when there is no tie.
    pub fn get_edge_value(&self, layer: &str, a: NodeId, b: NodeId) -> OperationResult<f32> {
        let res = self.layer_ref(layer).and_then(|l| {
            self.require_node(a)?;
            self.require_node(b)?;
            Ok(l.get_edge_value(a, b))
        });
        OperationResult::from_result(res, |v| format!("Edge {a} -> {b} value {v}"))
    }

    /// Alters of `node` in one layer, or the union across all layers when
    /// `layer` is `None`. Ascending, without duplicates.
    pub fn get_node_alters(&self, layer: Option<&str>, node: NodeId, traversal: Traversal) -> OperationResult<Vec<NodeId>> {
        let res = self.require_node(node).and_then(|()| {
            let mut seen: HashSet<NodeId> = HashSet::new();
            for l in self.resolve_layers(layer)? {
                seen.extend(l.get_alter_ids(node, traversal));
            }
            let mut alters: Vec<NodeId> = seen.into_iter().collect();
            alters.sort_unstable();
            Ok(alters)
        });
        OperationResult::from_result(res, |alters| format!("Node {node} has {} alters", alters.len()))
    }

    // ========================================================================
    // Two-mode affiliations
    // ========================================================================

    fn try_add_hyperedge(&mut self, layer: &str, name: &str, members: &[NodeId], add_missing: bool) -> Result<usize> {
        self.layer_ref(layer)?.as_two_mode()?;
        self.check_endpoints(members, add_missing)?;
        let count = self.layer_mut(layer)?.as_two_mode_mut()?.add_hyperedge(name, members)?;
        self.ensure_nodes(members);
        self.modified = true;
        Ok(count)
    }

    /// Create (or replace) a hyperedge. Payload: member count after dedup.
    pub fn add_hyperedge(&mut self, layer: &str, name: &str, members: &[NodeId], add_missing_nodes: bool) -> OperationResult<usize> {
        let res = self.try_add_hyperedge(layer, name, members, add_missing_nodes);
        OperationResult::from_result(res, |n| format!("Hyperedge '{name}' added to '{layer}' with {n} members"))
    }

    pub fn remove_hyperedge(&mut self, layer: &str, name: &str) -> OperationResult {
        let res = self
            .layer_mut(layer)
            .and_then(|l| l.as_two_mode_mut())
            .and_then(|l| l.remove_hyperedge(name));
        if res.is_ok() {
            self.modified = true;
        }
        OperationResult::from_unit(res, format!("Hyperedge '{name}' removed from '{layer}'"))
    }

    pub(crate) fn try_add_affiliation(
        &mut self,
        layer: &str,
        node: NodeId,
        hyper: &str,
        add_missing_hyperedge: bool,
        add_missing_node: bool,
    ) -> Result<bool> {
        self.layer_ref(layer)?.as_two_mode()?;
        self.check_endpoints(&[node], add_missing_node)?;
        let added = self
            .layer_mut(layer)?
            .as_two_mode_mut()?
            .add_affiliation(node, hyper, add_missing_hyperedge)?;
        self.ensure_nodes(&[node]);
        self.modified = true;
        Ok(added)
    }

    /// Affiliate a node with a hyperedge. Payload: false when the node was
    /// already a member.
    pub fn add_affiliation(
        &mut self,
        layer: &str,
        node: NodeId,
        hyper: &str,
        add_missing_hyperedge: bool,
        add_missing_node: bool,
    ) -> OperationResult<bool> {
        let res = self.try_add_affiliation(layer, node, hyper, add_missing_hyperedge, add_missing_node);
        OperationResult::from_result(res, |&added| {
            if added {
                format!("Node {node} affiliated with '{hyper}'")
            } else {
                format!("Node {node} already affiliated with '{hyper}'")
            }
        })
    }

    pub fn remove_affiliation(&mut self, layer: &str, node: NodeId, hyper: &str) -> OperationResult {
        let res = self
            .layer_mut(layer)
            .and_then(|l| l.as_two_mode_mut())
            .and_then(|l| l.remove_affiliation(node, hyper));
        if res.is_ok() {
            self.modified = true;
        }
        OperationResult::from_unit(res, format!("Node {node} removed from '{hyper}'"))
    }

    /// Members of a hyperedge, ascending.
    pub fn get_hyperedge_members(&self, layer: &str, name: &str) -> OperationResult<Vec<NodeId>> {
        let res = self.layer_ref(layer).and_then(|l| l.as_two_mode()).and_then(|l| {
            let h = l
                .hyperedge(name)
                .ok_or_else(|| Error::HyperedgeNotFound(format!("'{name}' in layer '{layer}'")))?;
            let mut members = h.members().to_vec();
            members.sort_unstable();
            Ok(members)
        });
        OperationResult::from_result(res, |m| format!("Hyperedge '{name}' has {} members", m.len()))
    }

    /// Hyperedges a node belongs to, ascending by name.
    pub fn get_node_hyperedges(&self, layer: &str, node: NodeId) -> OperationResult<Vec<String>> {
        let res = self.layer_ref(layer).and_then(|l| l.as_two_mode()).and_then(|l| {
            self.require_node(node)?;
            Ok(l.node_hyperedges(node).into_iter().map(str::to_string).collect::<Vec<_>>())
        });
        OperationResult::from_result(res, |h| format!("Node {node} is in {} hyperedges", h.len()))
    }

    // ========================================================================
    // Summary
    // ========================================================================

    pub fn info(&self) -> OperationResult<NetworkInfo> {
        let info = NetworkInfo {
            name: self.name.clone(),
            nodeset: self.nodeset.name().to_string(),
            nbr_nodes: self.nodeset.nbr_nodes(),
            layers: self.layers.values().map(Layer::info).collect(),
            modified: self.modified,
        };
        let msg = format!("Network '{}': {} nodes, {} layers", info.name, info.nbr_nodes, info.layers.len());
        OperationResult::ok_with(info, msg)
    }
}

// ============================================================================
// Tests
// ============================================================================
