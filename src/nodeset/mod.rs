//! Node-set: the node universe plus typed node attributes.
//!
//! ## Storage layout
//!
//! Node ids live in exactly one of two partitions:
//!
//! - `plain`: ids without any attribute (the common case, one set entry)
//! - `attributed`: ids mapped to their [`NodeAttributes`]
//!
//! A node moves to `attributed` when its first attribute is set and back to
//! `plain` when its last one is removed. Both partitions are never allowed
//! to hold the same id.
//!
//! A sorted array of all ids is built lazily for indexed access and dropped
//! on every add/remove. Whether it is kept between calls is decided by
//! [`EngineConfig::cache_node_ids`].

pub mod attributes;

use std::borrow::Cow;
use std::cell::OnceCell;

use hashbrown::{HashMap, HashSet};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::model::{AttributeType, AttributeValue, NodeId, validate_name};
use crate::outcome::OperationResult;
use crate::{Error, Result};

pub use attributes::{AttrIndex, AttributeDefinition, AttributeRegistry, NodeAttributes};

/// Summary payload returned by [`Nodeset::info`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodesetInfo {
    pub name: String,
    pub nbr_nodes: usize,
    pub nbr_nodes_with_attributes: usize,
    pub attributes: Vec<AttributeDefinition>,
}

#[derive(Debug, Clone)]
pub struct Nodeset {
    name: String,
    plain: HashSet<NodeId>,
    attributed: HashMap<NodeId, NodeAttributes>,
    registry: AttributeRegistry,
    cache_node_ids: bool,
    id_cache: OnceCell<Vec<NodeId>>,
}

impl Nodeset {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &EngineConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: &EngineConfig) -> Self {
        Self {
            name: name.into(),
            plain: HashSet::new(),
            attributed: HashMap::new(),
            registry: AttributeRegistry::new(),
            cache_node_ids: config.cache_node_ids,
            id_cache: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> OperationResult {
        let name = name.into();
        let res = validate_name("nodeset", &name).map(|()| self.name = name.clone());
        OperationResult::from_unit(res, format!("Nodeset renamed to '{name}'"))
    }

    pub fn nbr_nodes(&self) -> usize {
        self.plain.len() + self.attributed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nbr_nodes() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.plain.contains(&id) || self.attributed.contains_key(&id)
    }

    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut AttributeRegistry {
        &mut self.registry
    }

    pub fn attribute_definitions(&self) -> Vec<AttributeDefinition> {
        self.registry.definitions()
    }

    /// Turn the sorted-id cache on or off. Turning it off drops the cache.
    pub fn set_cache_node_ids(&mut self, on: bool) {
        self.cache_node_ids = on;
        if !on {
            self.id_cache.take();
        }
    }

    // ========================================================================
    // Node ids
    // ========================================================================

    /// All node ids in ascending order.
    pub fn node_ids(&self) -> Cow<'_, [NodeId]> {
        if self.cache_node_ids {
            Cow::Borrowed(self.id_cache.get_or_init(|| self.collect_sorted_ids()))
        } else {
            Cow::Owned(self.collect_sorted_ids())
        }
    }

    fn collect_sorted_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .plain
            .iter()
            .chain(self.attributed.keys())
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    fn invalidate_cache(&mut self) {
        self.id_cache.take();
    }

    /// Add a node if it is missing. Returns true if it was added.
    pub(crate) fn ensure_node(&mut self, id: NodeId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.plain.insert(id);
        self.invalidate_cache();
        true
    }

    pub(crate) fn insert_node(&mut self, id: NodeId) -> Result<()> {
        if !self.ensure_node(id) {
            return Err(Error::NodeAlreadyExists(format!("Node {id}")));
        }
        Ok(())
    }

    pub(crate) fn delete_node(&mut self, id: NodeId) -> Result<()> {
        let removed = self.plain.remove(&id) || self.attributed.remove(&id).is_some();
        if !removed {
            return Err(Error::NodeNotFound(format!("Node {id}")));
        }
        self.invalidate_cache();
        Ok(())
    }

    // ========================================================================
    // Node operations
    // ========================================================================

    pub fn add_node(&mut self, id: NodeId) -> OperationResult {
        OperationResult::from_unit(self.insert_node(id), format!("Node {id} added"))
    }

    pub fn remove_node(&mut self, id: NodeId) -> OperationResult {
        OperationResult::from_unit(self.delete_node(id), format!("Node {id} removed"))
    }

    pub fn check_node_exists(&self, id: NodeId) -> OperationResult<bool> {
        let exists = self.contains(id);
        let msg = if exists { format!("Node {id} exists") } else { format!("Node {id} does not exist") };
        OperationResult::ok_with(exists, msg)
    }

    /// Node id at position `index` of the sorted id array.
    pub fn node_id_by_index(&self, index: usize) -> OperationResult<NodeId> {
        let ids = self.node_ids();
        match ids.get(index) {
            Some(&id) => OperationResult::ok_with(id, format!("Node at index {index}")),
            None => Error::InvalidArgument(format!(
                "index {index} out of range (nodeset has {} nodes)",
                ids.len()
            ))
            .into(),
        }
    }

    /// One page of node ids in ascending order. `limit: None` means no limit.
    pub fn get_all_nodes(&self, offset: usize, limit: Option<usize>) -> OperationResult<Vec<NodeId>> {
        let ids = self.node_ids();
        let total = ids.len();
        if total == 0 {
            return OperationResult::ok_with(Vec::new(), format!("Nodeset '{}' has no nodes", self.name));
        }
        if offset >= total {
            return OperationResult::ok_with(
                Vec::new(),
                format!("Offset {offset} is beyond range: nodeset has {total} nodes"),
            );
        }
        let end = limit.map_or(total, |l| offset.saturating_add(l).min(total));
        let page = ids[offset..end].to_vec();
        let msg = if offset == 0 && end == total {
            format!("All {total} nodes returned")
        } else {
            format!("Returned nodes {offset}..{end} of {total}")
        };
        OperationResult::ok_with(page, msg)
    }

    // ========================================================================
    // Attribute definitions
    // ========================================================================

    pub fn define_attribute(&mut self, name: &str, attr_type: AttributeType) -> OperationResult<AttrIndex> {
        OperationResult::from_result(self.registry.define(name, attr_type), |idx| {
            format!("Attribute '{name}' ({attr_type}) defined with index {idx}")
        })
    }

    /// Same as [`define_attribute`](Self::define_attribute) with the type given by name.
    pub fn define_attribute_str(&mut self, name: &str, type_name: &str) -> OperationResult<AttrIndex> {
        match type_name.parse::<AttributeType>() {
            Ok(attr_type) => self.define_attribute(name, attr_type),
            Err(err) => err.into(),
        }
    }

    pub fn undefine_attribute(&mut self, name: &str) -> OperationResult {
        let index = match self.registry.undefine(name) {
            Ok(index) => index,
            Err(err) => return err.into(),
        };
        let mut demoted = Vec::new();
        let mut stripped = 0usize;
        for (&id, attrs) in self.attributed.iter_mut() {
            if attrs.remove(index) {
                stripped += 1;
                if attrs.is_empty() {
                    demoted.push(id);
                }
            }
        }
        for id in demoted {
            self.attributed.remove(&id);
            self.plain.insert(id);
        }
        OperationResult::ok(format!("Attribute '{name}' undefined ({stripped} values removed)"))
    }

    // ========================================================================
    // Attribute values
    // ========================================================================

    fn require_node(&self, id: NodeId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(Error::NodeNotFound(format!("Node {id}")))
        }
    }

    pub(crate) fn store_value(&mut self, id: NodeId, index: AttrIndex, value: AttributeValue) {
        if self.plain.remove(&id) {
            let mut attrs = NodeAttributes::new();
            attrs.set(index, value);
            self.attributed.insert(id, attrs);
        } else if let Some(attrs) = self.attributed.get_mut(&id) {
            attrs.set(index, value);
        }
    }

    fn try_set_value(&mut self, id: NodeId, name: &str, value: AttributeValue) -> Result<()> {
        self.require_node(id)?;
        let (index, attr_type) = self.registry.lookup(name)?;
        if value.attr_type() != attr_type || !value.fits_cell() {
            return Err(Error::AttributeTypeMismatch {
                expected: attr_type.name().to_string(),
                got: value.to_string(),
            });
        }
        self.store_value(id, index, value);
        Ok(())
    }

    /// Set an attribute from its textual form, parsed against the declared type.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> OperationResult {
        let res = self.require_node(id).and_then(|()| {
            let (_, attr_type) = self.registry.lookup(name)?;
            AttributeValue::parse(attr_type, value)
        });
        let res = res.and_then(|parsed| self.try_set_value(id, name, parsed));
        OperationResult::from_unit(res, format!("Attribute '{name}' set for node {id}"))
    }

    pub fn set_attribute_value(&mut self, id: NodeId, name: &str, value: AttributeValue) -> OperationResult {
        let res = self.try_set_value(id, name, value);
        OperationResult::from_unit(res, format!("Attribute '{name}' set for node {id}"))
    }

    pub(crate) fn attribute_value(&self, id: NodeId, index: AttrIndex) -> Option<AttributeValue> {
        self.attributed.get(&id).and_then(|attrs| attrs.get(index))
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> OperationResult<AttributeValue> {
        let res = self.require_node(id).and_then(|()| {
            let (index, _) = self.registry.lookup(name)?;
            self.attribute_value(id, index).ok_or_else(|| {
                Error::AttributeNotFound(format!("'{name}' is not set for node {id}"))
            })
        });
        OperationResult::from_result(res, |v| format!("{name} = {v}"))
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> OperationResult {
        let res = self.require_node(id).and_then(|()| {
            let (index, _) = self.registry.lookup(name)?;
            let outcome = self
                .attributed
                .get_mut(&id)
                .map(|attrs| (attrs.remove(index), attrs.is_empty()));
            let now_empty = match outcome {
                Some((true, now_empty)) => now_empty,
                _ => {
                    return Err(Error::AttributeNotFound(format!(
                        "'{name}' is not set for node {id}"
                    )));
                }
            };
            if now_empty {
                self.attributed.remove(&id);
                self.plain.insert(id);
            }
            Ok(())
        });
        OperationResult::from_unit(res, format!("Attribute '{name}' removed from node {id}"))
    }

    /// All attributes set on a node, ordered by attribute index.
    pub fn get_node_attributes(&self, id: NodeId) -> OperationResult<Vec<(String, AttributeValue)>> {
        if let Err(err) = self.require_node(id) {
            return err.into();
        }
        let mut pairs: Vec<(AttrIndex, AttributeValue)> = self
            .attributed
            .get(&id)
            .map(|attrs| attrs.iter().collect())
            .unwrap_or_default();
        pairs.sort_by_key(|(index, _)| *index);
        let named: Vec<(String, AttributeValue)> = pairs
            .into_iter()
            .filter_map(|(index, v)| self.registry.name_of(index).map(|n| (n.to_string(), v)))
            .collect();
        let msg = format!("Node {id} has {} attributes", named.len());
        OperationResult::ok_with(named, msg)
    }

    pub fn info(&self) -> OperationResult<NodesetInfo> {
        let info = NodesetInfo {
            name: self.name.clone(),
            nbr_nodes: self.nbr_nodes(),
            nbr_nodes_with_attributes: self.attributed.len(),
            attributes: self.attribute_definitions(),
        };
        OperationResult::ok_with(info, format!("Nodeset '{}'", self.name))
    }

    #[cfg(test)]
    fn partitions_disjoint(&self) -> bool {
        self.attributed.keys().all(|id| !self.plain.contains(id))
    }
}

// ============================================================================
// Tests
// ============================================================================
