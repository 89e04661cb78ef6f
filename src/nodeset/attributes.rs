//! Attribute definitions and compact per-node attribute lists.
//!
//! The registry hands out small integer indices. Freed indices go on a
//! LIFO free list and are reused before a new index is allocated, so a
//! long-lived node-set that keeps defining and undefining attributes does
//! not grow its index space.

use hashbrown::HashMap;
use serde::Serialize;
use smallvec::SmallVec;

use crate::model::{AttributeType, AttributeValue};
use crate::{Error, Result};

/// Index of a defined attribute.
pub type AttrIndex = u16;

/// One attribute definition, as listed by [`AttributeRegistry::definitions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDefinition {
    pub index: AttrIndex,
    pub name: String,
    pub attr_type: AttributeType,
}

// ============================================================================
// AttributeRegistry
// ============================================================================

/// Bidirectional name ↔ index map plus index → type.
#[derive(Debug, Clone, Default)]
pub struct AttributeRegistry {
    name_to_index: HashMap<String, AttrIndex>,
    index_to_name: HashMap<AttrIndex, String>,
    index_to_type: HashMap<AttrIndex, AttributeType>,
    free: Vec<AttrIndex>,
    next: u32,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.name_to_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_index.is_empty()
    }

    /// Define a new attribute and return its index.
    pub fn define(&mut self, name: &str, attr_type: AttributeType) -> Result<AttrIndex> {
        validate_name(name)?;
        if self.name_to_index.contains_key(name) {
            return Err(Error::AttributeNameExists(name.to_string()));
        }
        let index = match self.free.pop() {
            Some(recycled) => recycled,
            None => {
                let index = AttrIndex::try_from(self.next).map_err(|_| {
                    Error::InvalidArgument("attribute index space exhausted".into())
                })?;
                self.next += 1;
                index
            }
        };
        self.name_to_index.insert(name.to_string(), index);
        self.index_to_name.insert(index, name.to_string());
        self.index_to_type.insert(index, attr_type);
        Ok(index)
    }

    /// Remove a definition and recycle its index. Returns the freed index.
    pub fn undefine(&mut self, name: &str) -> Result<AttrIndex> {
        let index = self
            .name_to_index
            .remove(name)
            .ok_or_else(|| Error::AttributeNotFound(name.to_string()))?;
        self.index_to_name.remove(&index);
        self.index_to_type.remove(&index);
        self.free.push(index);
        Ok(index)
    }

    pub fn index_of(&self, name: &str) -> Option<AttrIndex> {
        self.name_to_index.get(name).copied()
    }

    pub fn name_of(&self, index: AttrIndex) -> Option<&str> {
        self.index_to_name.get(&index).map(String::as_str)
    }

    pub fn type_of(&self, index: AttrIndex) -> Option<AttributeType> {
        self.index_to_type.get(&index).copied()
    }

    /// Resolve a name to its index and type.
    pub fn lookup(&self, name: &str) -> Result<(AttrIndex, AttributeType)> {
        let index = self
            .index_of(name)
            .ok_or_else(|| Error::AttributeNotFound(name.to_string()))?;
        // Both maps are written together in define().
        let attr_type = self
            .type_of(index)
            .ok_or_else(|| Error::AttributeNotFound(name.to_string()))?;
        Ok((index, attr_type))
    }

    /// All definitions, ordered by index.
    pub fn definitions(&self) -> Vec<AttributeDefinition> {
        let mut defs: Vec<AttributeDefinition> = self
            .name_to_index
            .iter()
            .filter_map(|(name, &index)| {
                self.type_of(index).map(|attr_type| AttributeDefinition {
                    index,
                    name: name.clone(),
                    attr_type,
                })
            })
            .collect();
        defs.sort_by_key(|d| d.index);
        defs
    }
}

/// Names end up in a tab-separated header as `name:type`.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['\t', ':', '\n', '\r']) {
        return Err(Error::InvalidArgument(format!(
            "'{name}' is not a valid attribute name"
        )));
    }
    Ok(())
}

// ============================================================================
// NodeAttributes
// ============================================================================

/// Parallel (index, value) lists for one node.
///
/// Removal swaps the last entry into the freed slot, so order is not
/// meaningful.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAttributes {
    indices: SmallVec<[AttrIndex; 4]>,
    values: SmallVec<[AttributeValue; 4]>,
}

impl NodeAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn position(&self, index: AttrIndex) -> Option<usize> {
        self.indices.iter().position(|&i| i == index)
    }

    pub fn get(&self, index: AttrIndex) -> Option<AttributeValue> {
        self.position(index).map(|pos| self.values[pos])
    }

    /// Insert or overwrite.
    pub fn set(&mut self, index: AttrIndex, value: AttributeValue) {
        match self.position(index) {
            Some(pos) => self.values[pos] = value,
            None => {
                self.indices.push(index);
                self.values.push(value);
            }
        }
    }

    /// Returns true if the attribute was present.
    pub fn remove(&mut self, index: AttrIndex) -> bool {
        match self.position(index) {
            Some(pos) => {
                self.indices.swap_remove(pos);
                self.values.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttrIndex, AttributeValue)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_define_and_lookup() {
        let mut reg = AttributeRegistry::new();
        let age = reg.define("age", AttributeType::Int).unwrap();
        let score = reg.define("score", AttributeType::Float).unwrap();
        assert_eq!((age, score), (0, 1));
        assert_eq!(reg.lookup("score").unwrap(), (1, AttributeType::Float));
        assert!(matches!(reg.define("age", AttributeType::Bool), Err(Error::AttributeNameExists(_))));
    }

    #[test]
    fn test_index_recycling_is_lifo() {
        let mut reg = AttributeRegistry::new();
        for name in ["a", "b", "c", "d"] {
            reg.define(name, AttributeType::Int).unwrap();
        }
        reg.undefine("b").unwrap();
        reg.undefine("d").unwrap();
        assert_eq!(reg.define("x", AttributeType::Char).unwrap(), 3);
        assert_eq!(reg.define("y", AttributeType::Char).unwrap(), 1);
        assert_eq!(reg.define("z", AttributeType::Char).unwrap(), 4);
    }

    #[test]
    fn test_invalid_names() {
        let mut reg = AttributeRegistry::new();
        assert!(reg.define("", AttributeType::Int).is_err());
        assert!(reg.define("a:b", AttributeType::Int).is_err());
        assert!(reg.define("a\tb", AttributeType::Int).is_err());
    }

    #[test]
    fn test_node_attributes_swap_remove() {
        let mut attrs = NodeAttributes::new();
        attrs.set(0, AttributeValue::Int(1));
        attrs.set(1, AttributeValue::Int(2));
        attrs.set(2, AttributeValue::Int(3));
        assert!(attrs.remove(0));
        assert!(!attrs.remove(0));
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get(2), Some(AttributeValue::Int(3)));
        assert_eq!(attrs.get(1), Some(AttributeValue::Int(2)));

        attrs.set(1, AttributeValue::Int(20));
        assert_eq!(attrs.get(1), Some(AttributeValue::Int(20)));
        assert_eq!(attrs.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_live_indices_stay_unique(ops in proptest::collection::vec((0u8..8, any::<bool>()), 1..64)) {
            let mut reg = AttributeRegistry::new();
            for (slot, define) in ops {
                let name = format!("attr{slot}");
                if define {
                    let _ = reg.define(&name, AttributeType::Int);
                } else {
                    let _ = reg.undefine(&name);
                }
                let defs = reg.definitions();
                let mut seen: Vec<AttrIndex> = defs.iter().map(|d| d.index).collect();
                seen.dedup();
                prop_assert_eq!(seen.len(), defs.len());
                // Never more than eight names alive, so never more than eight indices.
                prop_assert!(defs.iter().all(|d| d.index < 8));
            }
        }
    }
}
