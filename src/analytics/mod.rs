//! # Analytics
//!
//! Algorithms over one layer (or, where noted, all layers) of a network.
//!
//! | Function | Scope | Payload | Side effect |
//! |----------|-------|---------|-------------|
//! | [`degree_centrality`] | one layer | nodes scored | `int` attribute |
//! | [`density`] | one-mode layer | ratio | none |
//! | [`connected_components`] | one layer | component count | `int` attribute |
//! | [`shortest_path`] | one layer or all | hop count | none |
//! | [`random_node`] / [`random_alter`] / [`random_edge`] | one layer | ids | none |
//!
//! Neighbourhoods come from [`Layer::get_alter_ids`](crate::layer::Layer::get_alter_ids),
//! so two-mode layers are walked through their shared-hyperedge projection.

pub mod components;
pub mod degree;
pub mod density;
pub mod path;
pub mod sampling;

pub use components::{component_groups, connected_components};
pub use degree::{degree_centrality, degrees};
pub use density::density;
pub use path::shortest_path;
pub use sampling::{random_alter, random_edge, random_node};

use crate::model::AttributeType;
use crate::nodeset::{AttrIndex, Nodeset};
use crate::{Error, Result};

/// Index of an `int` attribute for writing results, defining it if absent.
pub(crate) fn int_attribute(nodeset: &mut Nodeset, name: &str) -> Result<AttrIndex> {
    match nodeset.registry().index_of(name) {
        Some(index) => match nodeset.registry().type_of(index) {
            Some(AttributeType::Int) => Ok(index),
            other => Err(Error::AttributeTypeMismatch {
                expected: AttributeType::Int.name().to_string(),
                got: other.map_or_else(|| "undefined".to_string(), |t| t.name().to_string()),
            }),
        },
        None => nodeset.registry_mut().define(name, AttributeType::Int),
    }
}

/// Clamp a count into the `int` attribute range.
pub(crate) fn as_int(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
