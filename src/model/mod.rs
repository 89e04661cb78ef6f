//! # Network Model
//!
//! Plain value types shared by the node-set, layers, codec and analytics.
//!
//! Design rule: this module is pure data with no I/O and no state.

pub mod connection;
pub mod node;
pub mod value;

pub use connection::{Connection, Directionality, Traversal, ValueType};
pub use node::NodeId;
pub use value::{AttributeType, AttributeValue};

use crate::{Error, Result};

/// Check a network, node-set or layer name. These names are persisted as
/// `Key: value` lines or as the first cell of a header row, so they must be
/// non-empty, single-line, TAB-free and free of surrounding whitespace.
pub(crate) fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() || name.trim() != name || name.contains(['\t', '\n', '\r']) {
        return Err(Error::InvalidArgument(format!("'{}' is not a valid {kind} name", name.escape_debug())));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("layer", "kin").is_ok());
        assert!(validate_name("layer", "trade: 2019").is_ok());
        for bad in ["", "  ", "a\tb", "a\nb", "a\r", " padded"] {
            assert!(matches!(validate_name("network", bad), Err(Error::InvalidArgument(_))), "{bad:?}");
        }
    }
}
