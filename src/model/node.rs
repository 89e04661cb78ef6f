//! Node identifier.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Opaque node identifier, unique within one node-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(v: u32) -> Self {
        NodeId(v)
    }
}

impl FromStr for NodeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(NodeId)
            .map_err(|_| Error::InvalidArgument(format!("'{s}' is not a node id")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_node_id() {
        assert_eq!(" 42 ".parse::<NodeId>().unwrap(), NodeId(42));
        assert!("-1".parse::<NodeId>().is_err());
        assert!("abc".parse::<NodeId>().is_err());
    }
}
