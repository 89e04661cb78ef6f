//! Tie-level types: connections, traversal direction and layer metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::NodeId;
use crate::Error;

/// A valued tie to a partner node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub partner: NodeId,
    pub value: f32,
}

impl Connection {
    pub fn new(partner: NodeId, value: f32) -> Self {
        Self { partner, value }
    }
}

/// Traversal direction when asking for a node's alters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Traversal {
    In,
    Out,
    Both,
}

impl FromStr for Traversal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(Traversal::In),
            "out" => Ok(Traversal::Out),
            "both" => Ok(Traversal::Both),
            other => Err(Error::InvalidArgument(format!("unknown traversal '{other}'"))),
        }
    }
}

/// Whether ties in a one-mode layer have a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directionality {
    Directed,
    Undirected,
}

impl Directionality {
    pub fn name(&self) -> &'static str {
        match self {
            Directionality::Directed => "directed",
            Directionality::Undirected => "undirected",
        }
    }
}

impl fmt::Display for Directionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Directionality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "directed" => Ok(Directionality::Directed),
            "undirected" | "symmetric" => Ok(Directionality::Undirected),
            other => Err(Error::InvalidArgument(format!("unknown directionality '{other}'"))),
        }
    }
}

/// Whether ties in a one-mode layer carry a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Binary,
    Valued,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Binary => "binary",
            ValueType::Valued => "valued",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" => Ok(ValueType::Binary),
            "valued" => Ok(ValueType::Valued),
            other => Err(Error::InvalidArgument(format!("unknown value type '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata() {
        assert_eq!("Directed".parse::<Directionality>().unwrap(), Directionality::Directed);
        assert_eq!("undirected".parse::<Directionality>().unwrap(), Directionality::Undirected);
        assert_eq!("valued".parse::<ValueType>().unwrap(), ValueType::Valued);
        assert_eq!("BOTH".parse::<Traversal>().unwrap(), Traversal::Both);
        assert!("sideways".parse::<Traversal>().is_err());
    }
}
