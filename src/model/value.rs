//! Scalar attribute types and values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Declared type of a node attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Char,
    Int,
    Float,
    Bool,
}

impl AttributeType {
    /// Name used in node-set file headers.
    pub fn name(&self) -> &'static str {
        match self {
            AttributeType::Char => "char",
            AttributeType::Int => "int",
            AttributeType::Float => "float",
            AttributeType::Bool => "bool",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttributeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "char" => Ok(AttributeType::Char),
            "int" | "integer" => Ok(AttributeType::Int),
            "float" | "double" => Ok(AttributeType::Float),
            "bool" | "boolean" => Ok(AttributeType::Bool),
            other => Err(Error::InvalidAttributeType(other.to_string())),
        }
    }
}

/// Cell and row separators of the node-set file.
fn is_cell_break(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
}

/// A single attribute value. `Copy`, at most 8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AttributeValue {
    Char(char),
    Int(i32),
    Float(f32),
    Bool(bool),
}

// ============================================================================
// Type checking
// ============================================================================

impl AttributeValue {
    pub fn attr_type(&self) -> AttributeType {
        match self {
            AttributeValue::Char(_) => AttributeType::Char,
            AttributeValue::Int(_) => AttributeType::Int,
            AttributeValue::Float(_) => AttributeType::Float,
            AttributeValue::Bool(_) => AttributeType::Bool,
        }
    }

    /// Parse a string against a declared type.
    pub fn parse(attr_type: AttributeType, text: &str) -> crate::Result<Self> {
        let trimmed = text.trim();
        let mismatch = || Error::AttributeTypeMismatch {
            expected: attr_type.name().to_string(),
            got: text.to_string(),
        };
        match attr_type {
            AttributeType::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !is_cell_break(c) => Ok(AttributeValue::Char(c)),
                    _ => Err(mismatch()),
                }
            }
            AttributeType::Int => trimmed.parse().map(AttributeValue::Int).map_err(|_| mismatch()),
            AttributeType::Float => trimmed.parse().map(AttributeValue::Float).map_err(|_| mismatch()),
            AttributeType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(AttributeValue::Bool(true)),
                "false" | "0" => Ok(AttributeValue::Bool(false)),
                _ => Err(mismatch()),
            },
        }
    }

    /// False for a char that would split a persisted row.
    pub fn fits_cell(&self) -> bool {
        !matches!(self, AttributeValue::Char(c) if is_cell_break(*c))
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Int(i) => Some(*i as f32),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            AttributeValue::Char(c) => Some(*c),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<char> for AttributeValue {
    fn from(v: char) -> Self {
        AttributeValue::Char(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<f32> for AttributeValue {
    fn from(v: f32) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

// ============================================================================
// Display (also the persisted form)
// ============================================================================

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Char(c) => write!(f, "{c}"),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
        }
    }
}
