//! # plexnet: Embedded Multiplex Network Engine
//!
//! A multi-layer graph / hypergraph store with typed node attributes,
//! a line-oriented persistence format and a small set of network analytics.
//!
//! ## Design Principles
//!
//! 1. **One node universe**: a `Nodeset` owns node ids and their attributes
//! 2. **Layers are independent**: each `Layer` is either one-mode (dyadic ties)
//!    or two-mode (named hyperedges), with its own shape and policy
//! 3. **Uniform envelope**: public operations return an `OperationResult`,
//!    the only thing an outer command layer needs to render
//! 4. **Explicit policy**: multi-edge blocking, id caching and outbound-only
//!    storage are captured per instance from an `EngineConfig`
//!
//! ## Quick Start
//!
//! ```rust
//! use plexnet::{Network, EngineConfig, Directionality, ValueType, NodeId};
//!
//! let mut net = Network::new("trade", EngineConfig::default());
//! net.add_layer_one_mode("exports", Directionality::Directed, ValueType::Valued, false);
//! let r = net.add_edge("exports", NodeId(1), NodeId(2), 3.5, true);
//! assert!(r.success);
//! assert_eq!(net.get_edge_value("exports", NodeId(1), NodeId(2)).payload, Some(3.5));
//! ```
//!
//! ## Layer shapes
//!
//! | Layer | Storage | Edge value |
//! |-------|---------|------------|
//! | One-mode, binary | partner id lists | 1 if tie exists |
//! | One-mode, valued | (partner, value) lists | stored value |
//! | Two-mode | hyperedges + per-node reverse index | shared hyperedge count |

// ============================================================================
// Modules
// ============================================================================

pub mod analytics;
pub mod config;
pub mod layer;
pub mod model;
pub mod network;
pub mod nodeset;
pub mod outcome;
pub mod persist;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{EdgePolicy, EngineConfig};
pub use layer::{EdgeSet, EdgeSetKind, Hyperedge, Layer, LayerInfo, LayerOneMode, LayerTwoMode};
pub use model::{
    AttributeType, AttributeValue, Connection, Directionality, NodeId, Traversal, ValueType,
};
pub use network::{Network, NetworkInfo};
pub use nodeset::{Nodeset, NodesetInfo};
pub use outcome::{OperationResult, ResultCode};
pub use persist::FileFormat;

// ============================================================================
// Error Types
// ============================================================================

/// Every failure the engine can report. Each variant maps onto one
/// [`ResultCode`], which is what crosses the public boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("Hyperedge not found: {0}")]
    HyperedgeNotFound(String),

    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    #[error("No path: {0}")]
    PathNotFound(String),

    #[error("Node already exists: {0}")]
    NodeAlreadyExists(String),

    #[error("Attribute name already defined: {0}")]
    AttributeNameExists(String),

    #[error("Layer already exists: {0}")]
    LayerAlreadyExists(String),

    #[error("Edge exists: {0}")]
    EdgeExists(String),

    #[error("Edge already exists: {0}")]
    EdgeAlreadyExists(String),

    #[error("Invalid attribute type: {0}")]
    InvalidAttributeType(String),

    #[error("Selfties not allowed: {0}")]
    SelftiesNotAllowed(String),

    #[error("Type error: expected {expected}, got '{got}'")]
    AttributeTypeMismatch { expected: String, got: String },

    #[error("Layer is not one-mode: {0}")]
    LayerNotOneMode(String),

    #[error("Layer is not two-mode: {0}")]
    LayerNotTwoMode(String),

    #[error("Node not affiliated: {0}")]
    NodeNotAffiliated(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File format error at line {line}: {message}")]
    FileFormat { line: usize, message: String },

    #[error("File column error: {0}")]
    FileColumns(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Save error: {0}")]
    Save(String),

    #[error("Unexpected import error: {0}")]
    UnexpectedImport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The string code this error is reported under.
    pub fn code(&self) -> ResultCode {
        match self {
            Error::NodeNotFound(_) => ResultCode::NodeNotFound,
            Error::LayerNotFound(_) => ResultCode::LayerNotFound,
            Error::AttributeNotFound(_) => ResultCode::AttributeNotFound,
            Error::HyperedgeNotFound(_) => ResultCode::HyperedgeNotFound,
            Error::EdgeNotFound(_) => ResultCode::EdgeNotFound,
            Error::PathNotFound(_) => ResultCode::PathNotFound,
            Error::NodeAlreadyExists(_) => ResultCode::NodeAlreadyExists,
            Error::AttributeNameExists(_) => ResultCode::AttributeNameExists,
            Error::LayerAlreadyExists(_) => ResultCode::LayerAlreadyExists,
            Error::EdgeExists(_) => ResultCode::EdgeExists,
            Error::EdgeAlreadyExists(_) => ResultCode::EdgeAlreadyExists,
            Error::InvalidAttributeType(_) => ResultCode::InvalidAttributeType,
            Error::SelftiesNotAllowed(_) => ResultCode::SelftiesNotAllowed,
            Error::AttributeTypeMismatch { .. } => ResultCode::AttributeTypeMismatch,
            Error::LayerNotOneMode(_) => ResultCode::LayerNotOneMode,
            Error::LayerNotTwoMode(_) => ResultCode::LayerNotTwoMode,
            Error::NodeNotAffiliated(_) => ResultCode::ConstraintNodeNotAffiliated,
            Error::InvalidArgument(_) => ResultCode::InvalidArgument,
            Error::FileFormat { .. } => ResultCode::FileFormatError,
            Error::FileColumns(_) => ResultCode::FileColumnsError,
            Error::Load(_) => ResultCode::LoadError,
            Error::Save(_) => ResultCode::SaveError,
            Error::UnexpectedImport(_) => ResultCode::UnexpectedImportError,
            Error::Io(_) => ResultCode::IoError,
        }
    }

    pub(crate) fn file_format(line: usize, message: impl Into<String>) -> Self {
        Error::FileFormat { line, message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
