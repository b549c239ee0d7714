//! Error types for the patient hierarchy logic

use crate::scene::NodeId;
use thiserror::Error;

/// Result type alias for patient hierarchy operations
pub type Result<T> = std::result::Result<T, HierarchyError>;

/// Main error type for the patient hierarchy logic
#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{role} hierarchy node with UID '{uid}' cannot be found")]
    NotFound { role: NodeRole, uid: String },

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised by node storage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
}

/// The role a UID plays in a series insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Patient,
    Study,
    Series,
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeRole::Patient => "Patient",
            NodeRole::Study => "Study",
            NodeRole::Series => "Series",
        };
        f.write_str(name)
    }
}

impl HierarchyError {
    /// Whether this error means a lookup came back empty
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            HierarchyError::NotFound { .. } | HierarchyError::Scene(SceneError::NodeNotFound(_))
        )
    }
}

impl From<config::ConfigError> for HierarchyError {
    fn from(err: config::ConfigError) -> Self {
        HierarchyError::Config(err.to_string())
    }
}
