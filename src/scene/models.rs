//! Data models for scene nodes

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Node category as seen by the scene
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "kind")]
pub enum NodeClass {
    /// Generic hierarchy node (may or may not be a patient hierarchy node)
    Hierarchy,
    /// Any other scene node: volumes, models, plans...
    Data(String),
}

impl NodeClass {
    pub fn is_hierarchy(&self) -> bool {
        matches!(self, NodeClass::Hierarchy)
    }
}

/// A node held by the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    /// Unique identifier
    pub id: NodeId,

    /// Display name
    pub name: String,

    /// Node category
    pub class: NodeClass,

    /// Parent node, `None` for roots
    pub parent_id: Option<NodeId>,

    /// Data node organized by this hierarchy node
    pub associated_node_id: Option<NodeId>,

    /// Whether several children may attach
    pub allow_multiple_children: bool,

    /// Whether editors should skip this node
    pub hide_from_editors: bool,

    /// Free-form attributes
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
}

impl SceneNode {
    /// Create a generic hierarchy node with no attributes
    pub fn hierarchy(name: impl Into<String>) -> Self {
        Self::with_class(name, NodeClass::Hierarchy)
    }

    /// Create a data node of the given kind
    pub fn data(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::with_class(name, NodeClass::Data(kind.into()))
    }

    fn with_class(name: impl Into<String>, class: NodeClass) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            class,
            parent_id: None,
            associated_node_id: None,
            allow_multiple_children: false,
            hide_from_editors: true,
            attributes: IndexMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    pub fn with_associated_node(mut self, node: NodeId) -> Self {
        self.associated_node_id = Some(node);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}
