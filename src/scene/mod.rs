//! Scene node storage
//!
//! The host application owns the scene; the hierarchy logic only borrows it
//! for the duration of a call through [`NodeStore`].

pub mod memory;
pub mod models;

pub use memory::Scene;
pub use models::{NodeClass, NodeId, SceneNode};

/// Trait for scene node storage
pub trait NodeStore {
    /// Get node by ID
    fn node(&self, id: &NodeId) -> Option<&SceneNode>;

    /// Get mutable node by ID
    fn node_mut(&mut self, id: &NodeId) -> Option<&mut SceneNode>;

    /// All nodes of a class, in store order
    fn nodes_by_class(&self, class: &NodeClass) -> Vec<&SceneNode>;

    /// Register a node and return its ID
    fn add_node(&mut self, node: SceneNode) -> NodeId;

    /// Hierarchy node organizing a data node, first match in store order
    fn associated_hierarchy_node(&self, id: &NodeId) -> Option<&SceneNode> {
        self.nodes_by_class(&NodeClass::Hierarchy)
            .into_iter()
            .find(|node| node.associated_node_id.as_ref() == Some(id))
    }
}
