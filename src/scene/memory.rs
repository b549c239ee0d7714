//! In-memory scene backed by an insertion-ordered map

use super::{NodeClass, NodeId, NodeStore, SceneNode};
use crate::error::SceneError;
use indexmap::IndexMap;
use tracing::debug;

/// In-memory node store
#[derive(Debug, Default, Clone)]
pub struct Scene {
    nodes: IndexMap<NodeId, SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    /// Reassign a node's parent
    pub fn set_parent(&mut self, id: &NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or(SceneError::NodeNotFound(*id))?;
        node.parent_id = parent;
        Ok(())
    }
}

impl NodeStore for Scene {
    fn node(&self, id: &NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    fn node_mut(&mut self, id: &NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    fn nodes_by_class(&self, class: &NodeClass) -> Vec<&SceneNode> {
        self.nodes.values().filter(|node| &node.class == class).collect()
    }

    fn add_node(&mut self, node: SceneNode) -> NodeId {
        let id = node.id;
        debug!("Adding node '{}' ({})", node.name, id);
        self.nodes.insert(id, node);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_by_class_keeps_insertion_order() {
        let mut scene = Scene::new();
        let a = scene.add_node(SceneNode::hierarchy("a"));
        scene.add_node(SceneNode::data("ct", "Volume"));
        let b = scene.add_node(SceneNode::hierarchy("b"));

        let ids: Vec<NodeId> = scene
            .nodes_by_class(&NodeClass::Hierarchy)
            .iter()
            .map(|node| node.id)
            .collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_associated_hierarchy_node() {
        let mut scene = Scene::new();
        let volume = scene.add_node(SceneNode::data("ct", "Volume"));
        let series = scene.add_node(SceneNode::hierarchy("series").with_associated_node(volume));

        let found = scene.associated_hierarchy_node(&volume).map(|node| node.id);
        assert_eq!(found, Some(series));
        assert!(scene.associated_hierarchy_node(&series).is_none());
    }

    #[test]
    fn test_set_parent_unknown_node() {
        let mut scene = Scene::new();
        let missing = NodeId::new();
        assert_eq!(
            scene.set_parent(&missing, None),
            Err(SceneError::NodeNotFound(missing))
        );
    }
}
