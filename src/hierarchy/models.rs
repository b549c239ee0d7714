//! Data models for hierarchy operations

use super::level::HierarchyLevel;
use crate::scene::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of a successful series insertion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeriesPlacement {
    /// Patient node the study hangs under
    pub patient_id: NodeId,

    /// Study node now parenting the series
    pub study_id: NodeId,

    /// Re-linked series node
    pub series_id: NodeId,

    /// Patient node was created by this call
    pub patient_created: bool,

    /// Study node was created by this call
    pub study_created: bool,
}

impl SeriesPlacement {
    /// Number of nodes added to the scene
    pub fn created_count(&self) -> usize {
        usize::from(self.patient_created) + usize::from(self.study_created)
    }
}

/// Statistics about the hierarchy held by a scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HierarchyStats {
    /// Classified hierarchy nodes
    pub total_nodes: usize,

    /// Classified nodes per level
    pub nodes_per_level: HashMap<HierarchyLevel, usize>,

    /// Classified nodes with no classified parent
    pub roots: usize,

    /// Marked nodes rejected for lacking a level
    pub invalid_nodes: usize,

    /// Classified nodes without a UID
    pub missing_uid: usize,

    /// UIDs (lowercased) shared by more than one node
    pub duplicate_uids: Vec<String>,
}

impl HierarchyStats {
    pub fn count(&self, level: &HierarchyLevel) -> usize {
        self.nodes_per_level.get(level).copied().unwrap_or(0)
    }
}
