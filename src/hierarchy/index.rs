//! Patient hierarchy membership and traversal

use super::level::HierarchyLevel;
use super::models::{HierarchyStats, SeriesPlacement};
use crate::config::{DuplicateUidPolicy, HierarchyConfig};
use crate::error::{HierarchyError, NodeRole, Result, SceneError};
use crate::scene::{NodeClass, NodeId, NodeStore, SceneNode};
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info, warn};

/// How a scene node relates to the patient hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
enum Classification {
    NotHierarchy,
    MissingLevel,
    Hierarchy(HierarchyLevel),
}

/// Nodes matched per role during a series insertion scan
#[derive(Debug, Default)]
struct RoleMatches {
    patient: Option<NodeId>,
    study: Option<NodeId>,
    series: Option<NodeId>,
}

/// Patient hierarchy logic over a borrowed scene
///
/// The index keeps no state besides its configuration: every operation takes
/// the store explicitly and scans it linearly.
#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    config: HierarchyConfig,
}

impl HierarchyIndex {
    pub fn new(config: HierarchyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    fn classify(&self, node: &SceneNode) -> Classification {
        if node.class != NodeClass::Hierarchy {
            return Classification::NotHierarchy;
        }

        let names = &self.config.attributes;
        let marked = node
            .attribute(&names.node_type)
            .is_some_and(|value| value.eq_ignore_ascii_case(&names.node_type_value));
        if !marked {
            return Classification::NotHierarchy;
        }

        match node.attribute(&names.level).and_then(HierarchyLevel::parse) {
            Some(level) => Classification::Hierarchy(level),
            None => Classification::MissingLevel,
        }
    }

    /// Whether a scene node is a patient hierarchy node
    ///
    /// Requires the hierarchy node class, the node type marker and a
    /// non-empty level. A marked node without a level is reported and rejected.
    pub fn is_hierarchy_node(&self, node: &SceneNode) -> bool {
        match self.classify(node) {
            Classification::Hierarchy(_) => true,
            Classification::MissingLevel => {
                warn!(
                    "Patient hierarchy node '{}' ({}) has no DICOM level, skipping",
                    node.name, node.id
                );
                false
            }
            Classification::NotHierarchy => false,
        }
    }

    /// Level of a patient hierarchy node
    pub fn level_of(&self, node: &SceneNode) -> Option<HierarchyLevel> {
        match self.classify(node) {
            Classification::Hierarchy(level) => Some(level),
            _ => None,
        }
    }

    /// UID attribute of a node, `None` when absent or empty
    pub fn uid_of<'n>(&self, node: &'n SceneNode) -> Option<&'n str> {
        node.attribute(&self.config.attributes.uid)
            .filter(|uid| !uid.is_empty())
    }

    /// All patient hierarchy nodes in store order
    pub fn hierarchy_nodes<'s, S>(&self, store: &'s S) -> Vec<&'s SceneNode>
    where
        S: NodeStore + ?Sized,
    {
        store
            .nodes_by_class(&NodeClass::Hierarchy)
            .into_iter()
            .filter(|node| self.is_hierarchy_node(node))
            .collect()
    }

    /// Find the first patient hierarchy node whose UID matches, ignoring case
    pub fn find_by_uid<'s, S>(&self, store: &'s S, uid: &str) -> Option<&'s SceneNode>
    where
        S: NodeStore + ?Sized,
    {
        if uid.is_empty() {
            return None;
        }

        let found = self
            .hierarchy_nodes(store)
            .into_iter()
            .find(|node| self.uid_of(node).is_some_and(|node_uid| node_uid.eq_ignore_ascii_case(uid)));

        debug!("Lookup of UID '{}': {}", uid, if found.is_some() { "found" } else { "not found" });
        found
    }

    /// Attach an existing series node under its patient and study
    ///
    /// Missing patient and study nodes are created. The series node itself
    /// must already be in the store; it is only re-parented.
    pub fn insert_series<S>(
        &self,
        store: &mut S,
        patient_uid: &str,
        study_uid: &str,
        series_uid: &str,
    ) -> Result<SeriesPlacement>
    where
        S: NodeStore + ?Sized,
    {
        for (role, uid) in [
            (NodeRole::Patient, patient_uid),
            (NodeRole::Study, study_uid),
            (NodeRole::Series, series_uid),
        ] {
            if uid.is_empty() {
                return Err(HierarchyError::InvalidArgument(format!("{} UID is empty", role)));
            }
        }

        let matches = self.match_roles(&*store, patient_uid, study_uid, series_uid);

        let Some(series_id) = matches.series else {
            warn!("Series hierarchy node with UID '{}' cannot be found", series_uid);
            return Err(HierarchyError::NotFound {
                role: NodeRole::Series,
                uid: series_uid.to_string(),
            });
        };

        let (patient_id, patient_created) = match matches.patient {
            Some(id) => (id, false),
            None => {
                let node = self.new_hierarchy_node(HierarchyLevel::Patient, patient_uid, None);
                (store.add_node(node), true)
            }
        };

        let (study_id, study_created) = match matches.study {
            Some(id) => (id, false),
            None => {
                let node = self.new_hierarchy_node(HierarchyLevel::Study, study_uid, Some(patient_id));
                (store.add_node(node), true)
            }
        };

        let series = store
            .node_mut(&series_id)
            .ok_or(SceneError::NodeNotFound(series_id))?;
        series.parent_id = Some(study_id);

        debug!("Series '{}' placed under study '{}'", series_uid, study_uid);

        Ok(SeriesPlacement {
            patient_id,
            study_id,
            series_id,
            patient_created,
            study_created,
        })
    }

    fn match_roles<S>(&self, store: &S, patient_uid: &str, study_uid: &str, series_uid: &str) -> RoleMatches
    where
        S: NodeStore + ?Sized,
    {
        let mut matches = RoleMatches::default();

        for node in self.hierarchy_nodes(store) {
            let Some(uid) = self.uid_of(node) else {
                warn!("Patient hierarchy node '{}' ({}) has no UID, skipping", node.name, node.id);
                continue;
            };

            let (role, slot) = if uid.eq_ignore_ascii_case(patient_uid) {
                (NodeRole::Patient, &mut matches.patient)
            } else if uid.eq_ignore_ascii_case(study_uid) {
                (NodeRole::Study, &mut matches.study)
            } else if uid.eq_ignore_ascii_case(series_uid) {
                (NodeRole::Series, &mut matches.series)
            } else {
                continue;
            };

            match *slot {
                Some(existing) => {
                    warn!(
                        "Duplicate {} UID '{}': nodes {} and {} ({:?} kept)",
                        role, uid, existing, node.id, self.config.duplicate_uids
                    );
                    if self.config.duplicate_uids == DuplicateUidPolicy::LastMatch {
                        *slot = Some(node.id);
                    }
                }
                None => *slot = Some(node.id),
            }
        }

        matches
    }

    fn new_hierarchy_node(&self, level: HierarchyLevel, uid: &str, parent: Option<NodeId>) -> SceneNode {
        let names = &self.config.attributes;
        let mut node = SceneNode::hierarchy(uid)
            .with_attribute(names.node_type.as_str(), names.node_type_value.as_str())
            .with_attribute(names.level.as_str(), level.as_str())
            .with_attribute(names.uid.as_str(), uid);
        node.allow_multiple_children = true;
        node.hide_from_editors = false;
        node.parent_id = parent;

        info!("Creating {} hierarchy node for UID '{}'", level, uid);
        node
    }

    /// Whether two scene nodes belong to the same clinical entity
    ///
    /// Without a level the resolved hierarchy nodes must carry the same UID.
    /// With a level both are first walked up to their nearest ancestor tagged
    /// with that level.
    pub fn same_branch<S>(
        &self,
        store: &S,
        id1: &NodeId,
        id2: &NodeId,
        lowest_common_level: Option<&str>,
    ) -> bool
    where
        S: NodeStore + ?Sized,
    {
        let level = match lowest_common_level.map(str::trim) {
            Some("") => {
                error!("Invalid lowest common level: empty level name");
                return false;
            }
            other => other,
        };

        let (Some(node1), Some(node2)) = (
            self.resolve_for_comparison(store, id1, level.is_some()),
            self.resolve_for_comparison(store, id2, level.is_some()),
        ) else {
            return false;
        };

        let (node1, node2) = match level {
            Some(level) => {
                let ancestor1 = self.walk_to_level(store, node1, level, id1);
                let ancestor2 = self.walk_to_level(store, node2, level, id2);
                match (ancestor1, ancestor2) {
                    (Some(a), Some(b)) => (a, b),
                    _ => return false,
                }
            }
            None => (node1, node2),
        };

        match (self.uid_of(node1), self.uid_of(node2)) {
            (Some(uid1), Some(uid2)) => uid1 == uid2,
            _ => {
                error!(
                    "Found hierarchy node without UID while comparing {} and {}",
                    node1.id, node2.id
                );
                false
            }
        }
    }

    fn resolve_for_comparison<'s, S>(&self, store: &'s S, id: &NodeId, level_requested: bool) -> Option<&'s SceneNode>
    where
        S: NodeStore + ?Sized,
    {
        match store.node(id) {
            Some(node) if node.class.is_hierarchy() => {
                if level_requested && !self.config.allow_container_comparison && self.is_hierarchy_node(node) {
                    debug!("Node {} is a hierarchy container, refusing direct comparison", id);
                    return None;
                }
                Some(node)
            }
            _ => store.associated_hierarchy_node(id),
        }
    }

    fn resolve<'s, S>(&self, store: &'s S, id: &NodeId) -> Option<&'s SceneNode>
    where
        S: NodeStore + ?Sized,
    {
        match store.node(id) {
            Some(node) if node.class.is_hierarchy() => Some(node),
            _ => store.associated_hierarchy_node(id),
        }
    }

    /// Nearest strict ancestor of `start` tagged with `level`
    fn walk_to_level<'s, S>(&self, store: &'s S, start: &'s SceneNode, level: &str, origin: &NodeId) -> Option<&'s SceneNode>
    where
        S: NodeStore + ?Sized,
    {
        let mut current = start.parent_id.and_then(|parent| store.node(&parent));
        let mut visited = HashSet::new();

        while let Some(node) = current {
            if !visited.insert(node.id) {
                warn!("Cycle in hierarchy above node {}", origin);
                break;
            }
            match self.level_of(node) {
                Some(node_level) if node_level.matches(level) => return Some(node),
                Some(_) => current = node.parent_id.and_then(|parent| store.node(&parent)),
                None => break,
            }
        }

        warn!(
            "Patient hierarchy node (ID='{}') has no ancestor with DICOM level '{}'",
            origin, level
        );
        None
    }

    /// Nearest ancestor of a node tagged with `level`
    pub fn ancestor_at_level<'s, S>(&self, store: &'s S, id: &NodeId, level: &str) -> Option<&'s SceneNode>
    where
        S: NodeStore + ?Sized,
    {
        let level = level.trim();
        if level.is_empty() {
            return None;
        }
        let start = self.resolve(store, id)?;
        self.walk_to_level(store, start, level, id)
    }

    /// Patient hierarchy nodes parented to `id`, in store order
    pub fn children<'s, S>(&self, store: &'s S, id: &NodeId) -> Vec<&'s SceneNode>
    where
        S: NodeStore + ?Sized,
    {
        self.hierarchy_nodes(store)
            .into_iter()
            .filter(|node| node.parent_id.as_ref() == Some(id))
            .collect()
    }

    /// Chain of patient hierarchy nodes from `id` up to its root, nearest first
    pub fn branch_path<'s, S>(&self, store: &'s S, id: &NodeId) -> Vec<&'s SceneNode>
    where
        S: NodeStore + ?Sized,
    {
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current = self.resolve(store, id);

        while let Some(node) = current {
            if !self.is_hierarchy_node(node) || !visited.insert(node.id) {
                break;
            }
            path.push(node);
            current = node.parent_id.and_then(|parent| store.node(&parent));
        }

        path
    }

    /// Summarize the patient hierarchy held by a store
    pub fn stats<S>(&self, store: &S) -> HierarchyStats
    where
        S: NodeStore + ?Sized,
    {
        let mut stats = HierarchyStats::default();
        let mut uid_counts: HashMap<String, usize> = HashMap::new();

        for node in store.nodes_by_class(&NodeClass::Hierarchy) {
            let level = match self.classify(node) {
                Classification::Hierarchy(level) => level,
                Classification::MissingLevel => {
                    stats.invalid_nodes += 1;
                    continue;
                }
                Classification::NotHierarchy => continue,
            };

            stats.total_nodes += 1;
            *stats.nodes_per_level.entry(level).or_insert(0) += 1;

            match self.uid_of(node) {
                Some(uid) => *uid_counts.entry(uid.to_ascii_lowercase()).or_insert(0) += 1,
                None => stats.missing_uid += 1,
            }

            let has_hierarchy_parent = node
                .parent_id
                .and_then(|parent| store.node(&parent))
                .is_some_and(|parent| matches!(self.classify(parent), Classification::Hierarchy(_)));
            if !has_hierarchy_parent {
                stats.roots += 1;
            }
        }

        stats.duplicate_uids = uid_counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(uid, _)| uid)
            .collect();
        stats.duplicate_uids.sort();

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    fn index() -> HierarchyIndex {
        HierarchyIndex::default()
    }

    fn ph_node(level: &str, uid: &str) -> SceneNode {
        SceneNode::hierarchy(uid)
            .with_attribute("HierarchyType", "PatientHierarchy")
            .with_attribute("PatientHierarchy.DicomLevel", level)
            .with_attribute("PatientHierarchy.DicomUid", uid)
    }

    #[test]
    fn test_is_hierarchy_node_requires_all_three() {
        let index = index();

        assert!(index.is_hierarchy_node(&ph_node("Series", "S1")));

        let no_level = SceneNode::hierarchy("x").with_attribute("HierarchyType", "PatientHierarchy");
        assert!(!index.is_hierarchy_node(&no_level));

        let empty_level = no_level.clone().with_attribute("PatientHierarchy.DicomLevel", "");
        assert!(!index.is_hierarchy_node(&empty_level));

        let no_marker = SceneNode::hierarchy("x").with_attribute("PatientHierarchy.DicomLevel", "Study");
        assert!(!index.is_hierarchy_node(&no_marker));

        let wrong_marker = no_marker.clone().with_attribute("HierarchyType", "ModelHierarchy");
        assert!(!index.is_hierarchy_node(&wrong_marker));

        let data = SceneNode::data("x", "Volume")
            .with_attribute("HierarchyType", "PatientHierarchy")
            .with_attribute("PatientHierarchy.DicomLevel", "Series");
        assert!(!index.is_hierarchy_node(&data));
    }

    #[test]
    fn test_marker_value_is_case_insensitive() {
        let node = SceneNode::hierarchy("x")
            .with_attribute("HierarchyType", "patienthierarchy")
            .with_attribute("PatientHierarchy.DicomLevel", "Study");
        assert!(index().is_hierarchy_node(&node));
    }

    #[test]
    fn test_find_by_uid_first_match_wins() {
        let mut scene = Scene::new();
        let first = scene.add_node(ph_node("Series", "DUP"));
        scene.add_node(ph_node("Series", "dup"));

        assert_eq!(index().find_by_uid(&scene, "Dup").map(|node| node.id), Some(first));
        assert!(index().find_by_uid(&scene, "").is_none());
    }

    #[test]
    fn test_insert_series_empty_uid_is_invalid() {
        let mut scene = Scene::new();
        scene.add_node(ph_node("Series", "S1"));

        for (patient, study, series) in [("", "ST1", "S1"), ("P1", "", "S1"), ("P1", "ST1", "")] {
            let result = index().insert_series(&mut scene, patient, study, series);
            assert!(matches!(result, Err(HierarchyError::InvalidArgument(_))));
            assert_eq!(scene.len(), 1);
        }
        assert_eq!(scene.iter().next().unwrap().parent_id, None);
    }

    #[test]
    fn test_insert_series_duplicate_policy() {
        let mut scene = Scene::new();
        let first = scene.add_node(ph_node("Series", "S1"));
        let last = scene.add_node(ph_node("Series", "S1"));

        let placement = index().insert_series(&mut scene, "P1", "ST1", "S1").unwrap();
        assert_eq!(placement.series_id, first);

        let mut config = HierarchyConfig::default();
        config.duplicate_uids = DuplicateUidPolicy::LastMatch;
        let placement = HierarchyIndex::new(config)
            .insert_series(&mut scene, "P1", "ST1", "S1")
            .unwrap();
        assert_eq!(placement.series_id, last);
        assert_eq!(placement.created_count(), 0);
    }

    #[test]
    fn test_insert_series_skips_nodes_without_uid() {
        let mut scene = Scene::new();
        scene.add_node(
            SceneNode::hierarchy("broken")
                .with_attribute("HierarchyType", "PatientHierarchy")
                .with_attribute("PatientHierarchy.DicomLevel", "Patient"),
        );
        scene.add_node(ph_node("Series", "S1"));

        let placement = index().insert_series(&mut scene, "P1", "ST1", "S1").unwrap();
        assert!(placement.patient_created);
        assert!(placement.study_created);
    }

    #[test]
    fn test_created_nodes_flags() {
        let mut scene = Scene::new();
        scene.add_node(ph_node("Series", "S1"));

        let placement = index().insert_series(&mut scene, "P1", "ST1", "S1").unwrap();
        let patient = scene.node(&placement.patient_id).unwrap();
        assert!(patient.allow_multiple_children);
        assert!(!patient.hide_from_editors);
        assert_eq!(index().level_of(patient), Some(HierarchyLevel::Patient));
        assert_eq!(patient.parent_id, None);
    }

    #[test]
    fn test_empty_level_is_rejected() {
        let mut scene = Scene::new();
        let a = scene.add_node(SceneNode::data("a", "Volume"));
        scene.add_node(ph_node("Series", "S1").with_associated_node(a));

        assert!(!index().same_branch(&scene, &a, &a, Some("  ")));
        assert!(index().same_branch(&scene, &a, &a, None));
    }

    #[test]
    fn test_walk_stops_on_cycle() {
        let mut scene = Scene::new();
        let a = scene.add_node(ph_node("Series", "A"));
        let b = scene.add_node(ph_node("Study", "B").with_parent(a));
        scene.set_parent(&a, Some(b)).unwrap();

        assert!(index().ancestor_at_level(&scene, &a, "Patient").is_none());
        assert_eq!(index().branch_path(&scene, &a).len(), 2);
    }

    #[test]
    fn test_stats_counts() {
        let mut scene = Scene::new();
        let patient = scene.add_node(ph_node("Patient", "P1"));
        scene.add_node(ph_node("Study", "ST1").with_parent(patient));
        scene.add_node(ph_node("Study", "st1").with_parent(patient));
        scene.add_node(SceneNode::hierarchy("bad").with_attribute("HierarchyType", "PatientHierarchy"));
        scene.add_node(SceneNode::data("ct", "Volume"));

        let stats = index().stats(&scene);
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.count(&HierarchyLevel::Study), 2);
        assert_eq!(stats.count(&HierarchyLevel::Series), 0);
        assert_eq!(stats.roots, 1);
        assert_eq!(stats.invalid_nodes, 1);
        assert_eq!(stats.missing_uid, 0);
        assert_eq!(stats.duplicate_uids, vec!["st1".to_string()]);
    }

    #[test]
    fn test_stats_duplicates_follow_lookup_case_folding() {
        let mut scene = Scene::new();
        let upper = scene.add_node(ph_node("Patient", "\u{c4}1"));
        scene.add_node(ph_node("Patient", "\u{e4}1"));

        // Only ASCII letters fold, so these are two distinct UIDs
        let stats = index().stats(&scene);
        assert!(stats.duplicate_uids.is_empty());
        assert_eq!(index().find_by_uid(&scene, "\u{c4}1").map(|node| node.id), Some(upper));
    }

    #[test]
    fn test_walk_never_matches_the_start_node() {
        let mut scene = Scene::new();
        let patient = scene.add_node(ph_node("Patient", "P1"));
        let series = scene.add_node(ph_node("Series", "S1").with_parent(patient));

        assert!(index().ancestor_at_level(&scene, &series, "Series").is_none());
        assert!(index().ancestor_at_level(&scene, &patient, "Patient").is_none());
        assert_eq!(
            index().ancestor_at_level(&scene, &series, "Patient").map(|node| node.id),
            Some(patient)
        );
    }
}
