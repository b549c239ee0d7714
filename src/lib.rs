//! Patient Hierarchy - membership and traversal logic for DICOM-derived scene nodes
//!
//! Scene nodes imported from DICOM are organized under Patient, Study, Series
//! and Subseries hierarchy nodes. This library classifies those nodes, looks
//! them up by UID, links imported series under their patient and study, and
//! decides whether two scene nodes belong to the same branch of the tree.
//!
//! ## Quick Start
//!
//! ```rust
//! use patient_hierarchy::prelude::*;
//!
//! let index = HierarchyIndex::new(Config::default_config().hierarchy);
//! let mut scene = Scene::new();
//!
//! let names = &index.config().attributes;
//! scene.add_node(
//!     SceneNode::hierarchy("CT series")
//!         .with_attribute(names.node_type.as_str(), names.node_type_value.as_str())
//!         .with_attribute(names.level.as_str(), "Series")
//!         .with_attribute(names.uid.as_str(), "1.2.840.1"),
//! );
//!
//! let placement = index.insert_series(&mut scene, "PAT-1", "1.2.840", "1.2.840.1")?;
//! assert!(placement.patient_created && placement.study_created);
//! assert!(index.find_by_uid(&scene, "pat-1").is_some());
//! # Ok::<(), patient_hierarchy::HierarchyError>(())
//! ```

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod observability;
pub mod scene;

pub use config::Config;
pub use error::{HierarchyError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, DuplicateUidPolicy, HierarchyConfig};
    pub use crate::error::{HierarchyError, NodeRole, Result};
    pub use crate::hierarchy::{HierarchyIndex, HierarchyLevel, HierarchyStats, SeriesPlacement};
    pub use crate::scene::{NodeClass, NodeId, NodeStore, Scene, SceneNode};
}
