//! Patient hierarchy: Patient / Study / Series / Subseries nodes tagged on
//! generic scene hierarchy nodes

pub mod index;
pub mod level;
pub mod models;

pub use index::HierarchyIndex;
pub use level::HierarchyLevel;
pub use models::{HierarchyStats, SeriesPlacement};
