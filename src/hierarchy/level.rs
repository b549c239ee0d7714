//! Hierarchy level tags

use crate::error::HierarchyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Depth of a node in the clinical hierarchy (Patient is shallowest)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HierarchyLevel {
    Patient,
    Study,
    Series,
    Subseries,
    /// Any other non-empty level tag
    Custom(String),
}

impl HierarchyLevel {
    pub const PATIENT: &'static str = "Patient";
    pub const STUDY: &'static str = "Study";
    pub const SERIES: &'static str = "Series";
    pub const SUBSERIES: &'static str = "Subseries";

    /// Parse a level tag, `None` for an empty or blank string
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() {
            return None;
        }

        let level = [
            HierarchyLevel::Patient,
            HierarchyLevel::Study,
            HierarchyLevel::Series,
            HierarchyLevel::Subseries,
        ]
        .into_iter()
        .find(|level| level.as_str().eq_ignore_ascii_case(tag))
        .unwrap_or_else(|| HierarchyLevel::Custom(tag.to_string()));

        Some(level)
    }

    pub fn as_str(&self) -> &str {
        match self {
            HierarchyLevel::Patient => Self::PATIENT,
            HierarchyLevel::Study => Self::STUDY,
            HierarchyLevel::Series => Self::SERIES,
            HierarchyLevel::Subseries => Self::SUBSERIES,
            HierarchyLevel::Custom(tag) => tag,
        }
    }

    /// Position in the canonical ordering, `None` for custom levels
    pub fn depth(&self) -> Option<usize> {
        match self {
            HierarchyLevel::Patient => Some(0),
            HierarchyLevel::Study => Some(1),
            HierarchyLevel::Series => Some(2),
            HierarchyLevel::Subseries => Some(3),
            HierarchyLevel::Custom(_) => None,
        }
    }

    /// Case-insensitive match against a raw tag
    pub fn matches(&self, tag: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(tag)
    }
}

impl PartialEq for HierarchyLevel {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other.as_str())
    }
}

impl Eq for HierarchyLevel {}

impl std::hash::Hash for HierarchyLevel {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for HierarchyLevel {
    type Error = HierarchyError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        HierarchyLevel::parse(&tag)
            .ok_or_else(|| HierarchyError::InvalidArgument("hierarchy level cannot be empty".to_string()))
    }
}

impl From<HierarchyLevel> for String {
    fn from(level: HierarchyLevel) -> Self {
        level.as_str().to_string()
    }
}
