//! Configuration management for the patient hierarchy logic

use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod loader;
pub mod validation;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Patient hierarchy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Attribute names used to tag hierarchy nodes
    #[serde(default)]
    pub attributes: AttributeNames,

    /// Which node wins when several share a UID during series insertion
    #[serde(default)]
    pub duplicate_uids: DuplicateUidPolicy,

    /// Allow same-branch queries between two hierarchy nodes named directly
    /// when a common level is requested
    #[serde(default)]
    pub allow_container_comparison: bool,
}

/// Attribute names carried by patient hierarchy nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeNames {
    /// Marker attribute name
    #[serde(default = "default_node_type_name")]
    pub node_type: String,

    /// Value the marker attribute must hold
    #[serde(default = "default_node_type_value")]
    pub node_type_value: String,

    /// DICOM level attribute name
    #[serde(default = "default_level_name")]
    pub level: String,

    /// DICOM UID attribute name
    #[serde(default = "default_uid_name")]
    pub uid: String,
}

/// Tie-break for nodes sharing a UID
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateUidPolicy {
    #[default]
    FirstMatch,
    LastMatch,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_node_type_name() -> String { "HierarchyType".to_string() }
fn default_node_type_value() -> String { "PatientHierarchy".to_string() }
fn default_level_name() -> String { "PatientHierarchy.DicomLevel".to_string() }
fn default_uid_name() -> String { "PatientHierarchy.DicomUid".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            node_type: default_node_type_name(),
            node_type_value: default_node_type_value(),
            level: default_level_name(),
            uid: default_uid_name(),
        }
    }
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            attributes: AttributeNames::default(),
            duplicate_uids: DuplicateUidPolicy::default(),
            allow_container_comparison: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let config = loader::load_config(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let config = loader::load_config_with_env(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Validate this configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        validation::validate_config(self)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Self {
            hierarchy: HierarchyConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
