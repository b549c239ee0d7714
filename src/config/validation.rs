//! Configuration validation

use super::*;
use crate::error::{HierarchyError, Result};

/// Supported log output formats
const LOG_FORMATS: &[&str] = &["json", "pretty", "compact"];

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_hierarchy_config(&config.hierarchy)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validate hierarchy configuration
fn validate_hierarchy_config(config: &HierarchyConfig) -> Result<()> {
    let names = &config.attributes;

    for (label, value) in [
        ("Node type attribute name", &names.node_type),
        ("Node type attribute value", &names.node_type_value),
        ("Level attribute name", &names.level),
        ("UID attribute name", &names.uid),
    ] {
        if value.trim().is_empty() {
            return Err(HierarchyError::Config(format!("{} cannot be empty", label)));
        }
    }

    if names.node_type == names.level || names.node_type == names.uid || names.level == names.uid {
        return Err(HierarchyError::Config(
            "Node type, level and UID attribute names must be distinct".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        return Err(HierarchyError::Config(
            "Log level cannot be empty".to_string()
        ));
    }

    if !LOG_FORMATS.contains(&config.format.as_str()) {
        return Err(HierarchyError::Config(
            format!("Unsupported log format '{}' (expected one of {:?})", config.format, LOG_FORMATS)
        ));
    }

    Ok(())
}
