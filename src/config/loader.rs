//! Configuration loader with environment variable support

use super::Config;
use crate::error::Result;
use config::{Environment, File, FileFormat};
use std::path::Path;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "PATIENT_HIERARCHY";

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config = config::Config::builder()
        .add_source(File::from(path.as_ref()))
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Load configuration from a TOML file with environment variable overrides
pub fn load_config_with_env<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config = config::Config::builder()
        .add_source(File::from(path.as_ref()))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Load configuration from an in-memory TOML document
pub fn load_config_from_str(toml: &str) -> Result<Config> {
    let config = config::Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?;

    Ok(config.try_deserialize()?)
}
