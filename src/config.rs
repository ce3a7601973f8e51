// src/config.rs

//! Configuration loading utilities.
//!
//! The effective configuration is the file (or defaults when it is
//! missing or broken), then the environment override, then validation.

use std::path::Path;

use crate::error::Result;
use crate::models::{BASE_URL_ENV, Config};

/// Load, override from the environment and validate.
pub fn load_config(path: &Path) -> Result<Config> {
    resolve(path, std::env::var(BASE_URL_ENV).ok())
}

fn resolve(path: &Path, base_url: Option<String>) -> Result<Config> {
    let mut config = if path.exists() {
        Config::load_or_default(path)
    } else {
        log::debug!("No config file at {:?}, using defaults", path);
        Config::default()
    };
    config.apply_base_url(base_url);
    config.validate()?;
    Ok(config)
}
