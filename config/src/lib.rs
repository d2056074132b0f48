//! Environment configuration for contrail: load project `.env` into the process
//! environment (existing env wins), then read a typed [`Settings`].

mod dotenv;
mod settings;

use std::path::Path;
use thiserror::Error;

pub use settings::{Settings, SettingsError};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Loads `.env` from `override_dir` (or the current directory) and sets each key
/// that is **not** already present in the process environment.
pub fn load_and_apply(override_dir: Option<&Path>) -> Result<(), LoadError> {
    let map = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;
    for (key, value) in map {
        if std::env::var(&key).is_err() {
            std::env::set_var(&key, value);
        }
    }
    Ok(())
}
