use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::io::store::StoreError;
use crate::model::config::ClientConfig;

pub const CONFIG_FILE: &str = "sharedo.toml";

/// Default config location inside a store directory
pub fn config_path(store_dir: &Path) -> PathBuf {
    store_dir.join(CONFIG_FILE)
}

/// Read the client config. A missing file yields the defaults.
pub fn read_config(path: &Path) -> Result<ClientConfig, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ClientConfig::default()),
        Err(e) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| StoreError::Config {
        path: path.to_path_buf(),
        source: e,
    })
}
