mod config;
pub mod database;
mod memory;

pub use config::{Config, LoggingConfig, NotificationsConfig, UiConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Key-value string store backing every state slice.
///
/// Values are opaque strings; the state store owns their encoding.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it if needed.
///
/// `STUDYDESK_DATA_DIR` wins when set. Otherwise `~/.config/studydesk[-dev]/`
/// based on `STUDYDESK_ENV` (set it to `dev` for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("STUDYDESK_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("STUDYDESK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studydesk-dev")
            } else {
                base_dir.join("studydesk")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(StorageError::DataDir)?;
    Ok(dir)
}
