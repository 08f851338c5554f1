use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Rocksdb,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Ledger storage configuration
    pub backend: StoreBackend,
    pub db_path: PathBuf,
    pub max_open_files: i32,
    pub cache_capacity: usize,
}
