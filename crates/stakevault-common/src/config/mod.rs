//! Configuration types for the stakevault system

mod staking;
mod store;

pub use staking::StakingSettings;
pub use store::{StoreBackend, StoreSettings};

use {
    serde::{Deserialize, Serialize},
    std::{fs, path::{Path, PathBuf}},
};

use crate::errors::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub data_dir: PathBuf,
    pub staking: StakingSettings,
    pub store: StoreSettings,
}

impl LedgerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str::<Self>(&contents)?)
    }
}
