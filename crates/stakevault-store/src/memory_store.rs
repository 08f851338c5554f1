use {
    crate::traits::LedgerStore,
    async_trait::async_trait,
    solana_sdk::pubkey::Pubkey,
    stakevault_common::{
        types::{GlobalConfig, UserStakeInfo, VaultRecord},
        Error, Result,
    },
    std::{
        collections::HashMap,
        sync::RwLock,
    },
};

/// In-memory ledger store used by tests and local tooling. Same semantics
/// as the durable backend, nothing survives the process.
#[derive(Default)]
pub struct MemoryLedgerStore {
    vaults: RwLock<HashMap<Pubkey, VaultRecord>>,
    stakes: RwLock<HashMap<Pubkey, UserStakeInfo>>,
    global: RwLock<Option<GlobalConfig>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error<T>(e: T) -> Error
where
    T: std::fmt::Display,
{
    Error::Storage(format!("Lock error: {e}"))
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn create_vault(&self, vault: VaultRecord) -> Result<()> {
        let mut vaults = self.vaults.write().map_err(lock_error)?;
        if vaults.contains_key(&vault.asset_mint) {
            return Err(Error::AlreadyExists(format!(
                "vault for mint {}",
                vault.asset_mint
            )));
        }
        vaults.insert(vault.asset_mint, vault);
        Ok(())
    }

    async fn vault(&self, asset_mint: &Pubkey) -> Result<Option<VaultRecord>> {
        let vaults = self.vaults.read().map_err(lock_error)?;
        Ok(vaults.get(asset_mint).cloned())
    }

    async fn put_vault(&self, vault: &VaultRecord) -> Result<()> {
        let mut vaults = self.vaults.write().map_err(lock_error)?;
        vaults.insert(vault.asset_mint, vault.clone());
        Ok(())
    }

    async fn stake_info(&self, owner: &Pubkey) -> Result<Option<UserStakeInfo>> {
        let stakes = self.stakes.read().map_err(lock_error)?;
        Ok(stakes.get(owner).cloned())
    }

    async fn put_stake_info(&self, info: &UserStakeInfo) -> Result<()> {
        let mut stakes = self.stakes.write().map_err(lock_error)?;
        stakes.insert(info.owner, info.clone());
        Ok(())
    }

    async fn global_config(&self) -> Result<Option<GlobalConfig>> {
        let global = self.global.read().map_err(lock_error)?;
        Ok(global.clone())
    }

    async fn create_global_config(&self, config: GlobalConfig) -> Result<()> {
        let mut global = self.global.write().map_err(lock_error)?;
        if global.is_some() {
            return Err(Error::AlreadyExists("global config".into()));
        }
        *global = Some(config);
        Ok(())
    }

    async fn put_global_config(&self, config: &GlobalConfig) -> Result<()> {
        let mut global = self.global.write().map_err(lock_error)?;
        *global = Some(config.clone());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
