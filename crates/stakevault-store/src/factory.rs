use {
    crate::{
        memory_store::MemoryLedgerStore,
        rocks_store::{RocksLedgerStore, RocksStoreConfig},
        traits::{LedgerStore, LedgerStoreFactory},
    },
    async_trait::async_trait,
    stakevault_common::{
        config::{StoreBackend, StoreSettings},
        Result,
    },
    std::sync::Arc,
};

/// Factory for creating ledger store instances based on configuration
pub struct VaultStoreFactory {
    settings: StoreSettings,
}

impl VaultStoreFactory {
    pub fn new(settings: StoreSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl LedgerStoreFactory for VaultStoreFactory {
    async fn create_store(&self) -> Result<Arc<dyn LedgerStore>> {
        match self.settings.backend {
            StoreBackend::Rocksdb => {
                let store = RocksLedgerStore::open(RocksStoreConfig {
                    path: self.settings.db_path.clone(),
                    max_open_files: self.settings.max_open_files,
                    cache_capacity: self.settings.cache_capacity,
                })?;
                Ok(Arc::new(store))
            }
            StoreBackend::Memory => Ok(Arc::new(MemoryLedgerStore::new())),
        }
    }
}
