use {
    crate::traits::LedgerStore,
    async_trait::async_trait,
    rocksdb::{
        BlockBasedOptions, Cache, ColumnFamilyDescriptor, DBCompressionType, Options, DB,
    },
    serde::{de::DeserializeOwned, Serialize},
    solana_sdk::pubkey::Pubkey,
    stakevault_common::{
        types::{GlobalConfig, UserStakeInfo, VaultRecord},
        utils::{derive_custody_address, derive_stake_address},
        Error, Result,
    },
    std::{path::PathBuf, sync::Arc},
    tracing::debug,
};

pub const CF_VAULTS: &str = "vaults";
pub const CF_STAKES: &str = "stakes";
pub const CF_METADATA: &str = "metadata";

const GLOBAL_CONFIG_KEY: &[u8] = b"global_config";

#[derive(Clone, Debug)]
pub struct RocksStoreConfig {
    pub path: PathBuf,
    pub max_open_files: i32,
    pub cache_capacity: usize,
}

/// Durable ledger store backed by RocksDB. Records are bincode-serialized
/// into one column family per record type.
#[derive(Clone)]
pub struct RocksLedgerStore {
    db: Arc<DB>,
}

impl RocksLedgerStore {
    pub fn open(config: RocksStoreConfig) -> Result<Self> {
        let path = config.path.clone();

        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }

        let mut options = Options::default();
        options.create_if_missing(true);
        options.create_missing_column_families(true);
        options.set_max_open_files(config.max_open_files);
        options.set_compression_type(DBCompressionType::Lz4);
        options.set_bottommost_compression_type(DBCompressionType::Zstd);
        options.increase_parallelism(num_cpus::get() as i32);

        let mut block_opts = BlockBasedOptions::default();
        let cache = Cache::new_lru_cache(config.cache_capacity);
        block_opts.set_block_cache(&cache);
        block_opts.set_cache_index_and_filter_blocks(true);
        options.set_block_based_table_factory(&block_opts);

        let cf_opts = options.clone();
        let cf_vaults = ColumnFamilyDescriptor::new(CF_VAULTS, cf_opts.clone());
        let cf_stakes = ColumnFamilyDescriptor::new(CF_STAKES, cf_opts.clone());
        let cf_metadata = ColumnFamilyDescriptor::new(CF_METADATA, cf_opts);

        debug!(path = %path.display(), "opening ledger store");

        let db = DB::open_cf_descriptors(&options, &path, vec![cf_vaults, cf_stakes, cf_metadata])
            .map_err(|e| Error::Storage(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("Column family '{name}' not found")))
    }

    fn get_record<T: DeserializeOwned>(&self, cf: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf)?;
        match self.db.get_cf(cf, key).map_err(|e| Error::Storage(e.to_string()))? {
            Some(data) => {
                let record =
                    bincode::deserialize(&data).map_err(|e| Error::Serialization(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn put_record<T: Serialize>(&self, cf: &str, key: &[u8], record: &T) -> Result<()> {
        let cf = self.cf(cf)?;
        let data = bincode::serialize(record).map_err(|e| Error::Serialization(e.to_string()))?;
        self.db
            .put_cf(cf, key, data)
            .map_err(|e| Error::Storage(e.to_string()))
    }
}

#[async_trait]
impl LedgerStore for RocksLedgerStore {
    async fn create_vault(&self, vault: VaultRecord) -> Result<()> {
        let key = derive_custody_address(&vault.asset_mint);
        if self
            .get_record::<VaultRecord>(CF_VAULTS, key.as_ref())?
            .is_some()
        {
            return Err(Error::AlreadyExists(format!(
                "vault for mint {}",
                vault.asset_mint
            )));
        }
        self.put_record(CF_VAULTS, key.as_ref(), &vault)
    }

    async fn vault(&self, asset_mint: &Pubkey) -> Result<Option<VaultRecord>> {
        let key = derive_custody_address(asset_mint);
        self.get_record(CF_VAULTS, key.as_ref())
    }

    async fn put_vault(&self, vault: &VaultRecord) -> Result<()> {
        let key = derive_custody_address(&vault.asset_mint);
        self.put_record(CF_VAULTS, key.as_ref(), vault)
    }

    async fn stake_info(&self, owner: &Pubkey) -> Result<Option<UserStakeInfo>> {
        let key = derive_stake_address(owner);
        self.get_record(CF_STAKES, key.as_ref())
    }

    async fn put_stake_info(&self, info: &UserStakeInfo) -> Result<()> {
        let key = derive_stake_address(&info.owner);
        self.put_record(CF_STAKES, key.as_ref(), info)
    }

    async fn global_config(&self) -> Result<Option<GlobalConfig>> {
        self.get_record(CF_METADATA, GLOBAL_CONFIG_KEY)
    }

    async fn create_global_config(&self, config: GlobalConfig) -> Result<()> {
        if self
            .get_record::<GlobalConfig>(CF_METADATA, GLOBAL_CONFIG_KEY)?
            .is_some()
        {
            return Err(Error::AlreadyExists("global config".into()));
        }
        self.put_record(CF_METADATA, GLOBAL_CONFIG_KEY, &config)
    }

    async fn put_global_config(&self, config: &GlobalConfig) -> Result<()> {
        self.put_record(CF_METADATA, GLOBAL_CONFIG_KEY, config)
    }

    async fn close(&self) -> Result<()> {
        // RocksDB flushes and releases on drop
        Ok(())
    }
}
