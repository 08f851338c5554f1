use {
    async_trait::async_trait,
    solana_sdk::pubkey::Pubkey,
    stakevault_common::{
        types::{GlobalConfig, UserStakeInfo, VaultRecord},
        Result,
    },
    std::sync::Arc,
};

/// A trait representing the storage capabilities required by the staking
/// ledger. This abstraction allows for pluggable storage backends.
///
/// Records are keyed deterministically: vaults by the custody address
/// derived from the asset mint, stake records by the key derived from the
/// owner identity, and the control record under a fixed metadata key.
/// Nothing is ever deleted; all mutation is update-in-place.
#[async_trait]
pub trait LedgerStore: Send + Sync + 'static {
    /// Persist a new vault record. Fails with
    /// [`stakevault_common::Error::AlreadyExists`] when a vault for the
    /// same asset mint has already been created.
    async fn create_vault(&self, vault: VaultRecord) -> Result<()>;

    /// Get the vault record for an asset mint
    async fn vault(&self, asset_mint: &Pubkey) -> Result<Option<VaultRecord>>;

    /// Update a vault record in place
    async fn put_vault(&self, vault: &VaultRecord) -> Result<()>;

    /// Get a depositor's stake record
    async fn stake_info(&self, owner: &Pubkey) -> Result<Option<UserStakeInfo>>;

    /// Create or update a depositor's stake record
    async fn put_stake_info(&self, info: &UserStakeInfo) -> Result<()>;

    /// Get the singleton control record
    async fn global_config(&self) -> Result<Option<GlobalConfig>>;

    /// Persist the control record. Fails with
    /// [`stakevault_common::Error::AlreadyExists`] when one exists.
    async fn create_global_config(&self, config: GlobalConfig) -> Result<()>;

    /// Update the control record in place
    async fn put_global_config(&self, config: &GlobalConfig) -> Result<()>;

    /// Close the store (flush any pending writes, release handles)
    async fn close(&self) -> Result<()>;
}

/// Factory trait for creating ledger store instances
#[async_trait]
pub trait LedgerStoreFactory: Send + Sync + 'static {
    /// Create a new store instance with the given configuration
    async fn create_store(&self) -> Result<Arc<dyn LedgerStore>>;
}
