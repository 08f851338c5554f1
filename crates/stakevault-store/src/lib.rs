//! This is the stakevault-store crate - durable storage for the staking ledger

pub mod factory;
pub mod memory_store;
pub mod rocks_store;
pub mod traits;

pub use factory::VaultStoreFactory;
pub use memory_store::MemoryLedgerStore;
pub use rocks_store::{RocksLedgerStore, RocksStoreConfig};
pub use traits::{LedgerStore, LedgerStoreFactory};
