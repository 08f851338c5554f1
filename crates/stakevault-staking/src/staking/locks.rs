use {
    solana_sdk::pubkey::Pubkey,
    std::{collections::HashMap, sync::Arc},
    tokio::sync::Mutex,
};

/// Keyed mutex registry serializing operations against a single ledger
/// record. Distinct keys never contend; entries are kept for the life of
/// the service, matching the ledger's records-are-never-deleted shape.
pub(crate) struct LockRegistry {
    locks: Mutex<HashMap<Pubkey, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn lock_for(&self, key: &Pubkey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(*key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
