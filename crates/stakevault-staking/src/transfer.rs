//! Boundary to the asset transfer subsystem
//!
//! The staking ledger never moves value itself; it delegates to a
//! [`TransferService`] that holds the real balances and fails atomically
//! when the source account cannot cover a transfer. The in-memory
//! implementation stands in for the external system in tests, the demo
//! binary and local composition.

use {
    async_trait::async_trait,
    solana_sdk::pubkey::Pubkey,
    std::collections::HashMap,
    thiserror::Error,
    tokio::sync::RwLock,
};

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Insufficient funds: account {account} holds {available}, transfer requires {required}")]
    InsufficientFunds {
        account: Pubkey,
        available: u64,
        required: u64,
    },

    #[error("Transfer would overflow the destination balance")]
    BalanceOverflow,
}

/// Moves exact amounts of the asset between holding accounts.
#[async_trait]
pub trait TransferService: Send + Sync + 'static {
    /// Move exactly `amount` units from `from` to `to`. Either the full
    /// amount moves or nothing does.
    async fn transfer(
        &self,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> std::result::Result<(), TransferError>;

    /// Exact balance currently held by `account`.
    async fn balance_of(&self, account: &Pubkey) -> u64;
}

/// Transfer service holding balances in process memory.
#[derive(Default)]
pub struct InMemoryTransferService {
    balances: RwLock<HashMap<Pubkey, u64>>,
}

impl InMemoryTransferService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` fresh units to `account`.
    pub async fn credit(
        &self,
        account: &Pubkey,
        amount: u64,
    ) -> std::result::Result<(), TransferError> {
        let mut balances = self.balances.write().await;
        let balance = balances.entry(*account).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(TransferError::BalanceOverflow)?;
        Ok(())
    }
}

#[async_trait]
impl TransferService for InMemoryTransferService {
    async fn transfer(
        &self,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> std::result::Result<(), TransferError> {
        // One write lock across the debit and the credit keeps the move atomic.
        let mut balances = self.balances.write().await;

        let available = balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                account: *from,
                available,
                required: amount,
            });
        }

        let credited = balances
            .get(to)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(TransferError::BalanceOverflow)?;

        balances.insert(*from, available - amount);
        balances.insert(*to, credited);
        Ok(())
    }

    async fn balance_of(&self, account: &Pubkey) -> u64 {
        let balances = self.balances.read().await;
        balances.get(account).copied().unwrap_or(0)
    }
}
