//! The staking state machine
//!
//! Exposes the ledger's operations over a [`LedgerStore`] and a
//! [`TransferService`]. Each operation runs as one atomic unit: ledger
//! records are committed only after the corresponding transfer has
//! succeeded, so a failed transfer never leaves a partial mutation behind.

mod locks;
pub mod types;

pub use types::{DepositReceipt, StakeEvent, StakingConfig, WithdrawReceipt};

use {
    crate::{transfer::TransferService, Result, StakingError},
    locks::LockRegistry,
    solana_sdk::pubkey::Pubkey,
    stakevault_common::{
        types::{GlobalConfig, UserStakeInfo, VaultRecord},
        utils::current_timestamp,
        Error as StoreError,
    },
    stakevault_store::LedgerStore,
    std::sync::Arc,
    tokio::sync::{broadcast, Mutex},
    tracing::info,
};

/// Hard ceiling on the withdraw fee: 10_000 bps is the whole stake.
const MAX_FEE_BPS: u64 = 10_000;

const EVENT_CHANNEL_CAPACITY: usize = 1000;

pub struct StakingService {
    config: StakingConfig,
    store: Arc<dyn LedgerStore>,
    transfers: Arc<dyn TransferService>,
    /// Serializes operations against a single depositor's record
    stake_locks: LockRegistry,
    /// Serializes vault creation and `total_held` updates
    vault_lock: Mutex<()>,
    events: broadcast::Sender<StakeEvent>,
}

impl StakingService {
    pub fn new(
        config: StakingConfig,
        store: Arc<dyn LedgerStore>,
        transfers: Arc<dyn TransferService>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            store,
            transfers,
            stake_locks: LockRegistry::new(),
            vault_lock: Mutex::new(()),
            events,
        }
    }

    pub fn config(&self) -> &StakingConfig {
        &self.config
    }

    /// Get a subscription to ledger events
    pub fn subscribe(&self) -> broadcast::Receiver<StakeEvent> {
        self.events.subscribe()
    }

    /// Create the custody vault for `asset_mint`.
    ///
    /// Only the configured controller may call this; the vault's custody
    /// address is a pure function of the mint, and re-creating an existing
    /// vault is a hard failure. The first successful call also persists
    /// the control record carrying the fee policy.
    pub async fn initialize(&self, asset_mint: Pubkey, caller: Pubkey) -> Result<Pubkey> {
        if caller != self.config.controller {
            return Err(StakingError::Unauthorized);
        }
        if self.config.initial_fee_bps > MAX_FEE_BPS {
            return Err(StakingError::InvalidFee);
        }

        let _guard = self.vault_lock.lock().await;

        let vault = VaultRecord::new(asset_mint, caller);
        let custody_address = vault.custody_address;
        match self.store.create_vault(vault).await {
            Ok(()) => {}
            Err(StoreError::AlreadyExists(_)) => {
                return Err(StakingError::VaultExists(asset_mint))
            }
            Err(e) => return Err(e.into()),
        }

        let global = GlobalConfig {
            admin: caller,
            withdraw_fee_bps: self.config.initial_fee_bps,
            fee_vault: self.config.fee_vault,
        };
        match self.store.create_global_config(global).await {
            // An earlier initialize for another mint already wrote it.
            Ok(()) | Err(StoreError::AlreadyExists(_)) => {}
            Err(e) => return Err(e.into()),
        }

        info!(mint = %asset_mint, custody = %custody_address, "staking vault initialized");
        Ok(custody_address)
    }

    /// Move `amount` units from the depositor's holding account into
    /// custody and grow the depositor's ledger entry by the same amount.
    pub async fn deposit(
        &self,
        depositor: Pubkey,
        asset_mint: Pubkey,
        amount: u64,
    ) -> Result<DepositReceipt> {
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }

        let vault = self
            .store
            .vault(&asset_mint)
            .await?
            .ok_or(StakingError::VaultNotFound(asset_mint))?;

        let lock = self.stake_locks.lock_for(&depositor).await;
        let _guard = lock.lock().await;

        // Value moves first; the commits below are unreachable unless the
        // full amount is already in custody.
        self.transfers
            .transfer(&depositor, &vault.custody_address, amount)
            .await?;

        let mut stake_info = self
            .store
            .stake_info(&depositor)
            .await?
            .unwrap_or_else(|| UserStakeInfo::new(depositor));
        // Cannot overflow once the custody credit has succeeded.
        stake_info.amount += amount;
        stake_info.deposit_ts = current_timestamp();
        self.store.put_stake_info(&stake_info).await?;

        {
            let _vault_guard = self.vault_lock.lock().await;
            let mut vault = self
                .store
                .vault(&asset_mint)
                .await?
                .ok_or(StakingError::VaultNotFound(asset_mint))?;
            vault.total_held += amount;
            self.store.put_vault(&vault).await?;
        }

        let receipt = DepositReceipt {
            staker: depositor,
            amount,
            total_staked: stake_info.amount,
        };
        let _ = self.events.send(StakeEvent::Deposited(receipt.clone()));
        info!(staker = %depositor, amount, total_staked = stake_info.amount, "tokens staked");
        Ok(receipt)
    }

    /// Return the depositor's entire stake and reset their ledger entry.
    ///
    /// There is no partial withdraw. The configured fee is carved out of
    /// the payout and moved to the fee vault before the remainder returns
    /// to the depositor.
    pub async fn withdraw(
        &self,
        depositor: Pubkey,
        asset_mint: Pubkey,
    ) -> Result<WithdrawReceipt> {
        let vault = self
            .store
            .vault(&asset_mint)
            .await?
            .ok_or(StakingError::VaultNotFound(asset_mint))?;

        let lock = self.stake_locks.lock_for(&depositor).await;
        let _guard = lock.lock().await;

        let mut stake_info = self
            .store
            .stake_info(&depositor)
            .await?
            .filter(|info| info.amount > 0)
            .ok_or(StakingError::InvalidWithdraw)?;
        let total_amount = stake_info.amount;

        let global = self
            .store
            .global_config()
            .await?
            .ok_or(StakingError::NotInitialized)?;
        let fee = withdraw_fee(total_amount, global.withdraw_fee_bps)?;
        let payout = total_amount - fee;

        if fee > 0 {
            self.transfers
                .transfer(&vault.custody_address, &global.fee_vault, fee)
                .await?;
        }
        self.transfers
            .transfer(&vault.custody_address, &depositor, payout)
            .await?;

        stake_info.amount = 0;
        self.store.put_stake_info(&stake_info).await?;

        {
            let _vault_guard = self.vault_lock.lock().await;
            let mut vault = self
                .store
                .vault(&asset_mint)
                .await?
                .ok_or(StakingError::VaultNotFound(asset_mint))?;
            // total_held always covers the sum of stake entries.
            vault.total_held -= total_amount;
            self.store.put_vault(&vault).await?;
        }

        let receipt = WithdrawReceipt {
            staker: depositor,
            amount: payout,
            fee,
            total_staked: 0,
        };
        let _ = self.events.send(StakeEvent::Withdrawn(receipt.clone()));
        info!(staker = %depositor, amount = payout, fee, "tokens withdrawn");
        Ok(receipt)
    }

    /// Change the withdraw fee. Only the admin persisted at
    /// initialization may call this.
    pub async fn update_fee(&self, caller: Pubkey, new_fee_bps: u64) -> Result<()> {
        if new_fee_bps > MAX_FEE_BPS {
            return Err(StakingError::InvalidFee);
        }

        let _guard = self.vault_lock.lock().await;

        let mut global = self
            .store
            .global_config()
            .await?
            .ok_or(StakingError::NotInitialized)?;
        if caller != global.admin {
            return Err(StakingError::Unauthorized);
        }

        let old_fee = global.withdraw_fee_bps;
        global.withdraw_fee_bps = new_fee_bps;
        self.store.put_global_config(&global).await?;

        let _ = self.events.send(StakeEvent::FeeUpdated {
            old_fee,
            new_fee: new_fee_bps,
        });
        info!(old_fee, new_fee = new_fee_bps, "withdraw fee updated");
        Ok(())
    }

    pub async fn vault(&self, asset_mint: &Pubkey) -> Result<Option<VaultRecord>> {
        Ok(self.store.vault(asset_mint).await?)
    }

    pub async fn stake_info(&self, owner: &Pubkey) -> Result<Option<UserStakeInfo>> {
        Ok(self.store.stake_info(owner).await?)
    }

    /// Custody balance as reported by the transfer service itself.
    pub async fn custody_balance(&self, asset_mint: &Pubkey) -> Result<u64> {
        let vault = self
            .store
            .vault(asset_mint)
            .await?
            .ok_or(StakingError::VaultNotFound(*asset_mint))?;
        Ok(self.transfers.balance_of(&vault.custody_address).await)
    }
}

/// Fee carved out of a withdrawal of `total` at `fee_bps` basis points.
fn withdraw_fee(total: u64, fee_bps: u64) -> Result<u64> {
    if fee_bps > MAX_FEE_BPS {
        return Err(StakingError::InvalidFee);
    }
    Ok(((total as u128 * fee_bps as u128) / 10_000) as u64)
}
