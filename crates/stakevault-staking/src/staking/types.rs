use {
    serde::{Deserialize, Serialize},
    solana_sdk::pubkey::Pubkey,
};

/// Runtime configuration for the staking service.
///
/// The controller identity arrives here from deployment configuration;
/// nothing in the crate hardcodes it.
#[derive(Debug, Clone)]
pub struct StakingConfig {
    /// Identity permitted to create vaults and change the fee policy
    pub controller: Pubkey,
    /// Holding account that receives withdraw fees
    pub fee_vault: Pubkey,
    /// Withdraw fee in basis points persisted at initialization
    pub initial_fee_bps: u64,
}

/// Returned by a successful deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    pub staker: Pubkey,
    pub amount: u64,
    pub total_staked: u64,
}

/// Returned by a successful withdraw. `amount` is the payout after the
/// fee; the depositor's ledger entry is always reset to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    pub staker: Pubkey,
    pub amount: u64,
    pub fee: u64,
    pub total_staked: u64,
}

/// Notifications published on the service broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeEvent {
    Deposited(DepositReceipt),
    Withdrawn(WithdrawReceipt),
    FeeUpdated { old_fee: u64, new_fee: u64 },
}
