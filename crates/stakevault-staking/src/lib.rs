//! Custodial staking ledger core for the stakevault system
//! Provides vault initialization, stake deposits and full-balance withdrawals

pub mod staking;
pub mod transfer;

mod tests;

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Errors that can occur in staking operations
#[derive(Debug, Error)]
pub enum StakingError {
    #[error("You are not authorized to perform this action")]
    Unauthorized,

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("No tokens to withdraw")]
    InvalidWithdraw,

    #[error("Withdraw fee cannot exceed 10000 basis points")]
    InvalidFee,

    #[error("A vault already exists for mint {0}")]
    VaultExists(Pubkey),

    #[error("No vault exists for mint {0}")]
    VaultNotFound(Pubkey),

    #[error("The staking ledger has not been initialized")]
    NotInitialized,

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Store(#[from] stakevault_common::Error),
}

pub type Result<T> = std::result::Result<T, StakingError>;

pub use staking::{
    DepositReceipt, StakeEvent, StakingConfig, StakingService, WithdrawReceipt,
};
pub use transfer::{InMemoryTransferService, TransferError, TransferService};
