//! Vault and control records
//!
//! A vault is the pooled custody record for a single asset type. The
//! control record is a singleton written by the first successful
//! initialization and holds the mutable withdraw-fee policy.

use {
    crate::utils::{current_timestamp, derive_custody_address},
    serde::{Deserialize, Serialize},
    solana_sdk::pubkey::Pubkey,
};

/// Pooled custody record for one asset type.
///
/// Immutable after creation except for `total_held`, which tracks the
/// aggregate stake and only changes together with a custody transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRecord {
    /// Custody account identity, derived from the asset mint
    pub custody_address: Pubkey,
    /// Controller identity bound at creation
    pub authority: Pubkey,
    /// The fungible asset this vault custodies
    pub asset_mint: Pubkey,
    /// Aggregate stake currently in custody
    pub total_held: u64,
    pub created_at: i64,
}

impl VaultRecord {
    pub fn new(asset_mint: Pubkey, authority: Pubkey) -> Self {
        Self {
            custody_address: derive_custody_address(&asset_mint),
            authority,
            asset_mint,
            total_held: 0,
            created_at: current_timestamp(),
        }
    }
}

/// Singleton control record persisted by the first initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Controller identity allowed to change the fee policy
    pub admin: Pubkey,
    /// Withdraw fee in basis points
    pub withdraw_fee_bps: u64,
    /// Holding account that receives withdraw fees
    pub fee_vault: Pubkey,
}
