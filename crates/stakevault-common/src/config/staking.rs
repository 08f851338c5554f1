use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::errors::Result;
use crate::utils::string_to_pubkey;

/// Staking controls for a deployment. The controller identity is injected
/// here rather than compiled into the binary, so every environment can run
/// with its own authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakingSettings {
    /// Base58 identity permitted to create vaults
    pub controller: String,
    /// Holding account that collects withdraw fees
    pub fee_vault: String,
    /// Withdraw fee in basis points applied at vault initialization
    pub initial_fee_bps: u64,
    /// Asset mint to create a vault for at service startup, if any
    pub asset_mint: Option<String>,
}

impl StakingSettings {
    pub fn controller(&self) -> Result<Pubkey> {
        string_to_pubkey(&self.controller)
    }

    pub fn fee_vault(&self) -> Result<Pubkey> {
        string_to_pubkey(&self.fee_vault)
    }

    pub fn asset_mint(&self) -> Result<Option<Pubkey>> {
        self.asset_mint
            .as_deref()
            .map(string_to_pubkey)
            .transpose()
    }
}
