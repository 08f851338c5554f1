use {
    serde::{Deserialize, Serialize},
    solana_sdk::pubkey::Pubkey,
};

/// Per-depositor ledger entry recording the depositor's current claim on a
/// vault. Created at first deposit and reused afterwards; a withdrawn
/// record simply holds zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStakeInfo {
    /// Depositor this record belongs to; never reassigned
    pub owner: Pubkey,
    /// Current staked amount
    pub amount: u64,
    /// Unix timestamp of the most recent deposit
    pub deposit_ts: i64,
}

impl UserStakeInfo {
    pub fn new(owner: Pubkey) -> Self {
        Self {
            owner,
            amount: 0,
            deposit_ts: 0,
        }
    }
}
