//! Utility functions and helpers

mod keys;
mod time;

pub use keys::{derive_custody_address, derive_stake_address, STAKE_SEED, VAULT_SEED};
pub use time::current_timestamp;

use solana_sdk::pubkey::Pubkey;

pub fn string_to_pubkey(s: &str) -> crate::Result<Pubkey> {
    s.parse::<Pubkey>().map_err(|e: solana_sdk::pubkey::ParsePubkeyError| {
        crate::Error::Config(format!("invalid public key '{s}': {e}"))
    })
}
