use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

/// Seed prefix for vault custody addresses
pub const VAULT_SEED: &[u8] = b"vault";
/// Seed prefix for per-depositor stake record keys
pub const STAKE_SEED: &[u8] = b"user";

/// Derive the custody address for the vault holding `asset_mint`.
///
/// Pure function of the mint: any party can recompute the address without
/// consulting the store or the transfer service.
pub fn derive_custody_address(asset_mint: &Pubkey) -> Pubkey {
    derive_address(&[VAULT_SEED, asset_mint.as_ref()])
}

/// Derive the storage key for a depositor's stake record.
pub fn derive_stake_address(owner: &Pubkey) -> Pubkey {
    derive_address(&[STAKE_SEED, owner.as_ref()])
}

fn derive_address(seeds: &[&[u8]]) -> Pubkey {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    Pubkey::new_from_array(hasher.finalize().into())
}
