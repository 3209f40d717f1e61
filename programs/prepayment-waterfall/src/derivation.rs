//! Deterministic instance addressing.
//!
//! The salt commits to the factory, the creation id and the serialized
//! configuration, so equal inputs always land on the same instance address.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hashv;

use crate::constants::INSTANCE_SEED;
use crate::errors::ErrorCode;
use crate::states::InstanceConfig;

pub fn derive_salt(factory: &Pubkey, creation_id: &[u8; 32], config: &InstanceConfig) -> Result<[u8; 32]> {
    let mut encoded = Vec::new();
    AnchorSerialize::serialize(config, &mut encoded).map_err(|_| error!(ErrorCode::InvalidConfig))?;
    Ok(hashv(&[factory.as_ref(), creation_id.as_ref(), &encoded]).to_bytes())
}

pub fn instance_address(program_id: &Pubkey, factory: &Pubkey, salt: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[INSTANCE_SEED, factory.as_ref(), salt.as_ref()], program_id)
}

/// Address `create_instance` will initialize for these inputs.
pub fn predict_instance_address(
    program_id: &Pubkey,
    factory: &Pubkey,
    creation_id: &[u8; 32],
    config: &InstanceConfig,
) -> Result<Pubkey> {
    let salt = derive_salt(factory, creation_id, config)?;
    Ok(instance_address(program_id, factory, &salt).0)
}
