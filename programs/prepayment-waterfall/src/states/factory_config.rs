use anchor_lang::prelude::*;
use crate::constants::PERCENTAGE_SCALE;
use crate::errors::ErrorCode;

/// Factory-level settings; fee settings are snapshotted into each new instance
#[account]
#[derive(InitSpace)]
pub struct FactoryConfig {
    /// Owner allowed to change fee settings
    pub owner: Pubkey,
    /// Platform fee in parts-per-ten-million
    pub platform_fee: u32,
    /// Wallet receiving the platform fee
    pub platform_wallet: Pubkey,
    /// Number of instances created so far
    pub instances_created: u64,
    /// Bump seed for the PDA
    pub bump: u8,
}

impl FactoryConfig {
    pub fn new(owner: Pubkey, platform_fee: u32, platform_wallet: Pubkey, bump: u8) -> Result<Self> {
        validate_platform_fee(platform_fee)?;
        Ok(Self {
            owner,
            platform_fee,
            platform_wallet,
            instances_created: 0,
            bump,
        })
    }

    pub fn require_owner(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(*signer, self.owner, ErrorCode::UnauthorizedOwner);
        Ok(())
    }

    /// Updates the fee, leaving the previous value untouched on failure
    pub fn set_platform_fee(&mut self, platform_fee: u32) -> Result<u32> {
        validate_platform_fee(platform_fee)?;
        let old = self.platform_fee;
        self.platform_fee = platform_fee;
        Ok(old)
    }

    pub fn record_instance_created(&mut self) -> Result<()> {
        self.instances_created = self.instances_created
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }
}

/// The factory may only be created by the program's upgrade authority. A
/// frozen program (no authority) cannot create one.
pub fn require_upgrade_authority(upgrade_authority: Option<Pubkey>, signer: &Pubkey) -> Result<()> {
    require!(
        upgrade_authority == Some(*signer),
        ErrorCode::UnauthorizedInitializer
    );
    Ok(())
}

pub fn validate_platform_fee(platform_fee: u32) -> Result<()> {
    require!(
        platform_fee <= PERCENTAGE_SCALE,
        ErrorCode::InvalidFeePercentage
    );
    Ok(())
}
