use anchor_lang::prelude::*;
use crate::constants::FACTORY_SEED;
use crate::derivation::predict_instance_address;
use crate::states::{FactoryConfig, InstanceConfig};

#[derive(Accounts)]
pub struct PredictDeterministicAddress<'info> {
    #[account(
        seeds = [FACTORY_SEED],
        bump = factory_config.bump
    )]
    pub factory_config: Account<'info, FactoryConfig>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct PredictAddressParams {
    pub creation_id: [u8; 32],
    pub config: InstanceConfig,
}

impl<'info> PredictDeterministicAddress<'info> {
    /// Read-only; the address is returned through return data.
    pub fn handle(ctx: Context<PredictDeterministicAddress>, params: PredictAddressParams) -> Result<Pubkey> {
        let address = predict_instance_address(
            ctx.program_id,
            &ctx.accounts.factory_config.key(),
            &params.creation_id,
            &params.config,
        )?;
        msg!("Predicted instance address: {}", address);
        Ok(address)
    }
}
