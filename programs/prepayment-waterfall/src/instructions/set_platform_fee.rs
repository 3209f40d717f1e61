use anchor_lang::prelude::*;
use crate::constants::FACTORY_SEED;
use crate::states::FactoryConfig;

#[derive(Accounts)]
pub struct SetPlatformFee<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [FACTORY_SEED],
        bump = factory_config.bump
    )]
    pub factory_config: Account<'info, FactoryConfig>,
}

impl<'info> SetPlatformFee<'info> {
    /// Applies to instances created after this call; existing instances keep their snapshot.
    pub fn handle(ctx: Context<SetPlatformFee>, platform_fee: u32) -> Result<()> {
        let factory_key = ctx.accounts.factory_config.key();
        let factory_config = &mut ctx.accounts.factory_config;
        factory_config.require_owner(&ctx.accounts.owner.key())?;

        let old_fee = factory_config.set_platform_fee(platform_fee)?;
        msg!("Platform fee updated: {} -> {}", old_fee, platform_fee);

        emit!(crate::events::PlatformFeeUpdated {
            factory: factory_key,
            old_fee,
            new_fee: platform_fee,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}
