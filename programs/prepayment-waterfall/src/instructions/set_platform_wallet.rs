use anchor_lang::prelude::*;
use crate::constants::FACTORY_SEED;
use crate::states::FactoryConfig;

#[derive(Accounts)]
pub struct SetPlatformWallet<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [FACTORY_SEED],
        bump = factory_config.bump
    )]
    pub factory_config: Account<'info, FactoryConfig>,
}

impl<'info> SetPlatformWallet<'info> {
    pub fn handle(ctx: Context<SetPlatformWallet>, platform_wallet: Pubkey) -> Result<()> {
        let factory_key = ctx.accounts.factory_config.key();
        let factory_config = &mut ctx.accounts.factory_config;
        factory_config.require_owner(&ctx.accounts.owner.key())?;

        let old_wallet = factory_config.platform_wallet;
        factory_config.platform_wallet = platform_wallet;
        msg!("Platform wallet updated: {} -> {}", old_wallet, platform_wallet);

        emit!(crate::events::PlatformWalletUpdated {
            factory: factory_key,
            old_wallet,
            new_wallet: platform_wallet,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}
