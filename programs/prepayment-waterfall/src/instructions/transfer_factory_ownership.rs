use anchor_lang::prelude::*;
use crate::constants::FACTORY_SEED;
use crate::states::FactoryConfig;

#[derive(Accounts)]
pub struct TransferFactoryOwnership<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [FACTORY_SEED],
        bump = factory_config.bump
    )]
    pub factory_config: Account<'info, FactoryConfig>,
}

impl<'info> TransferFactoryOwnership<'info> {
    pub fn handle(ctx: Context<TransferFactoryOwnership>, new_owner: Pubkey) -> Result<()> {
        let factory_key = ctx.accounts.factory_config.key();
        let factory_config = &mut ctx.accounts.factory_config;
        factory_config.require_owner(&ctx.accounts.owner.key())?;

        let previous_owner = factory_config.owner;
        factory_config.owner = new_owner;
        msg!("Factory ownership transferred: {} -> {}", previous_owner, new_owner);

        emit!(crate::events::FactoryOwnershipTransferred {
            factory: factory_key,
            previous_owner,
            new_owner,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}
