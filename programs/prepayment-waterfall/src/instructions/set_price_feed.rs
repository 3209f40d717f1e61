use anchor_lang::prelude::*;
use crate::constants::INSTANCE_SEED;
use crate::states::Instance;

#[derive(Accounts)]
pub struct SetPriceFeed<'info> {
    /// Instance owner or controller
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [INSTANCE_SEED, instance.factory.as_ref(), instance.salt.as_ref()],
        bump = instance.bump
    )]
    pub instance: Box<Account<'info, Instance>>,
}

impl<'info> SetPriceFeed<'info> {
    pub fn handle(ctx: Context<SetPriceFeed>, mint: Pubkey, price_feed: Pubkey) -> Result<()> {
        let instance_key = ctx.accounts.instance.key();
        let instance = &mut ctx.accounts.instance;
        instance.require_owner_or_controller(&ctx.accounts.authority.key())?;

        instance.set_price_feed(mint, price_feed)?;
        msg!("Price feed for {} set to {}", mint, price_feed);

        emit!(crate::events::PriceFeedUpdated {
            instance: instance_key,
            asset: mint,
            price_feed,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }

    /// Only consulted when the instance values native amounts in a quote unit.
    pub fn handle_native(ctx: Context<SetPriceFeed>, price_feed: Pubkey) -> Result<()> {
        let instance_key = ctx.accounts.instance.key();
        let instance = &mut ctx.accounts.instance;
        instance.require_owner_or_controller(&ctx.accounts.authority.key())?;

        instance.native_price_feed = price_feed;
        msg!("Native price feed set to {}", price_feed);

        emit!(crate::events::PriceFeedUpdated {
            instance: instance_key,
            asset: Pubkey::default(),
            price_feed,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}
