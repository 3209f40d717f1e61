use anchor_lang::prelude::*;
use crate::constants::FACTORY_SEED;
use crate::program::PrepaymentWaterfall;
use crate::states::{require_upgrade_authority, FactoryConfig};

#[derive(Accounts)]
pub struct InitializeFactory<'info> {
    /// Signer that becomes the factory owner
    #[account(mut)]
    pub owner: Signer<'info>,

    /// Factory configuration PDA; `init` makes this a one-time call
    #[account(
        init,
        payer = owner,
        space = FactoryConfig::DISCRIMINATOR.len() + FactoryConfig::INIT_SPACE,
        seeds = [FACTORY_SEED],
        bump
    )]
    pub factory_config: Account<'info, FactoryConfig>,

    #[account(constraint = program.programdata_address()? == Some(program_data.key()))]
    pub program: Program<'info, PrepaymentWaterfall>,

    /// Upgradeable-loader data of this program; its authority gates initialization
    pub program_data: Account<'info, ProgramData>,

    pub system_program: Program<'info, System>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeFactoryParams {
    /// Platform fee in parts-per-ten-million (10_000_000 = 100%)
    pub platform_fee: u32,
    /// Wallet receiving the platform fee
    pub platform_wallet: Pubkey,
}

impl<'info> InitializeFactory<'info> {
    pub fn handle(ctx: Context<InitializeFactory>, params: InitializeFactoryParams) -> Result<()> {
        msg!("Initializing factory");

        let factory_key = ctx.accounts.factory_config.key();
        let owner = ctx.accounts.owner.key();
        require_upgrade_authority(ctx.accounts.program_data.upgrade_authority_address, &owner)?;

        let config = FactoryConfig::new(
            owner,
            params.platform_fee,
            params.platform_wallet,
            ctx.bumps.factory_config,
        )?;
        ctx.accounts.factory_config.set_inner(config);

        msg!("Owner: {}", owner);
        msg!("Platform fee: {} / 10000000", params.platform_fee);
        msg!("Platform wallet: {}", params.platform_wallet);

        emit!(crate::events::FactoryInitialized {
            factory: factory_key,
            owner,
            platform_fee: params.platform_fee,
            platform_wallet: params.platform_wallet,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}
