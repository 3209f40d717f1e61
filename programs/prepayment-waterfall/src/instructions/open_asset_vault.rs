use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::constants::{ASSET_VAULT_SEED, INSTANCE_SEED};
use crate::states::Instance;

#[derive(Accounts)]
pub struct OpenAssetVault<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        seeds = [INSTANCE_SEED, instance.factory.as_ref(), instance.salt.as_ref()],
        bump = instance.bump
    )]
    pub instance: Box<Account<'info, Instance>>,

    pub mint: Box<Account<'info, Mint>>,

    /// Token account credited to the instance for this mint
    #[account(
        init,
        payer = payer,
        seeds = [ASSET_VAULT_SEED, instance.key().as_ref(), mint.key().as_ref()],
        bump,
        token::mint = mint,
        token::authority = instance
    )]
    pub asset_vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

impl<'info> OpenAssetVault<'info> {
    pub fn handle(ctx: Context<OpenAssetVault>) -> Result<()> {
        msg!("Asset vault opened");
        msg!("Instance: {}", ctx.accounts.instance.key());
        msg!("Mint: {}", ctx.accounts.mint.key());
        msg!("Vault: {}", ctx.accounts.asset_vault.key());
        Ok(())
    }
}
