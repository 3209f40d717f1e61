use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::constants::INSTANCE_SEED;
use crate::errors::ErrorCode;
use crate::instructions::distribute_native::log_plan;
use crate::oracle::{self, Decimals};
use crate::states::{Instance, Recipient};
use crate::waterfall::plan_distribution;

/// Recipient token accounts for `mint` follow as remaining accounts, one per
/// recipient in list order, each owned by the listed recipient address.
#[derive(Accounts)]
pub struct DistributeToken<'info> {
    /// Must be one of the instance distributors
    pub distributor: Signer<'info>,

    #[account(
        mut,
        seeds = [INSTANCE_SEED, instance.factory.as_ref(), instance.salt.as_ref()],
        bump = instance.bump
    )]
    pub instance: Box<Account<'info, Instance>>,

    pub mint: Box<Account<'info, Mint>>,

    /// Any token account for `mint` whose authority is the instance: the
    /// opened vault PDA or an associated token account paid by a parent instance
    #[account(
        mut,
        constraint = is_source_vault(&asset_vault, &mint.key(), &instance.key()) @ ErrorCode::InvalidAssetVault
    )]
    pub asset_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = mint,
        constraint = investor_token_account.owner == instance.investor @ ErrorCode::InvalidRecipientAccounts
    )]
    pub investor_token_account: Box<Account<'info, TokenAccount>>,

    /// Required when the platform fee is non-zero
    #[account(
        mut,
        token::mint = mint,
        constraint = platform_fee_token_account.owner == instance.platform_wallet @ ErrorCode::TransferFailed
    )]
    pub platform_fee_token_account: Option<Box<Account<'info, TokenAccount>>>,

    /// CHECK: Validated against the feed bound to `mint`
    pub price_feed: Option<UncheckedAccount<'info>>,

    pub token_program: Program<'info, Token>,
}

impl<'info> DistributeToken<'info> {
    pub fn handle(ctx: Context<'_, '_, 'info, 'info, DistributeToken<'info>>) -> Result<()> {
        msg!("Distributing token balance");

        let accounts = ctx.accounts;
        accounts.instance.require_distributor(&accounts.distributor.key())?;

        let mint = accounts.mint.key();
        let balance = accounts.asset_vault.amount;
        if balance == 0 {
            msg!("Nothing to distribute");
            return Ok(());
        }
        check_recipient_token_accounts(&accounts.instance.recipients, &mint, ctx.remaining_accounts)?;

        let bound_feed = accounts.instance.price_feed_for(&mint);
        let supplied_feed = accounts.price_feed.as_ref().map(|f| f.to_account_info());
        let decimals = Decimals {
            asset: accounts.mint.decimals,
            valuation: accounts.instance.valuation_decimals,
        };
        let now = Clock::get()?.unix_timestamp;
        let percentages = accounts.instance.percentages();
        let plan = plan_distribution(
            balance,
            accounts.instance.platform_fee,
            &accounts.instance.investor_terms(),
            &percentages,
            |amount| oracle::valuate(amount, decimals, bound_feed, supplied_feed.as_ref(), now),
        )?;

        // Ledger first, transfers after
        accounts.instance.record_distribution(&plan)?;
        log_plan(&plan, "tokens");

        let seeds = accounts.instance.signer_seeds();
        let signer: &[&[&[u8]]] = &[&seeds];

        if plan.platform_fee > 0 {
            let fee_account = accounts
                .platform_fee_token_account
                .as_ref()
                .ok_or(ErrorCode::TransferFailed)?
                .to_account_info();
            accounts.transfer_from_vault(fee_account, plan.platform_fee, signer)?;
        }
        accounts.transfer_from_vault(
            accounts.investor_token_account.to_account_info(),
            plan.investor_total(),
            signer,
        )?;
        for (token_account, share) in ctx.remaining_accounts.iter().zip(&plan.recipient_shares) {
            accounts.transfer_from_vault(token_account.clone(), *share, signer)?;
        }

        emit!(crate::events::DistributionExecuted {
            instance: accounts.instance.key(),
            asset: mint,
            balance: plan.balance,
            platform_fee: plan.platform_fee,
            investor_priority: plan.investor_priority,
            investor_residual: plan.investor_residual,
            recipients_total: plan.recipients_total(),
            valued: plan.valued,
            amount_to_investor_cumulative: plan.new_cumulative,
            timestamp: Clock::get()?.unix_timestamp,
        });

        msg!("Token distribution completed");
        Ok(())
    }

    fn transfer_from_vault(&self, to: AccountInfo<'info>, amount: u64, signer: &[&[&[u8]]]) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        anchor_spl::token::transfer(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                anchor_spl::token::Transfer {
                    from: self.asset_vault.to_account_info(),
                    to,
                    authority: self.instance.to_account_info(),
                },
                signer,
            ),
            amount,
        )
        .map_err(|_| error!(ErrorCode::TransferFailed))
    }
}

fn is_source_vault(vault: &TokenAccount, mint: &Pubkey, instance: &Pubkey) -> bool {
    vault.mint == *mint && vault.owner == *instance
}

/// Each remaining account must be a token account for `mint` owned by the
/// recipient at the same position.
fn check_recipient_token_accounts(
    recipients: &[Recipient],
    mint: &Pubkey,
    accounts: &[AccountInfo],
) -> Result<()> {
    require!(
        accounts.len() == recipients.len(),
        ErrorCode::InvalidRecipientAccounts
    );
    for (recipient, info) in recipients.iter().zip(accounts) {
        require_keys_eq!(*info.owner, Token::id(), ErrorCode::InvalidRecipientAccounts);
        require!(info.is_writable, ErrorCode::TransferFailed);
        let data = info.try_borrow_data()?;
        let token_account = TokenAccount::try_deserialize(&mut &data[..])
            .map_err(|_| error!(ErrorCode::InvalidRecipientAccounts))?;
        require_keys_eq!(token_account.mint, *mint, ErrorCode::InvalidRecipientAccounts);
        require_keys_eq!(
            token_account.owner,
            recipient.address,
            ErrorCode::InvalidRecipientAccounts
        );
    }
    Ok(())
}
