use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};
use crate::constants::INSTANCE_SEED;
use crate::errors::ErrorCode;
use crate::instructions::distribute_native::{distribute_native_balance, NativePayees};
use crate::states::Instance;

/// When the deposit triggers an auto-distribution, the investor, fee wallet
/// and feed accounts must be present and the recipient wallets follow as
/// remaining accounts, exactly as for `distribute_native`.
#[derive(Accounts)]
pub struct DepositNative<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    #[account(
        mut,
        seeds = [INSTANCE_SEED, instance.factory.as_ref(), instance.salt.as_ref()],
        bump = instance.bump
    )]
    pub instance: Box<Account<'info, Instance>>,

    /// CHECK: Investor wallet, pinned to the instance investor
    #[account(
        mut,
        address = instance.investor @ ErrorCode::InvalidRecipientAccounts
    )]
    pub investor: Option<UncheckedAccount<'info>>,

    /// CHECK: Platform fee wallet
    #[account(
        mut,
        address = instance.platform_wallet @ ErrorCode::TransferFailed
    )]
    pub platform_wallet: Option<UncheckedAccount<'info>>,

    /// CHECK: Validated against the bound native feed
    pub native_price_feed: Option<UncheckedAccount<'info>>,

    pub system_program: Program<'info, System>,
}

impl<'info> DepositNative<'info> {
    pub fn handle(ctx: Context<'_, '_, 'info, 'info, DepositNative<'info>>, amount: u64) -> Result<()> {
        msg!("Depositing {} lamports", amount);

        let accounts = ctx.accounts;
        let instance_key = accounts.instance.key();
        let depositor = accounts.depositor.key();

        transfer(
            CpiContext::new(
                accounts.system_program.to_account_info(),
                Transfer {
                    from: accounts.depositor.to_account_info(),
                    to: accounts.instance.to_account_info(),
                },
            ),
            amount,
        )?;

        let auto_distributed = accounts.instance.auto_distributes(amount);

        if auto_distributed {
            msg!("Deposit meets the auto-distribution threshold");
            let investor = accounts
                .investor
                .as_ref()
                .ok_or(ErrorCode::InvalidRecipientAccounts)?
                .to_account_info();
            let payees = NativePayees {
                investor,
                platform_wallet: accounts.platform_wallet.as_ref().map(|w| w.to_account_info()),
                native_price_feed: accounts.native_price_feed.as_ref().map(|f| f.to_account_info()),
                recipients: ctx.remaining_accounts,
            };
            distribute_native_balance(&mut accounts.instance, payees)?;
        }

        emit!(crate::events::NativeDeposited {
            instance: instance_key,
            depositor,
            amount,
            auto_distributed,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}
