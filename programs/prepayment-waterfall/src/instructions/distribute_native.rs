use anchor_lang::prelude::*;
use crate::constants::{INSTANCE_SEED, NATIVE_DECIMALS};
use crate::errors::ErrorCode;
use crate::oracle::{self, Decimals};
use crate::states::{Instance, Recipient, ValuationUnit};
use crate::waterfall::{plan_distribution, DistributionPlan};

/// Recipient wallets follow as remaining accounts, writable, in list order.
#[derive(Accounts)]
pub struct DistributeNative<'info> {
    /// Must be one of the instance distributors
    pub distributor: Signer<'info>,

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
    pub investor: UncheckedAccount<'info>,

    /// CHECK: Platform fee wallet, required when the fee is non-zero
    #[account(
        mut,
        address = instance.platform_wallet @ ErrorCode::TransferFailed
    )]
    pub platform_wallet: Option<UncheckedAccount<'info>>,

    /// CHECK: Validated against the bound native feed in quote-valued instances
    pub native_price_feed: Option<UncheckedAccount<'info>>,
}

/// Accounts paid by a native distribution
pub(crate) struct NativePayees<'a, 'info> {
    pub investor: AccountInfo<'info>,
    pub platform_wallet: Option<AccountInfo<'info>>,
    pub native_price_feed: Option<AccountInfo<'info>>,
    pub recipients: &'a [AccountInfo<'info>],
}

impl<'info> DistributeNative<'info> {
    pub fn handle(ctx: Context<'_, '_, 'info, 'info, DistributeNative<'info>>) -> Result<()> {
        msg!("Distributing native balance");

        let accounts = ctx.accounts;
        accounts.instance.require_distributor(&accounts.distributor.key())?;

        let payees = NativePayees {
            investor: accounts.investor.to_account_info(),
            platform_wallet: accounts.platform_wallet.as_ref().map(|w| w.to_account_info()),
            native_price_feed: accounts.native_price_feed.as_ref().map(|f| f.to_account_info()),
            recipients: ctx.remaining_accounts,
        };
        distribute_native_balance(&mut accounts.instance, payees)?;

        Ok(())
    }
}

/// Lamports held above the rent-exempt minimum.
pub fn distributable_lamports(info: &AccountInfo) -> Result<u64> {
    let rent_exempt = Rent::get()?.minimum_balance(info.data_len());
    Ok(info.lamports().saturating_sub(rent_exempt))
}

/// Runs the waterfall over the instance's whole native balance. Shared by the
/// explicit distribution and the auto-distribution on deposit.
pub(crate) fn distribute_native_balance<'info>(
    instance: &mut Account<'info, Instance>,
    payees: NativePayees<'_, 'info>,
) -> Result<Option<DistributionPlan>> {
    let instance_info = instance.to_account_info();
    let balance = distributable_lamports(&instance_info)?;
    if balance == 0 {
        msg!("Nothing to distribute");
        return Ok(None);
    }
    check_recipient_wallets(&instance.recipients, payees.recipients)?;

    let valuation_unit = instance.valuation_unit;
    let native_feed = instance.native_price_feed;
    let decimals = Decimals {
        asset: NATIVE_DECIMALS,
        valuation: instance.valuation_decimals,
    };
    let now = Clock::get()?.unix_timestamp;
    let percentages = instance.percentages();
    let plan = plan_distribution(
        balance,
        instance.platform_fee,
        &instance.investor_terms(),
        &percentages,
        |amount| match valuation_unit {
            ValuationUnit::Native => Ok(amount as u128),
            ValuationUnit::Quote => oracle::valuate(
                amount,
                decimals,
                Some(native_feed),
                payees.native_price_feed.as_ref(),
                now,
            ),
        },
    )?;

    // Ledger first, transfers after
    instance.record_distribution(&plan)?;
    log_plan(&plan, "lamports");
    transfer_native_plan(&instance_info, &payees, &plan)?;

    emit!(crate::events::DistributionExecuted {
        instance: instance.key(),
        asset: Pubkey::default(),
        balance: plan.balance,
        platform_fee: plan.platform_fee,
        investor_priority: plan.investor_priority,
        investor_residual: plan.investor_residual,
        recipients_total: plan.recipients_total(),
        valued: plan.valued,
        amount_to_investor_cumulative: plan.new_cumulative,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Native distribution completed");
    Ok(Some(plan))
}

/// Recipient accounts must be the listed recipients, in order, and writable.
pub(crate) fn check_recipient_wallets(recipients: &[Recipient], accounts: &[AccountInfo]) -> Result<()> {
    require!(
        accounts.len() == recipients.len(),
        ErrorCode::InvalidRecipientAccounts
    );
    for (recipient, account) in recipients.iter().zip(accounts) {
        require_keys_eq!(
            account.key(),
            recipient.address,
            ErrorCode::InvalidRecipientAccounts
        );
        require!(account.is_writable, ErrorCode::TransferFailed);
    }
    Ok(())
}

/// Pays out a plan from `source`. Every payee is checked before the first
/// lamport moves.
pub(crate) fn transfer_native_plan(
    source: &AccountInfo,
    payees: &NativePayees,
    plan: &DistributionPlan,
) -> Result<()> {
    let fee_wallet = if plan.platform_fee > 0 {
        let wallet = payees
            .platform_wallet
            .as_ref()
            .ok_or(ErrorCode::TransferFailed)?;
        require!(wallet.is_writable, ErrorCode::TransferFailed);
        Some(wallet)
    } else {
        None
    };
    require!(
        plan.investor_total() == 0 || payees.investor.is_writable,
        ErrorCode::TransferFailed
    );
    require!(
        payees.recipients.len() == plan.recipient_shares.len(),
        ErrorCode::InvalidRecipientAccounts
    );
    for (wallet, share) in payees.recipients.iter().zip(&plan.recipient_shares) {
        require!(*share == 0 || wallet.is_writable, ErrorCode::TransferFailed);
    }

    if let Some(wallet) = fee_wallet {
        move_lamports(source, wallet, plan.platform_fee)?;
    }
    move_lamports(source, &payees.investor, plan.investor_total())?;
    for (wallet, share) in payees.recipients.iter().zip(&plan.recipient_shares) {
        move_lamports(source, wallet, *share)?;
    }
    Ok(())
}

fn move_lamports(from: &AccountInfo, to: &AccountInfo, amount: u64) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    let from_balance = from
        .lamports()
        .checked_sub(amount)
        .ok_or(ErrorCode::MathOverflow)?;
    **from.try_borrow_mut_lamports()? = from_balance;
    let to_balance = to
        .lamports()
        .checked_add(amount)
        .ok_or(ErrorCode::MathOverflow)?;
    **to.try_borrow_mut_lamports()? = to_balance;
    Ok(())
}

pub(crate) fn log_plan(plan: &DistributionPlan, unit: &str) {
    msg!("Balance: {} {}", plan.balance, unit);
    msg!("Platform fee: {} {}", plan.platform_fee, unit);
    msg!("Valued remainder: {}", plan.valued);
    msg!("Investor priority: {} {}", plan.investor_priority, unit);
    msg!("Investor residual: {} {}", plan.investor_residual, unit);
    msg!("Recipients total: {} {}", plan.recipients_total(), unit);
    msg!("Investor cumulative: {}", plan.new_cumulative);
}
