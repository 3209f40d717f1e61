//! Waterfall arithmetic.
//!
//! Everything here is pure: a distribution is first planned from balances and
//! ledger values, then the instruction handlers apply the plan. Amounts in
//! asset base units are `u64`; valued amounts (the unit of the investor target)
//! are `u128`.

use anchor_lang::prelude::*;
use ruint::aliases::U256;

use crate::constants::PERCENTAGE_SCALE;
use crate::errors::ErrorCode;

/// Investor state a distribution is planned against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvestorTerms {
    /// Repayment target in valued units
    pub amount_to_receive: u128,
    /// Valued units already credited to the investor
    pub cumulative: u128,
    /// Investor share of post-target excess, parts-per-ten-million
    pub residual_interest_rate: u32,
}

impl InvestorTerms {
    pub fn needed(&self) -> u128 {
        self.amount_to_receive.saturating_sub(self.cumulative)
    }
}

/// Outcome of one distribution, in asset base units unless noted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistributionPlan {
    pub balance: u64,
    pub platform_fee: u64,
    pub remaining: u64,
    /// `remaining` expressed in valued units
    pub valued: u128,
    /// Valued units that went toward the repayment target
    pub to_target_value: u128,
    pub investor_priority: u64,
    pub investor_residual: u64,
    /// One entry per recipient, in list order
    pub recipient_shares: Vec<u64>,
    /// Cumulative ledger value after this distribution
    pub new_cumulative: u128,
}

impl DistributionPlan {
    pub fn investor_total(&self) -> u64 {
        self.investor_priority + self.investor_residual
    }

    pub fn recipients_total(&self) -> u64 {
        self.recipient_shares.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.balance == 0
    }
}

/// `a * b / c` with a 256-bit intermediate, `None` on division by zero or
/// when the quotient does not fit a `u128`.
pub fn mul_div(a: u128, b: u128, c: u128) -> Option<u128> {
    if c == 0 {
        return None;
    }
    let quotient = U256::from(a)
        .checked_mul(U256::from(b))?
        .checked_div(U256::from(c))?;
    let limbs = quotient.as_limbs();
    if limbs[2] != 0 || limbs[3] != 0 {
        return None;
    }
    Some(((limbs[1] as u128) << 64) | limbs[0] as u128)
}

/// `amount * rate / 10_000_000`, for rates in parts-per-ten-million.
pub fn apply_rate(amount: u64, rate: u32) -> Result<u64> {
    let scaled = mul_div(amount as u128, rate as u128, PERCENTAGE_SCALE as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    Ok(u64::try_from(scaled).map_err(|_| ErrorCode::MathOverflow)?)
}

/// Platform cut of a balance.
pub fn platform_fee_amount(balance: u64, platform_fee: u32) -> Result<u64> {
    require!(
        platform_fee <= PERCENTAGE_SCALE,
        ErrorCode::InvalidFeePercentage
    );
    apply_rate(balance, platform_fee)
}

/// Principal plus interest, fixed at instance creation.
pub fn investor_amount_to_receive(invested_amount: u64, interest_rate: u32) -> Result<u128> {
    let interest = mul_div(
        invested_amount as u128,
        interest_rate as u128,
        PERCENTAGE_SCALE as u128,
    )
    .ok_or(ErrorCode::MathOverflow)?;
    Ok((invested_amount as u128)
        .checked_add(interest)
        .ok_or(ErrorCode::MathOverflow)?)
}

/// Splits `pool` by percentage with floor division; the rounding dust is
/// added to the last share so the shares always sum to `pool`.
pub fn split_pro_rata(pool: u64, percentages: &[u32]) -> Result<Vec<u64>> {
    require!(!percentages.is_empty(), ErrorCode::InvalidRecipientCount);

    let mut shares = Vec::with_capacity(percentages.len());
    let mut allocated: u64 = 0;
    for percentage in percentages {
        let share = apply_rate(pool, *percentage)?;
        allocated = allocated.checked_add(share).ok_or(ErrorCode::MathOverflow)?;
        shares.push(share);
    }

    let dust = pool.checked_sub(allocated).ok_or(ErrorCode::MathOverflow)?;
    if let Some(last) = shares.last_mut() {
        *last = last.checked_add(dust).ok_or(ErrorCode::MathOverflow)?;
    }
    Ok(shares)
}

/// Plans a distribution of `balance`.
///
/// The platform fee comes off the top. `valuate` converts the post-fee amount
/// into valued units; it is not called for an empty balance. Until the target
/// is reached every unit goes to the investor; the excess is split between the
/// investor (residual rate) and the recipients (by percentage).
pub fn plan_distribution<F>(
    balance: u64,
    platform_fee: u32,
    terms: &InvestorTerms,
    percentages: &[u32],
    valuate: F,
) -> Result<DistributionPlan>
where
    F: FnOnce(u64) -> Result<u128>,
{
    if balance == 0 {
        return Ok(DistributionPlan {
            new_cumulative: terms.cumulative,
            ..DistributionPlan::default()
        });
    }

    let fee = platform_fee_amount(balance, platform_fee)?;
    let remaining = balance.checked_sub(fee).ok_or(ErrorCode::MathOverflow)?;
    let valued = valuate(remaining)?;

    let needed = terms.needed();
    let to_target_value = needed.min(valued);

    let investor_priority = if needed == 0 {
        0
    } else if valued <= needed {
        remaining
    } else {
        let portion = mul_div(remaining as u128, needed, valued).ok_or(ErrorCode::MathOverflow)?;
        u64::try_from(portion).map_err(|_| ErrorCode::MathOverflow)?
    };

    let excess = remaining
        .checked_sub(investor_priority)
        .ok_or(ErrorCode::MathOverflow)?;

    let (investor_residual, recipient_shares) = if excess > 0 {
        let residual = apply_rate(excess, terms.residual_interest_rate)?;
        let pool = excess.checked_sub(residual).ok_or(ErrorCode::MathOverflow)?;
        (residual, split_pro_rata(pool, percentages)?)
    } else {
        (0, vec![0; percentages.len()])
    };

    let new_cumulative = terms
        .cumulative
        .checked_add(valued)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(DistributionPlan {
        balance,
        platform_fee: fee,
        remaining,
        valued,
        to_target_value,
        investor_priority,
        investor_residual,
        recipient_shares,
        new_cumulative,
    })
}
