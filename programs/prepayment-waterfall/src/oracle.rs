//! Valuation of asset amounts through bound Pyth price feeds.
//!
//! A feed quotes `price * 10^exponent` valuation units per whole asset unit.
//! Amounts are in asset base units (`10^asset_decimals` per whole unit) and
//! results are in valuation base units (`10^valuation_decimals` per whole unit).

use anchor_lang::prelude::*;
use price_feed::Price;
use ruint::aliases::U256;

use crate::constants::{MAX_PRICE_AGE_SECS, MAX_PRICE_CONF_BPS};
use crate::errors::ErrorCode;

/// Decimal context of one valuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decimals {
    pub asset: u8,
    pub valuation: u8,
}

/// `amount * price * 10^(exponent + valuation - asset)`, floored.
pub fn value_of(amount: u64, decimals: Decimals, price: &Price) -> Result<u128> {
    let shift = price.exponent + decimals.valuation as i32 - decimals.asset as i32;
    let product = U256::from(amount) * U256::from(price.price);
    let ten = U256::from(10u8);
    let scaled = if shift >= 0 {
        ten.checked_pow(U256::from(shift as u32))
            .and_then(|factor| product.checked_mul(factor))
            .ok_or(ErrorCode::MathOverflow)?
    } else {
        match ten.checked_pow(U256::from(shift.unsigned_abs())) {
            Some(divisor) => product / divisor,
            None => U256::ZERO,
        }
    };
    let limbs = scaled.as_limbs();
    require!(limbs[2] == 0 && limbs[3] == 0, ErrorCode::MathOverflow);
    Ok(((limbs[1] as u128) << 64) | limbs[0] as u128)
}

/// Resolves the supplied feed account against the bound feed address and
/// reads a fresh, tight price from it. A missing or default binding fails
/// before the account is looked at.
pub fn load_bound_price(bound: Option<Pubkey>, supplied: Option<&AccountInfo>, now: i64) -> Result<Price> {
    let bound = bound
        .filter(|feed| *feed != Pubkey::default())
        .ok_or(ErrorCode::MissingPriceOracle)?;
    let supplied = supplied.ok_or(ErrorCode::MissingPriceOracle)?;
    require_keys_eq!(supplied.key(), bound, ErrorCode::PriceFeedMismatch);
    price_feed::load_price(supplied)?
        .no_older_than(now, MAX_PRICE_AGE_SECS)?
        .with_confidence_within(MAX_PRICE_CONF_BPS)
}

/// Values `amount` through the bound feed.
pub fn valuate(
    amount: u64,
    decimals: Decimals,
    bound: Option<Pubkey>,
    supplied: Option<&AccountInfo>,
    now: i64,
) -> Result<u128> {
    let price = load_bound_price(bound, supplied, now)?;
    let valued = value_of(amount, decimals, &price)?;
    msg!(
        "Valued {} base units at {}e{} ({} -> {} decimals): {}",
        amount,
        price.price,
        price.exponent,
        decimals.asset,
        decimals.valuation,
        valued
    );
    Ok(valued)
}
