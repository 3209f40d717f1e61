//! Read-only interface for Pyth `PriceUpdateV2` accounts.
//!
//! Price update accounts are owned by the Pyth Solana Receiver program and are
//! Borsh-serialized Anchor accounts:
//!
//! ```text
//! [0..8]    discriminator
//! [8..40]   write_authority
//! [40]      verification level: 0 = Partial { num_signatures: u8 }, 1 = Full
//! [41|42..] PriceFeedMessage (84 bytes)
//! [..+8]    posted_slot
//! ```
//!
//! A price is `price * 10^exponent` quote units per whole unit of the asset.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;
use bytemuck::{Pod, Zeroable};

declare_id!("rec5EKMGg6MxZYaMdyBfgwp4d5rB9T1VQH5pJv5LtFJ");

/// Pyth Solana Receiver program, owner of every price update account.
pub const PYTH_RECEIVER_PROGRAM_ID: Pubkey = ID;

/// Allocated size of a `PriceUpdateV2` account (partial verification layout).
pub const PRICE_UPDATE_V2_LEN: usize = 134;

/// Largest accepted `|exponent|`.
pub const MAX_EXPONENT_ABS: i32 = 18;

const DISCRIMINATOR_LEN: usize = 8;
const VERIFICATION_LEVEL_OFFSET: usize = DISCRIMINATOR_LEN + 32; // 40

#[error_code]
pub enum PriceFeedError {
    #[msg("Price account is not owned by the Pyth receiver program")]
    InvalidOwner,
    #[msg("Price account data is malformed")]
    InvalidPriceAccount,
    #[msg("Price feed reports a non-positive price")]
    InvalidPrice,
    #[msg("Price exponent out of range")]
    InvalidExponent,
    #[msg("Price is older than the allowed age")]
    StalePrice,
    #[msg("Price confidence interval is too wide")]
    ConfidenceTooWide,
}

/// `PriceFeedMessage` as laid out inside the account.
#[repr(C, packed)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct PriceFeedMessage {
    pub feed_id: [u8; 32],
    pub price: i64,
    pub conf: u64,
    pub exponent: i32,
    pub publish_time: i64,
    pub prev_publish_time: i64,
    pub ema_price: i64,
    pub ema_conf: u64,
}

impl PriceFeedMessage {
    pub const LEN: usize = core::mem::size_of::<PriceFeedMessage>();

    /// Serializes a fully verified `PriceUpdateV2` account holding this message.
    pub fn to_account_data(&self, write_authority: &Pubkey) -> Vec<u8> {
        let mut data = vec![0u8; PRICE_UPDATE_V2_LEN];
        data[..DISCRIMINATOR_LEN].copy_from_slice(&price_update_discriminator());
        data[DISCRIMINATOR_LEN..VERIFICATION_LEVEL_OFFSET].copy_from_slice(write_authority.as_ref());
        data[VERIFICATION_LEVEL_OFFSET] = 1;
        let base = VERIFICATION_LEVEL_OFFSET + 1;
        data[base..base + Self::LEN].copy_from_slice(bytemuck::bytes_of(self));
        data
    }
}

/// A validated price: positive and with a bounded exponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Price {
    pub price: u64,
    pub conf: u64,
    pub exponent: i32,
    pub publish_time: i64,
}

impl Price {
    /// Rejects prices published more than `max_age_secs` before `now`, or in the future.
    pub fn no_older_than(self, now: i64, max_age_secs: u64) -> Result<Self> {
        let age = now.checked_sub(self.publish_time).ok_or(PriceFeedError::StalePrice)?;
        require!(
            age >= 0 && age as u64 <= max_age_secs,
            PriceFeedError::StalePrice
        );
        Ok(self)
    }

    /// Rejects prices whose confidence interval exceeds `max_conf_bps` of the price.
    pub fn with_confidence_within(self, max_conf_bps: u16) -> Result<Self> {
        require!(
            (self.conf as u128) * 10_000 <= (self.price as u128) * (max_conf_bps as u128),
            PriceFeedError::ConfidenceTooWide
        );
        Ok(self)
    }
}

/// Anchor discriminator of `PriceUpdateV2`.
pub fn price_update_discriminator() -> [u8; 8] {
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(b"account:PriceUpdateV2").to_bytes()[..8]);
    discriminator
}

/// Decodes the price message of a `PriceUpdateV2` account.
pub fn decode_price_update(data: &[u8]) -> Result<PriceFeedMessage> {
    require!(
        data.len() >= PRICE_UPDATE_V2_LEN,
        PriceFeedError::InvalidPriceAccount
    );
    require!(
        data[..DISCRIMINATOR_LEN] == price_update_discriminator(),
        PriceFeedError::InvalidPriceAccount
    );
    let base = match data[VERIFICATION_LEVEL_OFFSET] {
        0 => VERIFICATION_LEVEL_OFFSET + 2,
        1 => VERIFICATION_LEVEL_OFFSET + 1,
        _ => return err!(PriceFeedError::InvalidPriceAccount),
    };
    Ok(bytemuck::pod_read_unaligned(&data[base..base + PriceFeedMessage::LEN]))
}

/// Decodes and validates the current price.
pub fn price_from_bytes(data: &[u8]) -> Result<Price> {
    let message = decode_price_update(data)?;
    let (price, conf, exponent, publish_time) =
        (message.price, message.conf, message.exponent, message.publish_time);
    require!(price > 0, PriceFeedError::InvalidPrice);
    require!(
        exponent.abs() <= MAX_EXPONENT_ABS,
        PriceFeedError::InvalidExponent
    );
    Ok(Price {
        price: price as u64,
        conf,
        exponent,
        publish_time,
    })
}

/// Loads the price from an account owned by the Pyth receiver.
pub fn load_price(info: &AccountInfo) -> Result<Price> {
    require_keys_eq!(*info.owner, PYTH_RECEIVER_PROGRAM_ID, PriceFeedError::InvalidOwner);
    let data = info.try_borrow_data()?;
    price_from_bytes(&data)
}
