// PDA Seeds
pub const FACTORY_SEED: &[u8] = b"factory";
pub const CREATION_RECORD_SEED: &[u8] = b"creation_record";
pub const INSTANCE_SEED: &[u8] = b"instance";
pub const ASSET_VAULT_SEED: &[u8] = b"asset_vault";

// Percentages, rates and fees are parts-per-ten-million
pub const PERCENTAGE_SCALE: u32 = 10_000_000; // 100%

// Instance list caps
pub const MAX_RECIPIENTS: usize = 20;
pub const MAX_DISTRIBUTORS: usize = 10;
pub const MAX_SUPPORTED_ASSETS: usize = 10;

// Valuation
pub const NATIVE_DECIMALS: u8 = 9; // lamports per SOL
pub const MAX_VALUATION_DECIMALS: u8 = 18;
pub const MAX_PRICE_AGE_SECS: u64 = 60;
pub const MAX_PRICE_CONF_BPS: u16 = 200; // 2% of price
