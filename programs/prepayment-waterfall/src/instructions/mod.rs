pub mod initialize_factory;
pub use initialize_factory::*;

pub mod set_platform_fee;
pub use set_platform_fee::*;

pub mod set_platform_wallet;
pub use set_platform_wallet::*;

pub mod transfer_factory_ownership;
pub use transfer_factory_ownership::*;

pub mod create_instance;
pub use create_instance::*;

pub mod predict_address;
pub use predict_address::*;

pub mod set_recipients;
pub use set_recipients::*;

pub mod instance_owner_action;
pub use instance_owner_action::*;

pub mod set_price_feed;
pub use set_price_feed::*;

pub mod open_asset_vault;
pub use open_asset_vault::*;

pub mod distribute_native;
pub use distribute_native::*;

pub mod deposit_native;
pub use deposit_native::*;

pub mod distribute_token;
pub use distribute_token::*;
