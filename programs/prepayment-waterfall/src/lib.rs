use anchor_lang::prelude::*;

declare_id!("B1y6LbqxNaLbd2XySptjsZsxoAhNhQ7LKh2B8re6nf5C");

pub mod instructions;
pub mod errors;
pub mod constants;
pub mod states;
pub mod events;
pub mod oracle;
pub mod waterfall;
pub mod derivation;

pub use instructions::*;
pub use events::*;
pub use states::{InstanceConfig, ValuationUnit};

#[program]
pub mod prepayment_waterfall {
    use super::*;

    pub fn initialize_factory(ctx: Context<InitializeFactory>, params: InitializeFactoryParams) -> Result<()> {
        InitializeFactory::handle(ctx, params)
    }

    pub fn set_platform_fee(ctx: Context<SetPlatformFee>, platform_fee: u32) -> Result<()> {
        SetPlatformFee::handle(ctx, platform_fee)
    }

    pub fn set_platform_wallet(ctx: Context<SetPlatformWallet>, platform_wallet: Pubkey) -> Result<()> {
        SetPlatformWallet::handle(ctx, platform_wallet)
    }

    pub fn transfer_factory_ownership(ctx: Context<TransferFactoryOwnership>, new_owner: Pubkey) -> Result<()> {
        TransferFactoryOwnership::handle(ctx, new_owner)
    }

    pub fn create_instance(ctx: Context<CreateInstance>, params: CreateInstanceParams) -> Result<()> {
        CreateInstance::handle(ctx, params)
    }

    pub fn predict_deterministic_address(
        ctx: Context<PredictDeterministicAddress>,
        params: PredictAddressParams,
    ) -> Result<Pubkey> {
        PredictDeterministicAddress::handle(ctx, params)
    }

    pub fn set_recipients(ctx: Context<SetRecipients>, params: SetRecipientsParams) -> Result<()> {
        SetRecipients::handle(ctx, params)
    }

    pub fn set_controller(ctx: Context<InstanceOwnerAction>, new_controller: Pubkey) -> Result<()> {
        InstanceOwnerAction::set_controller(ctx, new_controller)
    }

    pub fn set_distributor(ctx: Context<InstanceOwnerAction>, distributor: Pubkey, enabled: bool) -> Result<()> {
        InstanceOwnerAction::set_distributor(ctx, distributor, enabled)
    }

    pub fn transfer_ownership(ctx: Context<InstanceOwnerAction>, new_owner: Pubkey) -> Result<()> {
        InstanceOwnerAction::transfer_ownership(ctx, new_owner)
    }

    pub fn set_price_feed(ctx: Context<SetPriceFeed>, mint: Pubkey, price_feed: Pubkey) -> Result<()> {
        SetPriceFeed::handle(ctx, mint, price_feed)
    }

    pub fn set_native_price_feed(ctx: Context<SetPriceFeed>, price_feed: Pubkey) -> Result<()> {
        SetPriceFeed::handle_native(ctx, price_feed)
    }

    pub fn open_asset_vault(ctx: Context<OpenAssetVault>) -> Result<()> {
        OpenAssetVault::handle(ctx)
    }

    pub fn deposit_native<'info>(
        ctx: Context<'_, '_, 'info, 'info, DepositNative<'info>>,
        amount: u64,
    ) -> Result<()> {
        DepositNative::handle(ctx, amount)
    }

    pub fn distribute_native<'info>(ctx: Context<'_, '_, 'info, 'info, DistributeNative<'info>>) -> Result<()> {
        DistributeNative::handle(ctx)
    }

    pub fn distribute_token<'info>(ctx: Context<'_, '_, 'info, 'info, DistributeToken<'info>>) -> Result<()> {
        DistributeToken::handle(ctx)
    }
}
