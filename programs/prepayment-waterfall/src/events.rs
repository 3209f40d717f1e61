use anchor_lang::prelude::*;

/// Event emitted when the factory is initialized
#[event]
pub struct FactoryInitialized {
    pub factory: Pubkey,
    pub owner: Pubkey,
    /// Platform fee in parts-per-ten-million
    pub platform_fee: u32,
    pub platform_wallet: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct PlatformFeeUpdated {
    pub factory: Pubkey,
    pub old_fee: u32,
    pub new_fee: u32,
    pub timestamp: i64,
}

#[event]
pub struct PlatformWalletUpdated {
    pub factory: Pubkey,
    pub old_wallet: Pubkey,
    pub new_wallet: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct FactoryOwnershipTransferred {
    pub factory: Pubkey,
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when the factory creates an instance
#[event]
pub struct InstanceCreated {
    pub factory: Pubkey,
    /// The new instance address
    pub instance: Pubkey,
    pub creation_id: [u8; 32],
    pub owner: Pubkey,
    pub controller: Pubkey,
    pub investor: Pubkey,
    /// Principal plus interest the investor is owed first
    pub investor_amount_to_receive: u128,
    pub recipients_count: u8,
    pub timestamp: i64,
}

/// Event emitted when the recipient list is replaced
#[event]
pub struct RecipientsUpdated {
    pub instance: Pubkey,
    pub recipients: Vec<Pubkey>,
    pub percentages: Vec<u32>,
    pub timestamp: i64,
}

#[event]
pub struct ControllerUpdated {
    pub instance: Pubkey,
    pub old_controller: Pubkey,
    pub new_controller: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct DistributorUpdated {
    pub instance: Pubkey,
    pub distributor: Pubkey,
    pub enabled: bool,
    pub timestamp: i64,
}

/// Event emitted when a price feed binding changes
#[event]
pub struct PriceFeedUpdated {
    pub instance: Pubkey,
    /// Asset mint, or the default address for the native feed
    pub asset: Pubkey,
    pub price_feed: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OwnershipTransferred {
    pub instance: Pubkey,
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct NativeDeposited {
    pub instance: Pubkey,
    pub depositor: Pubkey,
    pub amount: u64,
    /// Whether the deposit triggered a distribution
    pub auto_distributed: bool,
    pub timestamp: i64,
}

/// Event emitted after each completed distribution
#[event]
pub struct DistributionExecuted {
    pub instance: Pubkey,
    /// Token mint, or the default address for native value
    pub asset: Pubkey,
    /// Balance distributed, in asset base units
    pub balance: u64,
    pub platform_fee: u64,
    pub investor_priority: u64,
    pub investor_residual: u64,
    pub recipients_total: u64,
    /// Post-fee amount in valued units
    pub valued: u128,
    /// Investor cumulative after this distribution
    pub amount_to_investor_cumulative: u128,
    pub timestamp: i64,
}
