use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Only the owner can perform this action")]
    UnauthorizedOwner,
    #[msg("Only the program upgrade authority can initialize the factory")]
    UnauthorizedInitializer,
    #[msg("Only the controller can perform this action")]
    UnauthorizedController,
    #[msg("Only a distributor can trigger a distribution")]
    UnauthorizedDistributor,
    #[msg("Input arrays have inconsistent lengths")]
    InconsistentDataLength,
    #[msg("Recipient list must contain between 1 and 20 entries")]
    InvalidRecipientCount,
    #[msg("Recipient address cannot be the null address")]
    NullRecipient,
    #[msg("Recipient already added")]
    RecipientAlreadyAdded,
    #[msg("Recipient percentages must sum to 10000000")]
    InvalidPercentage,
    #[msg("Platform fee cannot exceed 10000000")]
    InvalidFeePercentage,
    #[msg("Controller is immutable")]
    ImmutableController,
    #[msg("Controller is already configured with this address")]
    ControllerAlreadyConfigured,
    #[msg("Creation id already processed")]
    CreationIdAlreadyProcessed,
    #[msg("Instance is already initialized")]
    AlreadyInitialized,
    #[msg("Asset has no bound price oracle")]
    MissingPriceOracle,
    #[msg("Supplied price feed does not match the bound feed")]
    PriceFeedMismatch,
    #[msg("Distributor list is full")]
    TooManyDistributors,
    #[msg("Supported asset list is full")]
    TooManySupportedAssets,
    #[msg("Invalid instance configuration")]
    InvalidConfig,
    #[msg("Salt does not match the instance configuration")]
    InvalidSalt,
    #[msg("Recipient accounts do not match the recipient list")]
    InvalidRecipientAccounts,
    #[msg("Source vault must hold the mint and be owned by the instance")]
    InvalidAssetVault,
    #[msg("Transfer failed")]
    TransferFailed,
    #[msg("Math overflow occurred during calculation")]
    MathOverflow,
}
