use anchor_lang::prelude::*;
use crate::constants::{
    INSTANCE_SEED, MAX_DISTRIBUTORS, MAX_RECIPIENTS, MAX_SUPPORTED_ASSETS, MAX_VALUATION_DECIMALS,
    NATIVE_DECIMALS, PERCENTAGE_SCALE,
};
use crate::errors::ErrorCode;
use crate::waterfall::{investor_amount_to_receive, DistributionPlan, InvestorTerms};

/// Unit the investor repayment target is denominated in
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub enum ValuationUnit {
    /// Target in lamports; native value needs no oracle
    #[default]
    Native,
    /// Target in an external quote unit; native value goes through `native_price_feed`
    Quote,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct Recipient {
    pub address: Pubkey,
    /// Share of the recipient pool, parts-per-ten-million
    pub percentage: u32,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct AssetPriceFeed {
    pub mint: Pubkey,
    pub price_feed: Pubkey,
}

/// Frozen configuration an instance is created with
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct InstanceConfig {
    /// Address allowed to replace the recipient list
    pub controller: Pubkey,
    /// Addresses allowed to trigger distributions
    pub distributors: Vec<Pubkey>,
    /// When set, the controller can never be reassigned
    pub immutable_controller: bool,
    /// Distribute native deposits as they arrive
    pub auto_distribution: bool,
    /// Smallest deposit that triggers an automatic distribution
    pub min_auto_distribute_amount: u64,
    pub investor: Pubkey,
    /// Principal in valued units
    pub invested_amount: u64,
    /// Interest on the principal, parts-per-ten-million
    pub interest_rate: u32,
    /// Investor share of post-target excess, parts-per-ten-million
    pub residual_interest_rate: u32,
    pub valuation_unit: ValuationUnit,
    /// Decimals of the quote unit; ignored for native valuation
    pub valuation_decimals: u8,
    pub native_price_feed: Pubkey,
    pub recipients: Vec<Pubkey>,
    pub percentages: Vec<u32>,
    pub supported_assets: Vec<Pubkey>,
    pub price_feeds: Vec<Pubkey>,
}

impl InstanceConfig {
    /// Array lengths are checked before anything else is validated.
    pub fn validate_lengths(&self) -> Result<()> {
        require!(
            self.recipients.len() == self.percentages.len(),
            ErrorCode::InconsistentDataLength
        );
        require!(
            self.supported_assets.len() == self.price_feeds.len(),
            ErrorCode::InconsistentDataLength
        );
        Ok(())
    }
}

/// Factory-side values an instance is stamped with at creation
#[derive(Clone, Copy, Debug)]
pub struct InstanceOrigin {
    pub factory: Pubkey,
    pub owner: Pubkey,
    pub platform_fee: u32,
    pub platform_wallet: Pubkey,
    pub creation_id: [u8; 32],
    pub salt: [u8; 32],
    pub bump: u8,
}

#[account]
#[derive(InitSpace, Default)]
pub struct Instance {
    /// Factory that created this instance
    pub factory: Pubkey,
    /// Owner allowed to manage controller, distributors and feeds
    pub owner: Pubkey,
    pub controller: Pubkey,
    pub immutable_controller: bool,
    #[max_len(MAX_DISTRIBUTORS)]
    pub distributors: Vec<Pubkey>,
    pub auto_distribution: bool,
    pub min_auto_distribute_amount: u64,
    /// Platform fee snapshotted from the factory, parts-per-ten-million
    pub platform_fee: u32,
    pub platform_wallet: Pubkey,
    pub valuation_unit: ValuationUnit,
    /// Base units per whole valuation unit, as a power of ten
    pub valuation_decimals: u8,
    pub native_price_feed: Pubkey,
    #[max_len(MAX_SUPPORTED_ASSETS)]
    pub supported_assets: Vec<AssetPriceFeed>,
    pub investor: Pubkey,
    pub invested_amount: u64,
    pub interest_rate: u32,
    pub residual_interest_rate: u32,
    /// Principal plus interest, in valued units
    pub investor_amount_to_receive: u128,
    /// Valued units distributed so far; never decreases
    pub amount_to_investor_cumulative: u128,
    #[max_len(MAX_RECIPIENTS)]
    pub recipients: Vec<Recipient>,
    pub creation_id: [u8; 32],
    pub salt: [u8; 32],
    pub initialized: bool,
    /// Bump seed for the PDA
    pub bump: u8,
}

impl Instance {
    pub fn initialize(&mut self, origin: InstanceOrigin, config: &InstanceConfig) -> Result<()> {
        require!(!self.initialized, ErrorCode::AlreadyInitialized);
        config.validate_lengths()?;
        require!(config.investor != Pubkey::default(), ErrorCode::InvalidConfig);
        require!(
            config.residual_interest_rate <= PERCENTAGE_SCALE,
            ErrorCode::InvalidConfig
        );
        require!(
            config.valuation_unit == ValuationUnit::Native
                || config.valuation_decimals <= MAX_VALUATION_DECIMALS,
            ErrorCode::InvalidConfig
        );
        require!(
            origin.platform_fee <= PERCENTAGE_SCALE,
            ErrorCode::InvalidFeePercentage
        );

        let recipients = validate_recipients(&config.recipients, &config.percentages)?;
        let amount_to_receive =
            investor_amount_to_receive(config.invested_amount, config.interest_rate)?;

        self.factory = origin.factory;
        self.owner = origin.owner;
        self.controller = config.controller;
        self.immutable_controller = config.immutable_controller;
        self.distributors = Vec::with_capacity(config.distributors.len());
        for distributor in &config.distributors {
            self.set_distributor(*distributor, true)?;
        }
        self.auto_distribution = config.auto_distribution;
        self.min_auto_distribute_amount = config.min_auto_distribute_amount;
        self.platform_fee = origin.platform_fee;
        self.platform_wallet = origin.platform_wallet;
        self.valuation_unit = config.valuation_unit;
        self.valuation_decimals = match config.valuation_unit {
            ValuationUnit::Native => NATIVE_DECIMALS,
            ValuationUnit::Quote => config.valuation_decimals,
        };
        self.native_price_feed = config.native_price_feed;
        self.supported_assets = Vec::with_capacity(config.supported_assets.len());
        for (mint, feed) in config.supported_assets.iter().zip(&config.price_feeds) {
            self.set_price_feed(*mint, *feed)?;
        }
        self.investor = config.investor;
        self.invested_amount = config.invested_amount;
        self.interest_rate = config.interest_rate;
        self.residual_interest_rate = config.residual_interest_rate;
        self.investor_amount_to_receive = amount_to_receive;
        self.amount_to_investor_cumulative = 0;
        self.recipients = recipients;
        self.creation_id = origin.creation_id;
        self.salt = origin.salt;
        self.bump = origin.bump;
        self.initialized = true;
        Ok(())
    }

    pub fn require_owner(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(*signer, self.owner, ErrorCode::UnauthorizedOwner);
        Ok(())
    }

    /// A default controller can never sign, so a nulled controller locks the list.
    pub fn require_controller(&self, signer: &Pubkey) -> Result<()> {
        require!(
            self.controller != Pubkey::default() && *signer == self.controller,
            ErrorCode::UnauthorizedController
        );
        Ok(())
    }

    pub fn require_owner_or_controller(&self, signer: &Pubkey) -> Result<()> {
        if *signer == self.owner {
            return Ok(());
        }
        self.require_controller(signer)
            .map_err(|_| error!(ErrorCode::UnauthorizedOwner))
    }

    pub fn require_distributor(&self, signer: &Pubkey) -> Result<()> {
        require!(self.is_distributor(signer), ErrorCode::UnauthorizedDistributor);
        Ok(())
    }

    /// Returns the previous controller.
    pub fn set_controller(&mut self, new_controller: Pubkey) -> Result<Pubkey> {
        require!(!self.immutable_controller, ErrorCode::ImmutableController);
        require!(
            new_controller != self.controller,
            ErrorCode::ControllerAlreadyConfigured
        );
        let old = self.controller;
        self.controller = new_controller;
        Ok(old)
    }

    /// Replaces the whole list; on error nothing changes.
    pub fn set_recipients(&mut self, addresses: &[Pubkey], percentages: &[u32]) -> Result<()> {
        self.recipients = validate_recipients(addresses, percentages)?;
        Ok(())
    }

    pub fn set_distributor(&mut self, distributor: Pubkey, enabled: bool) -> Result<()> {
        let position = self.distributors.iter().position(|d| *d == distributor);
        match (position, enabled) {
            (None, true) => {
                require!(
                    self.distributors.len() < MAX_DISTRIBUTORS,
                    ErrorCode::TooManyDistributors
                );
                self.distributors.push(distributor);
            }
            (Some(index), false) => {
                self.distributors.swap_remove(index);
            }
            _ => {}
        }
        Ok(())
    }

    /// Binds `mint` to `price_feed`, replacing an existing binding.
    pub fn set_price_feed(&mut self, mint: Pubkey, price_feed: Pubkey) -> Result<()> {
        if let Some(entry) = self.supported_assets.iter_mut().find(|a| a.mint == mint) {
            entry.price_feed = price_feed;
            return Ok(());
        }
        require!(
            self.supported_assets.len() < MAX_SUPPORTED_ASSETS,
            ErrorCode::TooManySupportedAssets
        );
        self.supported_assets.push(AssetPriceFeed { mint, price_feed });
        Ok(())
    }

    pub fn price_feed_for(&self, mint: &Pubkey) -> Option<Pubkey> {
        self.supported_assets
            .iter()
            .find(|a| a.mint == *mint)
            .map(|a| a.price_feed)
            .filter(|feed| *feed != Pubkey::default())
    }

    pub fn is_distributor(&self, address: &Pubkey) -> bool {
        self.distributors.contains(address)
    }

    pub fn number_of_recipients(&self) -> usize {
        self.recipients.len()
    }

    /// Zero for addresses not in the list.
    pub fn recipient_percentage(&self, address: &Pubkey) -> u32 {
        self.recipients
            .iter()
            .find(|r| r.address == *address)
            .map_or(0, |r| r.percentage)
    }

    pub fn percentages(&self) -> Vec<u32> {
        self.recipients.iter().map(|r| r.percentage).collect()
    }

    pub fn investor_terms(&self) -> InvestorTerms {
        InvestorTerms {
            amount_to_receive: self.investor_amount_to_receive,
            cumulative: self.amount_to_investor_cumulative,
            residual_interest_rate: self.residual_interest_rate,
        }
    }

    pub fn remaining_to_target(&self) -> u128 {
        self.investor_terms().needed()
    }

    /// Whether a deposit of `amount` triggers a distribution. The threshold is inclusive.
    pub fn auto_distributes(&self, amount: u64) -> bool {
        self.auto_distribution && amount >= self.min_auto_distribute_amount
    }

    /// Writes the ledger side of a plan. Must run before any transfer.
    pub fn record_distribution(&mut self, plan: &DistributionPlan) -> Result<()> {
        require!(
            plan.new_cumulative >= self.amount_to_investor_cumulative,
            ErrorCode::MathOverflow
        );
        self.amount_to_investor_cumulative = plan.new_cumulative;
        Ok(())
    }

    pub fn signer_seeds(&self) -> [&[u8]; 4] {
        [
            INSTANCE_SEED,
            self.factory.as_ref(),
            self.salt.as_ref(),
            core::slice::from_ref(&self.bump),
        ]
    }
}

/// Checks run in order: lengths, count, null entries, duplicates, then the
/// percentage sum.
pub fn validate_recipients(addresses: &[Pubkey], percentages: &[u32]) -> Result<Vec<Recipient>> {
    require!(
        addresses.len() == percentages.len(),
        ErrorCode::InconsistentDataLength
    );
    require!(
        !addresses.is_empty() && addresses.len() <= MAX_RECIPIENTS,
        ErrorCode::InvalidRecipientCount
    );

    let mut recipients: Vec<Recipient> = Vec::with_capacity(addresses.len());
    let mut sum: u64 = 0;
    for (address, percentage) in addresses.iter().zip(percentages) {
        require!(*address != Pubkey::default(), ErrorCode::NullRecipient);
        require!(
            !recipients.iter().any(|r| r.address == *address),
            ErrorCode::RecipientAlreadyAdded
        );
        sum += *percentage as u64;
        recipients.push(Recipient {
            address: *address,
            percentage: *percentage,
        });
    }
    require!(sum == PERCENTAGE_SCALE as u64, ErrorCode::InvalidPercentage);
    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_code(result: Result<impl Sized>) -> u32 {
        match result {
            Err(Error::AnchorError(e)) => e.error_code_number,
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    fn code(e: ErrorCode) -> u32 {
        u32::from(e)
    }

    fn origin() -> InstanceOrigin {
        InstanceOrigin {
            factory: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            platform_fee: 0,
            platform_wallet: Pubkey::new_unique(),
            creation_id: [1u8; 32],
            salt: [2u8; 32],
            bump: 254,
        }
    }

    fn config(recipients: Vec<Pubkey>, percentages: Vec<u32>) -> InstanceConfig {
        InstanceConfig {
            controller: Pubkey::new_unique(),
            investor: Pubkey::new_unique(),
            invested_amount: 100,
            interest_rate: 1_000_000,
            recipients,
            percentages,
            ..InstanceConfig::default()
        }
    }

    fn created() -> Instance {
        let mut instance = Instance::default();
        let cfg = config(
            vec![Pubkey::new_unique(), Pubkey::new_unique()],
            vec![8_000_000, 2_000_000],
        );
        instance.initialize(origin(), &cfg).unwrap();
        instance
    }

    #[test]
    fn initialize_computes_target_and_runs_once() {
        let mut instance = created();
        assert_eq!(instance.investor_amount_to_receive, 110);
        assert_eq!(instance.amount_to_investor_cumulative, 0);
        assert_eq!(instance.number_of_recipients(), 2);
        assert_eq!(instance.remaining_to_target(), 110);
        assert_eq!(instance.valuation_decimals, NATIVE_DECIMALS);

        let again = config(vec![Pubkey::new_unique()], vec![10_000_000]);
        assert_eq!(
            error_code(instance.initialize(origin(), &again)),
            code(ErrorCode::AlreadyInitialized)
        );
    }

    #[test]
    fn quote_valuation_keeps_bounded_decimals() {
        let mut cfg = config(vec![Pubkey::new_unique()], vec![10_000_000]);
        cfg.valuation_unit = ValuationUnit::Quote;
        cfg.valuation_decimals = 6;
        let mut instance = Instance::default();
        instance.initialize(origin(), &cfg).unwrap();
        assert_eq!(instance.valuation_decimals, 6);

        cfg.valuation_decimals = MAX_VALUATION_DECIMALS + 1;
        assert_eq!(
            error_code(Instance::default().initialize(origin(), &cfg)),
            code(ErrorCode::InvalidConfig)
        );
    }

    #[test]
    fn auto_distribution_threshold_is_inclusive() {
        let mut cfg = config(vec![Pubkey::new_unique()], vec![10_000_000]);
        cfg.auto_distribution = true;
        cfg.min_auto_distribute_amount = 1_000;
        let mut instance = Instance::default();
        instance.initialize(origin(), &cfg).unwrap();

        assert!(!instance.auto_distributes(999));
        assert!(instance.auto_distributes(1_000));
        assert!(instance.auto_distributes(1_001));

        instance.auto_distribution = false;
        assert!(!instance.auto_distributes(1_001));
    }

    #[test]
    fn recipient_validation_order() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();

        assert_eq!(
            error_code(validate_recipients(&[a, b], &[10_000_000])),
            code(ErrorCode::InconsistentDataLength)
        );
        assert_eq!(
            error_code(validate_recipients(&[], &[])),
            code(ErrorCode::InvalidRecipientCount)
        );
        let too_many: Vec<Pubkey> = (0..=MAX_RECIPIENTS).map(|_| Pubkey::new_unique()).collect();
        assert_eq!(
            error_code(validate_recipients(&too_many, &vec![0; too_many.len()])),
            code(ErrorCode::InvalidRecipientCount)
        );
        assert_eq!(
            error_code(validate_recipients(&[a, Pubkey::default()], &[5_000_000, 5_000_000])),
            code(ErrorCode::NullRecipient)
        );
        assert_eq!(
            error_code(validate_recipients(&[a, a], &[5_000_000, 5_000_000])),
            code(ErrorCode::RecipientAlreadyAdded)
        );
        assert_eq!(
            error_code(validate_recipients(&[a, b], &[5_000_000, 4_999_999])),
            code(ErrorCode::InvalidPercentage)
        );
        assert_eq!(validate_recipients(&[a, b], &[5_000_000, 5_000_000]).unwrap().len(), 2);
    }

    #[test]
    fn failed_replacement_keeps_previous_list() {
        let mut instance = created();
        let before = instance.recipients.clone();
        let x = Pubkey::new_unique();

        assert!(instance.set_recipients(&[x, x], &[5_000_000, 5_000_000]).is_err());
        assert_eq!(instance.recipients, before);

        let y = Pubkey::new_unique();
        instance.set_recipients(&[x, y], &[2_500_000, 7_500_000]).unwrap();
        assert_eq!(instance.recipient_percentage(&x), 2_500_000);
        assert_eq!(instance.recipient_percentage(&y), 7_500_000);
        assert_eq!(instance.recipient_percentage(&before[0].address), 0);
        assert_eq!(instance.percentages().iter().sum::<u32>(), PERCENTAGE_SCALE);
    }

    #[test]
    fn controller_policy() {
        let mut instance = created();
        let current = instance.controller;

        assert_eq!(
            error_code(instance.set_controller(current)),
            code(ErrorCode::ControllerAlreadyConfigured)
        );
        let next = Pubkey::new_unique();
        assert_eq!(instance.set_controller(next).unwrap(), current);
        assert_eq!(instance.set_controller(Pubkey::default()).unwrap(), next);
        assert_eq!(
            error_code(instance.require_controller(&Pubkey::default())),
            code(ErrorCode::UnauthorizedController)
        );

        instance.immutable_controller = true;
        assert_eq!(
            error_code(instance.set_controller(Pubkey::new_unique())),
            code(ErrorCode::ImmutableController)
        );
    }

    #[test]
    fn distributor_and_feed_registry() {
        let mut instance = created();
        let d = Pubkey::new_unique();
        instance.set_distributor(d, true).unwrap();
        instance.set_distributor(d, true).unwrap();
        assert!(instance.is_distributor(&d));
        assert_eq!(instance.distributors.len(), 1);
        instance.set_distributor(d, false).unwrap();
        assert!(!instance.is_distributor(&d));

        for _ in 0..MAX_DISTRIBUTORS {
            instance.set_distributor(Pubkey::new_unique(), true).unwrap();
        }
        assert_eq!(
            error_code(instance.set_distributor(Pubkey::new_unique(), true)),
            code(ErrorCode::TooManyDistributors)
        );

        let mint = Pubkey::new_unique();
        assert_eq!(instance.price_feed_for(&mint), None);
        instance.set_price_feed(mint, Pubkey::default()).unwrap();
        assert_eq!(instance.price_feed_for(&mint), None);
        let feed = Pubkey::new_unique();
        instance.set_price_feed(mint, feed).unwrap();
        assert_eq!(instance.price_feed_for(&mint), Some(feed));
        assert_eq!(instance.supported_assets.len(), 1);
    }

    #[test]
    fn owner_or_controller_gate() {
        let instance = created();
        assert!(instance.require_owner_or_controller(&instance.owner).is_ok());
        assert!(instance.require_owner_or_controller(&instance.controller).is_ok());
        assert_eq!(
            error_code(instance.require_owner_or_controller(&Pubkey::new_unique())),
            code(ErrorCode::UnauthorizedOwner)
        );
    }
}
