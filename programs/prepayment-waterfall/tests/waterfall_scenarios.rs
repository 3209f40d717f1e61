#![cfg(all(test, not(target_arch = "bpf")))]

// Host-only tests driving the waterfall through an in-memory balance book:
// investor phase, fee path, missing oracle, nested instances, creation ids.

use std::collections::HashMap;

use anchor_lang::prelude::*;
use prepayment_waterfall::derivation::{derive_salt, instance_address, predict_instance_address};
use prepayment_waterfall::errors::ErrorCode;
use prepayment_waterfall::oracle::{value_of, Decimals};
use prepayment_waterfall::states::{
    CreationRecord, Instance, InstanceConfig, InstanceOrigin, ValuationUnit,
};
use prepayment_waterfall::waterfall::plan_distribution;
use price_feed::Price;

const UNIT: u64 = 1_000_000_000;

#[derive(Default)]
struct Book {
    balances: HashMap<Pubkey, u64>,
}

impl Book {
    fn credit(&mut self, who: Pubkey, amount: u64) {
        *self.balances.entry(who).or_default() += amount;
    }

    fn balance(&self, who: &Pubkey) -> u64 {
        self.balances.get(who).copied().unwrap_or_default()
    }

    fn take_all(&mut self, who: &Pubkey) -> u64 {
        self.balances.insert(*who, 0).unwrap_or_default()
    }
}

struct Waterfall {
    address: Pubkey,
    state: Instance,
}

impl Waterfall {
    /// Distributes the whole book balance of this instance. Nothing moves on error.
    fn distribute<F>(&mut self, book: &mut Book, valuate: F) -> Result<()>
    where
        F: FnOnce(u64) -> Result<u128>,
    {
        let balance = book.balance(&self.address);
        let plan = plan_distribution(
            balance,
            self.state.platform_fee,
            &self.state.investor_terms(),
            &self.state.percentages(),
            valuate,
        )?;
        if plan.is_empty() {
            return Ok(());
        }
        self.state.record_distribution(&plan)?;

        book.take_all(&self.address);
        book.credit(self.state.platform_wallet, plan.platform_fee);
        book.credit(self.state.investor, plan.investor_total());
        for (recipient, share) in self.state.recipients.iter().zip(&plan.recipient_shares) {
            book.credit(recipient.address, *share);
        }
        Ok(())
    }

    fn distribute_native(&mut self, book: &mut Book) -> Result<()> {
        self.distribute(book, |amount| Ok(amount as u128))
    }
}

fn config(investor: Pubkey, recipients: Vec<Pubkey>, percentages: Vec<u32>) -> InstanceConfig {
    InstanceConfig {
        controller: Pubkey::new_unique(),
        investor,
        invested_amount: 100 * UNIT,
        interest_rate: 3_000_000,
        residual_interest_rate: 500_000,
        valuation_unit: ValuationUnit::Native,
        recipients,
        percentages,
        ..InstanceConfig::default()
    }
}

fn create(
    factory: Pubkey,
    creation_id: [u8; 32],
    platform_fee: u32,
    platform_wallet: Pubkey,
    cfg: &InstanceConfig,
) -> Waterfall {
    let salt = derive_salt(&factory, &creation_id, cfg).unwrap();
    let (address, bump) = instance_address(&prepayment_waterfall::ID, &factory, &salt);
    let mut state = Instance::default();
    state
        .initialize(
            InstanceOrigin {
                factory,
                owner: Pubkey::new_unique(),
                platform_fee,
                platform_wallet,
                creation_id,
                salt,
                bump,
            },
            cfg,
        )
        .unwrap();
    Waterfall { address, state }
}

fn error_code<T>(result: Result<T>) -> u32 {
    match result {
        Err(Error::AnchorError(e)) => e.error_code_number,
        Err(other) => panic!("unexpected error {other:?}"),
        Ok(_) => panic!("expected an error"),
    }
}

#[test]
fn investor_phase_then_residual_split() {
    let investor = Pubkey::new_unique();
    let r1 = Pubkey::new_unique();
    let r2 = Pubkey::new_unique();
    let cfg = config(investor, vec![r1, r2], vec![8_000_000, 2_000_000]);
    let mut book = Book::default();
    let mut waterfall = create(Pubkey::new_unique(), [1u8; 32], 0, Pubkey::new_unique(), &cfg);
    assert_eq!(waterfall.state.investor_amount_to_receive, 130 * UNIT as u128);

    let expected = [
        (50 * UNIT, 0, 0),
        (50 * UNIT, 0, 0),
        (31 * UNIT, 15_200_000_000, 3_800_000_000),
        (2_500_000_000, 38 * UNIT, 9_500_000_000),
    ];
    for (investor_gets, r1_gets, r2_gets) in expected {
        let before = (book.balance(&investor), book.balance(&r1), book.balance(&r2));
        book.credit(waterfall.address, 50 * UNIT);
        waterfall.distribute_native(&mut book).unwrap();

        assert_eq!(book.balance(&investor) - before.0, investor_gets);
        assert_eq!(book.balance(&r1) - before.1, r1_gets);
        assert_eq!(book.balance(&r2) - before.2, r2_gets);
        assert_eq!(book.balance(&waterfall.address), 0);
    }
    assert_eq!(waterfall.state.amount_to_investor_cumulative, 200 * UNIT as u128);
    assert_eq!(waterfall.state.remaining_to_target(), 0);
}

#[test]
fn platform_fee_comes_off_the_top() {
    let investor = Pubkey::new_unique();
    let wallet = Pubkey::new_unique();
    let recipient = Pubkey::new_unique();
    let cfg = config(investor, vec![recipient], vec![10_000_000]);
    let mut book = Book::default();

    let mut half = create(Pubkey::new_unique(), [2u8; 32], 5_000_000, wallet, &cfg);
    book.credit(half.address, 50 * UNIT);
    half.distribute_native(&mut book).unwrap();
    assert_eq!(book.balance(&wallet), 25 * UNIT);
    assert_eq!(book.balance(&investor), 25 * UNIT);
    assert_eq!(book.balance(&recipient), 0);
    assert_eq!(half.state.amount_to_investor_cumulative, 25 * UNIT as u128);

    let other_wallet = Pubkey::new_unique();
    let mut fifth = create(Pubkey::new_unique(), [3u8; 32], 2_000_000, other_wallet, &cfg);
    book.credit(fifth.address, 50 * UNIT);
    fifth.distribute_native(&mut book).unwrap();
    assert_eq!(book.balance(&other_wallet), 10 * UNIT);
    assert_eq!(book.balance(&investor), 65 * UNIT);
    assert_eq!(book.balance(&fifth.address), 0);
}

#[test]
fn missing_oracle_leaves_everything_untouched() {
    let investor = Pubkey::new_unique();
    let recipient = Pubkey::new_unique();
    let cfg = config(investor, vec![recipient], vec![10_000_000]);
    let mut book = Book::default();
    let mut waterfall = create(Pubkey::new_unique(), [4u8; 32], 1_000_000, Pubkey::new_unique(), &cfg);

    let mint = Pubkey::new_unique();
    assert!(waterfall.state.price_feed_for(&mint).is_none());

    book.credit(waterfall.address, 40 * UNIT);
    let result = waterfall.distribute(&mut book, |_| Err(ErrorCode::MissingPriceOracle.into()));

    assert_eq!(error_code(result), u32::from(ErrorCode::MissingPriceOracle));
    assert_eq!(book.balance(&waterfall.address), 40 * UNIT);
    assert_eq!(book.balance(&investor), 0);
    assert_eq!(book.balance(&recipient), 0);
    assert_eq!(waterfall.state.amount_to_investor_cumulative, 0);
}

#[test]
fn token_value_counts_toward_target_through_feed() {
    let investor = Pubkey::new_unique();
    let recipient = Pubkey::new_unique();
    let cfg = config(investor, vec![recipient], vec![10_000_000]);
    let mut book = Book::default();
    let mut waterfall = create(Pubkey::new_unique(), [5u8; 32], 0, Pubkey::new_unique(), &cfg);

    // two valued units per token unit, target 130 units
    let price = Price { price: 2, conf: 0, exponent: 0, publish_time: 0 };
    let decimals = Decimals { asset: 9, valuation: 9 };
    book.credit(waterfall.address, 100 * UNIT);
    waterfall
        .distribute(&mut book, |amount| value_of(amount, decimals, &price))
        .unwrap();

    // 200 valued against 130 needed: 65 tokens of priority, 35 of excess
    assert_eq!(book.balance(&investor), 65 * UNIT + 1_750_000_000);
    assert_eq!(book.balance(&recipient), 33_250_000_000);
    assert_eq!(waterfall.state.amount_to_investor_cumulative, 200 * UNIT as u128);
}

#[test]
fn nested_instances_drain_to_zero() {
    let factory = Pubkey::new_unique();
    let investor_b = Pubkey::new_unique();
    let leaf_1 = Pubkey::new_unique();
    let leaf_2 = Pubkey::new_unique();
    let cfg_b = config(investor_b, vec![leaf_1, leaf_2], vec![3_333_333, 6_666_667]);
    let mut inner = create(factory, [6u8; 32], 0, Pubkey::new_unique(), &cfg_b);

    let investor_a = Pubkey::new_unique();
    let other = Pubkey::new_unique();
    let mut cfg_a = config(investor_a, vec![inner.address, other], vec![5_000_000, 5_000_000]);
    cfg_a.invested_amount = UNIT;
    cfg_a.interest_rate = 0;
    let mut outer = create(factory, [7u8; 32], 0, Pubkey::new_unique(), &cfg_a);

    let mut book = Book::default();
    book.credit(outer.address, 777 * UNIT + 13);
    outer.distribute_native(&mut book).unwrap();
    assert_eq!(book.balance(&outer.address), 0);
    assert!(book.balance(&inner.address) > 0);

    inner.distribute_native(&mut book).unwrap();
    assert_eq!(book.balance(&inner.address), 0);

    let paid: u64 = [investor_a, other, investor_b, leaf_1, leaf_2]
        .iter()
        .map(|who| book.balance(who))
        .sum();
    assert_eq!(paid, 777 * UNIT + 13);
}

#[test]
fn empty_balance_is_a_no_op() {
    let cfg = config(Pubkey::new_unique(), vec![Pubkey::new_unique()], vec![10_000_000]);
    let mut book = Book::default();
    let mut waterfall = create(Pubkey::new_unique(), [8u8; 32], 0, Pubkey::new_unique(), &cfg);

    waterfall
        .distribute(&mut book, |_| panic!("valuation must not run"))
        .unwrap();
    assert_eq!(waterfall.state.amount_to_investor_cumulative, 0);
}

#[test]
fn recipient_replacement_applies_to_next_distribution() {
    let investor = Pubkey::new_unique();
    let cfg = config(investor, vec![Pubkey::new_unique()], vec![10_000_000]);
    let mut book = Book::default();
    let mut waterfall = create(Pubkey::new_unique(), [9u8; 32], 0, Pubkey::new_unique(), &cfg);
    waterfall.state.amount_to_investor_cumulative = waterfall.state.investor_amount_to_receive;

    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    let controller = waterfall.state.controller;
    waterfall.state.require_controller(&controller).unwrap();
    waterfall
        .state
        .set_recipients(&[a, b], &[2_500_000, 7_500_000])
        .unwrap();

    book.credit(waterfall.address, 100);
    waterfall.distribute_native(&mut book).unwrap();
    // 5 residual to the investor, 95 split 25/75 with dust to the last entry
    assert_eq!(book.balance(&investor), 5);
    assert_eq!(book.balance(&a), 23);
    assert_eq!(book.balance(&b), 72);
}

#[test]
fn creation_ids_are_consumed_once_and_addresses_are_predictable() {
    let factory = Pubkey::new_unique();
    let creation_id = [42u8; 32];
    let cfg = config(Pubkey::new_unique(), vec![Pubkey::new_unique()], vec![10_000_000]);

    let predicted =
        predict_instance_address(&prepayment_waterfall::ID, &factory, &creation_id, &cfg).unwrap();
    let created = create(factory, creation_id, 0, Pubkey::new_unique(), &cfg);
    assert_eq!(created.address, predicted);

    let mut record = CreationRecord {
        creation_id: [0u8; 32],
        instance: Pubkey::default(),
        processed: false,
        bump: 0,
    };
    record.mark_processed(creation_id, created.address, 255).unwrap();
    assert_eq!(
        error_code(record.mark_processed(creation_id, created.address, 255)),
        u32::from(ErrorCode::CreationIdAlreadyProcessed)
    );
    assert_eq!(
        error_code(record.require_unprocessed()),
        u32::from(ErrorCode::CreationIdAlreadyProcessed)
    );

    let mut state = created.state.clone();
    assert_eq!(
        error_code(state.initialize(
            InstanceOrigin {
                factory,
                owner: Pubkey::new_unique(),
                platform_fee: 0,
                platform_wallet: Pubkey::new_unique(),
                creation_id,
                salt: created.state.salt,
                bump: created.state.bump,
            },
            &cfg,
        )),
        u32::from(ErrorCode::AlreadyInitialized)
    );

    let other_id =
        predict_instance_address(&prepayment_waterfall::ID, &factory, &[43u8; 32], &cfg).unwrap();
    assert_ne!(other_id, predicted);
}

#[test]
fn mismatched_lengths_are_rejected_before_creation() {
    let mut cfg = config(Pubkey::new_unique(), vec![Pubkey::new_unique()], vec![5_000_000, 5_000_000]);
    assert_eq!(
        error_code(cfg.validate_lengths()),
        u32::from(ErrorCode::InconsistentDataLength)
    );

    cfg.percentages = vec![10_000_000];
    cfg.supported_assets = vec![Pubkey::new_unique()];
    assert_eq!(
        error_code(cfg.validate_lengths()),
        u32::from(ErrorCode::InconsistentDataLength)
    );
}
