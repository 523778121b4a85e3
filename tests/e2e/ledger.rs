//! Ledger E2E tests.
//!
//! ## Test Coverage
//!
//! - Voucher release and token delivery
//! - Replay rejection
//! - Foreign signer rejection
//! - Pause / unpause gating
//! - `PaymentReleased` event contents
//! - Owner-only configuration (pause, signer, token, ownership)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::harness::TestHarness;
use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use payment_sender::{Erc20, Error, LedgerEvent, PaymentReleased};

const PAYMENT_AMOUNT: u64 = 100;

fn amount() -> U256 {
    U256::from(PAYMENT_AMOUNT)
}

#[test]
fn test_payee_can_release_payment() {
    let harness = TestHarness::setup().expect("Failed to setup harness");
    let ledger = harness.ledger();
    let payee = harness.accounts().address(1);

    let nonce = ledger.nonce(payee);
    let voucher = harness.create_voucher(harness.voucher_signer(), payee, nonce, amount());

    assert_eq!(harness.token().balance_of(payee), U256::ZERO);

    ledger.release(payee, amount(), &voucher.as_bytes()).unwrap();

    assert_eq!(harness.token().balance_of(payee), amount());
    assert_eq!(ledger.nonce(payee), nonce + U256::from(1));
}

#[test]
fn test_payee_cant_use_voucher_twice() {
    let harness = TestHarness::setup().expect("Failed to setup harness");
    let ledger = harness.ledger();
    let payee = harness.accounts().address(1);

    let voucher = harness.create_voucher(
        harness.voucher_signer(),
        payee,
        ledger.nonce(payee),
        amount(),
    );

    ledger.release(payee, amount(), &voucher.as_bytes()).unwrap();

    let err = ledger
        .release(payee, amount(), &voucher.as_bytes())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidVoucher));
    assert!(err.to_string().contains("voucher is invalid"));
    assert_eq!(harness.token().balance_of(payee), amount());
}

#[test]
fn test_payee_cant_use_invalid_voucher() {
    let harness = TestHarness::setup().expect("Failed to setup harness");
    let ledger = harness.ledger();
    let payee = harness.accounts().address(1);
    let invalid_signer = PrivateKeySigner::random();

    let invalid_voucher =
        harness.create_voucher(&invalid_signer, payee, ledger.nonce(payee), amount());

    let err = ledger
        .release(payee, amount(), &invalid_voucher.as_bytes())
        .unwrap_err();
    assert!(err.to_string().contains("voucher is invalid"));
    assert_eq!(ledger.nonce(payee), U256::ZERO);
}

#[test]
fn test_payee_cant_release_payment_when_paused() {
    let harness = TestHarness::setup().expect("Failed to setup harness");
    let ledger = harness.ledger();
    let owner = harness.owner();
    let payee = harness.accounts().address(1);

    let voucher = harness.create_voucher(
        harness.voucher_signer(),
        payee,
        ledger.nonce(payee),
        amount(),
    );

    ledger.pause(owner).unwrap();
    assert!(ledger.paused());

    let err = ledger
        .release(payee, amount(), &voucher.as_bytes())
        .unwrap_err();
    assert!(err.to_string().contains("paused"));
    assert_eq!(ledger.nonce(payee), U256::ZERO);

    // The same voucher is honoured once releases resume.
    ledger.unpause(owner).unwrap();
    ledger.release(payee, amount(), &voucher.as_bytes()).unwrap();
    assert_eq!(harness.token().balance_of(payee), amount());
}

#[test]
fn test_release_emits_event() {
    let harness = TestHarness::setup().expect("Failed to setup harness");
    let ledger = harness.ledger();
    let payee = harness.accounts().address(1);

    let nonce = ledger.nonce(payee);
    let voucher = harness.create_voucher(harness.voucher_signer(), payee, nonce, amount());

    let released = ledger.release(payee, amount(), &voucher.as_bytes()).unwrap();
    assert_eq!(released.payee, payee);
    assert_eq!(released.nonce, nonce);
    assert_eq!(released.amount, amount());

    assert_eq!(
        ledger.event_log().last(),
        Some(&LedgerEvent::PaymentReleased(PaymentReleased {
            payee,
            nonce,
            amount: amount(),
        }))
    );
}

#[test]
fn test_only_owner_can_pause() {
    let harness = TestHarness::setup().expect("Failed to setup harness");
    let ledger = harness.ledger();
    let random_account = harness.accounts().address(1);

    assert!(!ledger.paused());

    let err = ledger.pause(random_account).unwrap_err();
    assert!(err.to_string().contains("caller is not the owner"));
    assert!(!ledger.paused());

    ledger.pause(harness.owner()).unwrap();
    assert!(ledger.paused());
}

#[test]
fn test_only_owner_can_unpause() {
    let harness = TestHarness::setup().expect("Failed to setup harness");
    let ledger = harness.ledger();
    let random_account = harness.accounts().address(1);

    ledger.pause(harness.owner()).unwrap();
    assert!(ledger.paused());

    let err = ledger.unpause(random_account).unwrap_err();
    assert!(err.to_string().contains("caller is not the owner"));
    assert!(ledger.paused());

    ledger.unpause(harness.owner()).unwrap();
    assert!(!ledger.paused());
}

#[test]
fn test_only_owner_can_change_voucher_signer() {
    let accounts = super::DevAccounts::load();
    let harness = TestHarness::setup_with_signer(accounts.signer(1).clone())
        .expect("Failed to setup harness");
    let ledger = harness.ledger();
    let new_voucher_signer = accounts.address(2);
    let random_account = accounts.address(3);

    assert_eq!(ledger.voucher_signer(), accounts.address(1));

    let err = ledger
        .set_voucher_signer(random_account, new_voucher_signer)
        .unwrap_err();
    assert!(err.to_string().contains("caller is not the owner"));

    ledger
        .set_voucher_signer(harness.owner(), new_voucher_signer)
        .unwrap();
    assert_eq!(ledger.voucher_signer(), new_voucher_signer);
}

#[test]
fn test_only_owner_can_change_payment_token() {
    let mut harness = TestHarness::setup().expect("Failed to setup harness");
    let original = harness.token().address();
    let new_token = harness.deploy_token();
    let ledger = harness.ledger();
    let random_account = harness.accounts().address(1);

    assert_eq!(ledger.payment_token(), original);

    let err = ledger
        .set_payment_token(random_account, new_token.address())
        .unwrap_err();
    assert!(err.to_string().contains("caller is not the owner"));

    ledger
        .set_payment_token(harness.owner(), new_token.address())
        .unwrap();
    assert_eq!(ledger.payment_token(), new_token.address());
}

#[test]
fn test_token_switch_pays_from_new_token() {
    let mut harness = TestHarness::setup().expect("Failed to setup harness");
    let owner = harness.owner();
    let payee = harness.accounts().address(1);
    let old_token_balance = harness.token().balance_of(harness.ledger().address());

    let new_token = harness.deploy_token();
    new_token
        .transfer(owner, harness.ledger().address(), amount())
        .unwrap();
    harness
        .ledger()
        .set_payment_token(owner, new_token.address())
        .unwrap();

    let voucher = harness.create_voucher(
        harness.voucher_signer(),
        payee,
        harness.ledger().nonce(payee),
        amount(),
    );
    harness
        .ledger()
        .release(payee, amount(), &voucher.as_bytes())
        .unwrap();

    assert_eq!(new_token.balance_of(payee), amount());
    assert_eq!(harness.token().balance_of(payee), U256::ZERO);
    assert_eq!(
        harness.token().balance_of(harness.ledger().address()),
        old_token_balance
    );
}

#[test]
fn test_ownership_handover() {
    let harness = TestHarness::setup().expect("Failed to setup harness");
    let ledger = harness.ledger();
    let owner = harness.owner();
    let successor = harness.accounts().address(2);

    assert!(matches!(
        ledger.transfer_ownership(owner, Address::ZERO),
        Err(Error::ZeroAddress)
    ));

    ledger.transfer_ownership(owner, successor).unwrap();
    assert_eq!(ledger.owner(), successor);

    assert!(matches!(ledger.pause(owner), Err(Error::Unauthorized)));
    ledger.pause(successor).unwrap();
    assert!(ledger.paused());
}

#[test]
fn test_fund_release_scenario() {
    let harness = TestHarness::setup().expect("Failed to setup harness");
    let ledger = harness.ledger();
    let payee = harness.accounts().address(1);
    let funded = ledger.token_balance();

    let first = harness.create_voucher(harness.voucher_signer(), payee, U256::ZERO, amount());
    let second =
        harness.create_voucher(harness.voucher_signer(), payee, U256::from(1), amount());

    // A voucher for a future nonce is not valid yet.
    assert!(matches!(
        ledger.release(payee, amount(), &second.as_bytes()),
        Err(Error::InvalidVoucher)
    ));

    ledger.release(payee, amount(), &first.as_bytes()).unwrap();
    ledger.release(payee, amount(), &second.as_bytes()).unwrap();

    assert_eq!(ledger.nonce(payee), U256::from(2));
    assert_eq!(harness.token().balance_of(payee), amount() * U256::from(2));
    assert_eq!(ledger.token_balance(), funded - amount() * U256::from(2));
    assert_eq!(ledger.stats().releases, 2);
    assert_eq!(ledger.stats().rejections, 1);
}
