//! Voucher payment ledger.
//!
//! The ledger pays out its own balance of the configured payment token to
//! payees that present a voucher signed by the voucher signer.
//!
//! ```text
//! release(caller, amount, signature)
//!        │
//!        ▼
//! ┌─────────────────────┐
//! │ paused?             │──yes──► ContractPaused
//! └─────────┬───────────┘
//!           ▼
//! ┌─────────────────────┐
//! │ recover signer of   │
//! │ (caller, nonce,     │──≠ voucher signer──► InvalidVoucher
//! │  amount)            │
//! └─────────┬───────────┘
//!           ▼
//! ┌─────────────────────┐
//! │ token.transfer      │──fails──► TransferFailed
//! └─────────┬───────────┘
//!           ▼
//!   nonce += 1, emit PaymentReleased
//! ```
//!
//! Each call holds the state lock from its first check to its last write,
//! so calls are serialized and a failing call leaves no trace.

mod nonces;
mod state;

pub use state::LedgerStats;

use crate::config::LedgerConfig;
use crate::error::{Error, Result};
use crate::event::{
    create_event_channel, LedgerEvent, LedgerEventsChannel, LedgerEventsSender, PaymentReleased,
};
use crate::token::TokenRegistry;
use crate::voucher::{payment_domain, verify_voucher, PaymentVoucher};
use alloy::primitives::{Address, U256};
use alloy::sol_types::Eip712Domain;
use parking_lot::Mutex;
use state::LedgerState;
use tracing::{debug, info, warn};

/// Builder for deploying a ledger.
pub struct LedgerBuilder {
    config: LedgerConfig,
    owner: Address,
    deployer_nonce: u64,
    tokens: TokenRegistry,
}

impl LedgerBuilder {
    /// Create a new builder with the given configuration.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            owner: Address::ZERO,
            deployer_nonce: 0,
            tokens: TokenRegistry::new(),
        }
    }

    /// Account deploying the ledger; it becomes the owner.
    #[must_use]
    pub fn owner(mut self, owner: Address) -> Self {
        self.owner = owner;
        self
    }

    /// Transaction count of the deployer, used to derive the ledger address
    /// when the configuration does not pin one.
    #[must_use]
    pub fn deployer_nonce(mut self, nonce: u64) -> Self {
        self.deployer_nonce = nonce;
        self
    }

    /// Tokens the ledger can pay out in.
    #[must_use]
    pub fn tokens(mut self, tokens: TokenRegistry) -> Self {
        self.tokens = tokens;
        self
    }

    /// Deploy the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or no owner was set.
    pub fn build(self) -> Result<PaymentSender> {
        self.config.validate()?;
        if self.owner.is_zero() {
            return Err(Error::Config("ledger owner must be set".to_string()));
        }

        let address = self
            .config
            .domain
            .verifying_contract
            .unwrap_or_else(|| self.owner.create(self.deployer_nonce));
        let domain = payment_domain(self.config.domain.chain_id, address);

        let payment = &self.config.payment;
        if !self.tokens.contains(&payment.payment_token) {
            debug!(
                "No token registered at {} yet; releases fail until one is",
                payment.payment_token
            );
        }

        let (events_tx, _) = create_event_channel();
        let mut state = LedgerState::new(self.owner, payment.voucher_signer, payment.payment_token);
        let deployed = LedgerEvent::OwnershipTransferred {
            previous: Address::ZERO,
            current: self.owner,
        };
        state.log.push(deployed);

        info!(
            "Payment sender deployed at {} (chain_id={}, owner={}, signer={}, token={})",
            address,
            self.config.domain.chain_id,
            self.owner,
            payment.voucher_signer,
            payment.payment_token
        );

        Ok(PaymentSender {
            address,
            domain,
            tokens: self.tokens,
            state: Mutex::new(state),
            events_tx,
        })
    }
}

/// Ledger releasing token payments against signed vouchers.
pub struct PaymentSender {
    address: Address,
    domain: Eip712Domain,
    tokens: TokenRegistry,
    state: Mutex<LedgerState>,
    events_tx: LedgerEventsSender,
}

impl PaymentSender {
    /// Redeem a voucher for `amount` tokens, paid to `caller`.
    ///
    /// The voucher is rebuilt from the caller and the caller's current
    /// nonce, so `signature` only has to cover the amount.
    ///
    /// # Errors
    ///
    /// * [`Error::ContractPaused`] - the ledger is paused
    /// * [`Error::InvalidVoucher`] - the signature does not recover to the
    ///   voucher signer for this payee, nonce and amount
    /// * [`Error::TransferFailed`] - the token transfer did not go through
    pub fn release(
        &self,
        caller: Address,
        amount: U256,
        signature: &[u8],
    ) -> Result<PaymentReleased> {
        let mut state = self.state.lock();
        match self.try_release(&mut state, caller, amount, signature) {
            Ok(released) => Ok(released),
            Err(e) => {
                state.stats.rejections += 1;
                warn!("Release for {} rejected: {}", caller, e);
                Err(e)
            }
        }
    }

    fn try_release(
        &self,
        state: &mut LedgerState,
        payee: Address,
        amount: U256,
        signature: &[u8],
    ) -> Result<PaymentReleased> {
        state.when_not_paused()?;

        if amount.is_zero() {
            debug!("Zero-amount voucher presented by {}", payee);
            return Err(Error::InvalidVoucher);
        }

        let nonce = state.nonces.current(&payee);
        let voucher = PaymentVoucher::new(payee, nonce, amount);
        verify_voucher(&self.domain, &voucher, signature, state.voucher_signer)?;
        let next = state.nonces.next(&payee).ok_or(Error::InvalidVoucher)?;

        let token = self.tokens.get(&state.payment_token).ok_or_else(|| {
            Error::TransferFailed(format!("no token deployed at {}", state.payment_token))
        })?;
        match token.transfer(self.address, payee, amount) {
            Ok(true) => {}
            Ok(false) => {
                return Err(Error::TransferFailed("token returned false".to_string()));
            }
            Err(e) => return Err(Error::TransferFailed(e.to_string())),
        }

        state.nonces.commit(payee, next);
        state.stats.releases += 1;
        state.stats.released_total = state.stats.released_total.saturating_add(amount);

        let released = PaymentReleased {
            payee,
            nonce,
            amount,
        };
        self.emit(state, LedgerEvent::PaymentReleased(released));
        info!(
            "Released {} of {} to {} (nonce={})",
            amount, state.payment_token, payee, nonce
        );
        Ok(released)
    }

    /// Suspend releases. Pausing a paused ledger is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] if `caller` is not the owner.
    pub fn pause(&self, caller: Address) -> Result<()> {
        let mut state = self.state.lock();
        state.only_owner(caller)?;
        if state.paused {
            debug!("Pause requested while already paused");
            return Ok(());
        }
        state.paused = true;
        self.emit(&mut state, LedgerEvent::Paused { account: caller });
        info!("Releases paused by {}", caller);
        Ok(())
    }

    /// Resume releases. Unpausing an active ledger is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] if `caller` is not the owner.
    pub fn unpause(&self, caller: Address) -> Result<()> {
        let mut state = self.state.lock();
        state.only_owner(caller)?;
        if !state.paused {
            debug!("Unpause requested while not paused");
            return Ok(());
        }
        state.paused = false;
        self.emit(&mut state, LedgerEvent::Unpaused { account: caller });
        info!("Releases resumed by {}", caller);
        Ok(())
    }

    /// Replace the voucher signer. Takes effect for the next release.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] if `caller` is not the owner.
    pub fn set_voucher_signer(&self, caller: Address, new_signer: Address) -> Result<()> {
        let mut state = self.state.lock();
        state.only_owner(caller)?;
        let previous = std::mem::replace(&mut state.voucher_signer, new_signer);
        self.emit(
            &mut state,
            LedgerEvent::VoucherSignerChanged {
                previous,
                current: new_signer,
            },
        );
        info!("Voucher signer changed from {} to {}", previous, new_signer);
        Ok(())
    }

    /// Replace the payment token. Balances held in the old token stay put.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] if `caller` is not the owner.
    pub fn set_payment_token(&self, caller: Address, new_token: Address) -> Result<()> {
        let mut state = self.state.lock();
        state.only_owner(caller)?;
        let previous = std::mem::replace(&mut state.payment_token, new_token);
        self.emit(
            &mut state,
            LedgerEvent::PaymentTokenChanged {
                previous,
                current: new_token,
            },
        );
        info!("Payment token changed from {} to {}", previous, new_token);
        Ok(())
    }

    /// Hand ownership to `new_owner`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] if `caller` is not the owner, or
    /// [`Error::ZeroAddress`] if `new_owner` is the zero address.
    pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<()> {
        let mut state = self.state.lock();
        state.only_owner(caller)?;
        if new_owner.is_zero() {
            return Err(Error::ZeroAddress);
        }
        self.set_owner(&mut state, new_owner);
        Ok(())
    }

    /// Give up ownership. Every owner-only call fails afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] if `caller` is not the owner.
    pub fn renounce_ownership(&self, caller: Address) -> Result<()> {
        let mut state = self.state.lock();
        state.only_owner(caller)?;
        self.set_owner(&mut state, Address::ZERO);
        Ok(())
    }

    fn set_owner(&self, state: &mut LedgerState, new_owner: Address) {
        let previous = std::mem::replace(&mut state.owner, new_owner);
        self.emit(
            state,
            LedgerEvent::OwnershipTransferred {
                previous,
                current: new_owner,
            },
        );
        info!("Ownership transferred from {} to {}", previous, new_owner);
    }

    fn emit(&self, state: &mut LedgerState, event: LedgerEvent) {
        state.log.push(event.clone());
        // No subscribers is fine; the log keeps the record.
        let _ = self.events_tx.send(event);
    }

    /// Address of the ledger.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// EIP712 domain vouchers must be signed under.
    #[must_use]
    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// Nonce the next voucher for `payee` must carry.
    #[must_use]
    pub fn nonce(&self, payee: Address) -> U256 {
        self.state.lock().nonces.current(&payee)
    }

    /// Whether releases are suspended.
    #[must_use]
    pub fn paused(&self) -> bool {
        self.state.lock().paused
    }

    /// Current owner, zero once renounced.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.state.lock().owner
    }

    /// Address whose vouchers are honoured.
    #[must_use]
    pub fn voucher_signer(&self) -> Address {
        self.state.lock().voucher_signer
    }

    /// Token paid out on release.
    #[must_use]
    pub fn payment_token(&self) -> Address {
        self.state.lock().payment_token
    }

    /// Ledger balance of the current payment token.
    #[must_use]
    pub fn token_balance(&self) -> U256 {
        let token = self.payment_token();
        self.tokens
            .get(&token)
            .map(|t| t.balance_of(self.address))
            .unwrap_or_default()
    }

    /// Every event emitted so far, oldest first.
    #[must_use]
    pub fn event_log(&self) -> Vec<LedgerEvent> {
        self.state.lock().log.clone()
    }

    /// Subscribe to events emitted from now on.
    #[must_use]
    pub fn subscribe_events(&self) -> LedgerEventsChannel {
        self.events_tx.subscribe()
    }

    /// Release statistics.
    #[must_use]
    pub fn stats(&self) -> LedgerStats {
        self.state.lock().stats.clone()
    }

    /// Token registry the ledger resolves payment tokens through.
    #[must_use]
    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }
}

impl std::fmt::Debug for PaymentSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PaymentSender")
            .field("address", &self.address)
            .field("owner", &state.owner)
            .field("voucher_signer", &state.voucher_signer)
            .field("payment_token", &state.payment_token)
            .field("paused", &state.paused)
            .finish_non_exhaustive()
    }
}
