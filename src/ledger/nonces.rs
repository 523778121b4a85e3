//! Per-payee voucher nonces.

use alloy::primitives::{Address, U256};
use std::collections::HashMap;

/// Next valid voucher nonce for every payee.
///
/// Payees that never released anything are absent and read as zero.
/// Nonces only move forward, one step per successful release.
#[derive(Debug, Default, Clone)]
pub(crate) struct NonceBook {
    nonces: HashMap<Address, U256>,
}

impl NonceBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nonce the next voucher for `payee` must carry.
    #[must_use]
    pub fn current(&self, payee: &Address) -> U256 {
        self.nonces.get(payee).copied().unwrap_or_default()
    }

    /// Nonce following the current one, or `None` if the counter is exhausted.
    #[must_use]
    pub fn next(&self, payee: &Address) -> Option<U256> {
        self.current(payee).checked_add(U256::from(1))
    }

    /// Store `next` as the payee's nonce.
    ///
    /// Callers obtain `next` from [`Self::next`] and commit it only once the
    /// release has gone through.
    pub fn commit(&mut self, payee: Address, next: U256) {
        debug_assert!(next > self.current(&payee));
        self.nonces.insert(payee, next);
    }
}
