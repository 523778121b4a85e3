//! Mutable ledger state and owner checks.

use super::nonces::NonceBook;
use crate::error::{Error, Result};
use crate::event::LedgerEvent;
use alloy::primitives::{Address, U256};

/// Counters for monitoring release traffic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LedgerStats {
    /// Successful releases.
    pub releases: u64,
    /// Rejected release attempts.
    pub rejections: u64,
    /// Sum of released amounts, across payment tokens.
    pub released_total: U256,
}

impl LedgerStats {
    /// Share of release attempts that were rejected, as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rejection_rate(&self) -> f64 {
        let total = self.releases + self.rejections;
        if total == 0 {
            0.0
        } else {
            (self.rejections as f64 / total as f64) * 100.0
        }
    }
}

/// Everything a ledger call may read or write.
#[derive(Debug)]
pub(crate) struct LedgerState {
    pub(crate) owner: Address,
    pub(crate) voucher_signer: Address,
    pub(crate) payment_token: Address,
    pub(crate) paused: bool,
    pub(crate) nonces: NonceBook,
    pub(crate) log: Vec<LedgerEvent>,
    pub(crate) stats: LedgerStats,
}

impl LedgerState {
    pub(crate) fn new(owner: Address, voucher_signer: Address, payment_token: Address) -> Self {
        Self {
            owner,
            voucher_signer,
            payment_token,
            paused: false,
            nonces: NonceBook::new(),
            log: Vec::new(),
            stats: LedgerStats::default(),
        }
    }

    /// Fail with [`Error::Unauthorized`] unless `caller` owns the ledger.
    pub(crate) fn only_owner(&self, caller: Address) -> Result<()> {
        // A renounced ledger has the zero owner, which no caller can be.
        if caller == self.owner && !self.owner.is_zero() {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }

    /// Fail with [`Error::ContractPaused`] while paused.
    pub(crate) fn when_not_paused(&self) -> Result<()> {
        if self.paused {
            Err(Error::ContractPaused)
        } else {
            Ok(())
        }
    }
}
