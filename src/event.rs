//! Ledger event system.

use alloy::primitives::{Address, U256};
use tokio::sync::broadcast;

/// Record of a successful voucher release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentReleased {
    /// Account that received the tokens.
    pub payee: Address,
    /// Nonce the voucher was issued for.
    pub nonce: U256,
    /// Amount of payment token transferred.
    pub amount: U256,
}

/// Events emitted by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A voucher was redeemed.
    PaymentReleased(PaymentReleased),

    /// Releases were suspended.
    Paused {
        /// Account that paused.
        account: Address,
    },

    /// Releases were resumed.
    Unpaused {
        /// Account that unpaused.
        account: Address,
    },

    /// The voucher signer was replaced.
    VoucherSignerChanged {
        /// Previous signer.
        previous: Address,
        /// New signer.
        current: Address,
    },

    /// The payment token was replaced.
    PaymentTokenChanged {
        /// Previous token.
        previous: Address,
        /// New token.
        current: Address,
    },

    /// Ownership moved to another account.
    OwnershipTransferred {
        /// Previous owner.
        previous: Address,
        /// New owner, zero when renounced.
        current: Address,
    },
}

/// Channel for receiving ledger events.
pub type LedgerEventsChannel = broadcast::Receiver<LedgerEvent>;

/// Sender for ledger events.
pub type LedgerEventsSender = broadcast::Sender<LedgerEvent>;

/// Create a new event channel pair.
#[must_use]
pub fn create_event_channel() -> (LedgerEventsSender, LedgerEventsChannel) {
    broadcast::channel(256)
}
