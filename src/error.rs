//! Error types for payment-sender.

use thiserror::Error;

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by ledger calls and supporting modules.
///
/// Every ledger error aborts the whole call: no nonce moves, no tokens move
/// and no event is emitted.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller is not the current owner.
    #[error("Ownable: caller is not the owner")]
    Unauthorized,

    /// `release` called while the ledger is paused.
    #[error("Pausable: paused")]
    ContractPaused,

    /// Voucher signature, signer, nonce or amount did not check out.
    ///
    /// The individual causes share one variant so callers cannot tell
    /// which check failed.
    #[error("voucher is invalid")]
    InvalidVoucher,

    /// The token transfer failed, returned false, or the token is unknown.
    #[error("transfer failed: {0}")]
    TransferFailed(String),

    /// Ownership cannot be handed to the zero address.
    #[error("Ownable: new owner is the zero address")]
    ZeroAddress,

    /// Producing a voucher signature failed.
    #[error("signing error: {0}")]
    Signing(String),

    /// Configuration could not be parsed or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
