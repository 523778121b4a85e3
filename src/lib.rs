//! # payment-sender
//!
//! Voucher-based payment ledger for ERC20-style tokens.
//!
//! A voucher signer authorizes payouts off-chain by signing EIP712
//! `PaymentVoucher(address payee,uint256 nonce,uint256 amount)` messages. A
//! payee redeems a voucher by calling [`PaymentSender::release`] with the
//! amount and the signature; the ledger checks the signature against its
//! configured signer and the payee's current nonce, transfers the tokens
//! from its own balance and advances the nonce so the voucher cannot be
//! used again.
//!
//! ## Example
//!
//! ```rust,ignore
//! use payment_sender::{LedgerBuilder, LedgerConfig, MemoryToken, TokenRegistry};
//!
//! let tokens = TokenRegistry::new();
//! tokens.register(Arc::new(MemoryToken::deploy(token, owner, supply)));
//!
//! let ledger = LedgerBuilder::new(LedgerConfig::new(1337, signer.address(), token))
//!     .owner(owner)
//!     .tokens(tokens)
//!     .build()?;
//!
//! let voucher = PaymentVoucher::new(payee, ledger.nonce(payee), amount);
//! let signature = sign_voucher(&signer, ledger.domain(), &voucher)?;
//! ledger.release(payee, amount, &signature.as_bytes())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod event;
pub mod ledger;
pub mod token;
pub mod voucher;

pub use config::LedgerConfig;
pub use error::{Error, Result};
pub use event::{LedgerEvent, PaymentReleased};
pub use ledger::{LedgerBuilder, LedgerStats, PaymentSender};
pub use token::{Erc20, MemoryToken, TokenError, TokenRegistry};
pub use voucher::{payment_domain, recover_signer, sign_voucher, verify_voucher, PaymentVoucher};
