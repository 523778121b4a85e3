//! ERC20-compatible payment tokens.
//!
//! The ledger addresses tokens the way a contract does: by address. A
//! [`TokenRegistry`] resolves an address to the token living there, and the
//! ledger calls [`Erc20::transfer`] on it with its own address as sender.

mod memory;

pub use memory::{MemoryToken, DEFAULT_SUPPLY};

use alloy::primitives::{Address, U256};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by token contracts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Sender balance is lower than the transfer amount.
    #[error("ERC20: transfer amount exceeds balance")]
    InsufficientBalance,

    /// Transfer to the zero address.
    #[error("ERC20: transfer to the zero address")]
    ZeroRecipient,

    /// Recipient balance would overflow.
    #[error("ERC20: balance overflow")]
    Overflow,
}

/// The subset of ERC20 the ledger relies on.
pub trait Erc20: Send + Sync {
    /// Address the token is deployed at.
    fn address(&self) -> Address;

    /// Balance held by `account`.
    fn balance_of(&self, account: Address) -> U256;

    /// Total amount in circulation.
    fn total_supply(&self) -> U256;

    /// Move `amount` from `from` to `to`.
    ///
    /// Returns `Ok(false)` for tokens that signal failure through the
    /// return value instead of reverting.
    ///
    /// # Errors
    ///
    /// Returns an error when the token reverts.
    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<bool, TokenError>;
}

/// Address book of deployed tokens.
#[derive(Default, Clone)]
pub struct TokenRegistry {
    tokens: Arc<RwLock<HashMap<Address, Arc<dyn Erc20>>>>,
}

impl TokenRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token under its own address, replacing any previous one.
    pub fn register(&self, token: Arc<dyn Erc20>) {
        self.tokens.write().insert(token.address(), token);
    }

    /// Look up the token deployed at `address`.
    #[must_use]
    pub fn get(&self, address: &Address) -> Option<Arc<dyn Erc20>> {
        self.tokens.read().get(address).cloned()
    }

    /// Check whether a token is deployed at `address`.
    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        self.tokens.read().contains_key(address)
    }

    /// Number of registered tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    /// Check whether no token is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

impl std::fmt::Debug for TokenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRegistry")
            .field("tokens", &self.tokens.read().keys().collect::<Vec<_>>())
            .finish()
    }
}
