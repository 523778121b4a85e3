//! In-memory ERC20 token.

use super::{Erc20, TokenError};
use alloy::primitives::{Address, U256};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

/// Default supply minted to the deployer (1,000,000 tokens with 18 decimals).
pub const DEFAULT_SUPPLY: U256 = U256::from_limbs([0x1bce_cced_a100_0000, 0xd3c2, 0, 0]);

/// ERC20 token whose balances live in process memory.
///
/// The full supply is minted to the deployer, as a freshly deployed
/// fixed-supply token would do.
#[derive(Debug)]
pub struct MemoryToken {
    address: Address,
    symbol: String,
    total_supply: U256,
    balances: Mutex<HashMap<Address, U256>>,
}

impl MemoryToken {
    /// Deploy a token at `address`, minting `supply` to `owner`.
    #[must_use]
    pub fn deploy(address: Address, owner: Address, supply: U256) -> Self {
        Self::with_symbol(address, owner, supply, "TST")
    }

    /// Deploy a token with an explicit symbol.
    #[must_use]
    pub fn with_symbol(address: Address, owner: Address, supply: U256, symbol: &str) -> Self {
        let mut balances = HashMap::new();
        if !supply.is_zero() {
            balances.insert(owner, supply);
        }
        Self {
            address,
            symbol: symbol.to_string(),
            total_supply: supply,
            balances: Mutex::new(balances),
        }
    }

    /// Token symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl Erc20 for MemoryToken {
    fn address(&self) -> Address {
        self.address
    }

    fn balance_of(&self, account: Address) -> U256 {
        self.balances
            .lock()
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    fn total_supply(&self) -> U256 {
        self.total_supply
    }

    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<bool, TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroRecipient);
        }

        let mut balances = self.balances.lock();
        let from_balance = balances.get(&from).copied().unwrap_or_default();
        let remaining = from_balance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance)?;

        if from != to {
            let to_balance = balances.get(&to).copied().unwrap_or_default();
            let credited = to_balance
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
            balances.insert(from, remaining);
            balances.insert(to, credited);
        }

        debug!("{}: {} -> {} ({})", self.symbol, from, to, amount);
        Ok(true)
    }
}
