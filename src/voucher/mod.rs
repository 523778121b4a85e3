//! Payment vouchers.
//!
//! A voucher authorizes one release of `amount` payment tokens to `payee`.
//! It is never stored: the issuer signs it off-chain with EIP712 and the
//! payee presents only the amount and the signature. The ledger rebuilds
//! the voucher from the caller address and the caller's current nonce, so a
//! signature is bound to exactly one (payee, nonce) pair.
//!
//! ```text
//! domain   = { name: "Payment Sender", version: "1", chainId, verifyingContract }
//! struct   = PaymentVoucher(address payee,uint256 nonce,uint256 amount)
//! digest   = keccak256("\x19\x01" || domainSeparator || hashStruct(voucher))
//! ```

mod signature;

pub use signature::{recover_signer, sign_voucher, verify_voucher, SIGNATURE_SIZE};

use alloy::primitives::{Address, B256, U256};
use alloy::sol;
use alloy::sol_types::{Eip712Domain, SolStruct};
use std::borrow::Cow;

/// EIP712 domain name every voucher is signed under.
pub const DOMAIN_NAME: &str = "Payment Sender";

/// EIP712 domain version every voucher is signed under.
pub const DOMAIN_VERSION: &str = "1";

sol! {
    /// Payment authorization signed by the voucher signer.
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    struct PaymentVoucher {
        address payee;
        uint256 nonce;
        uint256 amount;
    }
}

impl PaymentVoucher {
    /// Create a voucher.
    #[must_use]
    pub const fn new(payee: Address, nonce: U256, amount: U256) -> Self {
        Self {
            payee,
            nonce,
            amount,
        }
    }

    /// EIP712 signing hash of this voucher under `domain`.
    #[must_use]
    pub fn digest(&self, domain: &Eip712Domain) -> B256 {
        self.eip712_signing_hash(domain)
    }
}

/// Domain for a ledger at `verifying_contract` on `chain_id`.
///
/// Name and version are fixed; only the chain and the contract address vary
/// between deployments.
#[must_use]
pub fn payment_domain(chain_id: u64, verifying_contract: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed(DOMAIN_NAME)),
        Some(Cow::Borrowed(DOMAIN_VERSION)),
        Some(U256::from(chain_id)),
        Some(verifying_contract),
        None,
    )
}
