//! ECDSA signing and signer recovery for payment vouchers.

use super::PaymentVoucher;
use crate::error::{Error, Result};
use alloy::primitives::{Address, Signature};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use alloy::sol_types::Eip712Domain;
use tracing::debug;

/// Recoverable secp256k1 signature size in bytes (`r || s || v`).
pub const SIGNATURE_SIZE: usize = 65;

/// Sign a voucher as the voucher issuer.
///
/// # Errors
///
/// Returns an error if the signer fails to produce a signature.
pub fn sign_voucher(
    signer: &PrivateKeySigner,
    domain: &Eip712Domain,
    voucher: &PaymentVoucher,
) -> Result<Signature> {
    let digest = voucher.digest(domain);
    debug!(
        "Signing voucher for {} (nonce={}, amount={}) as {}",
        voucher.payee,
        voucher.nonce,
        voucher.amount,
        signer.address()
    );
    signer
        .sign_hash_sync(&digest)
        .map_err(|e| Error::Signing(e.to_string()))
}

/// Recover the address that signed `voucher` under `domain`.
///
/// # Errors
///
/// Returns [`Error::InvalidVoucher`] if the signature is not 65 bytes, is
/// malformed, or does not recover to a public key.
pub fn recover_signer(
    domain: &Eip712Domain,
    voucher: &PaymentVoucher,
    signature: &[u8],
) -> Result<Address> {
    if signature.len() != SIGNATURE_SIZE {
        debug!(
            "Invalid signature size: expected {SIGNATURE_SIZE}, got {}",
            signature.len()
        );
        return Err(Error::InvalidVoucher);
    }

    let sig = Signature::try_from(signature).map_err(|e| {
        debug!("Invalid signature format: {e}");
        Error::InvalidVoucher
    })?;

    sig.recover_address_from_prehash(&voucher.digest(domain))
        .map_err(|e| {
            debug!("Signer recovery failed: {e}");
            Error::InvalidVoucher
        })
}

/// Check that `voucher` was signed by `expected`.
///
/// # Errors
///
/// Returns [`Error::InvalidVoucher`] if recovery fails or yields another address.
pub fn verify_voucher(
    domain: &Eip712Domain,
    voucher: &PaymentVoucher,
    signature: &[u8],
    expected: Address,
) -> Result<()> {
    let recovered = recover_signer(domain, voucher, signature)?;
    if recovered == expected {
        Ok(())
    } else {
        debug!("Voucher signed by {recovered}, expected {expected}");
        Err(Error::InvalidVoucher)
    }
}
