//! # Crypto Context
//!
//! The initialized secp256k1 handle required for signing and verification.
//!
//! Creating a context is expensive and, for side-channel hardening, each one
//! is re-randomized with a fresh 32-byte blinding seed drawn from the OS
//! random source. The seed is zeroed from memory immediately after use.
//!
//! The context can be owned explicitly (handy for tests) or shared
//! process-wide through [`CryptoContext::global`], which initializes exactly
//! once on first use. After construction the context is read-only and safe
//! for concurrent sign/verify calls from any number of threads; an owned
//! context is destroyed on drop, the global one lives until process exit.

use crate::core::packet::{PRIVKEY_SIZE, PUBKEY_SIZE};
use crate::error::{PacketError, Result};
use rand_core::{OsRng, RngCore};
use secp256k1::{All, PublicKey, Secp256k1, SecretKey};
use std::sync::OnceLock;
use tracing::debug;
use zeroize::Zeroize;

/// Process-wide signing/verification context.
///
/// Injected by reference into every packet operation that needs it, rather
/// than reached for implicitly; tests can substitute their own instance.
pub struct CryptoContext {
    secp: Secp256k1<All>,
}

impl CryptoContext {
    /// Create and blind a fresh context.
    #[must_use]
    pub fn new() -> Self {
        let mut secp = Secp256k1::new();

        // Pass a random blinding seed to the secp256k1 context.
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        secp.seeded_randomize(&seed);
        seed.zeroize();

        debug!("crypto context created and randomized");
        Self { secp }
    }

    /// The shared process-wide context, initialized exactly once on first
    /// use and read-only thereafter.
    #[must_use]
    pub fn global() -> &'static Self {
        static CONTEXT: OnceLock<CryptoContext> = OnceLock::new();
        CONTEXT.get_or_init(Self::new)
    }

    /// Compressed public key for a raw private key, for key-management
    /// collaborators that hand keys to the signing layer.
    ///
    /// # Errors
    /// Fails on a wrong-sized key or a byte pattern outside the curve order.
    pub fn derive_pubkey(&self, privkey: &[u8]) -> Result<[u8; PUBKEY_SIZE]> {
        if privkey.len() != PRIVKEY_SIZE {
            return Err(PacketError::BadPrivkeyLength {
                expected: PRIVKEY_SIZE,
                actual: privkey.len(),
            });
        }
        let secret = SecretKey::from_slice(privkey).map_err(PacketError::InvalidPrivkey)?;
        Ok(PublicKey::from_secret_key(&self.secp, &secret).serialize())
    }

    pub(crate) fn secp(&self) -> &Secp256k1<All> {
        &self.secp
    }
}

impl Default for CryptoContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_global_is_initialized_once() {
        let first: *const CryptoContext = CryptoContext::global();
        let second: *const CryptoContext = CryptoContext::global();
        assert_eq!(first, second);
    }

    #[test]
    fn test_derive_pubkey() {
        let ctx = CryptoContext::new();
        let pubkey = ctx.derive_pubkey(&[0x11; 32]).unwrap();
        assert_eq!(pubkey.len(), PUBKEY_SIZE);
        // Compressed form starts with the parity tag
        assert!(pubkey[0] == 0x02 || pubkey[0] == 0x03);
        // Deterministic
        assert_eq!(pubkey, ctx.derive_pubkey(&[0x11; 32]).unwrap());
    }

    #[test]
    fn test_derive_pubkey_rejects_bad_lengths() {
        let ctx = CryptoContext::new();
        assert!(matches!(
            ctx.derive_pubkey(&[0u8; 31]),
            Err(PacketError::BadPrivkeyLength {
                expected: PRIVKEY_SIZE,
                actual: 31
            })
        ));
        // All-zero is not a valid scalar either
        assert!(matches!(
            ctx.derive_pubkey(&[0u8; 32]),
            Err(PacketError::InvalidPrivkey(_))
        ));
    }
}
