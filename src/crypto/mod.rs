//! # Cryptographic Components
//!
//! Packet authentication on top of secp256k1.
//!
//! ## Components
//! - **Context**: the blinded, process-wide signing/verification handle
//! - **Signing**: canonical hashing, ECDSA sign, and five-step verification
//!
//! ## Security
//! - Context blinded with a one-time random seed (zeroed after use)
//! - Deterministic nonces (RFC 6979); no per-signature randomness
//! - Verification cross-checks the recovered key's compressed serialization
//!   against the embedded sender pubkey, byte for byte

pub mod context;
pub mod signing;

pub use context::CryptoContext;
