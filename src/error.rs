//! # Error Types
//!
//! Comprehensive error handling for the packet core.
//!
//! This module defines all error variants that can occur while building,
//! parsing, signing, or verifying a packet, from malformed-input errors to
//! cryptographic verification failures.
//!
//! ## Error Categories
//! - **Malformed input**: wrong key sizes, truncated packets, out-of-range reads
//! - **Parse errors**: unparseable signatures or public keys, bad string encodings
//! - **Verification failures**: cryptographically invalid signatures, pubkey mismatches
//! - **Internal crypto failures**: the underlying signing operation reports failure
//!
//! All variants are recoverable at the caller; nothing in this crate aborts
//! the process on a runtime data error. All errors implement
//! `std::error::Error` for interoperability.

use thiserror::Error;

/// PacketError is the primary error type for all packet operations
#[derive(Error, Debug)]
pub enum PacketError {
    #[error("incorrect public key size: expected {expected} bytes, got {actual}")]
    BadPubkeyLength { expected: usize, actual: usize },

    #[error("incorrect private key size: expected {expected} bytes, got {actual}")]
    BadPrivkeyLength { expected: usize, actual: usize },

    #[error("packet too short: {0} bytes, header requires {1}")]
    Truncated(usize, usize),

    #[error("declared body length {declared} disagrees with actual body length {actual}")]
    BodyLengthMismatch { declared: usize, actual: usize },

    #[error("read out of bounds: offset {offset} + size {size} exceeds body length {len}")]
    OutOfBounds {
        offset: usize,
        size: usize,
        len: usize,
    },

    #[error("zero-length read at offset {0}")]
    ZeroLengthRead(usize),

    #[error("no string terminator found before end of body (scan started at offset {0})")]
    UnterminatedString(usize),

    #[error("string field is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("incorrect or unparseable signature")]
    MalformedSignature,

    #[error("the embedded public key could not be parsed or is invalid")]
    MalformedPubkey,

    #[error("bad signature")]
    BadSignature,

    #[error("signature correct, but different pubkeys")]
    PubkeyMismatch,

    #[error("invalid private key: {0}")]
    InvalidPrivkey(secp256k1::Error),
}

/// Type alias for Results using PacketError
pub type Result<T> = std::result::Result<T, PacketError>;
