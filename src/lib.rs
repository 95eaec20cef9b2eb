//! # Swap Protocol
//!
//! Signed binary packet core for a peer-to-peer cross-chain trading protocol.
//!
//! A [`Packet`] is a self-describing, authenticated message: a fixed-size
//! header (version, command, timestamp, body length, sender pubkey,
//! signature) followed by a variable-length body of typed fields appended in
//! order and read back at explicit offsets. Packets are signed with ECDSA
//! over a canonical SHA-256 hash and verified by any peer holding the
//! sender's compressed public key.
//!
//! ## Components
//! - **core**: packet buffer and float codec (wire format)
//! - **crypto**: blinded secp256k1 context, signing, verification
//! - **protocol**: typed command identifiers for the trade flow
//!
//! Transport framing, session state, order storage, trust policy, and key
//! lifecycle all live above this crate; it supplies integrity and
//! authenticity, not confidentiality.
//!
//! ## Example
//! ```
//! use swap_protocol::{Command, CryptoContext, Packet};
//!
//! let ctx = CryptoContext::global();
//! let privkey = [0x11u8; 32];
//! let pubkey = ctx.derive_pubkey(&privkey)?;
//!
//! // Sender
//! let mut packet = Packet::new(Command::TransactionInit);
//! packet.append(42u32);
//! packet.append(3.5f64);
//! packet.sign(ctx, &pubkey, &privkey)?;
//! let wire = packet.into_bytes();
//!
//! // Receiver
//! let received = Packet::from_bytes(wire)?;
//! received.verify_from(ctx, &pubkey)?;
//! let (amount, consumed) = received.read::<u32>(0)?;
//! let (price, _) = received.read::<f64>(consumed)?;
//! assert_eq!((amount, price), (42, 3.5));
//! # Ok::<(), swap_protocol::PacketError>(())
//! ```

#![warn(clippy::unwrap_used, clippy::expect_used)]

pub mod core;
pub mod crypto;
pub mod error;
pub mod protocol;

pub use crate::core::packet::Packet;
pub use crate::crypto::context::CryptoContext;
pub use crate::error::{PacketError, Result};
pub use crate::protocol::commands::Command;
