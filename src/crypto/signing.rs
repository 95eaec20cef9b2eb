//! # Signing and Verification
//!
//! Packet authentication: a deterministic (RFC 6979) ECDSA signature over the
//! canonical hash of the packet, carried in the header's signature field.
//!
//! The canonical hash is SHA-256 over the entire buffer with the signature
//! field treated as all-zero. It is computed on a copy, so verification never
//! has an observable side effect on the live buffer.
//!
//! State machine over a single packet: `Unsigned -> Signed` via [`Packet::sign`],
//! and independently `AnyState -> {Valid, Invalid}` via [`Packet::verify`].
//! Re-signing is permitted and overwrites the previous signature.

use crate::core::packet::{
    Packet, HEADER_SIZE, PRIVKEY_SIZE, PUBKEY_SIZE, SIGNATURE_OFFSET, SIGNATURE_SIZE,
};
use crate::crypto::context::CryptoContext;
use crate::error::{PacketError, Result};
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, SecretKey};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

impl Packet {
    /// SHA-256 over a copy of the buffer with the signature field zeroed.
    /// The live buffer is never touched.
    fn canonical_hash(&self) -> [u8; 32] {
        let mut canonical = self.as_bytes().to_vec();
        canonical[SIGNATURE_OFFSET..HEADER_SIZE].fill(0);

        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        hasher.finalize().into()
    }

    /// Sign the packet: write `pubkey` into the header, sign the canonical
    /// hash with `privkey`, write the compact signature, then self-verify
    /// the result before declaring success.
    ///
    /// # Errors
    /// Key-size and key-parse failures leave the packet unmodified. A failed
    /// self-verify (for example a pubkey that does not belong to `privkey`)
    /// leaves the written pubkey and signature in place and reports why.
    pub fn sign(&mut self, ctx: &CryptoContext, pubkey: &[u8], privkey: &[u8]) -> Result<()> {
        if pubkey.len() != PUBKEY_SIZE {
            warn!(actual = pubkey.len(), "incorrect public key size");
            return Err(PacketError::BadPubkeyLength {
                expected: PUBKEY_SIZE,
                actual: pubkey.len(),
            });
        }
        if privkey.len() != PRIVKEY_SIZE {
            warn!(actual = privkey.len(), "incorrect private key size");
            return Err(PacketError::BadPrivkeyLength {
                expected: PRIVKEY_SIZE,
                actual: privkey.len(),
            });
        }
        let secret = SecretKey::from_slice(privkey).map_err(PacketError::InvalidPrivkey)?;

        self.set_pubkey(pubkey);
        self.set_signature(&[0u8; SIGNATURE_SIZE]);

        let message = Message::from_digest(self.canonical_hash());
        let signature = ctx.secp().sign_ecdsa(&message, &secret);
        self.set_signature(&signature.serialize_compact());

        debug!(command = self.command_id(), "packet signed");
        self.verify(ctx)
    }

    /// Verify the embedded signature against the canonical hash and the
    /// embedded sender pubkey. Non-destructive: the buffer is bit-identical
    /// before and after the call, no matter the outcome.
    ///
    /// # Errors
    /// Distinguishes an unparseable signature, an unparseable pubkey, a
    /// cryptographically invalid signature, and a valid signature whose key
    /// does not re-serialize to the embedded pubkey bytes.
    pub fn verify(&self, ctx: &CryptoContext) -> Result<()> {
        let message = Message::from_digest(self.canonical_hash());

        let signature = Signature::from_compact(self.signature()).map_err(|e| {
            warn!(error = %e, "incorrect or unparseable signature");
            PacketError::MalformedSignature
        })?;

        let pubkey = PublicKey::from_slice(self.pubkey()).map_err(|e| {
            warn!(error = %e, "the public key could not be parsed or is invalid");
            PacketError::MalformedPubkey
        })?;

        ctx.secp()
            .verify_ecdsa(&message, &signature, &pubkey)
            .map_err(|e| {
                warn!(error = %e, "bad signature");
                PacketError::BadSignature
            })?;

        // A signature can be valid for a key whose serialized form still
        // differs from the header bytes (alternate encodings); the compressed
        // re-serialization must match verbatim.
        if pubkey.serialize()[..] != *self.pubkey() {
            warn!("signature correct, but different pubkeys");
            return Err(PacketError::PubkeyMismatch);
        }

        Ok(())
    }

    /// Verify against a specific expected sender.
    ///
    /// # Errors
    /// Short-circuits with a pubkey mismatch when `expected_pubkey` does not
    /// byte-match the header field, otherwise delegates to [`Packet::verify`].
    pub fn verify_from(&self, ctx: &CryptoContext, expected_pubkey: &[u8]) -> Result<()> {
        if expected_pubkey.len() != PUBKEY_SIZE || *expected_pubkey != *self.pubkey() {
            warn!("expected pubkey does not match the packet sender");
            return Err(PacketError::PubkeyMismatch);
        }
        self.verify(ctx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::protocol::commands::Command;

    fn keypair(ctx: &CryptoContext, fill: u8) -> ([u8; PRIVKEY_SIZE], [u8; PUBKEY_SIZE]) {
        let privkey = [fill; PRIVKEY_SIZE];
        let pubkey = ctx.derive_pubkey(&privkey).unwrap();
        (privkey, pubkey)
    }

    #[test]
    fn test_sign_then_verify() {
        let ctx = CryptoContext::new();
        let (privkey, pubkey) = keypair(&ctx, 0x42);

        let mut packet = Packet::new(Command::Transaction);
        packet.append(7u64);
        packet.sign(&ctx, &pubkey, &privkey).unwrap();

        assert_eq!(packet.pubkey(), &pubkey[..]);
        assert!(packet.signature().iter().any(|&b| b != 0));
        packet.verify(&ctx).unwrap();
        packet.verify_from(&ctx, &pubkey).unwrap();
    }

    #[test]
    fn test_sign_rejects_bad_key_sizes_without_mutation() {
        let ctx = CryptoContext::new();
        let (privkey, pubkey) = keypair(&ctx, 0x42);

        let mut packet = Packet::new(Command::Transaction);
        packet.append(7u64);
        let before = packet.clone();

        assert!(matches!(
            packet.sign(&ctx, &pubkey[..32], &privkey),
            Err(PacketError::BadPubkeyLength { .. })
        ));
        assert_eq!(packet, before);

        assert!(matches!(
            packet.sign(&ctx, &pubkey, &privkey[..31]),
            Err(PacketError::BadPrivkeyLength { .. })
        ));
        assert_eq!(packet, before);
    }

    #[test]
    fn test_sign_with_foreign_pubkey_fails_self_verify() {
        let ctx = CryptoContext::new();
        let (privkey, _) = keypair(&ctx, 0x42);
        let (_, other_pubkey) = keypair(&ctx, 0x43);

        let mut packet = Packet::new(Command::Transaction);
        assert!(matches!(
            packet.sign(&ctx, &other_pubkey, &privkey),
            Err(PacketError::PubkeyMismatch)
        ));
    }

    #[test]
    fn test_verify_from_wrong_sender() {
        let ctx = CryptoContext::new();
        let (privkey, pubkey) = keypair(&ctx, 0x42);
        let (_, other_pubkey) = keypair(&ctx, 0x43);

        let mut packet = Packet::new(Command::Transaction);
        packet.sign(&ctx, &pubkey, &privkey).unwrap();

        assert!(matches!(
            packet.verify_from(&ctx, &other_pubkey),
            Err(PacketError::PubkeyMismatch)
        ));
        // Wrong length short-circuits too
        assert!(packet.verify_from(&ctx, &pubkey[..32]).is_err());
    }

    #[test]
    fn test_verify_is_non_destructive() {
        let ctx = CryptoContext::new();
        let (privkey, pubkey) = keypair(&ctx, 0x42);

        let mut packet = Packet::new(Command::Transaction);
        packet.append("trade");
        packet.sign(&ctx, &pubkey, &privkey).unwrap();

        let before = packet.as_bytes().to_vec();
        for _ in 0..3 {
            packet.verify(&ctx).unwrap();
        }
        assert_eq!(packet.as_bytes(), &before[..]);

        // Also bit-identical after a failed verify
        let unsigned = Packet::new(Command::Transaction);
        let before = unsigned.as_bytes().to_vec();
        assert!(unsigned.verify(&ctx).is_err());
        assert_eq!(unsigned.as_bytes(), &before[..]);
    }

    #[test]
    fn test_unsigned_packet_fails_with_malformed_signature() {
        let ctx = CryptoContext::new();
        let packet = Packet::new(Command::Transaction);
        // All-zero r/s does not parse as a compact signature
        assert!(matches!(
            packet.verify(&ctx),
            Err(PacketError::MalformedSignature)
        ));
    }

    #[test]
    fn test_resign_replaces_signature() {
        let ctx = CryptoContext::new();
        let (privkey_a, pubkey_a) = keypair(&ctx, 0x42);
        let (privkey_b, pubkey_b) = keypair(&ctx, 0x43);

        let mut packet = Packet::new(Command::Transaction);
        packet.append(1u32);
        packet.sign(&ctx, &pubkey_a, &privkey_a).unwrap();
        let first = packet.signature().to_vec();

        packet.sign(&ctx, &pubkey_b, &privkey_b).unwrap();
        assert_ne!(packet.signature(), &first[..]);
        packet.verify_from(&ctx, &pubkey_b).unwrap();
    }

    #[test]
    fn test_signature_excluded_from_canonical_hash() {
        let ctx = CryptoContext::new();
        let (privkey, pubkey) = keypair(&ctx, 0x42);

        let mut packet = Packet::new(Command::Transaction);
        packet.append(9u32);
        let unsigned_hash = packet.canonical_hash();
        packet.sign(&ctx, &pubkey, &privkey).unwrap();

        // Writing the pubkey changes the hash, writing the signature must not
        assert_ne!(packet.canonical_hash(), unsigned_hash);

        let mut tampered_sig = packet.clone();
        tampered_sig.set_signature(&[0xAA; SIGNATURE_SIZE]);
        assert_eq!(tampered_sig.canonical_hash(), packet.canonical_hash());
    }
}
