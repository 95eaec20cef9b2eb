//! # Packet Buffer
//!
//! Binary packet format for the trading protocol: a fixed 117-byte header
//! followed by a variable-length body of typed, position-addressed fields.
//!
//! ## Wire Format
//! ```text
//! [Version(4)] [Command(4)] [Timestamp(8)] [BodyLen(4)] [Pubkey(33)] [Signature(64)] [Body(N)]
//! ```
//!
//! All integers are little-endian. Body offsets are relative to the start of
//! the body; the generic read API never reaches into the header, whose fields
//! live at protocol-defined fixed offsets and have dedicated accessors.
//!
//! ## Security
//! - Every generic read is bounds-checked before any access
//! - `from_bytes` validates the declared body length against the actual one
//! - The signature field is excluded from the signed hash (see `crypto`)

use crate::core::float::{pack_f32, pack_f64, unpack_f32, unpack_f64};
use crate::error::{PacketError, Result};
use crate::protocol::commands::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Current protocol version carried in every header
pub const PROTOCOL_VERSION: u32 = 1;

/// Size of a compressed secp256k1 public key
pub const PUBKEY_SIZE: usize = 33;

/// Size of a compact ECDSA signature (r || s, no DER framing)
pub const SIGNATURE_SIZE: usize = 64;

/// Size of a raw secp256k1 private key
pub const PRIVKEY_SIZE: usize = 32;

const VERSION_OFFSET: usize = 0;
const COMMAND_OFFSET: usize = 4;
const TIMESTAMP_OFFSET: usize = 8;
const BODY_LEN_OFFSET: usize = 16;

/// Header offset of the sender pubkey field
pub const PUBKEY_OFFSET: usize = 20;

/// Header offset of the signature field
pub const SIGNATURE_OFFSET: usize = PUBKEY_OFFSET + PUBKEY_SIZE;

/// Total size of the fixed header; the body starts here
pub const HEADER_SIZE: usize = SIGNATURE_OFFSET + SIGNATURE_SIZE;

mod sealed {
    pub trait Sealed {}
}

/// Types that can be appended to a packet body in a fixed-width encoding.
///
/// One encoding per concrete type, selected by static typing at the call
/// site; no type tag travels on the wire since the layout is protocol-defined
/// and position-based.
pub trait WireWrite: sealed::Sealed {
    /// Serialize `self` onto the end of `out`
    fn write_wire(&self, out: &mut Vec<u8>);
}

/// Types that can be read back out of a packet body at a given offset.
pub trait WireRead: sealed::Sealed + Sized {
    /// Decode a value at `offset` within `body`, returning the value and the
    /// number of bytes consumed.
    ///
    /// # Errors
    /// Fails if the encoded width would run past the end of the body. The
    /// memory access never happens in that case.
    fn read_wire(body: &[u8], offset: usize) -> Result<(Self, usize)>;
}

/// Bounds-checked view of `size` bytes at `offset`. Validation precedes the
/// access; an oversized request never touches the buffer.
fn take(body: &[u8], offset: usize, size: usize) -> Result<&[u8]> {
    if size == 0 {
        warn!(offset, "rejected zero-length read");
        return Err(PacketError::ZeroLengthRead(offset));
    }
    let end = offset.checked_add(size);
    match end {
        Some(end) if end <= body.len() => Ok(&body[offset..end]),
        _ => {
            warn!(offset, size, len = body.len(), "read out of bounds");
            Err(PacketError::OutOfBounds {
                offset,
                size,
                len: body.len(),
            })
        }
    }
}

macro_rules! wire_int {
    ($($t:ty),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl WireWrite for $t {
            fn write_wire(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }
        }

        impl WireRead for $t {
            fn read_wire(body: &[u8], offset: usize) -> Result<(Self, usize)> {
                const WIDTH: usize = std::mem::size_of::<$t>();
                let mut raw = [0u8; WIDTH];
                raw.copy_from_slice(take(body, offset, WIDTH)?);
                Ok((<$t>::from_le_bytes(raw), WIDTH))
            }
        }
    )*};
}

wire_int!(u16, u32, u64);

impl sealed::Sealed for f64 {}

impl WireWrite for f64 {
    fn write_wire(&self, out: &mut Vec<u8>) {
        pack_f64(*self).write_wire(out);
    }
}

impl WireRead for f64 {
    fn read_wire(body: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (bits, consumed) = u64::read_wire(body, offset)?;
        Ok((unpack_f64(bits), consumed))
    }
}

impl sealed::Sealed for f32 {}

impl WireWrite for f32 {
    fn write_wire(&self, out: &mut Vec<u8>) {
        pack_f32(*self).write_wire(out);
    }
}

impl WireRead for f32 {
    fn read_wire(body: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (bits, consumed) = u64::read_wire(body, offset)?;
        Ok((unpack_f32(bits), consumed))
    }
}

// Fixed-size byte arrays: hashes, addresses, any raw field of known width.
impl<const N: usize> sealed::Sealed for [u8; N] {}

impl<const N: usize> WireWrite for [u8; N] {
    fn write_wire(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}

impl<const N: usize> WireRead for [u8; N] {
    fn read_wire(body: &[u8], offset: usize) -> Result<(Self, usize)> {
        let mut value = [0u8; N];
        value.copy_from_slice(take(body, offset, N)?);
        Ok((value, N))
    }
}

impl sealed::Sealed for &str {}

impl WireWrite for &str {
    /// String bytes followed by a NUL terminator
    fn write_wire(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.as_bytes());
        out.push(0);
    }
}

impl sealed::Sealed for String {}

impl WireWrite for String {
    fn write_wire(&self, out: &mut Vec<u8>) {
        self.as_str().write_wire(out);
    }
}

impl WireRead for String {
    /// Scans forward for the NUL terminator within the body. Consumed bytes
    /// include the terminator. A missing terminator is an explicit error,
    /// never a silent read to the end of the body.
    fn read_wire(body: &[u8], offset: usize) -> Result<(Self, usize)> {
        if offset >= body.len() {
            return Err(PacketError::OutOfBounds {
                offset,
                size: 1,
                len: body.len(),
            });
        }
        let length = body[offset..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| {
                warn!(offset, "string terminator not found before end of body");
                PacketError::UnterminatedString(offset)
            })?;
        let value = String::from_utf8(body[offset..offset + length].to_vec())?;
        Ok((value, length + 1))
    }
}

/// The unit of signed, typed communication in the protocol.
///
/// Owns one contiguous byte buffer: fixed header plus variable body. Built
/// field-by-field by a sender, signed once, then parsed, verified, and read
/// back by a receiver. Each packet is independently owned; the only shared
/// resource is the crypto context used for signing and verification.
///
/// ```
/// use swap_protocol::core::packet::Packet;
/// use swap_protocol::protocol::commands::Command;
///
/// let mut packet = Packet::new(Command::TransactionInit);
/// packet.append(42u32);
/// packet.append(3.5f64);
///
/// let (amount, consumed) = packet.read::<u32>(0).unwrap();
/// assert_eq!(amount, 42);
/// let (price, _) = packet.read::<f64>(consumed).unwrap();
/// assert_eq!(price, 3.5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    buf: Vec<u8>,
}

impl Packet {
    /// Create an empty packet for `command`: zeroed pubkey and signature,
    /// current timestamp, no body.
    #[must_use]
    pub fn new(command: Command) -> Self {
        let mut packet = Self {
            buf: vec![0u8; HEADER_SIZE],
        };
        packet.put_header_u32(VERSION_OFFSET, PROTOCOL_VERSION);
        packet.put_header_u32(COMMAND_OFFSET, command.id());
        packet.touch();
        packet
    }

    /// Adopt a raw buffer received from the transport.
    ///
    /// # Errors
    /// Fails if the buffer is shorter than the header, or if the declared
    /// body length disagrees with the actual remainder.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            warn!(len = bytes.len(), "packet shorter than header");
            return Err(PacketError::Truncated(bytes.len(), HEADER_SIZE));
        }
        let packet = Self { buf: bytes };
        let declared = packet.header_u32(BODY_LEN_OFFSET) as usize;
        let actual = packet.buf.len() - HEADER_SIZE;
        if declared != actual {
            warn!(declared, actual, "body length mismatch");
            return Err(PacketError::BodyLengthMismatch { declared, actual });
        }
        Ok(packet)
    }

    /// Total buffer length (header plus body)
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Read-only view of the raw bytes, for hashing and for the transport
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the packet, handing the raw buffer to the transport
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// The variable-length body region
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.buf[HEADER_SIZE..]
    }

    /// Byte length of the body
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.buf.len() - HEADER_SIZE
    }

    /// Protocol version from the header
    #[must_use]
    pub fn version(&self) -> u32 {
        self.header_u32(VERSION_OFFSET)
    }

    /// Raw command identifier from the header
    #[must_use]
    pub fn command_id(&self) -> u32 {
        self.header_u32(COMMAND_OFFSET)
    }

    /// Typed command, or `None` for values this build does not know.
    /// Unknown commands survive transport untouched.
    #[must_use]
    pub fn command(&self) -> Option<Command> {
        Command::from_id(self.command_id())
    }

    /// Overwrite the command field
    pub fn set_command(&mut self, command: Command) {
        self.put_header_u32(COMMAND_OFFSET, command.id());
    }

    /// Header timestamp, unix seconds
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.header_u64(TIMESTAMP_OFFSET)
    }

    /// Stamp the header with the current time
    pub fn touch(&mut self) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.put_header_u64(TIMESTAMP_OFFSET, now);
    }

    /// The embedded sender pubkey field (33 bytes, compressed form)
    #[must_use]
    pub fn pubkey(&self) -> &[u8] {
        &self.buf[PUBKEY_OFFSET..SIGNATURE_OFFSET]
    }

    /// The signature field (64 bytes, compact form; all-zero until signed)
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.buf[SIGNATURE_OFFSET..HEADER_SIZE]
    }

    pub(crate) fn set_pubkey(&mut self, pubkey: &[u8]) {
        self.buf[PUBKEY_OFFSET..SIGNATURE_OFFSET].copy_from_slice(pubkey);
    }

    pub(crate) fn set_signature(&mut self, signature: &[u8; SIGNATURE_SIZE]) {
        self.buf[SIGNATURE_OFFSET..HEADER_SIZE].copy_from_slice(signature);
    }

    /// Append a typed field to the body. Growing the body is always legal;
    /// message-size policy belongs to the transport. The header's body-length
    /// field is kept current.
    pub fn append<T: WireWrite>(&mut self, value: T) {
        value.write_wire(&mut self.buf);
        self.sync_body_len();
    }

    /// Append a raw byte blob of caller-chosen length
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        self.sync_body_len();
    }

    /// Read a typed field at a body-relative offset, returning the value and
    /// the number of bytes consumed.
    ///
    /// # Errors
    /// Fails without touching memory if the field's width would run past the
    /// end of the body.
    pub fn read<T: WireRead>(&self, offset: usize) -> Result<(T, usize)> {
        T::read_wire(self.body(), offset)
    }

    /// Read a raw byte blob of caller-specified size.
    ///
    /// # Errors
    /// Fails on a zero-size request or when `offset + size` exceeds the body.
    pub fn read_bytes(&self, offset: usize, size: usize) -> Result<Vec<u8>> {
        Ok(take(self.body(), offset, size)?.to_vec())
    }

    /// Read a fixed-width string field of exactly `size` bytes, stripping the
    /// trailing NUL-padding run. Space padding is preserved; an all-NUL field
    /// decodes as the empty string.
    ///
    /// # Errors
    /// Fails on bounds violations and on non-UTF-8 content.
    pub fn read_fixed_string(&self, offset: usize, size: usize) -> Result<(String, usize)> {
        let bytes = take(self.body(), offset, size)?;
        let kept = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let value = String::from_utf8(bytes[..kept].to_vec())?;
        Ok((value, size))
    }

    fn sync_body_len(&mut self) {
        let body_len = self.buf.len() - HEADER_SIZE;
        self.put_header_u32(BODY_LEN_OFFSET, body_len as u32);
    }

    fn header_u32(&self, offset: usize) -> u32 {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.buf[offset..offset + 4]);
        u32::from_le_bytes(raw)
    }

    fn header_u64(&self, offset: usize) -> u64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.buf[offset..offset + 8]);
        u64::from_le_bytes(raw)
    }

    fn put_header_u32(&mut self, offset: usize, value: u32) {
        self.buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn put_header_u64(&mut self, offset: usize, value: u64) {
        self.buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self::new(Command::Invalid)
    }
}
