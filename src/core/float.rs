//! # Float Codec
//!
//! Lossless packing of IEEE 754 floating-point values into a transport-safe
//! 64-bit integer.
//!
//! The packed form is the binary64 interchange layout: 1 sign bit, 11
//! exponent bits, 52 significand bits. Rust guarantees `f64` is IEEE 754
//! binary64, so the packed value is the number's own bit pattern; the packet
//! buffer fixes the byte order of the resulting `u64` on the wire, which
//! makes the encoding independent of host endianness.
//!
//! The codec is total: every `f64` packs, every `u64` unpacks, and the two
//! are exact mutual inverses over all bit patterns (including infinities,
//! NaNs, and signed zeros). 32-bit floats widen before packing and narrow
//! after unpacking; only the expected narrowing precision is lost.

/// Pack a 64-bit float into its binary64 interchange bits.
#[inline]
#[must_use]
pub fn pack_f64(value: f64) -> u64 {
    value.to_bits()
}

/// Unpack binary64 interchange bits back into a 64-bit float.
#[inline]
#[must_use]
pub fn unpack_f64(bits: u64) -> f64 {
    f64::from_bits(bits)
}

/// Pack a 32-bit float, widening to 64-bit precision first.
#[inline]
#[must_use]
pub fn pack_f32(value: f32) -> u64 {
    pack_f64(f64::from(value))
}

/// Unpack into a 32-bit float, narrowing after decoding.
///
/// Narrowing a value outside `f32` range saturates to infinity, as usual
/// for `as` conversion.
#[inline]
#[must_use]
pub fn unpack_f32(bits: u64) -> f32 {
    unpack_f64(bits) as f32
}
