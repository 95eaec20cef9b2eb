//! # Core Packet Components
//!
//! Low-level packet handling and binary field encoding.
//!
//! This module provides the foundation for the protocol: the packet buffer
//! with its fixed header and typed body fields, and the float codec used for
//! floating-point fields.
//!
//! ## Components
//! - **Packet**: header-plus-body byte buffer with offset-addressed typed reads
//! - **Float Codec**: lossless 64-bit packing for floating-point fields
//!
//! ## Wire Format
//! ```text
//! [Version(4)] [Command(4)] [Timestamp(8)] [BodyLen(4)] [Pubkey(33)] [Signature(64)] [Body(N)]
//! ```
//!
//! ## Security
//! - Bounds validation before every body read
//! - Declared body length checked against the buffer on ingest

pub mod float;
pub mod packet;
