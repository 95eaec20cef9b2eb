//! # Protocol Layer Types
//!
//! Typed identifiers shared with the session layer that drives the trade
//! state machine. The state machine itself lives above this crate; only the
//! vocabulary it needs on the wire is defined here.

pub mod commands;

pub use commands::Command;
