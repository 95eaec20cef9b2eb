//! # Protocol Commands
//!
//! Message-type identifiers for the cross-chain trade flow. The packet header
//! stores the raw `u32`; this module gives the session layer a typed view of
//! it. Values a build does not recognize survive transport untouched and
//! surface as `None` from the typed accessor.

use serde::{Deserialize, Serialize};

/// Message types exchanged during a cross-chain trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Command {
    /// Placeholder; never sent deliberately
    Invalid = 0,
    /// Peer address gossip
    AnnounceAddresses = 1,
    /// New trade order broadcast
    Transaction = 2,
    /// Order relayed by a service node
    PendingTransaction = 3,
    /// Taker accepts an order
    TransactionAccepting = 4,
    /// Service node puts the trade on hold for pairing
    TransactionHold = 5,
    /// Both sides acknowledge the hold
    TransactionHoldApply = 6,
    /// Counterparties exchange session data
    TransactionInit = 7,
    TransactionInitialized = 8,
    /// Maker creates the deposit transaction
    TransactionCreate = 9,
    TransactionCreated = 10,
    /// Taker redeems side A
    TransactionConfirmA = 11,
    TransactionConfirmedA = 12,
    /// Maker redeems side B
    TransactionConfirmB = 13,
    TransactionConfirmedB = 14,
    /// Either side abandons the trade
    TransactionCancel = 15,
    TransactionFinished = 16,
}

impl Command {
    /// Raw identifier as carried in the packet header
    #[must_use]
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Typed command for a raw wire value, `None` if unrecognized
    #[must_use]
    pub fn from_id(id: u32) -> Option<Self> {
        let command = match id {
            0 => Self::Invalid,
            1 => Self::AnnounceAddresses,
            2 => Self::Transaction,
            3 => Self::PendingTransaction,
            4 => Self::TransactionAccepting,
            5 => Self::TransactionHold,
            6 => Self::TransactionHoldApply,
            7 => Self::TransactionInit,
            8 => Self::TransactionInitialized,
            9 => Self::TransactionCreate,
            10 => Self::TransactionCreated,
            11 => Self::TransactionConfirmA,
            12 => Self::TransactionConfirmedA,
            13 => Self::TransactionConfirmB,
            14 => Self::TransactionConfirmedB,
            15 => Self::TransactionCancel,
            16 => Self::TransactionFinished,
            _ => return None,
        };
        Some(command)
    }
}
