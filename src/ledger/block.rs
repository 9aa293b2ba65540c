use serde::{Deserialize, Serialize};
use std::fmt;

/// Chain-index sentinel meaning "no previous receipt exists".
pub const NO_RECEIPT: u32 = u32::MAX;

/// Width of the opaque genesis payload: four 32-bit words.
pub const BLANK_SIZE: usize = 16;

/// Every transaction serializes to the same width: a 4-byte tag followed by
/// four payload words (the Blank payload fills the word slots directly).
pub const TX_IMAGE_SIZE: usize = 4 + BLANK_SIZE;

/// Width of the byte image fed to the digest: `index || prev_hash ||
/// timestamp || transaction || nonce || threshold`, little-endian, unpadded.
pub const BLOCK_IMAGE_SIZE: usize = 4 + 4 + 8 + TX_IMAGE_SIZE + 4 + 4;

/// Wire tag of a transaction; `Invalid` is stored only by the genesis Blank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum TransactionKind {
    Invalid = -1,
    Generate = 0,
    Transfer = 1,
    Receipt = 2,
}

/// Debit side of a send. `sender == 0` marks a mint (Generate); `prev_receipt`
/// is the chain index of the sender's latest Receipt, `NO_RECEIPT` if none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPayload {
    pub sender: u32,
    pub receiver: u32,
    pub prev_receipt: u32,
    pub amount: u32,
}

/// Credit side: acknowledges the transfer at `prev_transfer`, records the
/// account's new running `balance`, and back-links its preceding Receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptPayload {
    pub account: u32,
    pub prev_receipt: u32,
    pub prev_transfer: u32,
    pub balance: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transaction {
    Blank([u8; BLANK_SIZE]),
    Generate(TransferPayload),
    Transfer(TransferPayload),
    Receipt(ReceiptPayload),
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::Blank(_) => TransactionKind::Invalid,
            Transaction::Generate(_) => TransactionKind::Generate,
            Transaction::Transfer(_) => TransactionKind::Transfer,
            Transaction::Receipt(_) => TransactionKind::Receipt,
        }
    }

    /// Payload of a Generate or Transfer, if that is what this is.
    pub fn transfer(&self) -> Option<&TransferPayload> {
        match self {
            Transaction::Generate(payload) | Transaction::Transfer(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn receipt(&self) -> Option<&ReceiptPayload> {
        match self {
            Transaction::Receipt(payload) => Some(payload),
            _ => None,
        }
    }

    /// Fixed-width byte image: tag as little-endian i32, then the four
    /// payload words little-endian (Blank contributes its raw bytes).
    pub fn image(&self) -> [u8; TX_IMAGE_SIZE] {
        let mut buf = [0u8; TX_IMAGE_SIZE];
        buf[0..4].copy_from_slice(&(self.kind() as i32).to_le_bytes());
        match self {
            Transaction::Blank(data) => buf[4..].copy_from_slice(data),
            Transaction::Generate(t) | Transaction::Transfer(t) => {
                put_u32(&mut buf, 4, t.sender);
                put_u32(&mut buf, 8, t.receiver);
                put_u32(&mut buf, 12, t.prev_receipt);
                put_u32(&mut buf, 16, t.amount);
            }
            Transaction::Receipt(r) => {
                put_u32(&mut buf, 4, r.account);
                put_u32(&mut buf, 8, r.prev_receipt);
                put_u32(&mut buf, 12, r.prev_transfer);
                put_u32(&mut buf, 16, r.balance);
            }
        }
        buf
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u32,
    pub prev_hash: u32,
    pub timestamp: u64,
    pub transaction: Transaction,
    pub nonce: u32,
    pub threshold: u32,
}

impl Block {
    /// A freshly formed, not yet mined block.
    pub fn new(index: u32, prev_hash: u32, timestamp: u64, transaction: Transaction) -> Block {
        Block {
            index,
            prev_hash,
            timestamp,
            transaction,
            nonce: 0,
            threshold: 0,
        }
    }

    /// The exact bytes the digest runs over. Field order and endianness are
    /// load-bearing: changing either changes every hash on the chain.
    pub fn image(&self) -> [u8; BLOCK_IMAGE_SIZE] {
        let mut buf = [0u8; BLOCK_IMAGE_SIZE];
        put_u32(&mut buf, 0, self.index);
        put_u32(&mut buf, 4, self.prev_hash);
        buf[8..16].copy_from_slice(&self.timestamp.to_le_bytes());
        buf[16..16 + TX_IMAGE_SIZE].copy_from_slice(&self.transaction.image());
        put_u32(&mut buf, 36, self.nonce);
        put_u32(&mut buf, 40, self.threshold);
        buf
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): ", self.index, self.prev_hash)?;
        match &self.transaction {
            Transaction::Blank(_) => write!(f, "INVALID"),
            Transaction::Generate(t) => {
                write!(f, "GENERATE {} received {}", t.receiver, t.amount)
            }
            Transaction::Transfer(t) => {
                write!(f, "TRANSFER {} sent {} to {}", t.sender, t.amount, t.receiver)
            }
            Transaction::Receipt(r) => {
                write!(f, "RECEIPT {} now has {}", r.account, r.balance)
            }
        }
    }
}

fn put_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}
