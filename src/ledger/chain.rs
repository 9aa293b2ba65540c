use thiserror::Error;
use tracing::debug;

use super::block::{Block, Transaction, NO_RECEIPT};
use crate::utils::fnv1a_32;

/// Why a chain failed invariant validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("block {position} carries index {index}")]
    IndexMismatch { position: usize, index: u32 },
    #[error("block {index} does not link to its predecessor's hash")]
    BrokenLink { index: u32 },
    #[error("block {index} hashes above its threshold")]
    ThresholdExceeded { index: u32 },
    #[error("receipt at block {index} has a malformed back-link")]
    BadReceiptLink { index: u32 },
}

/// Append-only sequence of blocks.
#[derive(Debug, Default)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    pub fn new() -> Chain {
        Chain { blocks: Vec::new() }
    }

    /// Index for the next block; advances on append so `blocks[i].index == i`.
    pub fn next_index(&self) -> u32 {
        self.blocks.len() as u32
    }

    /// No validation here: the engine only appends blocks it has already
    /// built and mined.
    pub fn append(&mut self, block: Block) {
        debug!(index = block.index, "append {}", block);
        self.blocks.push(block);
    }

    pub fn tail(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Mutable tail, for the miner's in-place re-mine.
    pub fn tail_mut(&mut self) -> Option<&mut Block> {
        self.blocks.last_mut()
    }

    pub fn block_at(&self, index: u32) -> Option<&Block> {
        self.blocks.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Newest-first scan for the account's latest Receipt. Returns
    /// `(0, NO_RECEIPT)` for an account that never received anything.
    pub fn latest_receipt(&self, account: u32) -> (u32, u32) {
        for block in self.blocks.iter().rev() {
            if let Transaction::Receipt(receipt) = &block.transaction {
                if receipt.account == account {
                    return (receipt.balance, block.index);
                }
            }
        }
        (0, NO_RECEIPT)
    }

    /// Checks the structural invariants of the whole chain: dense indices,
    /// hash linkage, proof-of-work thresholds, and receipt back-links.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (position, block) in self.blocks.iter().enumerate() {
            if block.index as usize != position {
                return Err(ValidationError::IndexMismatch {
                    position,
                    index: block.index,
                });
            }

            if position > 0 {
                let prev = &self.blocks[position - 1];
                if block.prev_hash != fnv1a_32(&prev.image()) {
                    return Err(ValidationError::BrokenLink { index: block.index });
                }
            }

            if fnv1a_32(&block.image()) > block.threshold {
                return Err(ValidationError::ThresholdExceeded { index: block.index });
            }

            if let Transaction::Receipt(receipt) = &block.transaction {
                if receipt.prev_receipt != NO_RECEIPT {
                    let linked = self
                        .blocks
                        .get(receipt.prev_receipt as usize)
                        .filter(|b| b.index < block.index)
                        .and_then(|b| b.transaction.receipt())
                        .filter(|r| r.account == receipt.account);
                    if linked.is_none() {
                        return Err(ValidationError::BadReceiptLink { index: block.index });
                    }
                }
            }
        }
        Ok(())
    }
}
