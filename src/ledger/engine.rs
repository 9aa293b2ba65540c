use thiserror::Error;
use tracing::{info, warn};

use super::block::{Block, BLANK_SIZE};
use super::builder;
use super::chain::Chain;
use super::mining::mine;
use crate::utils::Clock;

/// Maximum accepted hash value; roughly 2^12 digests per block on average.
pub const DEFAULT_THRESHOLD: u32 = 1 << 20;

/// Why a send was refused. A refused send leaves the chain untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("transfer rejected")]
    RejectedTransfer,
    #[error("receipt rejected")]
    RejectedReceipt,
}

impl SendError {
    /// Numeric status: success is 0, rejections are negative.
    pub fn code(&self) -> i32 {
        match self {
            SendError::RejectedTransfer => -1,
            SendError::RejectedReceipt => -2,
        }
    }
}

/// The ledger proper: owns the chain, the clock, and the mining threshold.
/// Single-threaded by design; `send` blocks until its blocks are committed.
pub struct Ledger<C: Clock> {
    chain: Chain,
    clock: C,
    threshold: u32,
}

impl<C: Clock> Ledger<C> {
    /// A fresh ledger whose genesis block wraps `blank` under `prev_hash_seed`.
    pub fn new(blank: [u8; BLANK_SIZE], prev_hash_seed: u32, clock: C) -> Ledger<C> {
        Ledger::with_threshold(blank, prev_hash_seed, clock, DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(
        blank: [u8; BLANK_SIZE],
        prev_hash_seed: u32,
        mut clock: C,
        threshold: u32,
    ) -> Ledger<C> {
        let mut chain = Chain::new();
        let mut genesis = Block::new(
            chain.next_index(),
            prev_hash_seed,
            clock.tick(),
            builder::build_blank(blank),
        );
        // Mined up front so the whole-chain threshold invariant holds from
        // the first block onward.
        mine(&mut genesis, threshold);
        chain.append(genesis);

        Ledger {
            chain,
            clock,
            threshold,
        }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Balance of `account` as recorded by its newest Receipt.
    pub fn balance(&self, account: u32) -> u32 {
        self.chain.latest_receipt(account).0
    }

    /// Expands a user-level transfer into the three-block protocol: the
    /// transfer itself, the receiver's receipt, and (for non-mint sends) the
    /// change receipt returned to the sender. Each block is mined against
    /// its finalized predecessor before it is appended.
    pub fn send(&mut self, sender: u32, receiver: u32, amount: u32) -> Result<(), SendError> {
        let transfer_tx = builder::build_transfer(&self.chain, sender, receiver, amount)
            .ok_or(SendError::RejectedTransfer)?;

        // Re-mining the tail is a deterministic no-op that hands back its
        // hash; nothing observable changes on a rejection below.
        let tail = self
            .chain
            .tail_mut()
            .expect("chain always holds the genesis block");
        let prev_hash = mine(tail, self.threshold);

        let base = self.chain.next_index();
        let mut transfer_block = Block::new(base, prev_hash, self.clock.tick(), transfer_tx);

        // Guarded even though a successfully built transfer implies a
        // buildable receipt for any in-range balance.
        let receipt_tx = builder::build_receipt(&self.chain, &transfer_block).ok_or_else(|| {
            warn!(sender, receiver, amount, "receipt could not be built");
            SendError::RejectedReceipt
        })?;
        let prev_hash = mine(&mut transfer_block, self.threshold);
        let mut receipt_block = Block::new(base + 1, prev_hash, self.clock.tick(), receipt_tx);

        let return_tx = builder::build_return(&self.chain, &transfer_block, &receipt_block);
        let prev_hash = mine(&mut receipt_block, self.threshold);
        let return_block = return_tx.map(|tx| {
            let mut block = Block::new(base + 2, prev_hash, self.clock.tick(), tx);
            mine(&mut block, self.threshold);
            block
        });

        self.chain.append(transfer_block);
        self.chain.append(receipt_block);
        let appended = if let Some(block) = return_block {
            self.chain.append(block);
            3
        } else {
            2
        };

        info!(sender, receiver, amount, appended, "send committed");
        Ok(())
    }
}
