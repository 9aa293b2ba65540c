//! An in-process append-only ledger. Transfers between integer-identified
//! accounts are recorded as a linear chain of proof-of-work blocks; each
//! user-level send expands into a transfer, a receipt, and (when the sender
//! has a prior balance) a change receipt. Balances come from a backward scan
//! for an account's newest receipt.

pub mod ledger;
pub mod utils;

pub use ledger::{Block, Chain, Ledger, SendError, Transaction, DEFAULT_THRESHOLD};
pub use utils::{Clock, FixedClock, SystemClock};
