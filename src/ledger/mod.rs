pub mod block;
pub mod builder;
pub mod chain;
pub mod engine;
pub mod mining;

pub use block::{
    Block, ReceiptPayload, Transaction, TransactionKind, TransferPayload, BLANK_SIZE,
    BLOCK_IMAGE_SIZE, NO_RECEIPT, TX_IMAGE_SIZE,
};
pub use chain::{Chain, ValidationError};
pub use engine::{Ledger, SendError, DEFAULT_THRESHOLD};
pub use mining::mine;
