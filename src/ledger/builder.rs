//! Builds the transaction payloads that make up a send. Each builder checks
//! its preconditions against the current chain and returns `None` when the
//! transaction would be invalid; nothing is appended here.

use tracing::warn;

use super::block::{Block, ReceiptPayload, Transaction, TransferPayload, BLANK_SIZE, NO_RECEIPT};
use super::chain::Chain;

/// Opaque payload for the genesis block. Carries the `Invalid` tag on the
/// wire, so the chain dump renders it as such.
pub fn build_blank(data: [u8; BLANK_SIZE]) -> Transaction {
    Transaction::Blank(data)
}

/// The debit half of a send. `sender == 0` mints new value and skips the
/// balance check; everyone else must hold at least `amount`.
pub fn build_transfer(
    chain: &Chain,
    sender: u32,
    receiver: u32,
    amount: u32,
) -> Option<Transaction> {
    if sender == receiver || receiver == 0 {
        return None;
    }

    let (balance, prev_receipt) = if sender != 0 {
        chain.latest_receipt(sender)
    } else {
        (0, NO_RECEIPT)
    };

    if sender != 0 && balance < amount {
        warn!(sender, amount, balance, "transfer exceeds balance");
        return None;
    }

    let payload = TransferPayload {
        sender,
        receiver,
        prev_receipt,
        amount,
    };
    Some(if sender == 0 {
        Transaction::Generate(payload)
    } else {
        Transaction::Transfer(payload)
    })
}

/// Acknowledges the credit side of `transfer_block`, carrying the receiver's
/// new running balance.
pub fn build_receipt(chain: &Chain, transfer_block: &Block) -> Option<Transaction> {
    let transfer = transfer_block.transaction.transfer()?;
    let (balance, prev_receipt) = chain.latest_receipt(transfer.receiver);

    // The chain only holds u32 balances; an overflowing credit is rejected
    // rather than wrapped.
    let balance = balance.checked_add(transfer.amount)?;

    Some(Transaction::Receipt(ReceiptPayload {
        account: transfer.receiver,
        prev_receipt,
        prev_transfer: transfer_block.index,
        balance,
    }))
}

/// The change receipt: what remains of the sender's balance after the
/// transfer. Mints have no sender balance and therefore no return.
pub fn build_return(
    chain: &Chain,
    transfer_block: &Block,
    receipt_block: &Block,
) -> Option<Transaction> {
    let transfer = transfer_block.transaction.transfer()?;
    receipt_block.transaction.receipt()?;

    if transfer.prev_receipt == NO_RECEIPT {
        return None;
    }

    let prior_balance = chain
        .block_at(transfer.prev_receipt)
        .and_then(|block| block.transaction.receipt())
        .map(|receipt| receipt.balance)?;

    // Unreachable when the transfer was built against this chain, since
    // build_transfer already refused amounts above the balance.
    let balance = prior_balance.checked_sub(transfer.amount)?;

    Some(Transaction::Receipt(ReceiptPayload {
        account: transfer.sender,
        prev_receipt: transfer.prev_receipt,
        prev_transfer: receipt_block.index,
        balance,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::block::TransactionKind;

    fn chain_with_receipt(account: u32, balance: u32) -> Chain {
        let mut chain = Chain::new();
        chain.append(Block::new(
            0,
            0,
            0,
            Transaction::Receipt(ReceiptPayload {
                account,
                prev_receipt: NO_RECEIPT,
                prev_transfer: 0,
                balance,
            }),
        ));
        chain
    }

    #[test]
    fn blank_keeps_bytes_under_invalid_tag() {
        let tx = build_blank(*b"Kayne Ruse 2021!");
        assert_eq!(tx.kind(), TransactionKind::Invalid);
        assert_eq!(tx, Transaction::Blank(*b"Kayne Ruse 2021!"));
    }

    #[test]
    fn transfer_to_self_is_rejected() {
        let chain = chain_with_receipt(1, 100);
        assert!(build_transfer(&chain, 1, 1, 10).is_none());
    }

    #[test]
    fn transfer_to_account_zero_is_rejected() {
        let chain = chain_with_receipt(1, 100);
        assert!(build_transfer(&chain, 1, 0, 10).is_none());
        assert!(build_transfer(&chain, 0, 0, 10).is_none());
    }

    #[test]
    fn transfer_beyond_balance_is_rejected() {
        let chain = chain_with_receipt(1, 50);
        assert!(build_transfer(&chain, 1, 2, 75).is_none());
    }

    #[test]
    fn mint_skips_the_balance_check() {
        let chain = Chain::new();
        let tx = build_transfer(&chain, 0, 1, 50).unwrap();
        assert_eq!(tx.kind(), TransactionKind::Generate);
        let payload = tx.transfer().unwrap();
        assert_eq!(payload.prev_receipt, NO_RECEIPT);
        assert_eq!(payload.amount, 50);
    }

    #[test]
    fn transfer_records_prev_receipt() {
        let chain = chain_with_receipt(1, 100);
        let tx = build_transfer(&chain, 1, 2, 75).unwrap();
        assert_eq!(tx.kind(), TransactionKind::Transfer);
        assert_eq!(tx.transfer().unwrap().prev_receipt, 0);
    }

    #[test]
    fn receipt_adds_to_prior_balance() {
        let chain = chain_with_receipt(2, 30);
        let transfer_tx = build_transfer(&chain, 0, 2, 50).unwrap();
        let transfer_block = Block::new(1, 0, 0, transfer_tx);

        let receipt = build_receipt(&chain, &transfer_block).unwrap();
        let payload = receipt.receipt().unwrap();
        assert_eq!(payload.account, 2);
        assert_eq!(payload.balance, 80);
        assert_eq!(payload.prev_receipt, 0);
        assert_eq!(payload.prev_transfer, 1);
    }

    #[test]
    fn receipt_rejects_non_transfer_blocks() {
        let chain = Chain::new();
        let blank_block = Block::new(0, 0, 0, build_blank([0u8; BLANK_SIZE]));
        assert!(build_receipt(&chain, &blank_block).is_none());
    }

    #[test]
    fn receipt_rejects_balance_overflow() {
        let chain = chain_with_receipt(2, u32::MAX);
        let transfer_tx = build_transfer(&chain, 0, 2, 1).unwrap();
        let transfer_block = Block::new(1, 0, 0, transfer_tx);
        assert!(build_receipt(&chain, &transfer_block).is_none());
    }

    #[test]
    fn mint_produces_no_return() {
        let chain = Chain::new();
        let transfer_block = Block::new(0, 0, 0, build_transfer(&chain, 0, 1, 50).unwrap());
        let receipt_block = Block::new(1, 0, 0, build_receipt(&chain, &transfer_block).unwrap());
        assert!(build_return(&chain, &transfer_block, &receipt_block).is_none());
    }

    #[test]
    fn return_carries_the_change() {
        let chain = chain_with_receipt(1, 200);
        let transfer_block = Block::new(1, 0, 0, build_transfer(&chain, 1, 2, 75).unwrap());
        let receipt_block = Block::new(2, 0, 0, build_receipt(&chain, &transfer_block).unwrap());

        let ret = build_return(&chain, &transfer_block, &receipt_block).unwrap();
        let payload = ret.receipt().unwrap();
        assert_eq!(payload.account, 1);
        assert_eq!(payload.balance, 125);
        // Back-link to the sender's previous receipt, which is block 0 here.
        assert_eq!(payload.prev_receipt, 0);
        assert_eq!(payload.prev_transfer, 2);
    }

    #[test]
    fn return_requires_a_receipt_block() {
        let chain = chain_with_receipt(1, 200);
        let transfer_block = Block::new(1, 0, 0, build_transfer(&chain, 1, 2, 75).unwrap());
        assert!(build_return(&chain, &transfer_block, &transfer_block).is_none());
    }
}
