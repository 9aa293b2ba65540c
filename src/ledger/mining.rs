use tracing::trace;

use super::block::Block;
use crate::utils::fnv1a_32;

/// Proof-of-work search. Writes `threshold` into the block, scans nonces
/// upward from zero until the digest of the block image falls at or below
/// it, leaves the winning nonce in place, and returns the accepted hash.
/// Deterministic: the same block and threshold always land on the same nonce.
pub fn mine(block: &mut Block, threshold: u32) -> u32 {
    block.threshold = threshold;
    block.nonce = 0;
    loop {
        let hash = fnv1a_32(&block.image());
        if hash <= threshold {
            trace!(
                index = block.index,
                nonce = block.nonce,
                hash = %format!("0x{}", hex::encode(hash.to_be_bytes())),
                "mined"
            );
            return hash;
        }
        block.nonce = block.nonce.wrapping_add(1);
    }
}
