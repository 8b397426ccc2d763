//! Block and chain validation.
//!
//! `validate_block` applies the linkage rules in a fixed order and stops at the
//! first failure: index continuity, prev-hash linkage, then hash recomputation.
//! The recomputation only proves the stored hash matches the block contents; it
//! does not re-check proof of work. Use `validate_proof_of_work` for that.
//! Timestamps and payloads are never inspected.

use crate::error::ValidationError;
use crate::{count_leading_zero_hex, meets_difficulty, Block};

pub fn validate_block(candidate: &Block, predecessor: &Block) -> Result<(), ValidationError> {
    let expected_index = predecessor
        .index
        .checked_add(1)
        .ok_or(ValidationError::IndexOverflow {
            predecessor: predecessor.index,
        })?;
    if candidate.index != expected_index {
        return Err(ValidationError::InvalidIndex {
            expected: expected_index,
            got: candidate.index,
        });
    }

    if predecessor.hash != candidate.prev_hash {
        return Err(ValidationError::PrevHashMismatch);
    }

    let recomputed = candidate.compute_hash();
    if recomputed != candidate.hash {
        return Err(ValidationError::HashMismatch {
            expected: recomputed,
            got: candidate.hash.clone(),
        });
    }

    Ok(())
}

pub fn is_block_valid(candidate: &Block, predecessor: &Block) -> bool {
    validate_block(candidate, predecessor).is_ok()
}

pub fn validate_proof_of_work(block: &Block, difficulty: usize) -> Result<(), ValidationError> {
    if meets_difficulty(&block.hash, difficulty) {
        Ok(())
    } else {
        Err(ValidationError::InsufficientWork {
            required: difficulty,
            found: count_leading_zero_hex(&block.hash),
        })
    }
}

/// Validate every adjacent pair; reports the height of the first bad block.
pub fn validate_chain(blocks: &[Block]) -> Result<(), ValidationError> {
    for pair in blocks.windows(2) {
        let (predecessor, candidate) = (&pair[0], &pair[1]);
        validate_block(candidate, predecessor).map_err(|e| ValidationError::AtHeight {
            height: candidate.index,
            source: Box::new(e),
        })?;
    }
    Ok(())
}

/// Empty and genesis-only chains are trivially valid.
pub fn is_chain_valid(blocks: &[Block]) -> bool {
    validate_chain(blocks).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::genesis_block;
    use crate::pow::{mine_block, MiningConfig};

    fn two_block_chain() -> (Block, Block) {
        let genesis = genesis_block();
        let next = mine_block(Block::next(&genesis, "hello"), &MiningConfig::default()).unwrap();
        (genesis, next)
    }

    #[test]
    fn valid_successor_passes() {
        let (genesis, next) = two_block_chain();
        assert!(is_block_valid(&next, &genesis));
        assert_eq!(validate_block(&next, &genesis), Ok(()));
    }

    #[test]
    fn rejects_tampered_data() {
        let (genesis, mut next) = two_block_chain();
        next.data = "goodbye".into();
        assert!(!is_block_valid(&next, &genesis));
        assert!(matches!(
            validate_block(&next, &genesis),
            Err(ValidationError::HashMismatch { .. })
        ));
    }

    #[test]
    fn rejects_skipped_index() {
        let (genesis, mut next) = two_block_chain();
        next.index = genesis.index + 2;
        assert!(!is_block_valid(&next, &genesis));
        assert_eq!(
            validate_block(&next, &genesis),
            Err(ValidationError::InvalidIndex {
                expected: 1,
                got: 2
            })
        );
    }

    #[test]
    fn rejects_broken_prev_hash() {
        let (genesis, mut next) = two_block_chain();
        next.prev_hash = "not-the-genesis-hash".into();
        assert!(!is_block_valid(&next, &genesis));
        assert_eq!(
            validate_block(&next, &genesis),
            Err(ValidationError::PrevHashMismatch)
        );
    }

    #[test]
    fn rejects_successor_of_max_index() {
        let mut predecessor = genesis_block();
        predecessor.index = u64::MAX;
        let mut candidate = Block::new(0, "ts", "wrapped", predecessor.hash.clone());
        candidate.hash = candidate.compute_hash();

        assert!(!is_block_valid(&candidate, &predecessor));
        assert_eq!(
            validate_block(&candidate, &predecessor),
            Err(ValidationError::IndexOverflow {
                predecessor: u64::MAX
            })
        );
        assert!(!is_chain_valid(&[predecessor, candidate]));
    }

    #[test]
    fn index_check_runs_first() {
        let (genesis, mut next) = two_block_chain();
        next.index = 5;
        next.prev_hash = "bogus".into();
        next.data = "tampered".into();
        assert!(matches!(
            validate_block(&next, &genesis),
            Err(ValidationError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn self_consistent_block_without_work_still_passes_linkage() {
        let genesis = genesis_block();
        let mut next = Block::next(&genesis, "lazy");
        next.hash = next.compute_hash();
        assert!(is_block_valid(&next, &genesis));
        if !next.hash.starts_with("000") {
            assert!(validate_proof_of_work(&next, 3).is_err());
        }
    }

    #[test]
    fn proof_of_work_check() {
        let (genesis, next) = two_block_chain();
        assert_eq!(validate_proof_of_work(&next, 3), Ok(()));
        assert_eq!(validate_proof_of_work(&genesis, 0), Ok(()));

        let mut weak = next.clone();
        weak.hash = "00abcdef".into();
        assert_eq!(
            validate_proof_of_work(&weak, 3),
            Err(ValidationError::InsufficientWork {
                required: 3,
                found: 2
            })
        );
    }

    #[test]
    fn empty_and_genesis_only_chains_are_valid() {
        assert!(is_chain_valid(&[]));
        assert!(is_chain_valid(&[genesis_block()]));
    }

    #[test]
    fn chain_validation_reports_first_bad_height() {
        let (genesis, next) = two_block_chain();
        let third = mine_block(Block::next(&next, "third"), &MiningConfig::default()).unwrap();
        let mut blocks = vec![genesis, next, third];
        assert!(is_chain_valid(&blocks));

        blocks[2].data = "rewritten".into();
        assert!(!is_chain_valid(&blocks));
        match validate_chain(&blocks) {
            Err(ValidationError::AtHeight { height, source }) => {
                assert_eq!(height, 2);
                assert!(matches!(*source, ValidationError::HashMismatch { .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
