use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::constants::{MINING_CLOCK_CHECK_INTERVAL, POW_DIFFICULTY};
use crate::error::{ChainError, Result};
use crate::{meets_difficulty, Block};

/// Difficulty and optional bounds for the nonce search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MiningConfig {
    /// Required number of leading `'0'` hex characters.
    pub difficulty: usize,
    pub max_attempts: Option<u64>,
    pub max_duration: Option<Duration>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            difficulty: POW_DIFFICULTY,
            max_attempts: None,
            max_duration: None,
        }
    }
}

impl MiningConfig {
    pub fn with_difficulty(difficulty: usize) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn max_attempts(mut self, attempts: u64) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }
}

/// Mine the block by incrementing the nonce from 0 until its hash has at least
/// `config.difficulty` leading zero hex characters.
///
/// With no bounds configured the search only stops on success or when the
/// `u64` nonce space runs out.
pub fn mine_block(block: Block, config: &MiningConfig) -> Result<Block> {
    search_from(block, 0, config)
}

fn search_from(mut block: Block, first_nonce: u64, config: &MiningConfig) -> Result<Block> {
    let started = Instant::now();
    block.nonce = first_nonce;
    let mut attempts: u64 = 0;

    loop {
        block.hash = block.compute_hash();
        attempts = attempts.saturating_add(1);

        if meets_difficulty(&block.hash, config.difficulty) {
            info!(
                index = block.index,
                nonce = block.nonce,
                attempts,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Mined block {}",
                block.hash
            );
            return Ok(block);
        }

        if config.max_attempts.is_some_and(|max| attempts >= max) {
            debug!(index = block.index, attempts, "mining attempt bound reached");
            return Err(ChainError::ProofOfWorkTimeout { attempts });
        }
        if attempts % MINING_CLOCK_CHECK_INTERVAL == 0
            && config.max_duration.is_some_and(|max| started.elapsed() >= max)
        {
            debug!(index = block.index, attempts, "mining time bound reached");
            return Err(ChainError::ProofOfWorkTimeout { attempts });
        }

        block.nonce = block
            .nonce
            .checked_add(1)
            .ok_or(ChainError::NonceSpaceExhausted)?;
    }
}
