use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::constants::GENESIS_DATA;
use crate::error::{ChainError, Result, ValidationError};
use crate::pow::{mine_block, MiningConfig};
use crate::validate::{is_chain_valid, validate_block, validate_proof_of_work};
use crate::{now_timestamp, Block};

/// Trait the storage backends implement for the chain to operate.
/// This lives in `hashchain-core` to avoid a circular dependency.
pub trait ChainStore: Send + Sync {
    /// Append `block`. Implementations reject indices that are not `block_count()`.
    fn put_block(&self, block: &Block) -> anyhow::Result<()>;
    fn get_block(&self, index: u64) -> anyhow::Result<Option<Block>>;
    fn tip(&self) -> anyhow::Result<Option<Block>>;
    fn block_count(&self) -> anyhow::Result<u64>;
    /// Copy of every block, genesis first.
    fn blocks(&self) -> anyhow::Result<Vec<Block>>;
}

/// Chain façade that owns the append path and delegates storage to a `ChainStore`.
///
/// Appends are serialized behind one lock held across read-tail, mine, validate
/// and store. Reads go straight to the store and never see a half-written chain.
pub struct Chain<S: ChainStore> {
    store: Arc<S>,
    config: MiningConfig,
    append_lock: Arc<Mutex<()>>,
}

impl<S: ChainStore> Clone for Chain<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
            append_lock: Arc::clone(&self.append_lock),
        }
    }
}

impl<S: ChainStore> Chain<S> {
    pub fn new(store: Arc<S>, config: MiningConfig) -> Self {
        Self {
            store,
            config,
            append_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    /// Ensure a genesis block exists. Idempotent.
    pub fn ensure_genesis(&self) -> Result<Block> {
        let _guard = self.append_lock.lock().map_err(|_| ChainError::LockPoisoned)?;
        if let Some(genesis) = self.store.get_block(0)? {
            return Ok(genesis);
        }
        let genesis = genesis_block();
        self.store.put_block(&genesis)?;
        info!(hash = %genesis.hash, "genesis block created");
        Ok(genesis)
    }

    /// Mine a block carrying `data` on top of the current tip and append it.
    ///
    /// Blocks the calling thread for the whole proof-of-work search.
    pub fn append(&self, data: impl Into<String>) -> Result<Block> {
        let _guard = self.append_lock.lock().map_err(|_| ChainError::LockPoisoned)?;
        let tail = self.store.tip()?.ok_or(ChainError::MissingGenesis)?;
        if tail.index == u64::MAX {
            return Err(ValidationError::IndexOverflow {
                predecessor: tail.index,
            }
            .into());
        }
        let mined = mine_block(Block::next(&tail, data), &self.config)?;
        self.commit(&tail, mined)
    }

    // Caller must hold `append_lock`.
    fn commit(&self, tail: &Block, mined: Block) -> Result<Block> {
        let checked = validate_block(&mined, tail)
            .and_then(|()| validate_proof_of_work(&mined, self.config.difficulty));
        if let Err(e) = checked {
            warn!(index = mined.index, hash = %mined.hash, error = %e, "discarding invalid block");
            return Err(ChainError::IntegrityViolation(e));
        }
        self.store.put_block(&mined)?;
        info!(index = mined.index, hash = %mined.hash, "block appended");
        Ok(mined)
    }

    pub fn snapshot(&self) -> Result<Vec<Block>> {
        Ok(self.store.blocks()?)
    }

    pub fn tip(&self) -> Result<Block> {
        self.store.tip()?.ok_or(ChainError::MissingGenesis)
    }

    pub fn block(&self, index: u64) -> Result<Option<Block>> {
        Ok(self.store.get_block(index)?)
    }

    /// Index of the tip block; 0 when only genesis exists.
    pub fn height(&self) -> Result<u64> {
        Ok(self.tip()?.index)
    }

    pub fn is_valid(&self) -> Result<bool> {
        Ok(is_chain_valid(&self.snapshot()?))
    }
}

/// Genesis block: empty prev-hash, nonce 0, hashed once with no proof-of-work search.
pub fn genesis_block() -> Block {
    let mut genesis = Block::new(0, now_timestamp(), GENESIS_DATA, "");
    genesis.hash = genesis.compute_hash();
    genesis
}
