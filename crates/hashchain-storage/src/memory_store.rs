use anyhow::{anyhow, bail, Result};
use hashchain_core::{Block, ChainStore};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Append-only block store held in memory. Everything is lost on drop.
///
/// Readers share the lock; a `put_block` takes it exclusively only for the push.
#[derive(Default)]
pub struct MemoryStore {
  blocks: RwLock<Vec<Block>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    info!("memory store opened");
    Self::default()
  }

  fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Block>>> {
    self.blocks.read().map_err(|_| anyhow!("block store lock poisoned"))
  }

  fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Block>>> {
    self.blocks.write().map_err(|_| anyhow!("block store lock poisoned"))
  }
}

impl ChainStore for MemoryStore {
  fn put_block(&self, block: &Block) -> Result<()> {
    let mut blocks = self.write()?;
    let next = blocks.len() as u64;
    if block.index != next {
      bail!("cannot store block {} (next index is {})", block.index, next);
    }
    blocks.push(block.clone());
    debug!(index = block.index, "block stored");
    Ok(())
  }

  fn get_block(&self, index: u64) -> Result<Option<Block>> {
    let blocks = self.read()?;
    Ok(usize::try_from(index).ok().and_then(|i| blocks.get(i)).cloned())
  }

  fn tip(&self) -> Result<Option<Block>> {
    Ok(self.read()?.last().cloned())
  }

  fn block_count(&self) -> Result<u64> {
    Ok(self.read()?.len() as u64)
  }

  fn blocks(&self) -> Result<Vec<Block>> {
    Ok(self.read()?.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use hashchain_core::genesis_block;

  #[test]
  fn empty_store() {
    let store = MemoryStore::new();
    assert_eq!(store.block_count().unwrap(), 0);
    assert!(store.tip().unwrap().is_none());
    assert!(store.get_block(0).unwrap().is_none());
    assert!(store.blocks().unwrap().is_empty());
  }

  #[test]
  fn rejects_gaps_and_duplicates() {
    let store = MemoryStore::new();
    let genesis = genesis_block();
    store.put_block(&genesis).unwrap();

    let err = store.put_block(&genesis).unwrap_err();
    assert!(err.to_string().contains("next index is 1"));

    let mut skipped = Block::next(&genesis, "skip");
    skipped.index = 5;
    assert!(store.put_block(&skipped).is_err());
    assert_eq!(store.block_count().unwrap(), 1);
  }
}
