pub mod api;
pub mod config;
mod constants;

use hashchain_core::{Chain, MiningConfig};
use hashchain_storage::MemoryStore;
use std::sync::Arc;

pub use api::{router, AppState};
pub use constants::MAX_MINE_BODY_BYTES;

/// Fresh in-memory chain seeded with its genesis block.
pub fn build_state(config: MiningConfig) -> hashchain_core::Result<AppState> {
    let chain = Chain::new(Arc::new(MemoryStore::new()), config);
    chain.ensure_genesis()?;
    Ok(AppState { chain })
}
