use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod chain;
pub mod constants;
pub mod error;
pub mod pow;
pub mod validate;

pub use chain::{genesis_block, Chain, ChainStore};
pub use error::{ChainError, Result, ValidationError};
pub use pow::MiningConfig;
pub use validate::{is_block_valid, is_chain_valid, validate_block, validate_chain};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub index: u64,
    pub timestamp: String,
    pub data: String,
    pub prev_hash: String,
    pub hash: String,
    pub nonce: u64,
}

impl Block {
    /// Unmined block: nonce 0 and an empty hash.
    pub fn new(
        index: u64,
        timestamp: impl Into<String>,
        data: impl Into<String>,
        prev_hash: impl Into<String>,
    ) -> Self {
        Self {
            index,
            timestamp: timestamp.into(),
            data: data.into(),
            prev_hash: prev_hash.into(),
            hash: String::new(),
            nonce: 0,
        }
    }

    /// Candidate successor of `prev`, stamped with the current time.
    ///
    /// The index saturates at `u64::MAX`; such a block never validates against `prev`.
    pub fn next(prev: &Block, data: impl Into<String>) -> Self {
        Self::new(prev.index.saturating_add(1), now_timestamp(), data, prev.hash.clone())
    }

    pub fn compute_hash(&self) -> String {
        calculate_hash(
            self.index,
            &self.timestamp,
            &self.data,
            &self.prev_hash,
            self.nonce,
        )
    }
}

/// SHA-256 over `{index}{timestamp}{data}{prev_hash}{nonce}`, lowercase hex.
pub fn calculate_hash(
    index: u64,
    timestamp: &str,
    data: &str,
    prev_hash: &str,
    nonce: u64,
) -> String {
    let record = format!("{index}{timestamp}{data}{prev_hash}{nonce}");
    let mut hasher = Sha256::new();
    hasher.update(record.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn count_leading_zero_hex(hash: &str) -> usize {
    hash.bytes().take_while(|b| *b == b'0').count()
}

pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}

pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
