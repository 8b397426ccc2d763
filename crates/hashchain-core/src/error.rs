use thiserror::Error;

/// Why a block failed validation against its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("block index mismatch (expected {expected}, got {got})")]
    InvalidIndex { expected: u64, got: u64 },

    #[error("no index follows predecessor index {predecessor}")]
    IndexOverflow { predecessor: u64 },

    #[error("block prev_hash does not match predecessor hash")]
    PrevHashMismatch,

    #[error("stored hash does not match block contents (expected {expected}, got {got})")]
    HashMismatch { expected: String, got: String },

    #[error("insufficient proof of work (required {required} leading zeros, found {found})")]
    InsufficientWork { required: usize, found: usize },

    #[error("invalid block at height {height}: {source}")]
    AtHeight {
        height: u64,
        #[source]
        source: Box<ValidationError>,
    },
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("mined block failed validation: {0}")]
    IntegrityViolation(#[from] ValidationError),

    #[error("proof of work not found after {attempts} attempts")]
    ProofOfWorkTimeout { attempts: u64 },

    #[error("nonce space exhausted")]
    NonceSpaceExhausted,

    #[error("chain has no genesis block")]
    MissingGenesis,

    #[error("chain lock poisoned")]
    LockPoisoned,

    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for ChainError {
    fn from(err: anyhow::Error) -> Self {
        ChainError::Storage(err)
    }
}

pub type Result<T> = std::result::Result<T, ChainError>;
