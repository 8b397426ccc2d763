pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const POW_DIFFICULTY: usize = 3;
pub const GENESIS_DATA: &str = "Genesis Block";
/// How many attempts pass between wall-clock checks when a time bound is set.
pub const MINING_CLOCK_CHECK_INTERVAL: u64 = 1024;
