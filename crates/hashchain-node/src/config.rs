use clap::Parser;
use hashchain_core::MiningConfig;
use std::time::Duration;

use crate::constants::DEFAULT_LISTEN;

#[derive(Parser, Debug)]
#[command(name = "hashchain-node")]
#[command(about = "Single-node proof-of-work block chain served over HTTP")]
pub struct Args {
    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long, default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// Give up mining a block after this many hash attempts
    #[arg(long)]
    pub max_attempts: Option<u64>,

    /// Give up mining a block after this many seconds
    #[arg(long)]
    pub max_mine_secs: Option<u64>,
}

impl Args {
    /// Difficulty is fixed at compile time; only the search bounds are configurable.
    pub fn mining_config(&self) -> MiningConfig {
        let mut config = MiningConfig::default();
        if let Some(attempts) = self.max_attempts {
            config = config.max_attempts(attempts);
        }
        if let Some(secs) = self.max_mine_secs {
            config = config.max_duration(Duration::from_secs(secs));
        }
        config
    }
}
