use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hashchain_core::{
    constants::POW_DIFFICULTY, validate::validate_proof_of_work, validate_chain, Block,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_NODE: &str = "http://127.0.0.1:8080";

#[derive(Parser, Debug)]
#[command(name = "hashchain-cli")]
#[command(about = "CLI client for the hashchain node")]
struct Cli {
    /// Node base URL (e.g. http://127.0.0.1:8080)
    #[arg(long, global = true, default_value = DEFAULT_NODE)]
    node: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every block the node holds
    Blocks,
    /// Ask the node to mine a block carrying DATA
    Mine {
        /// Block payload
        #[arg(long, default_value = "")]
        data: String,
    },
    /// Fetch the chain and check linkage and proof of work locally
    Verify {
        /// Leading zero hex characters required on every non-genesis block
        #[arg(long, default_value_t = POW_DIFFICULTY)]
        difficulty: usize,
    },
}

#[derive(Serialize)]
struct MineRequest {
    data: String,
}

async fn fetch_blocks(client: &reqwest::Client, node: &str) -> Result<Vec<Block>> {
    let url = format!("{node}/blocks");
    debug!(%url, "fetching blocks");
    client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?
        .error_for_status()?
        .json()
        .await
        .context("node returned an unreadable block list")
}

/// Linkage for every pair, then proof of work for everything past genesis.
fn verify(blocks: &[Block], difficulty: usize) -> Result<()> {
    validate_chain(blocks)?;
    for block in blocks.iter().skip(1) {
        validate_proof_of_work(block, difficulty)
            .with_context(|| format!("block {}", block.index))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();
    match cli.cmd {
        Command::Blocks => {
            let blocks = fetch_blocks(&client, &cli.node).await?;
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
        Command::Mine { data } => {
            let res = client
                .post(format!("{}/mine", cli.node))
                .json(&MineRequest { data })
                .send()
                .await?;
            let status = res.status();
            let body = res.text().await?;
            println!("status: {}", status);
            println!("{body}");
        }
        Command::Verify { difficulty } => {
            let blocks = fetch_blocks(&client, &cli.node).await?;
            match verify(&blocks, difficulty) {
                Ok(()) => println!("chain of {} blocks is valid", blocks.len()),
                Err(e) => {
                    println!("chain is INVALID: {e:#}");
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}
