use clap::Parser;
use tracing_subscriber::EnvFilter;

use minicoin::ledger::{BLANK_SIZE, BLOCK_IMAGE_SIZE, DEFAULT_THRESHOLD, TX_IMAGE_SIZE};
use minicoin::{Ledger, SystemClock};

const GENESIS_BLANK: [u8; BLANK_SIZE] = *b"Kayne Ruse 2021!";
const GENESIS_PREV_HASH: u32 = 42;

/// Demo driver: runs a fixed script of sends against a fresh ledger and
/// dumps the resulting chain.
#[derive(Parser)]
#[command(name = "minicoin", version)]
struct Cli {
    /// Mining threshold (maximum accepted hash value); zero would let the
    /// nonce search run forever, so it is refused
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, value_parser = clap::value_parser!(u32).range(1..))]
    threshold: u32,

    /// Dump the chain as JSON instead of the plain listing
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    println!("Blank size: {}", BLANK_SIZE);
    println!("Trans size: {}", TX_IMAGE_SIZE);
    println!("Block size: {}", BLOCK_IMAGE_SIZE);

    let mut ledger =
        Ledger::with_threshold(GENESIS_BLANK, GENESIS_PREV_HASH, SystemClock, cli.threshold);

    let script: [(u32, u32, u32); 12] = [
        (0, 1, 50),
        (0, 1, 50),
        (0, 1, 50),
        (0, 1, 50),
        (1, 1, 50),
        (1, 1, 50),
        (1, 1, 50),
        (1, 1, 50),
        (1, 2, 75),
        (1, 2, 75),
        (1, 2, 75),
        (1, 2, 75),
    ];
    for (sender, receiver, amount) in script {
        if let Err(err) = ledger.send(sender, receiver, amount) {
            tracing::warn!(sender, receiver, amount, code = err.code(), "{err}");
        }
    }

    if cli.json {
        match serde_json::to_string_pretty(ledger.chain().blocks()) {
            Ok(json) => println!("{json}"),
            Err(err) => tracing::error!("failed to serialize chain: {err}"),
        }
    } else {
        for block in ledger.chain().blocks() {
            println!("{block}");
        }
    }
}
