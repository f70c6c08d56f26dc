//! Gokedex - an interactive Pokedex in the terminal
//!
//! Reads commands from stdin, looks up location areas and pokemon on PokeAPI
//! through an in-memory response cache, and keeps caught pokemon for the
//! length of the session.

use std::io;
use std::process;

use clap::Parser;
use tokio::io::BufReader;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gokedex::api::PokeClient;
use gokedex::cache::TtlCache;
use gokedex::cli::{Cli, StartupConfig};
use gokedex::repl::Repl;

/// Sets up stderr logging, honouring `RUST_LOG` when present
fn init_tracing(verbose: bool) {
    let filter = if verbose { "gokedex=debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    init_tracing(config.verbose);
    debug!(?config, "starting gokedex");

    let cache = TtlCache::new(config.cache_ttl)?;
    let client = PokeClient::new(config.base_url, cache);
    let mut repl = Repl::new(client, rand::thread_rng());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    let result = repl.run(stdin, &mut stdout).await;

    // Stop the cache reaper before the runtime goes away
    repl.shutdown().await;

    result?;
    Ok(())
}
