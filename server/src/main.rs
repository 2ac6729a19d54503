use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pokebat_server::{Catalog, Server, ServerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pokebat")]
#[command(about = "Turn-based battle server over UDP")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Player catalog JSON
    #[arg(long, default_value = "player.json")]
    catalog: PathBuf,

    /// Largest datagram accepted, in bytes
    #[arg(long, default_value_t = 1024)]
    max_datagram: usize,

    /// Abort a battle when a prompted player stays silent this long
    #[arg(long)]
    reply_timeout_secs: Option<u64>,

    /// Seed for attack rolls
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between narration phases, in milliseconds
    #[arg(long, default_value_t = 0)]
    pause_ms: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            bind: args.bind,
            catalog: args.catalog,
            max_datagram: args.max_datagram,
            reply_timeout: args.reply_timeout_secs.map(Duration::from_secs),
            seed: args.seed,
            pause: Duration::from_millis(args.pause_ms),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from(Args::parse());

    let catalog = Catalog::load(&config.catalog)
        .with_context(|| format!("Could not start without a catalog ({})", config.catalog.display()))?;

    let server = Server::bind(config, catalog).await?;
    server.run().await
}
