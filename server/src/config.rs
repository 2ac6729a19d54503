use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings for a server instance
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address of the single datagram endpoint
    pub bind: SocketAddr,

    /// Path of the JSON player catalog
    pub catalog: PathBuf,

    /// Largest datagram accepted; anything longer is dropped
    pub max_datagram: usize,

    /// How long a battle waits for a prompted reply (None = forever)
    pub reply_timeout: Option<Duration>,

    /// Seed for attack rolls; each battle derives its own stream from it
    pub seed: Option<u64>,

    /// Delay between narration phases of a turn
    pub pause: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            catalog: PathBuf::from("player.json"),
            max_datagram: 1024,
            reply_timeout: None,
            seed: None,
            pause: Duration::ZERO,
        }
    }
}
