//! UDP battle server: login, roster selection, matchmaking and battles
//!
//! # Example
//!
//! ```ignore
//! use pokebat_server::{Catalog, Server, ServerConfig};
//!
//! let config = ServerConfig::default();
//! let catalog = Catalog::load(&config.catalog)?;
//!
//! let server = Server::bind(config, catalog).await?;
//! server.run().await?;
//! ```

mod catalog;
mod config;
mod dispatch;
mod errors;
mod link;
mod registry;
mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;

pub use catalog::Catalog;
pub use config::ServerConfig;
pub use errors::{RegistrationError, TransportError};
pub use link::{Seat, UdpLink};
pub use registry::{Entrant, MatchPairing, Registry};
pub use transport::Transport;

use dispatch::Dispatcher;

/// A bound server, ready to run
pub struct Server {
    transport: Transport,
    registry: Arc<Registry>,
    config: ServerConfig,
}

impl Server {
    /// Bind the datagram endpoint from `config`
    pub async fn bind(config: ServerConfig, catalog: Catalog) -> Result<Self> {
        let transport = Transport::bind(config.bind, config.max_datagram).await?;
        let registry = Arc::new(Registry::new(Arc::new(catalog)));

        Ok(Self {
            transport,
            registry,
            config,
        })
    }

    /// Address actually bound, useful when binding port 0
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.transport.local_addr()?)
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Serve until the task is cancelled
    pub async fn run(self) -> Result<()> {
        tracing::info!(
            addr = %self.local_addr()?,
            players = self.registry.catalog().len(),
            max_datagram = self.config.max_datagram,
            reply_timeout = ?self.config.reply_timeout,
            "Server listening"
        );

        Dispatcher::new(self.transport, self.registry, self.config)
            .run()
            .await;
        Ok(())
    }
}
