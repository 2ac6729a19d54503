//! UDP-backed player link for one battle

use std::net::SocketAddr;
use std::time::Duration;

use pokebat_battle::{BattleError, PlayerLink};
use pokebat_protocol::Player;
use tokio::sync::mpsc;

use crate::transport::Transport;

/// One seat's reply address and the inbox the dispatcher feeds
#[derive(Debug)]
pub struct Seat {
    pub addr: SocketAddr,
    inbox: mpsc::UnboundedReceiver<String>,
}

impl Seat {
    pub fn new(addr: SocketAddr, inbox: mpsc::UnboundedReceiver<String>) -> Self {
        Self { addr, inbox }
    }
}

/// Connects a battle to both players over the shared socket
#[derive(Debug)]
pub struct UdpLink {
    transport: Transport,
    seats: [Seat; 2],
    reply_timeout: Option<Duration>,
    pause: Duration,
}

impl UdpLink {
    pub fn new(transport: Transport, seats: [Seat; 2]) -> Self {
        Self {
            transport,
            seats,
            reply_timeout: None,
            pause: Duration::ZERO,
        }
    }

    /// Give up on a prompt after `timeout`
    pub fn with_reply_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Wait `pause` between narration phases
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn addr(&self, player: Player) -> SocketAddr {
        self.seats[player.index()].addr
    }

    /// Tell whoever is still there why the battle stopped
    pub async fn report_abort(&self, error: &BattleError) {
        let culprit = error.player();
        let notices = match error {
            BattleError::Disconnected(_) => {
                vec![(culprit.opponent(), "Your opponent left the battle. Battle ended!")]
            }
            BattleError::StalledPeer(_) => vec![
                (culprit, "No reply in time. Battle aborted!"),
                (culprit.opponent(), "Your opponent stopped responding. Battle aborted!"),
            ],
            BattleError::Transport { .. } => {
                vec![(culprit.opponent(), "Lost contact with your opponent. Battle aborted!")]
            }
        };

        for (player, text) in notices {
            if let Err(e) = self.transport.send(self.addr(player), text).await {
                tracing::warn!(%player, error = %e, "Failed to deliver abort notice");
            }
        }
    }
}

impl PlayerLink for UdpLink {
    async fn send(&mut self, player: Player, text: &str) -> Result<(), BattleError> {
        self.transport
            .send(self.addr(player), text)
            .await
            .map_err(|e| BattleError::Transport {
                player,
                message: e.to_string(),
            })
    }

    async fn ask(&mut self, player: Player, prompt: &str) -> Result<String, BattleError> {
        let seat = &mut self.seats[player.index()];

        // input typed before the prompt answers nothing
        while let Ok(stale) = seat.inbox.try_recv() {
            tracing::debug!(%player, input = %stale, "Discarding stale input");
        }

        self.transport
            .send(seat.addr, prompt)
            .await
            .map_err(|e| BattleError::Transport {
                player,
                message: e.to_string(),
            })?;

        let reply = match self.reply_timeout {
            Some(limit) => tokio::time::timeout(limit, seat.inbox.recv())
                .await
                .map_err(|_| BattleError::StalledPeer(player))?,
            None => seat.inbox.recv().await,
        };

        reply.ok_or(BattleError::Disconnected(player))
    }

    async fn pause(&mut self) {
        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }
    }
}
