//! Receive loop: classifies datagrams and routes them by sender address

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use pokebat_battle::{Battle, RandomRoll, ROSTER_SIZE, narration};
use pokebat_protocol::{
    ClientCommand, LoginFailure, ServerMessage, parse_client_message, parse_selection, prompt,
};
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::config::ServerConfig;
use crate::errors::{RegistrationError, TransportError};
use crate::link::{Seat, UdpLink};
use crate::registry::{MatchPairing, Registry};
use crate::transport::Transport;

const WAITING_FOR_OPPONENT: &str = "Waiting for an opponent...";

/// What an address is currently doing
#[derive(Debug)]
enum Route {
    /// Logged in, picking three fighters
    Selecting { name: String },

    /// Roster fixed, no opponent yet
    Waiting { name: String },

    /// Inside a battle; text goes to the battle's inbox for this seat
    Battle {
        name: String,
        inbox: mpsc::UnboundedSender<String>,
    },
}

impl Route {
    fn name(&self) -> &str {
        match self {
            Self::Selecting { name } | Self::Waiting { name } | Self::Battle { name, .. } => name,
        }
    }
}

/// Reports from battle tasks
#[derive(Debug)]
enum Control {
    Finished { seats: [(SocketAddr, String); 2] },
}

/// Owns the routing table; the registry is the only state it shares
pub(crate) struct Dispatcher {
    transport: Transport,
    registry: Arc<Registry>,
    config: ServerConfig,
    routes: HashMap<SocketAddr, Route>,
    control_tx: mpsc::UnboundedSender<Control>,
    control_rx: mpsc::UnboundedReceiver<Control>,
    battles_started: u64,
}

impl Dispatcher {
    pub(crate) fn new(transport: Transport, registry: Arc<Registry>, config: ServerConfig) -> Self {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            registry,
            config,
            routes: HashMap::new(),
            control_tx,
            control_rx,
            battles_started: 0,
        }
    }

    /// Run until the task is dropped
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                received = self.transport.recv() => match received {
                    Ok((text, from)) => self.handle_datagram(from, &text).await,
                    Err(e @ TransportError::Io(_)) => {
                        tracing::error!(error = %e, "Receive failed");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Dropping datagram");
                    }
                },
                Some(control) = self.control_rx.recv() => self.handle_control(control).await,
            }
        }
    }

    async fn handle_datagram(&mut self, from: SocketAddr, text: &str) {
        match parse_client_message(text) {
            Ok(ClientCommand::Login(name)) => self.login(from, name).await,
            Ok(ClientCommand::Logout(name)) => self.logout(from, &name),
            Ok(ClientCommand::Text(text)) => self.route_text(from, text).await,
            Err(e) => tracing::debug!(%from, error = %e, "Ignoring malformed datagram"),
        }
    }

    async fn login(&mut self, from: SocketAddr, name: String) {
        if let Some(route) = self.routes.get(&from) {
            let text = format!("You are already logged in as {}", route.name());
            self.reply(from, &text).await;
            return;
        }

        let reply = match self.registry.register(&name, from) {
            Ok(()) => ServerMessage::LoginSuccess(name.clone()),
            Err(RegistrationError::UnknownPlayer(_)) => ServerMessage::LoginFailed {
                name: name.clone(),
                reason: LoginFailure::NoPlayer,
            },
            Err(RegistrationError::AlreadyLoggedIn(_)) => ServerMessage::LoginFailed {
                name: name.clone(),
                reason: LoginFailure::AlreadyLoggedIn,
            },
            Err(e) => {
                tracing::warn!(%from, error = %e, "Unexpected login failure");
                return;
            }
        };

        self.reply(from, &reply.to_wire_format()).await;
        if !reply.is_success() {
            tracing::info!(%from, reply = %reply.to_wire_format(), "Login refused");
            return;
        }

        self.reply(from, prompt::WELCOME).await;
        self.prompt_roster(from, &name).await;
        self.routes.insert(from, Route::Selecting { name });
    }

    /// Sessions are looked up by name, so any address may end one
    fn logout(&mut self, from: SocketAddr, name: &str) {
        let held = self
            .routes
            .iter()
            .find(|(_, route)| route.name() == name)
            .map(|(addr, _)| *addr);

        // dropping a battle route closes that seat's inbox
        if let Some(addr) = held {
            self.routes.remove(&addr);
        }
        let was_waiting = self.registry.unregister(name);

        if held.is_none() && !was_waiting {
            tracing::debug!(%from, player = %name, "Logout for a name with no session");
            return;
        }
        tracing::info!(%from, session = ?held, player = %name, "Player logged out");
    }

    async fn route_text(&mut self, from: SocketAddr, text: String) {
        match self.routes.get(&from) {
            Some(Route::Selecting { name }) => {
                let name = name.clone();
                self.select_roster(from, &name, &text).await;
            }
            Some(Route::Waiting { .. }) => self.reply(from, WAITING_FOR_OPPONENT).await,
            Some(Route::Battle { name, inbox }) => {
                if inbox.send(text).is_err() {
                    tracing::debug!(%from, player = %name, "Battle already over, input dropped");
                }
            }
            None => tracing::debug!(%from, "Ignoring text from unknown address"),
        }
    }

    async fn prompt_roster(&self, to: SocketAddr, name: &str) {
        if let Some(fighters) = self.registry.catalog().player_roster(name) {
            self.reply(to, &narration::catalog_listing(name, fighters)).await;
        }
        self.reply(to, prompt::CHOOSE_ROSTER).await;
    }

    async fn select_roster(&mut self, from: SocketAddr, name: &str, text: &str) {
        let Some(fighters) = self.registry.catalog().player_roster(name) else {
            return;
        };

        let ids = match parse_selection(text, fighters.len(), ROSTER_SIZE) {
            Ok(slots) => slots.into_iter().map(|slot| fighters[slot - 1].id).collect::<Vec<_>>(),
            Err(e) => {
                tracing::debug!(player = %name, error = %e, "Rejected roster input");
                let text = format!("Invalid input ({}). Please try again.", e);
                self.reply(from, &text).await;
                self.reply(from, prompt::CHOOSE_ROSTER).await;
                return;
            }
        };

        match self.registry.complete_selection(name, &ids) {
            Ok(()) => {
                self.routes.insert(from, Route::Waiting { name: name.to_string() });
                self.reply(from, WAITING_FOR_OPPONENT).await;
                self.start_battles();
            }
            Err(RegistrationError::InvalidSelection(e)) => {
                let text = format!("Invalid selection ({}). Please try again.", e);
                self.reply(from, &text).await;
                self.reply(from, prompt::CHOOSE_ROSTER).await;
            }
            Err(e) => {
                tracing::warn!(%from, player = %name, error = %e, "Selection for a stale session");
                self.routes.remove(&from);
            }
        }
    }

    fn start_battles(&mut self) {
        while let Some(pairing) = self.registry.try_form_match() {
            self.spawn_battle(pairing);
        }
    }

    fn spawn_battle(&mut self, pairing: MatchPairing) {
        self.battles_started += 1;
        let id = self.battles_started;

        let MatchPairing { first, second } = pairing;
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();

        let seats = [
            (first.addr, first.participant.name.clone()),
            (second.addr, second.participant.name.clone()),
        ];
        for ((addr, name), inbox) in seats.iter().cloned().zip([tx1, tx2]) {
            self.routes.insert(addr, Route::Battle { name, inbox });
        }

        let link = UdpLink::new(
            self.transport.clone(),
            [Seat::new(first.addr, rx1), Seat::new(second.addr, rx2)],
        )
        .with_reply_timeout(self.config.reply_timeout)
        .with_pause(self.config.pause);

        let roll = match self.config.seed {
            Some(seed) => RandomRoll::seeded(seed.wrapping_add(id)),
            None => RandomRoll::from_entropy(),
        };

        let battle = Battle::new(first.participant, second.participant);
        let span = tracing::info_span!("battle", id, p1 = %seats[0].1, p2 = %seats[1].1);
        let control = self.control_tx.clone();

        tokio::spawn(
            async move {
                let mut link = link;
                let mut roll = roll;
                let mut battle = battle;

                match battle.run(&mut link, &mut roll).await {
                    Ok(outcome) => {
                        tracing::info!(winner = %outcome.winner_name, turns = outcome.turns, "Battle finished");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Battle aborted");
                        link.report_abort(&e).await;
                    }
                }

                if control.send(Control::Finished { seats }).is_err() {
                    tracing::warn!("Dispatcher gone, players stay engaged");
                }
            }
            .instrument(span),
        );
    }

    async fn handle_control(&mut self, control: Control) {
        match control {
            Control::Finished { seats } => {
                let mut names = Vec::with_capacity(seats.len());
                for (addr, name) in seats {
                    let still_routed = matches!(
                        self.routes.get(&addr),
                        Some(Route::Battle { name: routed, .. }) if *routed == name
                    );
                    if still_routed {
                        self.routes.remove(&addr);
                        let text = format!("Send LOGIN:{} to battle again.", name);
                        self.reply(addr, &text).await;
                    }
                    names.push(name);
                }

                self.registry.release(&names);
            }
        }
    }

    async fn reply(&self, to: SocketAddr, text: &str) {
        if let Err(e) = self.transport.send(to, text).await {
            tracing::warn!(%to, error = %e, "Failed to send reply");
        }
    }
}
