//! Session registry and matchmaker
//!
//! Tracks logged-in players until two of them are ready, then hands the
//! pair over to a battle. All operations go through one mutex.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pokebat_battle::{FighterId, Participant, Roster};

use crate::catalog::Catalog;
use crate::errors::RegistrationError;

/// One side of a freshly formed match
#[derive(Debug, Clone)]
pub struct Entrant {
    pub addr: SocketAddr,
    pub participant: Participant,
}

/// Two ready players, `first` being the one that registered earlier
#[derive(Debug, Clone)]
pub struct MatchPairing {
    pub first: Entrant,
    pub second: Entrant,
}

impl MatchPairing {
    pub fn names(&self) -> [String; 2] {
        [
            self.first.participant.name.clone(),
            self.second.participant.name.clone(),
        ]
    }
}

#[derive(Debug)]
enum Status {
    Selecting,
    Ready(Participant),
}

#[derive(Debug)]
struct Waiting {
    name: String,
    addr: SocketAddr,
    status: Status,
}

#[derive(Debug, Default)]
struct Inner {
    /// Registration order
    waiting: Vec<Waiting>,

    /// Names currently inside a battle
    engaged: HashSet<String>,
}

impl Inner {
    fn find(&self, name: &str) -> Option<usize> {
        self.waiting.iter().position(|w| w.name == name)
    }
}

/// Players that are logged in but not yet battling
pub struct Registry {
    catalog: Arc<Catalog>,
    inner: Mutex<Inner>,
}

impl Registry {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log `name` in from `addr`; the player starts out choosing a roster
    pub fn register(&self, name: &str, addr: SocketAddr) -> Result<(), RegistrationError> {
        if !self.catalog.contains(name) {
            return Err(RegistrationError::UnknownPlayer(name.to_string()));
        }

        let mut inner = self.lock();
        if inner.find(name).is_some() || inner.engaged.contains(name) {
            return Err(RegistrationError::AlreadyLoggedIn(name.to_string()));
        }

        inner.waiting.push(Waiting {
            name: name.to_string(),
            addr,
            status: Status::Selecting,
        });

        tracing::info!(player = %name, %addr, "Player registered");
        Ok(())
    }

    /// Fix the three fighters `name` brings into battle
    ///
    /// Fails with `NotRegistered` once the player has logged out or been
    /// paired.
    pub fn complete_selection(&self, name: &str, ids: &[FighterId]) -> Result<(), RegistrationError> {
        let mut inner = self.lock();
        let idx = inner
            .find(name)
            .ok_or_else(|| RegistrationError::NotRegistered(name.to_string()))?;

        let available = self
            .catalog
            .player_roster(name)
            .ok_or_else(|| RegistrationError::UnknownPlayer(name.to_string()))?;
        let roster = Roster::select(available, ids)?;

        inner.waiting[idx].status = Status::Ready(Participant::new(name, roster));

        tracing::info!(player = %name, fighters = ?ids, "Roster selected");
        Ok(())
    }

    /// Take the two earliest registered ready players out of the waiting set
    pub fn try_form_match(&self) -> Option<MatchPairing> {
        let mut inner = self.lock();

        let ready: Vec<usize> = inner
            .waiting
            .iter()
            .enumerate()
            .filter(|(_, w)| matches!(w.status, Status::Ready(_)))
            .map(|(idx, _)| idx)
            .take(2)
            .collect();

        let [a, b] = ready[..] else {
            return None;
        };

        // remove the later index first so `a` stays valid
        let second = inner.waiting.remove(b);
        let first = inner.waiting.remove(a);

        let (Some(first), Some(second)) = (into_entrant(first), into_entrant(second)) else {
            return None;
        };

        inner.engaged.insert(first.participant.name.clone());
        inner.engaged.insert(second.participant.name.clone());

        tracing::info!(
            p1 = %first.participant.name,
            p2 = %second.participant.name,
            "Match formed"
        );

        Some(MatchPairing { first, second })
    }

    /// Drop a waiting player, whatever their status; returns whether one was found
    pub fn unregister(&self, name: &str) -> bool {
        let mut inner = self.lock();
        match inner.find(name) {
            Some(idx) => {
                inner.waiting.remove(idx);
                tracing::info!(player = %name, "Player unregistered");
                true
            }
            None => false,
        }
    }

    /// Allow players of a finished battle to log in again
    pub fn release(&self, names: &[String]) {
        let mut inner = self.lock();
        for name in names {
            inner.engaged.remove(name);
        }
    }

    pub fn is_waiting(&self, name: &str) -> bool {
        self.lock().find(name).is_some()
    }

    pub fn is_engaged(&self, name: &str) -> bool {
        self.lock().engaged.contains(name)
    }

    /// Number of players waiting, selecting or ready
    pub fn waiting_count(&self) -> usize {
        self.lock().waiting.len()
    }
}

fn into_entrant(waiting: Waiting) -> Option<Entrant> {
    match waiting.status {
        Status::Ready(participant) => Some(Entrant {
            addr: waiting.addr,
            participant,
        }),
        Status::Selecting => None,
    }
}
