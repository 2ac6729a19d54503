//! Battle rules and turn engine for the Pokebat server.
//!
//! This crate owns everything that happens between two paired players:
//! fighter records, roster selection, damage and experience rules, and the
//! turn state machine that drives a match to its end.
//!
//! # Overview
//!
//! `pokebat-battle` sits between `pokebat-protocol` (wire format) and the
//! UDP server:
//!
//! ```text
//! pokebat-protocol (wire format, prompts)
//!        │
//!        ▼
//! pokebat-battle (domain types + engine) ← THIS CRATE
//!        │
//!        ▼
//! pokebat-server (registry, matchmaking, UDP transport)
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`FighterRecord`] - One creature's stats and progression
//! - [`Roster`] - The three fighters a player brings into battle
//! - [`Participant`] - A player's side with its active fighter
//!
//! ## Engine
//! - [`Battle`] - Turn state machine for one match
//! - [`PlayerLink`] - Seam between the engine and a transport
//! - [`AttackRoll`] - Source of special/normal attack choices
//!
//! # Example Usage
//!
//! ```ignore
//! use pokebat_battle::{Battle, Participant, RandomRoll, Roster};
//!
//! let ash = Participant::new("ash", Roster::select(&ash_catalog, &[1, 4, 7])?);
//! let misty = Participant::new("misty", Roster::select(&misty_catalog, &[54, 120, 121])?);
//!
//! let mut battle = Battle::new(ash, misty);
//! let outcome = battle.run(&mut link, &mut RandomRoll::from_entropy()).await?;
//! println!("{} won in {} turns", outcome.winner_name, outcome.turns);
//! ```

pub mod engine;
pub mod error;
pub mod narration;
pub mod rules;
pub mod types;

pub use engine::{
    AttackReport, AttackRoll, Battle, BattleOutcome, BattleState, FixedRoll, Outcome, PlayerLink,
    RandomRoll,
};
pub use error::{BattleError, SelectionError, SwitchError};
pub use rules::{AttackKind, damage, distribute_exp, exp_bonus};
pub use types::{FighterId, FighterRecord, Participant, ROSTER_SIZE, Roster};
