//! Participant (player) state

use super::fighter::{FighterId, FighterRecord};
use super::roster::Roster;
use crate::error::SwitchError;

/// One player's side of the battle
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    /// Player's login name
    pub name: String,

    /// Fighters brought into battle (selection order)
    pub roster: Roster,

    /// Index of the active fighter inside `roster`
    active: usize,
}

impl Participant {
    /// Create a participant whose first chosen fighter is active
    pub fn new(name: impl Into<String>, roster: Roster) -> Self {
        Self {
            name: name.into(),
            roster,
            active: 0,
        }
    }

    /// Get the active fighter
    pub fn active_fighter(&self) -> &FighterRecord {
        self.roster.by_index(self.active)
    }

    /// Get the active fighter mutably
    ///
    /// Mutations land directly in the roster entry.
    pub fn active_fighter_mut(&mut self) -> &mut FighterRecord {
        self.roster.by_index_mut(self.active)
    }

    pub fn active_id(&self) -> FighterId {
        self.active_fighter().id
    }

    /// 1-based slot of the active fighter
    pub fn active_slot(&self) -> usize {
        self.active + 1
    }

    /// Make the fighter in `slot` active
    ///
    /// Fainted fighters are refused. Picking the current fighter is allowed
    /// and changes nothing.
    pub fn switch_to(&mut self, slot: usize) -> Result<&FighterRecord, SwitchError> {
        let fighter = self.roster.slot(slot).ok_or(SwitchError::NoSuchSlot(slot))?;

        if !fighter.is_alive() {
            return Err(SwitchError::Fainted(fighter.name.clone()));
        }

        self.active = slot - 1;
        Ok(self.active_fighter())
    }

    /// Check if any fighter other than the active one can still battle
    pub fn has_reserve(&self) -> bool {
        self.roster
            .living()
            .any(|(slot, _)| slot != self.active_slot())
    }

    /// Check if no fighter can battle
    pub fn is_eliminated(&self) -> bool {
        self.roster.all_fainted()
    }
}
