//! The fighters a participant brings into battle

use std::collections::HashSet;

use super::fighter::{FighterId, FighterRecord};
use crate::error::SelectionError;

/// Number of fighters every participant selects
pub const ROSTER_SIZE: usize = 3;

/// Chosen fighters in selection order
///
/// Slots are 1-based on the wire and map onto this order.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    fighters: Vec<FighterRecord>,
}

impl Roster {
    /// Build a roster from catalog fighters and chosen ids
    ///
    /// Requires exactly [`ROSTER_SIZE`] distinct ids, each present in
    /// `available`. Duplicates are an error, never silently dropped.
    pub fn select(available: &[FighterRecord], ids: &[FighterId]) -> Result<Self, SelectionError> {
        if ids.len() != ROSTER_SIZE {
            return Err(SelectionError::WrongCount {
                expected: ROSTER_SIZE,
                got: ids.len(),
            });
        }

        let mut seen = HashSet::with_capacity(ids.len());
        let mut fighters = Vec::with_capacity(ids.len());

        for &id in ids {
            if !seen.insert(id) {
                return Err(SelectionError::DuplicateFighter(id));
            }

            let fighter = available
                .iter()
                .find(|f| f.id == id)
                .ok_or(SelectionError::UnknownFighter(id))?;
            fighters.push(fighter.clone());
        }

        Ok(Self { fighters })
    }

    pub fn len(&self) -> usize {
        self.fighters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fighters.is_empty()
    }

    /// Get a fighter by id
    pub fn get(&self, id: FighterId) -> Option<&FighterRecord> {
        self.fighters.iter().find(|f| f.id == id)
    }

    /// Get a fighter by 1-based slot
    pub fn slot(&self, slot: usize) -> Option<&FighterRecord> {
        slot.checked_sub(1).and_then(|idx| self.fighters.get(idx))
    }

    pub(crate) fn by_index(&self, idx: usize) -> &FighterRecord {
        &self.fighters[idx]
    }

    pub(crate) fn by_index_mut(&mut self, idx: usize) -> &mut FighterRecord {
        &mut self.fighters[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FighterRecord> {
        self.fighters.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FighterRecord> {
        self.fighters.iter_mut()
    }

    /// Iterate over living fighters with their 1-based slots
    pub fn living(&self) -> impl Iterator<Item = (usize, &FighterRecord)> {
        self.fighters
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_alive())
            .map(|(idx, f)| (idx + 1, f))
    }

    /// Check if every fighter has fainted
    pub fn all_fainted(&self) -> bool {
        self.fighters.iter().all(|f| !f.is_alive())
    }

    /// Sum of `current_exp` across the roster
    pub fn total_current_exp(&self) -> u64 {
        self.fighters.iter().map(|f| u64::from(f.current_exp)).sum()
    }
}
