//! Human-readable battle text

use crate::types::{FighterRecord, Roster};

pub const DIVIDER: &str = "-----------------------";

/// One fighter's card, prefixed with its slot number
pub fn fighter_info(slot: usize, fighter: &FighterRecord) -> String {
    let types: Vec<&str> = fighter.types.iter().map(String::as_str).collect();

    format!(
        "{}. Name: {} (#{}) | Type: [{}] | Base Exp: {} | HP: {} | EV: {:.1} | Level: {} | Current Exp: {}\n\
         Speed: {} | Attack: {} | Defense: {} | Special Atk: {} | Special Def: {}\n",
        slot,
        fighter.name,
        fighter.id,
        types.join(" "),
        fighter.base_exp,
        fighter.hp,
        fighter.ev,
        fighter.level,
        fighter.current_exp,
        fighter.speed,
        fighter.attack,
        fighter.defense,
        fighter.special_attack,
        fighter.special_defense,
    )
}

/// Cards for every fighter in a catalog listing
pub fn catalog_listing(player: &str, fighters: &[FighterRecord]) -> String {
    let mut listing = format!("Player: {}\n", player);
    for (idx, fighter) in fighters.iter().enumerate() {
        listing.push_str(&fighter_info(idx + 1, fighter));
        listing.push('\n');
    }
    listing
}

/// Cards for the fighters that can still battle
pub fn living_listing(roster: &Roster) -> String {
    let mut listing = String::new();
    for (slot, fighter) in roster.living() {
        listing.push_str(&fighter_info(slot, fighter));
        listing.push('\n');
    }
    listing
}
