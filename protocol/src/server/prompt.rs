//! Prompt lines that expect an answer from the client
//!
//! Clients key off these prefixes to know an answer is expected.

pub const WELCOME: &str = "Welcome to the Pokemon Battle Server!\n";
pub const CHOOSE_ROSTER: &str = "Choose 3 Pokémon (enter the pokemon numbers separated by spaces): ";
pub const SELECT_FIGHTER: &str = "Select your fighter by number: ";
pub const SWITCH_OFFER_SUFFIX: &str = "do you want to switch your fighter? (Y/N)";

/// `NAME, do you want to switch your fighter? (Y/N)`
pub fn switch_offer(name: &str) -> String {
    format!("{}, {}", name, SWITCH_OFFER_SUFFIX)
}

/// Whether a server line is a switch offer
pub fn is_switch_offer(line: &str) -> bool {
    line.trim_end().ends_with(SWITCH_OFFER_SUFFIX)
}
