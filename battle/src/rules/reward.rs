//! Post-battle experience distribution

use crate::types::Roster;

/// Experience each winning fighter earns from beating `loser`
///
/// A third of the loser's average `current_exp`, rounded down.
pub fn exp_bonus(loser: &Roster) -> u32 {
    if loser.is_empty() {
        return 0;
    }

    let share = loser.total_current_exp() / (3 * loser.len() as u64);
    u32::try_from(share).unwrap_or(u32::MAX)
}

/// Add `bonus` to every fighter in `winner`, capped at each `base_exp`
///
/// Returns the total experience actually gained.
pub fn distribute_exp(winner: &mut Roster, bonus: u32) -> u64 {
    winner
        .iter_mut()
        .map(|fighter| u64::from(fighter.gain_exp(bonus)))
        .sum()
}
