//! Battle bookkeeping types

use pokebat_protocol::Player;

use crate::rules::AttackKind;

/// Whether the battle is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Concluded { winner: Player },
}

/// Turn counter and role assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleState {
    /// Turns started so far (0 = not started)
    pub turn: u32,

    /// Seat acting this turn; the other seat defends
    pub attacker: Player,

    pub outcome: Outcome,
}

impl BattleState {
    pub fn new(attacker: Player) -> Self {
        Self {
            turn: 0,
            attacker,
            outcome: Outcome::InProgress,
        }
    }

    pub fn defender(&self) -> Player {
        self.attacker.opponent()
    }

    pub fn is_over(&self) -> bool {
        matches!(self.outcome, Outcome::Concluded { .. })
    }
}

/// Result of a single attack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackReport {
    pub attacker: Player,
    pub defender: Player,
    pub kind: AttackKind,
    pub damage: u32,
    /// Defender's active fighter HP after the hit
    pub remaining_hp: u32,
    pub fainted: bool,
}

/// Final result handed back to whoever spawned the battle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleOutcome {
    pub winner: Player,
    pub loser: Player,
    pub winner_name: String,
    pub loser_name: String,
    pub turns: u32,
    /// Experience offered to each winning fighter
    pub exp_bonus: u32,
    /// Experience actually gained after the base_exp caps
    pub exp_gained: u64,
}
