//! Attack resolution

use std::fmt;

use crate::types::FighterRecord;

/// Which stat pair an attack uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackKind {
    /// special attack vs special defense
    Special,
    /// attack vs defense
    Normal,
}

impl fmt::Display for AttackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackKind::Special => f.write_str("special"),
            AttackKind::Normal => f.write_str("normal"),
        }
    }
}

/// Damage dealt by `attacker` to `defender`, never less than 1
pub fn damage(attacker: &FighterRecord, defender: &FighterRecord, kind: AttackKind) -> u32 {
    let (power, guard) = match kind {
        AttackKind::Special => (attacker.special_attack, defender.special_defense),
        AttackKind::Normal => (attacker.attack, defender.defense),
    };

    let raw = i64::from(power) - i64::from(guard);
    u32::try_from(raw.max(1)).unwrap_or(u32::MAX)
}
