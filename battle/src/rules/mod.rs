//! Combat and reward rules
//!
//! Pure functions over fighter records, shared by the battle engine and
//! anything that wants to preview an exchange.

mod damage;
mod reward;

pub use damage::{AttackKind, damage};
pub use reward::{distribute_exp, exp_bonus};
