//! Sources for the special/normal attack choice

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::rules::AttackKind;

/// Picks the kind of each attack
pub trait AttackRoll {
    fn roll(&mut self) -> AttackKind;
}

/// Fair coin flip between special and normal
pub struct RandomRoll<R = StdRng> {
    rng: R,
}

impl RandomRoll<StdRng> {
    /// Seed from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomRoll<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> AttackRoll for RandomRoll<R> {
    fn roll(&mut self) -> AttackKind {
        if self.rng.gen_bool(0.5) {
            AttackKind::Special
        } else {
            AttackKind::Normal
        }
    }
}

/// Always the same kind
#[derive(Debug, Clone, Copy)]
pub struct FixedRoll(pub AttackKind);

impl AttackRoll for FixedRoll {
    fn roll(&mut self) -> AttackKind {
        self.0
    }
}
