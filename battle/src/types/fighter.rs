//! Fighter stat records

use std::collections::BTreeSet;

/// Catalog identifier of a fighter
pub type FighterId = u32;

/// A fighter as listed in the catalog
///
/// During a battle each participant works on its own copy, so `hp` and
/// `current_exp` are battle-local.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FighterRecord {
    pub id: FighterId,

    pub name: String,

    /// Type tags, e.g. "Grass", "Poison"
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub types: BTreeSet<String>,

    // === Base stats ===
    pub attack: u32,

    pub defense: u32,

    #[cfg_attr(feature = "serde", serde(rename = "special_atk"))]
    pub special_attack: u32,

    #[cfg_attr(feature = "serde", serde(rename = "special_def"))]
    pub special_defense: u32,

    pub speed: u32,

    pub hp: u32,

    /// Experience cap for `current_exp`
    pub base_exp: u32,

    // === Progression ===
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u32,

    #[cfg_attr(feature = "serde", serde(default))]
    pub current_exp: u32,

    /// Evolution value
    #[cfg_attr(feature = "serde", serde(default))]
    pub ev: f64,
}

#[cfg(feature = "serde")]
fn default_level() -> u32 {
    1
}

impl FighterRecord {
    /// Create a level 1 fighter with zeroed stats
    pub fn new(id: FighterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            types: BTreeSet::new(),
            attack: 0,
            defense: 0,
            special_attack: 0,
            special_defense: 0,
            speed: 0,
            hp: 0,
            base_exp: 0,
            level: 1,
            current_exp: 0,
            ev: 0.0,
        }
    }

    /// Check if the fighter can still battle
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Whether `current_exp` respects the `base_exp` cap
    pub fn is_consistent(&self) -> bool {
        self.current_exp <= self.base_exp
    }

    /// Subtract damage from HP, stopping at 0; returns the new HP
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        self.hp = self.hp.saturating_sub(damage);
        self.hp
    }

    /// Add experience capped at `base_exp`; returns the amount actually gained
    pub fn gain_exp(&mut self, amount: u32) -> u32 {
        let before = self.current_exp;
        self.current_exp = self.current_exp.saturating_add(amount).min(self.base_exp);
        self.current_exp.saturating_sub(before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fighter_new() {
        let fighter = FighterRecord::new(25, "Pikachu");
        assert_eq!(fighter.id, 25);
        assert_eq!(fighter.name, "Pikachu");
        assert_eq!(fighter.level, 1);
        assert!(!fighter.is_alive());
        assert!(fighter.is_consistent());
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut fighter = FighterRecord::new(1, "Bulbasaur");
        fighter.hp = 10;

        assert_eq!(fighter.take_damage(4), 6);
        assert!(fighter.is_alive());

        assert_eq!(fighter.take_damage(50), 0);
        assert!(!fighter.is_alive());

        assert_eq!(fighter.take_damage(1), 0);
    }

    #[test]
    fn test_gain_exp_capped() {
        let mut fighter = FighterRecord::new(4, "Charmander");
        fighter.base_exp = 62;
        fighter.current_exp = 50;

        assert_eq!(fighter.gain_exp(33), 12);
        assert_eq!(fighter.current_exp, 62);

        assert_eq!(fighter.gain_exp(10), 0);
        assert_eq!(fighter.current_exp, 62);
    }

    #[test]
    fn test_inconsistent_exp() {
        let mut fighter = FighterRecord::new(7, "Squirtle");
        fighter.base_exp = 10;
        fighter.current_exp = 11;
        assert!(!fighter.is_consistent());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_catalog_record() {
        let json = r#"{
            "id": 1, "name": "Bulbasaur", "type": ["Grass", "Poison"],
            "base_exp": 64, "speed": 45, "attack": 49, "defense": 49,
            "special_atk": 65, "special_def": 65, "hp": 45, "ev": 1.5
        }"#;

        let fighter: FighterRecord = serde_json::from_str(json).unwrap();
        assert_eq!(fighter.special_attack, 65);
        assert!(fighter.types.contains("Poison"));
        assert_eq!(fighter.level, 1);
        assert_eq!(fighter.current_exp, 0);
    }
}
