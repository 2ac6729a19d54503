//! Player catalog loaded once at startup

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result, bail};
use pokebat_battle::{FighterRecord, ROSTER_SIZE};
use serde::Deserialize;

/// One entry of the catalog file
#[derive(Debug, Deserialize)]
struct PlayerEntry {
    name: String,
    pokemons: Vec<FighterRecord>,
}

/// Read-only mapping of player name to the fighters they own
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    players: HashMap<String, Vec<FighterRecord>>,
}

impl Catalog {
    /// Load and validate a catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;

        Self::from_json(&json).with_context(|| format!("Invalid catalog {}", path.display()))
    }

    /// Parse a catalog from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<PlayerEntry> =
            serde_json::from_str(json).context("Failed to parse catalog JSON")?;

        Self::from_players(entries.into_iter().map(|e| (e.name, e.pokemons)))
    }

    /// Build a catalog from `(player, fighters)` pairs
    ///
    /// Rejects duplicate player names, duplicate fighter ids within one
    /// player, fighters whose `current_exp` exceeds `base_exp`, and players
    /// owning fewer fighters than a roster needs.
    pub fn from_players<I>(players: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<FighterRecord>)>,
    {
        let mut catalog = Self::default();

        for (name, fighters) in players {
            let mut ids = HashSet::new();
            for fighter in &fighters {
                if !ids.insert(fighter.id) {
                    bail!("Player {} lists fighter {} twice", name, fighter.id);
                }
                if !fighter.is_consistent() {
                    bail!(
                        "Fighter {} of player {} has current_exp {} above base_exp {}",
                        fighter.name,
                        name,
                        fighter.current_exp,
                        fighter.base_exp
                    );
                }
            }

            if fighters.len() < ROSTER_SIZE {
                bail!(
                    "Player {} owns {} fighters, a roster needs {}",
                    name,
                    fighters.len(),
                    ROSTER_SIZE
                );
            }
            if catalog.players.contains_key(&name) {
                bail!("Player {} appears twice", name);
            }
            catalog.players.insert(name, fighters);
        }

        tracing::debug!(players = catalog.players.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Fighters owned by `name`, in catalog order
    pub fn player_roster(&self, name: &str) -> Option<&[FighterRecord]> {
        self.players.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "name": "ash",
            "pokemons": [
                {"id": 25, "name": "Pikachu", "type": ["Electric"], "base_exp": 112,
                 "speed": 90, "attack": 55, "defense": 40, "special_atk": 50,
                 "special_def": 50, "hp": 35, "ev": 1.0},
                {"id": 6, "name": "Charizard", "type": ["Fire", "Flying"], "base_exp": 240,
                 "speed": 100, "attack": 84, "defense": 78, "special_atk": 109,
                 "special_def": 85, "hp": 78, "ev": 2.0, "level": 36, "current_exp": 120},
                {"id": 1, "name": "Bulbasaur", "type": ["Grass", "Poison"], "base_exp": 64,
                 "speed": 45, "attack": 49, "defense": 49, "special_atk": 65,
                 "special_def": 65, "hp": 45, "ev": 1.0}
            ]
        },
        {
            "name": "misty",
            "pokemons": [
                {"id": 54, "name": "Psyduck", "type": ["Water"], "base_exp": 64,
                 "speed": 55, "attack": 52, "defense": 48, "special_atk": 65,
                 "special_def": 50, "hp": 50, "ev": 1.0},
                {"id": 120, "name": "Staryu", "type": ["Water"], "base_exp": 68,
                 "speed": 85, "attack": 45, "defense": 55, "special_atk": 70,
                 "special_def": 55, "hp": 30, "ev": 1.0},
                {"id": 121, "name": "Starmie", "type": ["Water", "Psychic"], "base_exp": 182,
                 "speed": 115, "attack": 75, "defense": 85, "special_atk": 100,
                 "special_def": 85, "hp": 60, "ev": 2.0}
            ]
        }
    ]"#;

    fn trio() -> Vec<FighterRecord> {
        vec![
            FighterRecord::new(1, "Bulbasaur"),
            FighterRecord::new(4, "Charmander"),
            FighterRecord::new(7, "Squirtle"),
        ]
    }

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("misty"));

        let roster = catalog.player_roster("ash").unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].name, "Pikachu");
        assert_eq!(roster[0].level, 1);
        assert_eq!(roster[0].current_exp, 0);
        assert_eq!(roster[1].special_attack, 109);
        assert_eq!(roster[1].current_exp, 120);
    }

    #[test]
    fn test_unknown_player() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert!(catalog.player_roster("gary").is_none());
    }

    #[test]
    fn test_rejects_exp_above_cap() {
        let mut fighters = trio();
        fighters[0].base_exp = 64;
        fighters[0].current_exp = 65;

        let err = Catalog::from_players([("ash".to_string(), fighters)]).unwrap_err();
        assert!(err.to_string().contains("above base_exp"));
    }

    #[test]
    fn test_rejects_duplicate_fighter_id() {
        let mut fighters = trio();
        fighters.push(FighterRecord::new(1, "Ivysaur"));

        assert!(Catalog::from_players([("ash".to_string(), fighters)]).is_err());
    }

    #[test]
    fn test_rejects_duplicate_player() {
        let players = [("ash".to_string(), trio()), ("ash".to_string(), trio())];

        let err = Catalog::from_players(players).unwrap_err();
        assert!(err.to_string().contains("appears twice"));
    }

    #[test]
    fn test_rejects_roster_too_small() {
        let mut fighters = trio();
        fighters.pop();

        let err = Catalog::from_players([("brock".to_string(), fighters)]).unwrap_err();
        assert!(err.to_string().contains("owns 2 fighters, a roster needs 3"));
    }

    #[test]
    fn test_accepts_exact_roster_size() {
        let catalog = Catalog::from_players([("brock".to_string(), trio())]).unwrap();
        assert_eq!(catalog.player_roster("brock").unwrap().len(), ROSTER_SIZE);
    }

    #[test]
    fn test_load_sample_catalog() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/player.json");
        let catalog = Catalog::load(path).unwrap();

        for name in ["ash", "misty", "brock"] {
            let roster = catalog.player_roster(name).unwrap();
            assert!(roster.len() >= 3, "{} needs at least three fighters", name);
        }
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::load("/nonexistent/player.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(Catalog::from_json("{not json").is_err());
    }
}
