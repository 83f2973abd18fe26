use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::stats;

const MAX_MOVES: usize = 4;

/// Experience curve families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthRate {
    Erratic,
    Fast,
    MediumFast,
    MediumSlow,
    Slow,
    Fluctuating,
}

impl GrowthRate {
    /// Total experience needed to reach `level`; level 1 is always 0.
    pub fn experience_at(self, level: u8) -> u32 {
        let n = i64::from(level.clamp(1, 100));
        if n == 1 {
            return 0;
        }
        let cube = n * n * n;
        let exp = match self {
            Self::Fast => 4 * cube / 5,
            Self::MediumFast => cube,
            Self::MediumSlow => 6 * cube / 5 - 15 * n * n + 100 * n - 140,
            Self::Slow => 5 * cube / 4,
            Self::Erratic if n < 50 => cube * (100 - n) / 50,
            Self::Erratic if n < 68 => cube * (150 - n) / 100,
            Self::Erratic if n < 98 => cube * ((1911 - 10 * n) / 3) / 500,
            Self::Erratic => cube * (160 - n) / 100,
            Self::Fluctuating if n < 15 => cube * ((n + 1) / 3 + 24) / 50,
            Self::Fluctuating if n < 36 => cube * (n + 14) / 50,
            Self::Fluctuating => cube * (n / 2 + 32) / 50,
        };
        exp.max(0) as u32
    }

    /// Highest level whose threshold `experience` reaches.
    pub fn level_for(self, experience: u32) -> u8 {
        (1..=100u8)
            .take_while(|&level| self.experience_at(level) <= experience)
            .last()
            .unwrap_or(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LearnsetEntry {
    pub level: u8,
    pub move_id: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeciesEntry {
    pub id: u16,
    pub name: String,
    /// HP, Attack, Defense, Speed, Sp. Attack, Sp. Defense.
    pub base_stats: [u16; 6],
    pub growth_rate: GrowthRate,
    /// First, second and hidden ability ids; 0 when absent.
    #[serde(default)]
    pub abilities: [u16; 3],
    #[serde(default)]
    pub learnset: Vec<LearnsetEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveEntry {
    pub id: u16,
    pub name: String,
    pub pp: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedEntry {
    pub id: u16,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    species: Vec<SpeciesEntry>,
    #[serde(default)]
    moves: Vec<MoveEntry>,
    #[serde(default)]
    abilities: Vec<NamedEntry>,
    #[serde(default)]
    items: Vec<NamedEntry>,
}

/// Name and reference data for building creatures, indexed once at load.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    source: Option<PathBuf>,
    file: CatalogFile,
    species_by_name: HashMap<String, usize>,
    species_by_id: HashMap<u16, usize>,
    moves_by_name: HashMap<String, usize>,
    moves_by_id: HashMap<u16, usize>,
    abilities_by_name: HashMap<String, u16>,
    abilities_by_id: HashMap<u16, usize>,
    items_by_name: HashMap<String, u16>,
    items_by_id: HashMap<u16, usize>,
}

impl Catalog {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let file: CatalogFile = serde_json::from_str(json).map_err(|e| {
            CoreError::new(CoreErrorCode::Parse, format!("invalid catalog JSON: {e}"))
        })?;
        Ok(Self::index(file))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CoreError> {
        let json = fs::read_to_string(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        let mut catalog = Self::from_json_str(&json)?;
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    fn index(file: CatalogFile) -> Self {
        let mut catalog = Self::default();
        for (i, entry) in file.species.iter().enumerate() {
            catalog.species_by_name.insert(normalize(&entry.name), i);
            catalog.species_by_id.insert(entry.id, i);
        }
        for (i, entry) in file.moves.iter().enumerate() {
            catalog.moves_by_name.insert(normalize(&entry.name), i);
            catalog.moves_by_id.insert(entry.id, i);
        }
        for (i, entry) in file.abilities.iter().enumerate() {
            catalog.abilities_by_name.insert(normalize(&entry.name), entry.id);
            catalog.abilities_by_id.insert(entry.id, i);
        }
        for (i, entry) in file.items.iter().enumerate() {
            catalog.items_by_name.insert(normalize(&entry.name), entry.id);
            catalog.items_by_id.insert(entry.id, i);
        }
        catalog.file = file;
        catalog
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn species(&self, id: u16) -> Option<&SpeciesEntry> {
        self.species_by_id.get(&id).map(|&i| &self.file.species[i])
    }

    pub fn resolve_species(&self, name: &str) -> Option<u16> {
        self.species_by_name
            .get(&normalize(name))
            .map(|&i| self.file.species[i].id)
    }

    pub fn species_name(&self, id: u16) -> Option<&str> {
        self.species(id).map(|entry| entry.name.as_str())
    }

    pub fn resolve_ability(&self, name: &str) -> Option<u16> {
        self.abilities_by_name.get(&normalize(name)).copied()
    }

    pub fn ability_name(&self, id: u16) -> Option<&str> {
        self.abilities_by_id
            .get(&id)
            .map(|&i| self.file.abilities[i].name.as_str())
    }

    pub fn resolve_nature(&self, name: &str) -> Option<u8> {
        stats::nature_by_name(name)
    }

    pub fn nature_name(&self, id: u8) -> Option<&'static str> {
        stats::nature_name(id)
    }

    pub fn resolve_move(&self, name: &str) -> Option<u16> {
        self.moves_by_name
            .get(&normalize(name))
            .map(|&i| self.file.moves[i].id)
    }

    pub fn move_name(&self, id: u16) -> Option<&str> {
        self.moves_by_id
            .get(&id)
            .map(|&i| self.file.moves[i].name.as_str())
    }

    pub fn move_pp(&self, id: u16) -> Option<u8> {
        self.moves_by_id.get(&id).map(|&i| self.file.moves[i].pp)
    }

    pub fn resolve_item(&self, name: &str) -> Option<u16> {
        self.items_by_name.get(&normalize(name)).copied()
    }

    pub fn item_name(&self, id: u16) -> Option<&str> {
        self.items_by_id
            .get(&id)
            .map(|&i| self.file.items[i].name.as_str())
    }

    /// The last four distinct moves learned by level-up at or below `level`,
    /// most recent first, with their base PP. Level-0 entries are skipped.
    pub fn level_up_moves(&self, species: u16, level: u8) -> ([u16; MAX_MOVES], [u8; MAX_MOVES]) {
        let mut moves = [0u16; MAX_MOVES];
        let mut pp = [0u8; MAX_MOVES];
        let Some(entry) = self.species(species) else {
            return (moves, pp);
        };

        let mut learned: Vec<&LearnsetEntry> = entry
            .learnset
            .iter()
            .filter(|learn| learn.level > 0 && learn.level <= level)
            .collect();
        learned.sort_by_key(|learn| std::cmp::Reverse(learn.level));

        let mut count = 0;
        for learn in learned {
            if count == MAX_MOVES {
                break;
            }
            if moves[..count].contains(&learn.move_id) {
                continue;
            }
            moves[count] = learn.move_id;
            pp[count] = self.move_pp(learn.move_id).unwrap_or(0);
            count += 1;
        }
        (moves, pp)
    }

    pub fn species_count(&self) -> usize {
        self.file.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.species.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '.' | '\''))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "species": [
            {
                "id": 1,
                "name": "Bulbasaur",
                "base_stats": [45, 49, 49, 45, 65, 65],
                "growth_rate": "medium-slow",
                "abilities": [65, 0, 34],
                "learnset": [
                    {"level": 1, "move_id": 33},
                    {"level": 3, "move_id": 45},
                    {"level": 7, "move_id": 22},
                    {"level": 9, "move_id": 73},
                    {"level": 13, "move_id": 77},
                    {"level": 0, "move_id": 99}
                ]
            }
        ],
        "moves": [
            {"id": 33, "name": "Tackle", "pp": 35},
            {"id": 45, "name": "Growl", "pp": 40},
            {"id": 22, "name": "Vine Whip", "pp": 25},
            {"id": 73, "name": "Leech Seed", "pp": 10},
            {"id": 77, "name": "Poison Powder", "pp": 35}
        ],
        "abilities": [
            {"id": 65, "name": "Overgrow"},
            {"id": 34, "name": "Chlorophyll"}
        ],
        "items": [
            {"id": 13, "name": "Potion"}
        ]
    }"#;

    #[test]
    fn lookups_ignore_case_and_separators() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.resolve_species("bulbasaur"), Some(1));
        assert_eq!(catalog.resolve_move("vine-whip"), Some(22));
        assert_eq!(catalog.resolve_move("VINE WHIP"), Some(22));
        assert_eq!(catalog.resolve_ability("chlorophyll"), Some(34));
        assert_eq!(catalog.resolve_nature("adamant"), Some(3));
        assert_eq!(catalog.resolve_item("potion"), Some(13));
        assert_eq!(catalog.resolve_species("Missingno"), None);

        assert_eq!(catalog.species_name(1), Some("Bulbasaur"));
        assert_eq!(catalog.move_name(73), Some("Leech Seed"));
        assert_eq!(catalog.ability_name(65), Some("Overgrow"));
        assert_eq!(catalog.nature_name(24), Some("Quirky"));
        assert_eq!(catalog.item_name(13), Some("Potion"));
    }

    #[test]
    fn level_up_moves_take_the_latest_four() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let (moves, pp) = catalog.level_up_moves(1, 10);
        assert_eq!(moves, [73, 22, 45, 33]);
        assert_eq!(pp, [10, 25, 40, 35]);

        let (moves, _) = catalog.level_up_moves(1, 2);
        assert_eq!(moves, [33, 0, 0, 0]);
    }

    #[test]
    fn growth_curves_match_reference_points() {
        assert_eq!(GrowthRate::MediumFast.experience_at(100), 1_000_000);
        assert_eq!(GrowthRate::Fast.experience_at(100), 800_000);
        assert_eq!(GrowthRate::Slow.experience_at(100), 1_250_000);
        assert_eq!(GrowthRate::MediumSlow.experience_at(100), 1_059_860);
        assert_eq!(GrowthRate::Erratic.experience_at(100), 600_000);
        assert_eq!(GrowthRate::Fluctuating.experience_at(100), 1_640_000);
        assert_eq!(GrowthRate::MediumSlow.experience_at(2), 9);
        assert_eq!(GrowthRate::MediumSlow.experience_at(1), 0);
        assert_eq!(GrowthRate::MediumFast.level_for(1_000), 10);
        assert_eq!(GrowthRate::MediumFast.level_for(999), 9);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Catalog::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Parse);
        let err = Catalog::from_json_str(r#"{"pokemon": []}"#).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Parse);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Catalog::load_from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Io);
    }
}
