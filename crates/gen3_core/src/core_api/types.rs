use crate::gender::Gender;
use crate::layout::{FIRE_RED_LAYOUT, RADICAL_RED_LAYOUT, VariantLayout};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Game {
    /// The unmodified cartridge format.
    FireRed,
    /// The ROM-hack format: plain party sub-data, compact PC records, security magic.
    RadicalRed,
}

impl Game {
    pub fn layout(self) -> &'static VariantLayout {
        match self {
            Self::FireRed => &FIRE_RED_LAYOUT,
            Self::RadicalRed => &RADICAL_RED_LAYOUT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FireRed => "FireRed",
            Self::RadicalRed => "Radical Red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotLabel {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilitySlot {
    First,
    Second,
    Hidden,
}

impl AbilitySlot {
    /// Required value of `pid % 2`. The hidden ability is flagged separately.
    pub fn pid_parity(self) -> u32 {
        match self {
            Self::First | Self::Hidden => 0,
            Self::Second => 1,
        }
    }

    /// Value of the misc ability bit. The cartridge stores the second
    /// ability there; the hack stores the hidden one.
    pub fn ability_flag(self, game: Game) -> bool {
        match game {
            Game::FireRed => self == Self::Second,
            Game::RadicalRed => self == Self::Hidden,
        }
    }

    pub fn decode(game: Game, pid: u32, ability_flag: bool) -> Self {
        match (game, ability_flag) {
            (Game::FireRed, true) => Self::Second,
            (Game::FireRed, false) => Self::First,
            (Game::RadicalRed, true) => Self::Hidden,
            (Game::RadicalRed, false) if pid % 2 == 1 => Self::Second,
            (Game::RadicalRed, false) => Self::First,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayTime {
    pub hours: u16,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatBlock {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
}

impl StatBlock {
    pub fn from_array(values: [u16; 6]) -> Self {
        Self {
            hp: values[0],
            attack: values[1],
            defense: values[2],
            speed: values[3],
            sp_attack: values[4],
            sp_defense: values[5],
        }
    }

    pub fn to_array(&self) -> [u16; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.speed,
            self.sp_attack,
            self.sp_defense,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub game: Game,
    pub active_slot: SlotLabel,
    pub save_index: u32,
    pub trainer_name: String,
    pub gender: Gender,
    pub public_id: u16,
    pub secret_id: u16,
    pub play_time: PlayTime,
    pub money: u32,
    pub coins: u16,
    pub team_size: usize,
    pub dex_seen: usize,
    pub dex_caught: usize,
    pub current_box: u32,
}

/// Decoded read view of one creature for reporting and export tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatureView {
    pub species: u16,
    pub nickname: String,
    pub ot_name: String,
    pub ot_public_id: u16,
    /// Box records do not store a level; it follows from experience and growth rate.
    pub level: Option<u8>,
    pub nature: u8,
    pub nature_name: String,
    pub ability: AbilitySlot,
    pub held_item: u16,
    pub experience: u32,
    pub friendship: u8,
    pub is_egg: bool,
    pub is_shiny: bool,
    pub moves: [u16; 4],
    pub evs: [u8; 6],
    pub ivs: [u8; 6],
    pub stats: Option<StatBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxEntry {
    pub box_index: usize,
    pub slot: usize,
    pub creature: CreatureView,
}

/// Result of inserting into the team. A full team is reported, not raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertOutcome {
    Inserted { slot: usize },
    TeamFull,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }
}
