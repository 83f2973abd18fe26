use std::fmt;

use serde::{Deserialize, Serialize};

/// Trainer gender as stored in the trainer block and in a creature's origin bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unknown(u8),
}

impl Gender {
    pub const MALE_RAW: u8 = 0;
    pub const FEMALE_RAW: u8 = 1;

    pub fn from_raw(raw: u8) -> Self {
        match raw {
            Self::MALE_RAW => Self::Male,
            Self::FEMALE_RAW => Self::Female,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::Male => Self::MALE_RAW,
            Self::Female => Self::FEMALE_RAW,
            Self::Unknown(other) => other,
        }
    }

    /// Single bit used by the creature origin field; anything not female is 0.
    pub fn origin_bit(&self) -> u16 {
        u16::from(*self == Self::Female)
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Male => "Boy",
            Self::Female => "Girl",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(v) => write!(f, "Unknown ({})", v),
            _ => f.write_str(self.as_str()),
        }
    }
}
