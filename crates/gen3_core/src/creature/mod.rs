//! Creature records: the shared 80-byte identity plus sub-structure, the
//! 100-byte party record and the per-variant box record.

pub mod boxed;
pub mod party;
pub mod substructure;

pub use boxed::BoxCreature;
pub use party::Creature;

use crate::charset;
use crate::core_api::{AbilitySlot, CoreError, CreatureView, Game, StatBlock};
use crate::pid;
use crate::reader::{put_u16, put_u32, u16_at, u32_at};
use crate::stats;
use substructure::{SUB_DATA_LEN, SubData, sub_data_array, validate_evs, validate_ivs};

pub const NICKNAME_LEN: usize = 10;
pub const OT_NAME_LEN: usize = 7;
pub const CHECKSUM_OFFSET: usize = 0x1C;
pub const SUB_DATA_OFFSET: usize = 0x20;
/// Header plus sub-structure; the part shared by party and cartridge box records.
pub const STORED_LEN: usize = SUB_DATA_OFFSET + SUB_DATA_LEN;
pub const PARTY_LEN: usize = 100;
pub const MAX_LEVEL: u8 = 100;

pub const FLAG_BAD_EGG: u8 = 0x01;
pub const FLAG_HAS_SPECIES: u8 = 0x02;
pub const FLAG_USE_EGG_NAME: u8 = 0x04;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Japanese = 1,
    English = 2,
    French = 3,
    Italian = 4,
    German = 5,
    Korean = 6,
    Spanish = 7,
}

impl Language {
    pub fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            1 => Self::Japanese,
            2 => Self::English,
            3 => Self::French,
            4 => Self::Italian,
            5 => Self::German,
            6 => Self::Korean,
            7 => Self::Spanish,
            _ => return None,
        })
    }
}

/// Identity header and decoded sub-structure of one creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreatureCore {
    pub pid: u32,
    pub ot_id: u32,
    pub nickname: [u8; NICKNAME_LEN],
    pub language: u8,
    pub flags: u8,
    pub ot_name: [u8; OT_NAME_LEN],
    pub markings: u8,
    pub filler: u16,
    pub sub: SubData,
}

impl CreatureCore {
    /// Decode the first 80 bytes of a party or cartridge box record.
    /// Returns the core and the checksum stored at 0x1C.
    pub fn decode_stored(bytes: &[u8], encrypted: bool) -> Result<(Self, u16), CoreError> {
        if bytes.len() < STORED_LEN {
            return Err(CoreError::size("creature record", STORED_LEN, bytes.len()));
        }

        let pid = u32_at(bytes, 0x00);
        let ot_id = u32_at(bytes, 0x04);
        let stored = sub_data_array(&bytes[SUB_DATA_OFFSET..STORED_LEN])?;
        let sub = if encrypted {
            SubData::from_encrypted(&stored, pid, ot_id)
        } else {
            SubData::from_plain(&stored)
        };

        let mut core = Self::read_header(bytes);
        core.sub = sub;
        Ok((core, u16_at(bytes, CHECKSUM_OFFSET)))
    }

    pub fn encode_stored(&self, encrypted: bool) -> [u8; STORED_LEN] {
        let mut out = [0u8; STORED_LEN];
        self.write_header(&mut out);
        put_u16(&mut out, CHECKSUM_OFFSET, self.checksum());
        let sub = if encrypted {
            self.sub.to_encrypted(self.pid, self.ot_id)
        } else {
            self.sub.to_plain()
        };
        out[SUB_DATA_OFFSET..].copy_from_slice(&sub);
        out
    }

    /// Header fields through markings, as laid out at 0x00..0x1C.
    pub(crate) fn read_header(bytes: &[u8]) -> Self {
        let mut nickname = [0u8; NICKNAME_LEN];
        nickname.copy_from_slice(&bytes[0x08..0x12]);
        let mut ot_name = [0u8; OT_NAME_LEN];
        ot_name.copy_from_slice(&bytes[0x14..0x1B]);

        Self {
            pid: u32_at(bytes, 0x00),
            ot_id: u32_at(bytes, 0x04),
            nickname,
            language: bytes[0x12],
            flags: bytes[0x13],
            ot_name,
            markings: bytes[0x1B],
            filler: u16_at(bytes, 0x1E),
            sub: SubData::default(),
        }
    }

    pub(crate) fn write_header(&self, out: &mut [u8]) {
        put_u32(out, 0x00, self.pid);
        put_u32(out, 0x04, self.ot_id);
        out[0x08..0x12].copy_from_slice(&self.nickname);
        out[0x12] = self.language;
        out[0x13] = self.flags;
        out[0x14..0x1B].copy_from_slice(&self.ot_name);
        out[0x1B] = self.markings;
        put_u16(out, 0x1E, self.filler);
    }

    pub fn checksum(&self) -> u16 {
        self.sub.checksum()
    }

    pub fn public_id(&self) -> u16 {
        (self.ot_id & 0xFFFF) as u16
    }

    pub fn secret_id(&self) -> u16 {
        (self.ot_id >> 16) as u16
    }

    pub fn species(&self) -> u16 {
        self.sub.growth.species
    }

    pub fn nature(&self) -> u8 {
        pid::nature_of(self.pid)
    }

    pub fn is_shiny(&self) -> bool {
        pid::is_shiny(self.pid, self.ot_id)
    }

    pub fn is_egg(&self) -> bool {
        self.sub.misc.iv_flags.is_egg()
    }

    pub fn ability(&self, game: Game) -> AbilitySlot {
        AbilitySlot::decode(game, self.pid, self.sub.misc.iv_flags.ability_flag())
    }

    pub fn ivs(&self) -> [u8; 6] {
        self.sub.misc.iv_flags.ivs()
    }

    pub fn nickname(&self) -> String {
        charset::decode(&self.nickname)
    }

    pub fn ot_name(&self) -> String {
        charset::decode(&self.ot_name)
    }

    pub fn set_species(&mut self, species: u16) {
        self.sub.growth.species = species;
        if species == 0 {
            self.flags &= !FLAG_HAS_SPECIES;
        } else {
            self.flags |= FLAG_HAS_SPECIES;
        }
    }

    pub fn set_evs(&mut self, evs: [u16; 6]) -> Result<(), CoreError> {
        self.sub.evs.values = validate_evs(evs)?;
        Ok(())
    }

    pub fn set_ivs(&mut self, ivs: [u8; 6]) -> Result<(), CoreError> {
        let ivs = validate_ivs(ivs)?;
        self.sub.misc.iv_flags = self.sub.misc.iv_flags.with_ivs(ivs);
        Ok(())
    }

    pub fn set_moves(&mut self, moves: [u16; 4], pp: [u8; 4]) {
        self.sub.attacks.moves = moves;
        self.sub.attacks.pp = pp;
    }

    pub fn set_nickname(&mut self, name: &str) -> Result<(), CoreError> {
        self.nickname = charset::encode_fixed::<NICKNAME_LEN>(name)?;
        Ok(())
    }

    pub fn set_ot_name(&mut self, name: &str) -> Result<(), CoreError> {
        self.ot_name = charset::encode_fixed::<OT_NAME_LEN>(name)?;
        Ok(())
    }

    pub fn view(&self, game: Game, level: Option<u8>, stats: Option<StatBlock>) -> CreatureView {
        let nature = self.nature();
        CreatureView {
            species: self.species(),
            nickname: self.nickname(),
            ot_name: self.ot_name(),
            ot_public_id: self.public_id(),
            level,
            nature,
            nature_name: stats::nature_name(nature).unwrap_or("?").to_string(),
            ability: self.ability(game),
            held_item: self.sub.growth.item,
            experience: self.sub.growth.experience,
            friendship: self.sub.growth.friendship,
            is_egg: self.is_egg(),
            is_shiny: self.is_shiny(),
            moves: self.sub.attacks.moves,
            evs: self.sub.evs.values,
            ivs: self.ivs(),
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_api::CoreErrorCode;

    fn sample() -> CreatureCore {
        let mut core = CreatureCore {
            pid: 0x8D3F_1A2B,
            ot_id: 0x0001_3039,
            language: Language::English as u8,
            ..CreatureCore::default()
        };
        core.set_species(25);
        core.set_nickname("PIKA").unwrap();
        core.set_ot_name("ASH").unwrap();
        core.set_ivs([31, 30, 29, 28, 27, 26]).unwrap();
        core.sub.growth.experience = 1000;
        core
    }

    #[test]
    fn stored_bytes_decode_in_both_representations() {
        let core = sample();
        for encrypted in [true, false] {
            let bytes = core.encode_stored(encrypted);
            let (decoded, stored) = CreatureCore::decode_stored(&bytes, encrypted).unwrap();
            assert_eq!(decoded, core);
            assert_eq!(stored, core.checksum());
        }
    }

    #[test]
    fn encrypted_and_plain_forms_differ_only_in_sub_data() {
        let core = sample();
        let plain = core.encode_stored(false);
        let encrypted = core.encode_stored(true);
        assert_eq!(plain[..SUB_DATA_OFFSET], encrypted[..SUB_DATA_OFFSET]);
        assert_ne!(plain[SUB_DATA_OFFSET..], encrypted[SUB_DATA_OFFSET..]);
    }

    #[test]
    fn short_record_is_a_size_fault() {
        let err = CreatureCore::decode_stored(&[0u8; 79], false).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Size);
    }

    #[test]
    fn species_toggles_has_species_flag() {
        let mut core = sample();
        assert_eq!(core.flags & FLAG_HAS_SPECIES, FLAG_HAS_SPECIES);
        core.set_species(0);
        assert_eq!(core.flags & FLAG_HAS_SPECIES, 0);
    }

    #[test]
    fn view_reports_decoded_fields() {
        let view = sample().view(Game::RadicalRed, Some(12), None);
        assert_eq!(view.species, 25);
        assert_eq!(view.nickname, "PIKA");
        assert_eq!(view.ot_name, "ASH");
        assert_eq!(view.ot_public_id, 0x3039);
        assert_eq!(view.ivs, [31, 30, 29, 28, 27, 26]);
        assert_eq!(view.nature, (0x8D3F_1A2Bu32 % 25) as u8);
        assert_eq!(view.level, Some(12));
    }

    #[test]
    fn language_codes() {
        assert_eq!(Language::from_raw(2), Some(Language::English));
        assert_eq!(Language::from_raw(0), None);
        assert_eq!(Language::from_raw(8), None);
    }
}
