use tracing::warn;

use crate::core_api::{CoreError, CreatureView, Game, StatBlock};
use crate::reader::{put_u16, put_u32, u16_at, u32_at};
use crate::record::Record;

use super::boxed::BoxCreature;
use super::{CreatureCore, MAX_LEVEL, PARTY_LEN, STORED_LEN};

const STATUS_OFFSET: usize = 0x50;
const LEVEL_OFFSET: usize = 0x54;
const MAIL_OFFSET: usize = 0x55;
const CURRENT_HP_OFFSET: usize = 0x56;
const STATS_OFFSET: usize = 0x58;

/// A 100-byte team record.
///
/// Setters edit the decoded fields and rewrite `raw` straight away, so the
/// stored checksum always matches after an edit. Owners still have to write
/// `raw` back into their sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creature {
    game: Game,
    raw: [u8; PARTY_LEN],
    core: CreatureCore,
    stored_checksum: u16,
    status: u32,
    level: u8,
    mail: u8,
    current_hp: u16,
    stats: StatBlock,
}

impl Creature {
    /// Decode a team record. The cartridge refuses a checksum mismatch; the
    /// hack keeps the record and logs it.
    pub fn parse(bytes: &[u8], game: Game) -> Result<Self, CoreError> {
        let raw: [u8; PARTY_LEN] = bytes
            .try_into()
            .map_err(|_| CoreError::size("creature record", PARTY_LEN, bytes.len()))?;

        let mut creature = Self::empty(game);
        creature.raw = raw;
        creature.rebuild_from_raw()?;
        Ok(creature)
    }

    pub fn empty(game: Game) -> Self {
        Self {
            game,
            raw: [0u8; PARTY_LEN],
            core: CreatureCore::default(),
            stored_checksum: 0,
            status: 0,
            level: 0,
            mail: 0,
            current_hp: 0,
            stats: StatBlock::default(),
        }
    }

    /// Assemble a full-health team record.
    pub fn from_core(
        game: Game,
        core: CreatureCore,
        level: u8,
        stats: StatBlock,
    ) -> Result<Self, CoreError> {
        validate_level(level)?;
        let mut creature = Self {
            core,
            level,
            current_hp: stats.hp,
            stats,
            ..Self::empty(game)
        };
        creature.rebuild_from_parts();
        Ok(creature)
    }

    /// Convert a box record to a team record; level and stats are not stored in boxes.
    pub fn from_box(boxed: &BoxCreature, level: u8, stats: StatBlock) -> Result<Self, CoreError> {
        Self::from_core(boxed.game(), *boxed.core(), level, stats)
    }

    pub fn to_box(&self) -> Result<BoxCreature, CoreError> {
        BoxCreature::from_core(self.game, self.core)
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn core(&self) -> &CreatureCore {
        &self.core
    }

    pub fn stored_checksum(&self) -> u16 {
        self.stored_checksum
    }

    /// Whether the stored checksum matches the decoded sub-structure.
    pub fn check(&self) -> bool {
        self.stored_checksum == self.core.checksum()
    }

    pub fn status(&self) -> u32 {
        self.status
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn stats(&self) -> StatBlock {
        self.stats
    }

    pub fn view(&self) -> CreatureView {
        self.core.view(self.game, Some(self.level), Some(self.stats))
    }

    pub fn set_species(&mut self, species: u16) {
        self.core.set_species(species);
        self.rebuild_from_parts();
    }

    pub fn set_evs(&mut self, evs: [u16; 6]) -> Result<(), CoreError> {
        self.core.set_evs(evs)?;
        self.rebuild_from_parts();
        Ok(())
    }

    pub fn set_ivs(&mut self, ivs: [u8; 6]) -> Result<(), CoreError> {
        self.core.set_ivs(ivs)?;
        self.rebuild_from_parts();
        Ok(())
    }

    pub fn set_moves(&mut self, moves: [u16; 4], pp: [u8; 4]) {
        self.core.set_moves(moves, pp);
        self.rebuild_from_parts();
    }

    pub fn set_level(&mut self, level: u8) -> Result<(), CoreError> {
        validate_level(level)?;
        self.level = level;
        self.rebuild_from_parts();
        Ok(())
    }

    pub fn set_nickname(&mut self, name: &str) -> Result<(), CoreError> {
        self.core.set_nickname(name)?;
        self.rebuild_from_parts();
        Ok(())
    }

    pub fn set_item(&mut self, item: u16) {
        self.core.sub.growth.item = item;
        self.rebuild_from_parts();
    }

    pub fn set_experience(&mut self, experience: u32) {
        self.core.sub.growth.experience = experience;
        self.rebuild_from_parts();
    }

    /// Replace the computed stats and restore full health.
    pub fn set_stats(&mut self, stats: StatBlock) {
        self.stats = stats;
        self.current_hp = stats.hp;
        self.rebuild_from_parts();
    }

    /// The record with the sub-structure masked and shuffled.
    pub fn to_encrypted_bytes(&self) -> [u8; PARTY_LEN] {
        self.encode(true)
    }

    /// The record with the sub-structure in canonical order.
    pub fn to_decrypted_bytes(&self) -> [u8; PARTY_LEN] {
        self.encode(false)
    }

    fn encode(&self, encrypted: bool) -> [u8; PARTY_LEN] {
        let mut out = [0u8; PARTY_LEN];
        out[..STORED_LEN].copy_from_slice(&self.core.encode_stored(encrypted));
        put_u32(&mut out, STATUS_OFFSET, self.status);
        out[LEVEL_OFFSET] = self.level;
        out[MAIL_OFFSET] = self.mail;
        put_u16(&mut out, CURRENT_HP_OFFSET, self.current_hp);
        for (i, value) in self.stats.to_array().into_iter().enumerate() {
            put_u16(&mut out, STATS_OFFSET + i * 2, value);
        }
        out
    }
}

impl Record for Creature {
    fn raw(&self) -> &[u8] {
        &self.raw
    }

    fn rebuild_from_parts(&mut self) {
        self.raw = self.encode(self.game.layout().party_sub_data_encrypted);
        self.stored_checksum = self.core.checksum();
    }

    fn rebuild_from_raw(&mut self) -> Result<(), CoreError> {
        let encrypted = self.game.layout().party_sub_data_encrypted;
        let (core, stored_checksum) = CreatureCore::decode_stored(&self.raw, encrypted)?;
        let computed = core.checksum();

        if stored_checksum != computed {
            if encrypted {
                return Err(CoreError::integrity(format!(
                    "creature checksum {stored_checksum:#06x} != computed {computed:#06x}"
                )));
            }
            warn!(
                pid = core.pid,
                stored = stored_checksum,
                computed,
                "creature checksum mismatch tolerated"
            );
        }

        let mut stats = [0u16; 6];
        for (i, value) in stats.iter_mut().enumerate() {
            *value = u16_at(&self.raw, STATS_OFFSET + i * 2);
        }

        self.core = core;
        self.stored_checksum = stored_checksum;
        self.status = u32_at(&self.raw, STATUS_OFFSET);
        self.level = self.raw[LEVEL_OFFSET];
        self.mail = self.raw[MAIL_OFFSET];
        self.current_hp = u16_at(&self.raw, CURRENT_HP_OFFSET);
        self.stats = StatBlock::from_array(stats);
        Ok(())
    }
}

fn validate_level(level: u8) -> Result<(), CoreError> {
    if !(1..=MAX_LEVEL).contains(&level) {
        return Err(CoreError::invalid_argument(format!(
            "level {level} outside 1..={MAX_LEVEL}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_api::CoreErrorCode;
    use crate::creature::CHECKSUM_OFFSET;

    fn sample(game: Game) -> Creature {
        let mut core = CreatureCore {
            pid: 0x5A5A_1234,
            ot_id: 0x0BAD_F00D,
            ..CreatureCore::default()
        };
        core.set_species(6);
        core.set_nickname("Zard").unwrap();
        core.set_moves([52, 10, 0, 0], [25, 35, 0, 0]);
        Creature::from_core(game, core, 36, StatBlock::from_array([110, 80, 70, 90, 95, 75]))
            .unwrap()
    }

    #[test]
    fn cartridge_record_round_trips_encrypted() {
        let creature = sample(Game::FireRed);
        assert_eq!(creature.raw(), &creature.to_encrypted_bytes());
        let reparsed = Creature::parse(creature.raw(), Game::FireRed).unwrap();
        assert_eq!(reparsed, creature);
        assert!(reparsed.check());
        assert_eq!(reparsed.current_hp(), 110);
    }

    #[test]
    fn hack_record_is_stored_plain() {
        let creature = sample(Game::RadicalRed);
        assert_eq!(creature.raw(), &creature.to_decrypted_bytes());
        assert_eq!(u16_at(creature.raw(), 0x20), 6);
    }

    #[test]
    fn cartridge_checksum_mismatch_is_an_integrity_fault() {
        let mut bytes = sample(Game::FireRed).raw;
        bytes[CHECKSUM_OFFSET] ^= 0xFF;
        let err = Creature::parse(&bytes, Game::FireRed).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Integrity);
    }

    #[test]
    fn hack_checksum_mismatch_loads_and_heals_on_edit() {
        let mut bytes = sample(Game::RadicalRed).raw;
        bytes[CHECKSUM_OFFSET] ^= 0xFF;
        let mut creature = Creature::parse(&bytes, Game::RadicalRed).unwrap();
        assert!(!creature.check());

        creature.set_species(7);
        assert!(creature.check());
        assert_eq!(
            u16_at(creature.raw(), CHECKSUM_OFFSET),
            creature.core().checksum()
        );
    }

    #[test]
    fn set_species_rewrites_encrypted_record() {
        let mut creature = sample(Game::FireRed);
        let before = creature.raw;
        creature.set_species(9);
        assert_ne!(creature.raw, before);
        let reparsed = Creature::parse(creature.raw(), Game::FireRed).unwrap();
        assert_eq!(reparsed.core().species(), 9);
    }

    #[test]
    fn setters_validate_ranges() {
        let mut creature = sample(Game::RadicalRed);
        assert_eq!(
            creature.set_evs([255, 255, 1, 0, 0, 0]).unwrap_err().code,
            CoreErrorCode::InvalidArgument
        );
        assert!(creature.set_ivs([32, 0, 0, 0, 0, 0]).is_err());
        assert!(creature.set_level(0).is_err());
        assert!(creature.set_level(101).is_err());
        assert!(creature.set_nickname("ABCDEFGHIJK").is_err());
        creature.set_evs([252, 252, 4, 0, 0, 0]).unwrap();
        assert_eq!(creature.view().evs, [252, 252, 4, 0, 0, 0]);
    }

    #[test]
    fn wrong_length_is_a_size_fault() {
        let err = Creature::parse(&[0u8; 99], Game::FireRed).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Size);
    }

    #[test]
    fn box_round_trip_keeps_core() {
        let creature = sample(Game::FireRed);
        let boxed = creature.to_box().unwrap();
        let back = Creature::from_box(&boxed, 36, creature.stats()).unwrap();
        assert_eq!(back, creature);
    }
}
