use crate::core_api::{CoreError, CreatureView, Game};
use crate::layout::BoxRecordFormat;
use crate::reader::{put_u16, put_u32, u16_at, u32_at};
use crate::record::Record;

use super::substructure::{IvFlags, Origin};
use super::{CHECKSUM_OFFSET, CreatureCore, STORED_LEN};

pub const COMPACT_LEN: usize = 58;
/// Compact records pack each move id into this many bits.
pub const COMPACT_MOVE_BITS: u32 = 10;
pub const COMPACT_MOVE_MAX: u16 = (1 << COMPACT_MOVE_BITS) - 1;

/// One PC storage record, encoded in the variant's box format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxCreature {
    game: Game,
    raw: Vec<u8>,
    core: CreatureCore,
}

impl BoxCreature {
    pub fn parse(bytes: &[u8], game: Game) -> Result<Self, CoreError> {
        let format = game.layout().box_format;
        if bytes.len() != format.len() {
            return Err(CoreError::size("box record", format.len(), bytes.len()));
        }
        Ok(Self {
            game,
            raw: bytes.to_vec(),
            core: decode(bytes, format)?,
        })
    }

    pub fn empty(game: Game) -> Self {
        Self {
            game,
            raw: vec![0u8; game.layout().box_format.len()],
            core: CreatureCore::default(),
        }
    }

    /// Encode `core` for storage. Compact records reject move ids wider than 10 bits.
    pub fn from_core(game: Game, core: CreatureCore) -> Result<Self, CoreError> {
        if game.layout().box_format == BoxRecordFormat::Compact58
            && let Some(mv) = core.sub.attacks.moves.iter().find(|&&mv| mv > COMPACT_MOVE_MAX)
        {
            return Err(CoreError::invalid_argument(format!(
                "move id {mv} does not fit a compact box record"
            )));
        }

        let mut creature = Self {
            game,
            raw: Vec::new(),
            core,
        };
        creature.rebuild_from_parts();
        Ok(creature)
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn core(&self) -> &CreatureCore {
        &self.core
    }

    pub fn is_empty(&self) -> bool {
        self.core.species() == 0
    }

    pub fn view(&self) -> CreatureView {
        self.core.view(self.game, None, None)
    }

    /// Change the species and re-encode; cartridge records get a fresh checksum.
    pub fn set_species(&mut self, species: u16) {
        self.core.set_species(species);
        self.rebuild_from_parts();
    }
}

impl Record for BoxCreature {
    fn raw(&self) -> &[u8] {
        &self.raw
    }

    fn rebuild_from_parts(&mut self) {
        self.raw = encode(&self.core, self.game.layout().box_format);
    }

    fn rebuild_from_raw(&mut self) -> Result<(), CoreError> {
        self.core = decode(&self.raw, self.game.layout().box_format)?;
        Ok(())
    }
}

fn decode(bytes: &[u8], format: BoxRecordFormat) -> Result<CreatureCore, CoreError> {
    match format {
        BoxRecordFormat::Encrypted80 => {
            let (core, stored) = CreatureCore::decode_stored(bytes, true)?;
            if stored != core.checksum() {
                return Err(CoreError::integrity(format!(
                    "box record checksum {stored:#06x} != computed {:#06x}",
                    core.checksum()
                )));
            }
            Ok(core)
        }
        BoxRecordFormat::Compact58 => decode_compact(bytes),
    }
}

fn encode(core: &CreatureCore, format: BoxRecordFormat) -> Vec<u8> {
    match format {
        BoxRecordFormat::Encrypted80 => core.encode_stored(true).to_vec(),
        BoxRecordFormat::Compact58 => encode_compact(core).to_vec(),
    }
}

pub fn decode_compact(bytes: &[u8]) -> Result<CreatureCore, CoreError> {
    if bytes.len() != COMPACT_LEN {
        return Err(CoreError::size("compact box record", COMPACT_LEN, bytes.len()));
    }

    let mut core = CreatureCore::read_header(bytes);
    core.filler = 0;

    let growth = &mut core.sub.growth;
    growth.species = u16_at(bytes, 0x1C);
    growth.item = u16_at(bytes, 0x1E);
    growth.experience = u32_at(bytes, 0x20);
    growth.pp_bonuses = bytes[0x24];
    growth.friendship = bytes[0x25];
    growth.ball = bytes[0x26];

    let mut packed = [0u8; 8];
    packed[..5].copy_from_slice(&bytes[0x27..0x2C]);
    let packed = u64::from_le_bytes(packed);
    for (i, mv) in core.sub.attacks.moves.iter_mut().enumerate() {
        *mv = ((packed >> (i as u32 * COMPACT_MOVE_BITS)) & u64::from(COMPACT_MOVE_MAX)) as u16;
    }

    core.sub.evs.values.copy_from_slice(&bytes[0x2C..0x32]);
    core.sub.misc.pokerus = bytes[0x32];
    core.sub.misc.met_location = bytes[0x33];
    core.sub.misc.origin = Origin(u16_at(bytes, 0x34));
    core.sub.misc.iv_flags = IvFlags(u32_at(bytes, 0x36));

    Ok(core)
}

/// PP, contest stats and ribbons have no place in the compact record.
pub fn encode_compact(core: &CreatureCore) -> [u8; COMPACT_LEN] {
    let mut header = [0u8; STORED_LEN];
    core.write_header(&mut header);

    let mut out = [0u8; COMPACT_LEN];
    out[..CHECKSUM_OFFSET].copy_from_slice(&header[..CHECKSUM_OFFSET]);

    let growth = &core.sub.growth;
    put_u16(&mut out, 0x1C, growth.species);
    put_u16(&mut out, 0x1E, growth.item);
    put_u32(&mut out, 0x20, growth.experience);
    out[0x24] = growth.pp_bonuses;
    out[0x25] = growth.friendship;
    out[0x26] = growth.ball;

    let packed = core
        .sub
        .attacks
        .moves
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &mv)| {
            acc | (u64::from(mv & COMPACT_MOVE_MAX) << (i as u32 * COMPACT_MOVE_BITS))
        });
    out[0x27..0x2C].copy_from_slice(&packed.to_le_bytes()[..5]);

    out[0x2C..0x32].copy_from_slice(&core.sub.evs.values);
    out[0x32] = core.sub.misc.pokerus;
    out[0x33] = core.sub.misc.met_location;
    put_u16(&mut out, 0x34, core.sub.misc.origin.0);
    put_u32(&mut out, 0x36, core.sub.misc.iv_flags.0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_api::CoreErrorCode;
    use crate::gender::Gender;

    fn sample() -> CreatureCore {
        let mut core = CreatureCore {
            pid: 0x0102_0304,
            ot_id: 0x9ABC_DEF0,
            ..CreatureCore::default()
        };
        core.set_species(1000);
        core.set_nickname("Bulby").unwrap();
        core.set_ot_name("Leaf").unwrap();
        core.set_moves([33, 1023, 512, 0], [35, 5, 10, 0]);
        core.set_evs([4, 0, 0, 252, 252, 0]).unwrap();
        core.set_ivs([31; 6]).unwrap();
        core.sub.growth.ball = 3;
        core.sub.misc.origin = Origin::new(5, 4, 3, Gender::Female);
        core
    }

    #[test]
    fn compact_record_keeps_identity_and_core_fields() {
        let core = sample();
        let decoded = decode_compact(&encode_compact(&core)).unwrap();
        assert_eq!(decoded.pid, core.pid);
        assert_eq!(decoded.nickname(), "Bulby");
        assert_eq!(decoded.ot_name(), "Leaf");
        assert_eq!(decoded.species(), 1000);
        assert_eq!(decoded.sub.attacks.moves, [33, 1023, 512, 0]);
        assert_eq!(decoded.sub.evs.values, [4, 0, 0, 252, 252, 0]);
        assert_eq!(decoded.ivs(), [31; 6]);
        assert_eq!(decoded.sub.growth.ball, 3);
        assert_eq!(decoded.sub.misc.origin.ot_gender(), Gender::Female);
        // Lost in the compact format.
        assert_eq!(decoded.sub.attacks.pp, [0; 4]);
    }

    #[test]
    fn compact_moves_pack_into_forty_bits() {
        let mut core = CreatureCore::default();
        core.set_moves([0x3FF, 0, 0, 0x3FF], [0; 4]);
        let bytes = encode_compact(&core);
        assert_eq!(&bytes[0x27..0x2C], &[0xFF, 0x03, 0x00, 0xC0, 0xFF]);
    }

    #[test]
    fn compact_rejects_wide_move_ids() {
        let mut core = sample();
        core.set_moves([1024, 0, 0, 0], [0; 4]);
        let err = BoxCreature::from_core(Game::RadicalRed, core).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::InvalidArgument);
        assert!(BoxCreature::from_core(Game::FireRed, core).is_ok());
    }

    #[test]
    fn cartridge_box_record_enforces_checksum() {
        let creature = BoxCreature::from_core(Game::FireRed, sample()).unwrap();
        assert_eq!(creature.raw().len(), 80);
        let mut bytes = creature.raw().to_vec();
        bytes[0x30] ^= 0x40;
        let err = BoxCreature::parse(&bytes, Game::FireRed).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Integrity);
    }

    #[test]
    fn zeroed_records_are_empty_and_valid() {
        for game in [Game::FireRed, Game::RadicalRed] {
            let empty = BoxCreature::empty(game);
            let parsed = BoxCreature::parse(empty.raw(), game).unwrap();
            assert!(parsed.is_empty());
        }
    }

    #[test]
    fn wrong_length_is_a_size_fault() {
        let err = BoxCreature::parse(&[0u8; 80], Game::RadicalRed).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Size);
    }
}
