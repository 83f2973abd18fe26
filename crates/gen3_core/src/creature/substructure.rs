//! The 48-byte creature sub-structure: four 12-byte blocks that are stored
//! XOR-masked and shuffled on the cartridge format.

use crate::core_api::CoreError;
use crate::gender::Gender;
use crate::reader::{put_u16, put_u32, u16_at, u32_at};

pub const SUB_DATA_LEN: usize = 48;
pub const BLOCK_LEN: usize = 12;

pub const MAX_EV: u16 = 255;
pub const MAX_EV_TOTAL: u32 = 510;
pub const MAX_IV: u8 = 31;

/// Block order for each `pid % 24`, in canonical letters
/// G(rowth), A(ttacks), E(Vs), M(isc).
pub const PERMUTATIONS: [&str; 24] = [
    "GAEM", "GAME", "GEAM", "GEMA", "GMAE", "GMEA", "AGEM", "AGME", "AEGM", "AEMG", "AMGE", "AMEG",
    "EGAM", "EGMA", "EAGM", "EAMG", "EMGA", "EMAG", "MGAE", "MGEA", "MAGE", "MAEG", "MEGA", "MEAG",
];

const fn slot_table() -> [[usize; 4]; 24] {
    let letters = *b"GAEM";
    let mut table = [[0usize; 4]; 24];
    let mut p = 0;
    while p < 24 {
        let order = PERMUTATIONS[p].as_bytes();
        let mut slot = 0;
        while slot < 4 {
            let mut kind = 0;
            while kind < 4 {
                if order[slot] == letters[kind] {
                    table[p][kind] = slot;
                }
                kind += 1;
            }
            slot += 1;
        }
        p += 1;
    }
    table
}

/// `BLOCK_SLOTS[pid % 24][kind]` is the stored slot of canonical block `kind`.
static BLOCK_SLOTS: [[usize; 4]; 24] = slot_table();

pub fn block_slots(pid: u32) -> [usize; 4] {
    BLOCK_SLOTS[(pid % 24) as usize]
}

fn xor_words(bytes: &mut [u8; SUB_DATA_LEN], key: u32) {
    for word in bytes.chunks_exact_mut(4) {
        let masked = u32::from_le_bytes([word[0], word[1], word[2], word[3]]) ^ key;
        word.copy_from_slice(&masked.to_le_bytes());
    }
}

/// Unmask and reorder stored bytes into canonical G|A|E|M order.
pub fn decrypt(stored: &[u8; SUB_DATA_LEN], pid: u32, ot_id: u32) -> [u8; SUB_DATA_LEN] {
    let mut unmasked = *stored;
    xor_words(&mut unmasked, pid ^ ot_id);

    let mut plain = [0u8; SUB_DATA_LEN];
    for (kind, slot) in block_slots(pid).into_iter().enumerate() {
        plain[kind * BLOCK_LEN..(kind + 1) * BLOCK_LEN]
            .copy_from_slice(&unmasked[slot * BLOCK_LEN..(slot + 1) * BLOCK_LEN]);
    }
    plain
}

pub fn encrypt(plain: &[u8; SUB_DATA_LEN], pid: u32, ot_id: u32) -> [u8; SUB_DATA_LEN] {
    let mut stored = [0u8; SUB_DATA_LEN];
    for (kind, slot) in block_slots(pid).into_iter().enumerate() {
        stored[slot * BLOCK_LEN..(slot + 1) * BLOCK_LEN]
            .copy_from_slice(&plain[kind * BLOCK_LEN..(kind + 1) * BLOCK_LEN]);
    }
    xor_words(&mut stored, pid ^ ot_id);
    stored
}

/// Sum of the 24 little-endian half-words of canonical (decrypted) bytes.
pub fn checksum(plain: &[u8; SUB_DATA_LEN]) -> u16 {
    plain
        .chunks_exact(2)
        .map(|half| u16::from_le_bytes([half[0], half[1]]))
        .fold(0u16, u16::wrapping_add)
}

pub fn sub_data_array(bytes: &[u8]) -> Result<[u8; SUB_DATA_LEN], CoreError> {
    bytes
        .try_into()
        .map_err(|_| CoreError::size("creature sub-data", SUB_DATA_LEN, bytes.len()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Growth {
    pub species: u16,
    pub item: u16,
    pub experience: u32,
    pub pp_bonuses: u8,
    pub friendship: u8,
    /// Full-width ball id; the hack keeps it here, the cartridge leaves it zero.
    pub ball: u8,
    pub filler: u8,
}

impl Growth {
    pub fn pp_bonus(&self, move_index: usize) -> u8 {
        (self.pp_bonuses >> (move_index * 2)) & 0b11
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attacks {
    pub moves: [u16; 4],
    pub pp: [u8; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evs {
    pub values: [u8; 6],
    pub contest: [u8; 6],
}

/// Packed origin: level met (7 bits), origin game (4), ball (4), OT gender (1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Origin(pub u16);

impl Origin {
    pub fn new(level_met: u8, game: u8, ball: u8, ot_gender: Gender) -> Self {
        Self(
            u16::from(level_met & 0x7F)
                | (u16::from(game & 0x0F) << 7)
                | (u16::from(ball & 0x0F) << 11)
                | (ot_gender.origin_bit() << 15),
        )
    }

    pub fn level_met(&self) -> u8 {
        (self.0 & 0x7F) as u8
    }

    pub fn game(&self) -> u8 {
        ((self.0 >> 7) & 0x0F) as u8
    }

    pub fn ball(&self) -> u8 {
        ((self.0 >> 11) & 0x0F) as u8
    }

    pub fn ot_gender(&self) -> Gender {
        Gender::from_raw((self.0 >> 15) as u8)
    }
}

/// Six 5-bit IVs, then the egg flag (bit 30) and ability flag (bit 31).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IvFlags(pub u32);

impl IvFlags {
    const EGG_BIT: u32 = 1 << 30;
    const ABILITY_BIT: u32 = 1 << 31;

    pub fn ivs(&self) -> [u8; 6] {
        let mut out = [0u8; 6];
        for (i, iv) in out.iter_mut().enumerate() {
            *iv = ((self.0 >> (i * 5)) & 0x1F) as u8;
        }
        out
    }

    pub fn with_ivs(self, ivs: [u8; 6]) -> Self {
        let mut packed = self.0 & (Self::EGG_BIT | Self::ABILITY_BIT);
        for (i, iv) in ivs.into_iter().enumerate() {
            packed |= u32::from(iv & 0x1F) << (i * 5);
        }
        Self(packed)
    }

    pub fn is_egg(&self) -> bool {
        self.0 & Self::EGG_BIT != 0
    }

    pub fn ability_flag(&self) -> bool {
        self.0 & Self::ABILITY_BIT != 0
    }

    pub fn with_ability_flag(self, set: bool) -> Self {
        if set {
            Self(self.0 | Self::ABILITY_BIT)
        } else {
            Self(self.0 & !Self::ABILITY_BIT)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Misc {
    pub pokerus: u8,
    pub met_location: u8,
    pub origin: Origin,
    pub iv_flags: IvFlags,
    pub ribbons: u32,
}

impl Misc {
    pub fn pokerus_days(&self) -> u8 {
        self.pokerus & 0x07
    }

    pub fn pokerus_strain(&self) -> u8 {
        self.pokerus >> 3
    }
}

/// Decoded sub-structure, always held in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubData {
    pub growth: Growth,
    pub attacks: Attacks,
    pub evs: Evs,
    pub misc: Misc,
}

impl SubData {
    pub fn from_plain(plain: &[u8; SUB_DATA_LEN]) -> Self {
        let g = &plain[0..12];
        let a = &plain[12..24];
        let e = &plain[24..36];
        let m = &plain[36..48];

        let mut evs = Evs::default();
        evs.values.copy_from_slice(&e[0..6]);
        evs.contest.copy_from_slice(&e[6..12]);

        Self {
            growth: Growth {
                species: u16_at(g, 0),
                item: u16_at(g, 2),
                experience: u32_at(g, 4),
                pp_bonuses: g[8],
                friendship: g[9],
                ball: g[10],
                filler: g[11],
            },
            attacks: Attacks {
                moves: [u16_at(a, 0), u16_at(a, 2), u16_at(a, 4), u16_at(a, 6)],
                pp: [a[8], a[9], a[10], a[11]],
            },
            evs,
            misc: Misc {
                pokerus: m[0],
                met_location: m[1],
                origin: Origin(u16_at(m, 2)),
                iv_flags: IvFlags(u32_at(m, 4)),
                ribbons: u32_at(m, 8),
            },
        }
    }

    pub fn from_encrypted(stored: &[u8; SUB_DATA_LEN], pid: u32, ot_id: u32) -> Self {
        Self::from_plain(&decrypt(stored, pid, ot_id))
    }

    pub fn to_plain(&self) -> [u8; SUB_DATA_LEN] {
        let mut out = [0u8; SUB_DATA_LEN];

        put_u16(&mut out, 0, self.growth.species);
        put_u16(&mut out, 2, self.growth.item);
        put_u32(&mut out, 4, self.growth.experience);
        out[8] = self.growth.pp_bonuses;
        out[9] = self.growth.friendship;
        out[10] = self.growth.ball;
        out[11] = self.growth.filler;

        for (i, mv) in self.attacks.moves.into_iter().enumerate() {
            put_u16(&mut out, 12 + i * 2, mv);
        }
        out[20..24].copy_from_slice(&self.attacks.pp);

        out[24..30].copy_from_slice(&self.evs.values);
        out[30..36].copy_from_slice(&self.evs.contest);

        out[36] = self.misc.pokerus;
        out[37] = self.misc.met_location;
        put_u16(&mut out, 38, self.misc.origin.0);
        put_u32(&mut out, 40, self.misc.iv_flags.0);
        put_u32(&mut out, 44, self.misc.ribbons);
        out
    }

    pub fn to_encrypted(&self, pid: u32, ot_id: u32) -> [u8; SUB_DATA_LEN] {
        encrypt(&self.to_plain(), pid, ot_id)
    }

    pub fn checksum(&self) -> u16 {
        checksum(&self.to_plain())
    }
}

pub fn validate_evs(evs: [u16; 6]) -> Result<[u8; 6], CoreError> {
    let mut out = [0u8; 6];
    for (slot, ev) in out.iter_mut().zip(evs) {
        if ev > MAX_EV {
            return Err(CoreError::invalid_argument(format!(
                "EV {ev} outside 0..={MAX_EV}"
            )));
        }
        *slot = ev as u8;
    }
    let total: u32 = evs.iter().map(|&ev| u32::from(ev)).sum();
    if total > MAX_EV_TOTAL {
        return Err(CoreError::invalid_argument(format!(
            "EV total {total} exceeds {MAX_EV_TOTAL}"
        )));
    }
    Ok(out)
}

pub fn validate_ivs(ivs: [u8; 6]) -> Result<[u8; 6], CoreError> {
    if let Some(iv) = ivs.iter().find(|&&iv| iv > MAX_IV) {
        return Err(CoreError::invalid_argument(format!(
            "IV {iv} outside 0..={MAX_IV}"
        )));
    }
    Ok(ivs)
}
