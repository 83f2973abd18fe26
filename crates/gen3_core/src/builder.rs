use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::Catalog;
use crate::core_api::{AbilitySlot, CoreError, Game};
use crate::creature::substructure::{IvFlags, Origin, validate_evs, validate_ivs};
use crate::creature::{Creature, CreatureCore, Language, MAX_LEVEL};
use crate::gender::Gender;
use crate::pid;
use crate::stats::{NATURE_COUNT, calculate_stats};

/// Origin game code for FireRed in the misc block.
const ORIGIN_GAME_FIRE_RED: u8 = 4;
/// Pallet Town.
const MET_LOCATION: u8 = 0x58;
const STARTING_FRIENDSHIP: u8 = 20;
/// Poke Ball, stored in the origin bits on the cartridge.
const CARTRIDGE_BALL: u8 = 4;
/// Poke Ball, stored in the growth block by the hack.
const HACK_BALL: u8 = 3;
/// All four box markings.
const MARKINGS: u8 = 0x0F;
const MAX_IV: u8 = 31;

/// Builds a structurally valid team creature from resolved ids.
///
/// Every input has a default except species; [`CreatureBuilder::build`]
/// validates the whole set at once. Nature, IVs and ability are rolled at
/// build time when left unset, from [`CreatureBuilder::seed`] if given.
#[derive(Debug, Clone)]
pub struct CreatureBuilder {
    game: Game,
    species: u16,
    level: u8,
    nickname: String,
    ot_name: String,
    ot_id: u64,
    ot_gender: Gender,
    ability: Option<AbilitySlot>,
    has_second_ability: bool,
    nature: Option<u8>,
    evs: [u16; 6],
    ivs: Option<[u8; 6]>,
    seed: Option<u64>,
    shiny: bool,
    item: u16,
    base_stats: [u16; 6],
    experience: u32,
    moves: [u16; 4],
    pp: [u8; 4],
}

impl CreatureBuilder {
    pub fn new(game: Game, species: u16) -> Self {
        Self {
            game,
            species,
            level: 5,
            nickname: String::new(),
            ot_name: "ISD".to_string(),
            ot_id: 123_456_789,
            ot_gender: Gender::Male,
            ability: None,
            has_second_ability: true,
            nature: None,
            evs: [0; 6],
            ivs: None,
            seed: None,
            shiny: false,
            item: 0,
            base_stats: [0; 6],
            experience: 0,
            moves: [0; 4],
            pp: [0; 4],
        }
    }

    /// Seed species-dependent fields from the catalog: base stats, nickname,
    /// experience for the current level and the level-up moveset.
    ///
    /// Call [`CreatureBuilder::level`] first; the experience and moves
    /// follow whatever level is set at this point.
    pub fn with_catalog(mut self, catalog: &Catalog) -> Result<Self, CoreError> {
        let entry = catalog.species(self.species).ok_or_else(|| {
            CoreError::invalid_argument(format!("species {} not in catalog", self.species))
        })?;
        self.base_stats = entry.base_stats;
        self.nickname = entry.name.to_uppercase();
        self.has_second_ability = entry.abilities[1] != 0;
        self.experience = entry.growth_rate.experience_at(self.level);
        (self.moves, self.pp) = catalog.level_up_moves(self.species, self.level);
        Ok(self)
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    pub fn trainer(mut self, name: impl Into<String>, id: u64, gender: Gender) -> Self {
        self.ot_name = name.into();
        self.ot_id = id;
        self.ot_gender = gender;
        self
    }

    pub fn ability(mut self, ability: AbilitySlot) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn nature(mut self, nature: u8) -> Self {
        self.nature = Some(nature);
        self
    }

    pub fn evs(mut self, evs: [u16; 6]) -> Self {
        self.evs = evs;
        self
    }

    pub fn ivs(mut self, ivs: [u8; 6]) -> Self {
        self.ivs = Some(ivs);
        self
    }

    /// Seed the rolls for unset nature, IVs and ability.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn shiny(mut self, shiny: bool) -> Self {
        self.shiny = shiny;
        self
    }

    pub fn item(mut self, item: u16) -> Self {
        self.item = item;
        self
    }

    pub fn base_stats(mut self, base_stats: [u16; 6]) -> Self {
        self.base_stats = base_stats;
        self
    }

    pub fn experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    pub fn moves(mut self, moves: [u16; 4], pp: [u8; 4]) -> Self {
        self.moves = moves;
        self.pp = pp;
        self
    }

    pub fn build(&self) -> Result<Creature, CoreError> {
        if self.species == 0 {
            return Err(CoreError::invalid_argument("species 0 is the empty slot"));
        }
        if !(1..=MAX_LEVEL).contains(&self.level) {
            return Err(CoreError::invalid_argument(format!(
                "level {} outside 1..={MAX_LEVEL}",
                self.level
            )));
        }
        let ot_id = u32::try_from(self.ot_id).map_err(|_| {
            CoreError::invalid_argument(format!("trainer id {} exceeds 32 bits", self.ot_id))
        })?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ability = self.ability.unwrap_or_else(|| {
            if self.has_second_ability && rng.gen_bool(0.5) {
                AbilitySlot::Second
            } else {
                AbilitySlot::First
            }
        });
        let nature = self
            .nature
            .unwrap_or_else(|| rng.gen_range(0..NATURE_COUNT));
        let ivs = self
            .ivs
            .unwrap_or_else(|| std::array::from_fn(|_| rng.gen_range(0..=MAX_IV)));

        if self.game == Game::FireRed && ability == AbilitySlot::Hidden {
            return Err(CoreError::invalid_argument(
                "FireRed creatures have no hidden ability",
            ));
        }
        let evs = validate_evs(self.evs)?;
        let ivs = validate_ivs(ivs)?;
        let pid = pid::synthesize(ability, nature, ot_id, self.shiny)?;

        let mut core = CreatureCore {
            pid,
            ot_id,
            language: Language::English as u8,
            markings: MARKINGS,
            ..CreatureCore::default()
        };
        core.set_species(self.species);
        core.set_nickname(&self.nickname)?;
        core.set_ot_name(&self.ot_name)?;
        core.set_moves(self.moves, self.pp);

        let sub = &mut core.sub;
        sub.growth.item = self.item;
        sub.growth.experience = self.experience;
        sub.growth.friendship = STARTING_FRIENDSHIP;
        sub.evs.values = evs;
        sub.misc.met_location = MET_LOCATION;
        sub.misc.iv_flags = IvFlags::default()
            .with_ivs(ivs)
            .with_ability_flag(ability.ability_flag(self.game));
        let origin_ball = match self.game {
            Game::FireRed => CARTRIDGE_BALL,
            Game::RadicalRed => {
                sub.growth.ball = HACK_BALL;
                0
            }
        };
        sub.misc.origin = Origin::new(
            self.level,
            ORIGIN_GAME_FIRE_RED,
            origin_ball,
            self.ot_gender,
        );

        let stats = calculate_stats(self.base_stats, self.level, nature, ivs, evs);
        Creature::from_core(self.game, core, self.level, stats)
    }
}
