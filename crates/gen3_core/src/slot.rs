use tracing::debug;

use crate::core_api::{CoreError, CoreErrorCode, Game, InsertOutcome};
use crate::creature::{BoxCreature, Creature};
use crate::layout::{
    DexLocation, PC_FIRST_SECTION, PC_LAST_SECTION, SECTION_COUNT, SECTION_LEN, SLOT_LEN,
};
use crate::pc::BoxStore;
use crate::pokedex::Pokedex;
use crate::section::Section;
use crate::team::Team;
use crate::trainer::{TrainerInfo, Wallet};

/// Decoded views over a used slot's sections.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SlotViews {
    trainer: TrainerInfo,
    wallet: Wallet,
    team: Team,
    pokedex: Pokedex,
    pc: BoxStore,
}

/// One of the two redundant 14-section copies of the game state.
///
/// Views are edited in memory; `commit` writes them back into the sections
/// and re-checks the result. Every mutating helper here commits on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSlot {
    game: Game,
    sections: Vec<Section>,
    views: Option<SlotViews>,
}

impl SaveSlot {
    pub fn parse(bytes: &[u8], game: Game) -> Result<Self, CoreError> {
        if bytes.len() != SLOT_LEN {
            return Err(CoreError::size("save slot", SLOT_LEN, bytes.len()));
        }

        let sections = bytes
            .chunks_exact(SECTION_LEN)
            .map(|frame| Section::parse(frame, game))
            .collect::<Result<Vec<_>, _>>()?;

        let mut slot = Self {
            game,
            sections,
            views: None,
        };
        if slot.is_used() {
            slot.views = Some(slot.decode_views()?);
        } else {
            debug!(game = game.as_str(), "slot has no complete section set");
        }
        Ok(slot)
    }

    /// A structurally valid, zero-filled slot with sections in id order.
    pub fn blank(game: Game, save_index: u32) -> Result<Self, CoreError> {
        let sections = (0..SECTION_COUNT as u16)
            .map(|id| Section::assemble(game, id, save_index, &[]))
            .collect::<Result<Vec<_>, _>>()?;

        let mut slot = Self {
            game,
            sections,
            views: None,
        };
        slot.views = Some(slot.decode_views()?);
        Ok(slot)
    }

    pub fn game(&self) -> Game {
        self.game
    }

    /// Used iff every id 0..14 appears exactly once.
    pub fn is_used(&self) -> bool {
        let mut counts = [0usize; SECTION_COUNT];
        for section in &self.sections {
            if let Some(count) = counts.get_mut(section.section_id() as usize) {
                *count += 1;
            }
        }
        counts.iter().all(|&count| count == 1)
    }

    pub fn check_valid(&self) -> bool {
        !self.is_used() || self.sections.iter().all(Section::validate)
    }

    /// The save counter of section 0; zero for an unused slot.
    pub fn save_index(&self) -> u32 {
        self.section(0).map(Section::save_index).unwrap_or(0)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, section_id: u16) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.section_id() == section_id)
    }

    fn section_mut(&mut self, section_id: u16) -> Result<&mut Section, CoreError> {
        self.sections
            .iter_mut()
            .find(|section| section.section_id() == section_id)
            .ok_or_else(|| CoreError::integrity(format!("section {section_id} missing")))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SLOT_LEN);
        for section in &self.sections {
            out.extend_from_slice(&section.to_bytes());
        }
        out
    }

    fn views(&self) -> Result<&SlotViews, CoreError> {
        self.views.as_ref().ok_or_else(unused_slot)
    }

    fn views_mut(&mut self) -> Result<&mut SlotViews, CoreError> {
        self.views.as_mut().ok_or_else(unused_slot)
    }

    pub fn trainer(&self) -> Result<&TrainerInfo, CoreError> {
        Ok(&self.views()?.trainer)
    }

    pub fn trainer_mut(&mut self) -> Result<&mut TrainerInfo, CoreError> {
        Ok(&mut self.views_mut()?.trainer)
    }

    pub fn wallet(&self) -> Result<&Wallet, CoreError> {
        Ok(&self.views()?.wallet)
    }

    pub fn wallet_mut(&mut self) -> Result<&mut Wallet, CoreError> {
        Ok(&mut self.views_mut()?.wallet)
    }

    pub fn team(&self) -> Result<&Team, CoreError> {
        Ok(&self.views()?.team)
    }

    pub fn team_mut(&mut self) -> Result<&mut Team, CoreError> {
        Ok(&mut self.views_mut()?.team)
    }

    pub fn pokedex(&self) -> Result<&Pokedex, CoreError> {
        Ok(&self.views()?.pokedex)
    }

    pub fn pokedex_mut(&mut self) -> Result<&mut Pokedex, CoreError> {
        Ok(&mut self.views_mut()?.pokedex)
    }

    pub fn pc(&self) -> Result<&BoxStore, CoreError> {
        Ok(&self.views()?.pc)
    }

    pub fn pc_mut(&mut self) -> Result<&mut BoxStore, CoreError> {
        Ok(&mut self.views_mut()?.pc)
    }

    /// Write every view back into its sections, refresh touched footers,
    /// re-decode, and require the slot to validate.
    ///
    /// # Panics
    ///
    /// Panics if the written sections fail to re-decode or validate; that
    /// means the codec produced malformed bytes.
    pub fn commit(&mut self) {
        let Some(views) = self.views.clone() else {
            return;
        };

        if let Err(err) = self.write_views(&views) {
            panic!("slot write-back failed: {err}");
        }
        match self.decode_views() {
            Ok(decoded) => self.views = Some(decoded),
            Err(err) => panic!("slot re-decode failed after commit: {err}"),
        }
        assert!(self.check_valid(), "slot failed validation after commit");
        debug!(
            game = self.game.as_str(),
            save_index = self.save_index(),
            "slot committed"
        );
    }

    pub fn set_creature(&mut self, creature: Creature, slot: usize) -> Result<usize, CoreError> {
        let written = self.team_mut()?.set(slot, creature)?;
        self.commit();
        Ok(written)
    }

    pub fn add_creature(&mut self, creature: Creature) -> Result<InsertOutcome, CoreError> {
        let outcome = self.team_mut()?.add(creature)?;
        if outcome.is_inserted() {
            self.commit();
        } else {
            debug!("team full, creature not inserted");
        }
        Ok(outcome)
    }

    /// Remove a member and shift the rest down; the vacated record is zeroed.
    pub fn remove_creature(&mut self, slot: usize) -> Result<Creature, CoreError> {
        let team = self.team_mut()?;
        let vacated = team.len().saturating_sub(1);
        let removed = team.remove(slot)?;

        let section = self.section_mut(1)?;
        let mut data = section.data().to_vec();
        Team::clear_record(&mut data, vacated);
        section.set_data(&data)?;

        self.commit();
        Ok(removed)
    }

    pub fn box_creature(&self, box_index: usize, slot: usize) -> Result<BoxCreature, CoreError> {
        self.pc()?.get(box_index, slot)
    }

    pub fn set_box_creature(
        &mut self,
        box_index: usize,
        slot: usize,
        creature: &BoxCreature,
    ) -> Result<(), CoreError> {
        self.pc_mut()?.set(box_index, slot, creature)?;
        self.commit();
        Ok(())
    }

    /// Copy the pokedex bitmaps into every variant-specific location.
    pub fn sync_pokedex(&mut self) -> Result<(), CoreError> {
        self.views()?;
        self.commit();
        Ok(())
    }

    pub fn set_money(&mut self, money: u32) -> Result<(), CoreError> {
        self.wallet_mut()?.set_money(money)?;
        self.commit();
        Ok(())
    }

    pub fn set_coins(&mut self, coins: u16) -> Result<(), CoreError> {
        self.wallet_mut()?.set_coins(coins)?;
        self.commit();
        Ok(())
    }

    pub fn set_trainer_name(&mut self, name: &str) -> Result<(), CoreError> {
        self.trainer_mut()?.set_name(name)?;
        self.commit();
        Ok(())
    }

    fn section_data(&self, section_id: u16) -> Result<&[u8], CoreError> {
        self.section(section_id)
            .map(Section::data)
            .ok_or_else(|| CoreError::integrity(format!("section {section_id} missing")))
    }

    fn decode_views(&self) -> Result<SlotViews, CoreError> {
        let trainer = TrainerInfo::parse(self.section_data(0)?)?;
        let wallet = Wallet::parse(self.section_data(1)?, trainer.security_key())?;
        let team = Team::parse(self.section_data(1)?, self.game)?;
        let pokedex = Pokedex::read(self.game.layout(), |id| {
            self.section(id).map(Section::data)
        })?;
        let pc_parts = (PC_FIRST_SECTION..=PC_LAST_SECTION)
            .map(|id| self.section_data(id))
            .collect::<Result<Vec<_>, _>>()?;
        let pc = BoxStore::gather(self.game, pc_parts)?;

        Ok(SlotViews {
            trainer,
            wallet,
            team,
            pokedex,
            pc,
        })
    }

    fn write_views(&mut self, views: &SlotViews) -> Result<(), CoreError> {
        let key = views.trainer.security_key();
        self.edit_section(0, |data| views.trainer.write(data))?;
        self.edit_section(1, |data| {
            views.wallet.write(data, key);
            views.team.write(data);
        })?;

        let layout = self.game.layout();
        write_bitmap(self, layout.dex_seen, views.pokedex.seen_bytes())?;
        write_bitmap(self, layout.dex_caught, views.pokedex.caught_bytes())?;

        for (section_id, part) in views.pc.scatter() {
            self.edit_section(section_id, |data| data.copy_from_slice(part))?;
        }
        Ok(())
    }

    /// Apply `edit` to a copy of a section's data; only changed sections are rewritten.
    fn edit_section(
        &mut self,
        section_id: u16,
        edit: impl FnOnce(&mut [u8]),
    ) -> Result<(), CoreError> {
        let section = self.section_mut(section_id)?;
        let mut data = section.data().to_vec();
        edit(&mut data);
        if data != section.data() {
            section.set_data(&data)?;
        }
        Ok(())
    }
}

fn write_bitmap(
    slot: &mut SaveSlot,
    locations: &[DexLocation],
    bitmap: &[u8],
) -> Result<(), CoreError> {
    for location in locations {
        slot.edit_section(location.section_id, |data| {
            data[location.offset..location.offset + bitmap.len()].copy_from_slice(bitmap);
        })?;
    }
    Ok(())
}

fn unused_slot() -> CoreError {
    CoreError::new(CoreErrorCode::UnsupportedOperation, "slot holds no save data")
}
