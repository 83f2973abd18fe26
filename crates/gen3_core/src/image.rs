use tracing::debug;

use crate::core_api::{CoreError, Game, InsertOutcome, SlotLabel};
use crate::creature::{BoxCreature, Creature};
use crate::layout::{BlockId, ImageLayout, SLOT_LEN};
use crate::pokedex::Pokedex;
use crate::slot::SaveSlot;

/// A whole save image: two slots plus the Hall of Fame, Mystery Gift and
/// Recorded Battle blocks, which are carried through untouched.
///
/// Mutators apply to the active slot only and rebuild the image bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveImage {
    game: Game,
    layout: ImageLayout,
    slot_a: SaveSlot,
    slot_b: SaveSlot,
    hall_of_fame: Vec<u8>,
    mystery_gift: Vec<u8>,
    recorded_battle: Vec<u8>,
    bytes: Vec<u8>,
}

impl SaveImage {
    pub fn load(bytes: &[u8], game: Game) -> Result<Self, CoreError> {
        let layout = ImageLayout::for_game(game);
        layout.validate()?;
        if bytes.len() != layout.file_len {
            return Err(CoreError::size("save image", layout.file_len, bytes.len()));
        }

        let block = |id: BlockId| {
            let range = layout.range(id);
            &bytes[range.start..range.end]
        };
        let slot_a = SaveSlot::parse(block(BlockId::SlotA), game)?;
        let slot_b = SaveSlot::parse(block(BlockId::SlotB), game)?;

        for (label, slot) in [(SlotLabel::A, &slot_a), (SlotLabel::B, &slot_b)] {
            if !slot.check_valid() {
                return Err(CoreError::integrity(format!(
                    "slot {label:?} failed checksum or security validation"
                )));
            }
        }
        if !slot_a.is_used() && !slot_b.is_used() {
            return Err(CoreError::integrity("image holds no used save slot"));
        }

        let image = Self {
            game,
            hall_of_fame: block(BlockId::HallOfFame).to_vec(),
            mystery_gift: block(BlockId::MysteryGift).to_vec(),
            recorded_battle: block(BlockId::RecordedBattle).to_vec(),
            slot_a,
            slot_b,
            bytes: bytes.to_vec(),
            layout,
        };
        debug!(
            game = game.as_str(),
            active = ?image.active(),
            save_index = image.active_slot().save_index(),
            "image loaded"
        );
        Ok(image)
    }

    /// Assemble an image from two slots with empty ancillary blocks.
    pub fn from_slots(game: Game, slot_a: SaveSlot, slot_b: SaveSlot) -> Result<Self, CoreError> {
        if slot_a.game() != game || slot_b.game() != game {
            return Err(CoreError::invalid_argument(format!(
                "slots do not both belong to {}",
                game.as_str()
            )));
        }

        let layout = ImageLayout::for_game(game);
        layout.validate()?;
        let ancillary = |id: BlockId| vec![0u8; layout.range(id).len()];

        let mut image = Self {
            game,
            hall_of_fame: ancillary(BlockId::HallOfFame),
            mystery_gift: ancillary(BlockId::MysteryGift),
            recorded_battle: ancillary(BlockId::RecordedBattle),
            slot_a,
            slot_b,
            bytes: Vec::new(),
            layout,
        };
        image.rebuild();
        Ok(image)
    }

    /// A fresh image: one blank used slot in A, an erased slot in B.
    pub fn blank(game: Game) -> Result<Self, CoreError> {
        let erased = SaveSlot::parse(&vec![0xFF; SLOT_LEN], game)?;
        Self::from_slots(game, SaveSlot::blank(game, 1)?, erased)
    }

    pub fn game(&self) -> Game {
        self.game
    }

    /// A unused => B; B unused => A; else the higher save index, ties to B.
    pub fn active(&self) -> SlotLabel {
        if !self.slot_a.is_used() {
            return SlotLabel::B;
        }
        if !self.slot_b.is_used() {
            return SlotLabel::A;
        }

        let (a, b) = (self.slot_a.save_index(), self.slot_b.save_index());
        if a == b {
            debug!(save_index = a, "slots share a save index, using B");
        }
        if a > b { SlotLabel::A } else { SlotLabel::B }
    }

    pub fn slot(&self, label: SlotLabel) -> &SaveSlot {
        match label {
            SlotLabel::A => &self.slot_a,
            SlotLabel::B => &self.slot_b,
        }
    }

    pub fn active_slot(&self) -> &SaveSlot {
        self.slot(self.active())
    }

    /// Direct access for view edits; follow with [`SaveImage::commit`].
    pub fn active_mut(&mut self) -> &mut SaveSlot {
        match self.active() {
            SlotLabel::A => &mut self.slot_a,
            SlotLabel::B => &mut self.slot_b,
        }
    }

    pub fn hall_of_fame(&self) -> &[u8] {
        &self.hall_of_fame
    }

    pub fn mystery_gift(&self) -> &[u8] {
        &self.mystery_gift
    }

    pub fn recorded_battle(&self) -> &[u8] {
        &self.recorded_battle
    }

    pub fn check_valid(&self) -> bool {
        self.slot_a.check_valid()
            && self.slot_b.check_valid()
            && self.bytes.len() == self.layout.file_len
    }

    /// Commit the active slot's views and rebuild the image.
    ///
    /// # Panics
    ///
    /// Panics when the rebuilt image no longer validates.
    pub fn commit(&mut self) {
        self.active_mut().commit();
        self.finish();
    }

    pub fn set_creature(&mut self, creature: Creature, slot: usize) -> Result<usize, CoreError> {
        let written = self.active_mut().set_creature(creature, slot)?;
        self.finish();
        Ok(written)
    }

    pub fn add_creature(&mut self, creature: Creature) -> Result<InsertOutcome, CoreError> {
        let outcome = self.active_mut().add_creature(creature)?;
        self.finish();
        Ok(outcome)
    }

    pub fn remove_creature(&mut self, slot: usize) -> Result<Creature, CoreError> {
        let removed = self.active_mut().remove_creature(slot)?;
        self.finish();
        Ok(removed)
    }

    pub fn set_box_creature(
        &mut self,
        box_index: usize,
        slot: usize,
        creature: &BoxCreature,
    ) -> Result<(), CoreError> {
        self.active_mut().set_box_creature(box_index, slot, creature)?;
        self.finish();
        Ok(())
    }

    pub fn set_seen(&mut self, species: u16) -> Result<(), CoreError> {
        self.edit_pokedex(|dex| dex.set_seen(species))
    }

    pub fn set_caught(&mut self, species: u16) -> Result<(), CoreError> {
        self.edit_pokedex(|dex| dex.set_caught(species))
    }

    pub fn unset_seen(&mut self, species: u16) -> Result<(), CoreError> {
        self.edit_pokedex(|dex| dex.unset_seen(species))
    }

    pub fn unset_caught(&mut self, species: u16) -> Result<(), CoreError> {
        self.edit_pokedex(|dex| dex.unset_caught(species))
    }

    pub fn set_money(&mut self, money: u32) -> Result<(), CoreError> {
        self.active_mut().set_money(money)?;
        self.finish();
        Ok(())
    }

    pub fn set_coins(&mut self, coins: u16) -> Result<(), CoreError> {
        self.active_mut().set_coins(coins)?;
        self.finish();
        Ok(())
    }

    pub fn set_trainer_name(&mut self, name: &str) -> Result<(), CoreError> {
        self.active_mut().set_trainer_name(name)?;
        self.finish();
        Ok(())
    }

    /// The image bytes, refused unless both slots validate.
    pub fn save(&self) -> Result<Vec<u8>, CoreError> {
        if !self.check_valid() {
            return Err(CoreError::integrity("refusing to save an invalid image"));
        }
        Ok(self.bytes.clone())
    }

    pub fn to_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn edit_pokedex(
        &mut self,
        edit: impl FnOnce(&mut Pokedex) -> Result<(), CoreError>,
    ) -> Result<(), CoreError> {
        let slot = self.active_mut();
        edit(slot.pokedex_mut()?)?;
        slot.sync_pokedex()?;
        self.finish();
        Ok(())
    }

    fn finish(&mut self) {
        self.rebuild();
        assert!(self.check_valid(), "image failed validation after mutation");
    }

    fn rebuild(&mut self) {
        let mut bytes = vec![0u8; self.layout.file_len];
        let blocks = [
            (BlockId::SlotA, self.slot_a.to_bytes()),
            (BlockId::SlotB, self.slot_b.to_bytes()),
            (BlockId::HallOfFame, self.hall_of_fame.clone()),
            (BlockId::MysteryGift, self.mystery_gift.clone()),
            (BlockId::RecordedBattle, self.recorded_battle.clone()),
        ];
        for (id, block) in blocks {
            let range = self.layout.range(id);
            bytes[range.start..range.end].copy_from_slice(&block);
        }
        self.bytes = bytes;
    }
}
