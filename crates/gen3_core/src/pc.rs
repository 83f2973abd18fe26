use crate::charset;
use crate::core_api::{CoreError, Game};
use crate::creature::BoxCreature;
use crate::layout::{BOX_CAPACITY, BOX_NAME_LEN, PC_FIRST_SECTION, PC_LAST_SECTION};
use crate::reader::{put_u32, u32_at};
use crate::record::Record;

const CURRENT_BOX_OFFSET: usize = 0;
const BOXES_OFFSET: usize = 4;

/// PC storage over the concatenated data of sections 5 through 13.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxStore {
    game: Game,
    buffer: Vec<u8>,
}

impl BoxStore {
    /// Concatenate section data, in id order 5..=13.
    pub fn gather<'a>(
        game: Game,
        sections: impl IntoIterator<Item = &'a [u8]>,
    ) -> Result<Self, CoreError> {
        let buffer: Vec<u8> = sections.into_iter().flatten().copied().collect();
        Self::from_buffer(game, buffer)
    }

    pub fn from_buffer(game: Game, buffer: Vec<u8>) -> Result<Self, CoreError> {
        let expected = game.layout().pc_buffer_len();
        if buffer.len() != expected {
            return Err(CoreError::size("PC buffer", expected, buffer.len()));
        }
        Ok(Self { game, buffer })
    }

    /// Split the buffer back along each backing section's data length.
    pub fn scatter(&self) -> Vec<(u16, &[u8])> {
        let layout = self.game.layout();
        let mut out = Vec::new();
        let mut start = 0;
        for section_id in PC_FIRST_SECTION..=PC_LAST_SECTION {
            let len = layout.section_size(section_id).unwrap_or(0);
            out.push((section_id, &self.buffer[start..start + len]));
            start += len;
        }
        out
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn box_count(&self) -> usize {
        self.game.layout().box_count
    }

    fn record_len(&self) -> usize {
        self.game.layout().box_format.len()
    }

    fn names_offset(&self) -> usize {
        BOXES_OFFSET + self.box_count() * BOX_CAPACITY * self.record_len()
    }

    fn wallpapers_offset(&self) -> usize {
        self.names_offset() + self.box_count() * BOX_NAME_LEN
    }

    fn check_box(&self, box_index: usize) -> Result<(), CoreError> {
        if box_index >= self.box_count() {
            return Err(CoreError::invalid_argument(format!(
                "box {box_index} outside 0..{}",
                self.box_count()
            )));
        }
        Ok(())
    }

    fn record_offset(&self, box_index: usize, slot: usize) -> Result<usize, CoreError> {
        self.check_box(box_index)?;
        if slot >= BOX_CAPACITY {
            return Err(CoreError::invalid_argument(format!(
                "box slot {slot} outside 0..{BOX_CAPACITY}"
            )));
        }
        let len = self.record_len();
        Ok(BOXES_OFFSET + box_index * BOX_CAPACITY * len + slot * len)
    }

    pub fn current_box(&self) -> u32 {
        u32_at(&self.buffer, CURRENT_BOX_OFFSET)
    }

    pub fn set_current_box(&mut self, box_index: usize) -> Result<(), CoreError> {
        self.check_box(box_index)?;
        put_u32(&mut self.buffer, CURRENT_BOX_OFFSET, box_index as u32);
        Ok(())
    }

    pub fn get(&self, box_index: usize, slot: usize) -> Result<BoxCreature, CoreError> {
        let start = self.record_offset(box_index, slot)?;
        BoxCreature::parse(&self.buffer[start..start + self.record_len()], self.game)
    }

    pub fn set(
        &mut self,
        box_index: usize,
        slot: usize,
        creature: &BoxCreature,
    ) -> Result<(), CoreError> {
        if creature.game() != self.game {
            return Err(CoreError::invalid_argument(format!(
                "{} box record stored in a {} PC",
                creature.game().as_str(),
                self.game.as_str()
            )));
        }
        let start = self.record_offset(box_index, slot)?;
        let len = self.record_len();
        self.buffer[start..start + len].copy_from_slice(creature.raw());
        Ok(())
    }

    pub fn clear(&mut self, box_index: usize, slot: usize) -> Result<(), CoreError> {
        self.set(box_index, slot, &BoxCreature::empty(self.game))
    }

    /// Non-empty slots of a box, in slot order.
    pub fn occupied(&self, box_index: usize) -> Result<Vec<(usize, BoxCreature)>, CoreError> {
        self.check_box(box_index)?;
        let mut out = Vec::new();
        for slot in 0..BOX_CAPACITY {
            let creature = self.get(box_index, slot)?;
            if !creature.is_empty() {
                out.push((slot, creature));
            }
        }
        Ok(out)
    }

    pub fn box_name(&self, box_index: usize) -> Result<String, CoreError> {
        self.check_box(box_index)?;
        let start = self.names_offset() + box_index * BOX_NAME_LEN;
        Ok(charset::decode(&self.buffer[start..start + BOX_NAME_LEN]))
    }

    pub fn set_box_name(&mut self, box_index: usize, name: &str) -> Result<(), CoreError> {
        self.check_box(box_index)?;
        let encoded = charset::encode_fixed::<BOX_NAME_LEN>(name)?;
        let start = self.names_offset() + box_index * BOX_NAME_LEN;
        self.buffer[start..start + BOX_NAME_LEN].copy_from_slice(&encoded);
        Ok(())
    }

    pub fn wallpaper(&self, box_index: usize) -> Result<u8, CoreError> {
        self.check_box(box_index)?;
        Ok(self.buffer[self.wallpapers_offset() + box_index])
    }

    pub fn set_wallpaper(&mut self, box_index: usize, wallpaper: u8) -> Result<(), CoreError> {
        self.check_box(box_index)?;
        let at = self.wallpapers_offset() + box_index;
        self.buffer[at] = wallpaper;
        Ok(())
    }
}
