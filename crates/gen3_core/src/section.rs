use std::io::Cursor;

use tracing::trace;

use crate::core_api::{CoreError, Game};
use crate::layout::{
    SECTION_CHECKSUM_OFFSET, SECTION_COUNT, SECTION_DATA_AREA_LEN, SECTION_ID_OFFSET,
    SECTION_LEN, SECTION_SAVE_INDEX_OFFSET, SECTION_SECURITY_OFFSET,
};
use crate::reader::{LittleEndianReader, put_u16, put_u32};

/// Checksum returned for ids outside the section table.
pub const INVALID_ID_CHECKSUM: u16 = 0xFFFF;

/// One 4 KiB frame of a save slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    game: Game,
    data: Vec<u8>,
    section_id: u16,
    checksum: u16,
    security: u32,
    save_index: u32,
}

/// Sum the little-endian words of `data[..size(section_id)]` and fold to 16 bits.
pub fn compute_checksum(data: &[u8], section_id: u16, game: Game) -> u16 {
    let Some(size) = game.layout().section_size(section_id) else {
        return INVALID_ID_CHECKSUM;
    };

    let sum = data[..size.min(data.len())]
        .chunks_exact(4)
        .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .fold(0u32, u32::wrapping_add);

    ((sum >> 16).wrapping_add(sum) & 0xFFFF) as u16
}

impl Section {
    pub fn parse(frame: &[u8], game: Game) -> Result<Self, CoreError> {
        if frame.len() != SECTION_LEN {
            return Err(CoreError::size("section", SECTION_LEN, frame.len()));
        }

        let mut r = LittleEndianReader::new(Cursor::new(frame));
        let data = r.read_bytes(SECTION_DATA_AREA_LEN)?;
        let section_id = r.read_u16()?;
        let checksum = r.read_u16()?;
        let security = r.read_u32()?;
        let save_index = r.read_u32()?;

        Ok(Self {
            game,
            data,
            section_id,
            checksum,
            security,
            save_index,
        })
    }

    /// Build a fresh frame; checksum and security are derived, never supplied.
    pub fn assemble(
        game: Game,
        section_id: u16,
        save_index: u32,
        data: &[u8],
    ) -> Result<Self, CoreError> {
        if section_id as usize >= SECTION_COUNT {
            return Err(CoreError::invalid_argument(format!(
                "section id {section_id} outside 0..{SECTION_COUNT}"
            )));
        }
        if data.len() > SECTION_DATA_AREA_LEN {
            return Err(CoreError::size(
                "section data",
                SECTION_DATA_AREA_LEN,
                data.len(),
            ));
        }

        let mut area = vec![0u8; SECTION_DATA_AREA_LEN];
        area[..data.len()].copy_from_slice(data);

        let mut section = Self {
            game,
            data: area,
            section_id,
            checksum: 0,
            security: 0,
            save_index,
        };
        section.refresh();
        Ok(section)
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn section_id(&self) -> u16 {
        self.section_id
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    pub fn security(&self) -> u32 {
        self.security
    }

    pub fn save_index(&self) -> u32 {
        self.save_index
    }

    /// Frames with an id outside 0..14 belong to a slot that was never written.
    pub fn is_used(&self) -> bool {
        (self.section_id as usize) < SECTION_COUNT
    }

    /// Checksummed length of this frame's data.
    pub fn data_len(&self) -> usize {
        self.game
            .layout()
            .section_size(self.section_id)
            .unwrap_or(SECTION_DATA_AREA_LEN)
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.data_len()]
    }

    pub fn expected_checksum(&self) -> u16 {
        compute_checksum(&self.data, self.section_id, self.game)
    }

    /// Replace the leading bytes of the data area.
    pub fn set_data(&mut self, data: &[u8]) -> Result<(), CoreError> {
        self.patch(0, data)
    }

    /// Overwrite `bytes` at `offset` within the checksummed data.
    pub fn patch(&mut self, offset: usize, bytes: &[u8]) -> Result<(), CoreError> {
        let len = self.data_len();
        if offset + bytes.len() > len {
            return Err(CoreError::size(
                &format!("section {} patch end", self.section_id),
                len,
                offset + bytes.len(),
            ));
        }
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.refresh();
        Ok(())
    }

    pub fn set_save_index(&mut self, save_index: u32) {
        self.save_index = save_index;
        self.refresh();
    }

    pub fn validate(&self) -> bool {
        if !self.is_used() {
            return true;
        }
        if self.checksum != self.expected_checksum() {
            return false;
        }
        match self.game.layout().security_magic {
            Some(magic) => self.security == magic,
            None => true,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; SECTION_LEN];
        out[..SECTION_DATA_AREA_LEN].copy_from_slice(&self.data);
        put_u16(&mut out, SECTION_ID_OFFSET, self.section_id);
        put_u16(&mut out, SECTION_CHECKSUM_OFFSET, self.checksum);
        put_u32(&mut out, SECTION_SECURITY_OFFSET, self.security);
        put_u32(&mut out, SECTION_SAVE_INDEX_OFFSET, self.save_index);
        out
    }

    fn refresh(&mut self) {
        self.checksum = self.expected_checksum();
        if let Some(magic) = self.game.layout().security_magic {
            self.security = magic;
        }
        trace!(
            section_id = self.section_id,
            checksum = self.checksum,
            "section footer refreshed"
        );
    }
}
