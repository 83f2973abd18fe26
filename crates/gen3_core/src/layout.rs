use crate::core_api::{CoreError, CoreErrorCode, Game};

pub const SECTION_LEN: usize = 4096;
pub const SECTION_COUNT: usize = 14;
pub const SLOT_LEN: usize = SECTION_LEN * SECTION_COUNT;

// Footer of every 4 KiB frame.
pub const SECTION_DATA_AREA_LEN: usize = 0x0FF4;
pub const SECTION_ID_OFFSET: usize = 0x0FF4;
pub const SECTION_CHECKSUM_OFFSET: usize = 0x0FF6;
pub const SECTION_SECURITY_OFFSET: usize = 0x0FF8;
pub const SECTION_SAVE_INDEX_OFFSET: usize = 0x0FFC;

pub const HALL_OF_FAME_LEN: usize = 8192;
pub const MYSTERY_GIFT_LEN: usize = 4096;
pub const RECORDED_BATTLE_LEN: usize = 4096;

pub const PC_FIRST_SECTION: u16 = 5;
pub const PC_LAST_SECTION: u16 = 13;
pub const BOX_CAPACITY: usize = 30;
pub const BOX_NAME_LEN: usize = 9;

pub const TEAM_CAPACITY: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn at(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Where a pokedex bitmap copy lives inside a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DexLocation {
    pub section_id: u16,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxRecordFormat {
    /// First 80 bytes of a party record, sub-data encrypted.
    Encrypted80,
    /// Unencrypted 58-byte record with 10-bit packed moves.
    Compact58,
}

impl BoxRecordFormat {
    pub const fn len(self) -> usize {
        match self {
            Self::Encrypted80 => 80,
            Self::Compact58 => 58,
        }
    }
}

/// Every per-variant constant the codec needs. One immutable instance per game.
#[derive(Debug)]
pub struct VariantLayout {
    pub section_sizes: [usize; SECTION_COUNT],
    pub security_magic: Option<u32>,
    pub image_len: usize,
    pub party_sub_data_encrypted: bool,
    pub dex_len: usize,
    pub dex_seen: &'static [DexLocation],
    pub dex_caught: &'static [DexLocation],
    pub box_count: usize,
    pub box_format: BoxRecordFormat,
}

pub const IMAGE_LEN: usize = 0x20000;

pub static FIRE_RED_LAYOUT: VariantLayout = VariantLayout {
    section_sizes: [
        3884, 3968, 3968, 3968, 3848, 3968, 3968, 3968, 3968, 3968, 3968, 3968, 3968, 2000,
    ],
    security_magic: None,
    image_len: IMAGE_LEN,
    party_sub_data_encrypted: true,
    dex_len: 49,
    dex_seen: &[
        DexLocation {
            section_id: 0,
            offset: 0x005C,
        },
        DexLocation {
            section_id: 1,
            offset: 0x05F8,
        },
        DexLocation {
            section_id: 4,
            offset: 0x0B98,
        },
    ],
    dex_caught: &[DexLocation {
        section_id: 0,
        offset: 0x0028,
    }],
    box_count: 14,
    box_format: BoxRecordFormat::Encrypted80,
};

pub static RADICAL_RED_LAYOUT: VariantLayout = VariantLayout {
    section_sizes: [
        0xF24, 0xFF0, 0xFF0, 0xFF0, 0xD98, 0xFF0, 0xFF0, 0xFF0, 0xFF0, 0xFF0, 0xFF0, 0xFF0,
        0xFF0, 0x450,
    ],
    security_magic: Some(0x0801_2025),
    image_len: IMAGE_LEN,
    party_sub_data_encrypted: false,
    dex_len: 125,
    dex_seen: &[DexLocation {
        section_id: 1,
        offset: 0x0310,
    }],
    dex_caught: &[DexLocation {
        section_id: 1,
        offset: 0x038D,
    }],
    box_count: 18,
    box_format: BoxRecordFormat::Compact58,
};

impl VariantLayout {
    pub fn section_size(&self, section_id: u16) -> Option<usize> {
        self.section_sizes.get(section_id as usize).copied()
    }

    /// Bytes of PC storage spread across sections 5..=13.
    pub fn pc_buffer_len(&self) -> usize {
        (PC_FIRST_SECTION..=PC_LAST_SECTION)
            .map(|id| self.section_sizes[id as usize])
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockId {
    SlotA,
    SlotB,
    HallOfFame,
    MysteryGift,
    RecordedBattle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub id: BlockId,
    pub range: ByteRange,
}

/// Fixed placement of the top-level blocks inside a save image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLayout {
    pub file_len: usize,
    pub blocks: Vec<BlockLayout>,
}

impl BlockId {
    pub const ALL: [BlockId; 5] = [
        Self::SlotA,
        Self::SlotB,
        Self::HallOfFame,
        Self::MysteryGift,
        Self::RecordedBattle,
    ];

    /// Placement inside the image, shared by both variants.
    pub const fn range(self) -> ByteRange {
        match self {
            Self::SlotA => ByteRange::at(0x0000_0000, SLOT_LEN),
            Self::SlotB => ByteRange::at(0x0000_E000, SLOT_LEN),
            Self::HallOfFame => ByteRange::at(0x0001_C000, HALL_OF_FAME_LEN),
            Self::MysteryGift => ByteRange::at(0x0001_E000, MYSTERY_GIFT_LEN),
            Self::RecordedBattle => ByteRange::at(0x0001_F000, RECORDED_BATTLE_LEN),
        }
    }
}

impl ImageLayout {
    pub fn for_game(game: Game) -> Self {
        let blocks = BlockId::ALL
            .iter()
            .map(|&id| BlockLayout {
                id,
                range: id.range(),
            })
            .collect();
        Self {
            file_len: game.layout().image_len,
            blocks,
        }
    }

    pub fn range(&self, id: BlockId) -> ByteRange {
        id.range()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let Some(first) = self.blocks.first() else {
            return Err(CoreError::new(
                CoreErrorCode::Size,
                "image layout must contain at least one block",
            ));
        };

        if first.range.start != 0 {
            return Err(CoreError::new(
                CoreErrorCode::Size,
                "layout does not start at byte 0",
            ));
        }

        let mut expected = 0usize;
        for block in &self.blocks {
            if block.range.start != expected {
                return Err(CoreError::new(
                    CoreErrorCode::Size,
                    format!(
                        "layout gap/overlap around block {:?}: expected start {}, got {}",
                        block.id, expected, block.range.start
                    ),
                ));
            }
            expected = block.range.end;
        }

        if expected != self.file_len {
            return Err(CoreError::new(
                CoreErrorCode::Size,
                format!(
                    "layout does not cover image: ended at {}, image length {}",
                    expected, self.file_len
                ),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pc_buffer_is_the_same_size_for_both_variants() {
        assert_eq!(FIRE_RED_LAYOUT.pc_buffer_len(), 33_744);
        assert_eq!(RADICAL_RED_LAYOUT.pc_buffer_len(), 33_744);
    }

    #[test]
    fn image_layout_tiles_the_whole_file() {
        ImageLayout::for_game(Game::FireRed)
            .validate()
            .expect("FireRed layout should tile the image");
        ImageLayout::for_game(Game::RadicalRed)
            .validate()
            .expect("Radical Red layout should tile the image");
    }

    #[test]
    fn section_sizes_fit_the_frame_data_area() {
        for layout in [&FIRE_RED_LAYOUT, &RADICAL_RED_LAYOUT] {
            for size in layout.section_sizes {
                assert!(size <= SECTION_DATA_AREA_LEN);
                assert_eq!(size % 4, 0);
            }
        }
    }

    #[test]
    fn pc_tables_fit_inside_the_buffer() {
        for layout in [&FIRE_RED_LAYOUT, &RADICAL_RED_LAYOUT] {
            let boxes = 4 + layout.box_count * BOX_CAPACITY * layout.box_format.len();
            let tables = layout.box_count * (BOX_NAME_LEN + 1);
            assert!(boxes + tables <= layout.pc_buffer_len());
        }
    }

    #[test]
    fn every_block_has_a_non_empty_range() {
        let layout = ImageLayout::for_game(Game::RadicalRed);
        assert_eq!(layout.blocks.len(), BlockId::ALL.len());
        for block in &layout.blocks {
            assert!(!block.range.is_empty(), "{:?}", block.id);
            assert_eq!(layout.range(block.id), block.range);
        }
        assert_eq!(layout.range(BlockId::SlotB).start, 0xE000);
        assert_eq!(layout.range(BlockId::RecordedBattle).end, IMAGE_LEN);
    }
}
