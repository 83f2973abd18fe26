#![allow(dead_code)]

use gen3_core::builder::CreatureBuilder;
use gen3_core::core_api::{AbilitySlot, Game};
use gen3_core::creature::Creature;
use gen3_core::gender::Gender;
use gen3_core::image::SaveImage;
use gen3_core::slot::SaveSlot;

pub const SLOT_B_OFFSET: usize = 0xE000;
pub const FRAME_LEN: usize = 0x1000;
pub const CHECKSUM_OFFSET: usize = 0xFF6;

/// Two blank used slots carrying the given save indices.
pub fn image_with_indices(game: Game, a: u32, b: u32) -> SaveImage {
    let slot_a = SaveSlot::blank(game, a).expect("failed to build slot A");
    let slot_b = SaveSlot::blank(game, b).expect("failed to build slot B");
    SaveImage::from_slots(game, slot_a, slot_b).expect("failed to assemble image")
}

pub fn blank_image_bytes(game: Game) -> Vec<u8> {
    SaveImage::blank(game)
        .expect("failed to build blank image")
        .save()
        .expect("blank image should validate")
}

/// A level-`level` creature with fixed stats and moves, owned by trainer RED.
pub fn sample_creature(game: Game, species: u16, level: u8) -> Creature {
    CreatureBuilder::new(game, species)
        .level(level)
        .nickname(format!("MON{species}"))
        .trainer("RED", 0x0001_3039, Gender::Male)
        .ability(AbilitySlot::Second)
        .nature(13)
        .ivs([31, 20, 15, 31, 10, 0])
        .evs([4, 252, 0, 252, 0, 0])
        .base_stats([80, 82, 83, 80, 100, 100])
        .moves([33, 45, 0, 0], [35, 40, 0, 0])
        .build()
        .expect("sample creature should build")
}

/// A session-ready image whose active slot holds `team_size` creatures.
pub fn image_with_team(game: Game, team_size: usize) -> SaveImage {
    let mut image = image_with_indices(game, 1, 2);
    for i in 0..team_size {
        image
            .add_creature(sample_creature(game, 1 + i as u16, 10 + i as u8))
            .expect("failed to add fixture creature");
    }
    image
}

/// Byte offset of a physical frame within the image.
pub fn frame_offset(slot_base: usize, frame: usize) -> usize {
    slot_base + frame * FRAME_LEN
}
