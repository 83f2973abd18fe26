mod common;

use gen3_core::core_api::{CoreErrorCode, Game, InsertOutcome, SlotLabel};
use gen3_core::creature::PARTY_LEN;
use gen3_core::image::SaveImage;
use gen3_core::record::Record;
use gen3_core::section::compute_checksum;

use common::{
    CHECKSUM_OFFSET, FRAME_LEN, SLOT_B_OFFSET, frame_offset, image_with_indices, image_with_team,
    sample_creature,
};

const TEAM_SIZE_OFFSET: usize = 0x34;
const TEAM_OFFSET: usize = 0x38;

#[test]
fn inserting_at_team_slot_one_only_touches_that_record() {
    for game in [Game::FireRed, Game::RadicalRed] {
        let mut image = image_with_team(game, 3);
        assert_eq!(image.active(), SlotLabel::B);
        let before = image.save().expect("fixture should validate");

        let replacement = sample_creature(game, 150, 70);
        let written = image
            .set_creature(replacement.clone(), 1)
            .expect("failed to replace slot 1");
        assert_eq!(written, 1);
        let after = image.save().expect("edited image should validate");

        let section1 = frame_offset(SLOT_B_OFFSET, 1);
        let record = section1 + TEAM_OFFSET + PARTY_LEN;
        let checksum = section1 + CHECKSUM_OFFSET;
        for (i, (old, new)) in before.iter().zip(&after).enumerate() {
            let in_record = (record..record + PARTY_LEN).contains(&i);
            let in_checksum = (checksum..checksum + 2).contains(&i);
            if !in_record && !in_checksum {
                assert_eq!(old, new, "{game:?}: byte {i:#x} changed");
            }
        }
        assert_eq!(&after[record..record + PARTY_LEN], replacement.raw());

        let reloaded = SaveImage::load(&after, game).expect("failed to reload");
        let team = reloaded.active_slot().team().expect("team view");
        assert_eq!(team.len(), 3);
        assert_eq!(team.get(1), Some(&replacement));
        assert_eq!(team.get(0).map(|c| c.core().species()), Some(1));
        assert_eq!(team.get(2).map(|c| c.core().species()), Some(3));
    }
}

#[test]
fn appending_to_a_one_member_team_writes_slot_one() {
    for game in [Game::FireRed, Game::RadicalRed] {
        let mut image = image_with_team(game, 1);
        assert!(image.check_valid());
        let before = image.save().expect("fixture should validate");

        let newcomer = sample_creature(game, 25, 20);
        let outcome = image.add_creature(newcomer.clone()).unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted { slot: 1 });
        assert!(image.check_valid());
        let after = image.save().expect("edited image should validate");

        let section1 = frame_offset(SLOT_B_OFFSET, 1);
        let size = section1 + TEAM_SIZE_OFFSET;
        let record = section1 + TEAM_OFFSET + PARTY_LEN;
        let checksum = section1 + CHECKSUM_OFFSET;
        for (i, (old, new)) in before.iter().zip(&after).enumerate() {
            let touched = (size..size + 4).contains(&i)
                || (record..record + PARTY_LEN).contains(&i)
                || (checksum..checksum + 2).contains(&i);
            if !touched {
                assert_eq!(old, new, "{game:?}: byte {i:#x} changed");
            }
        }
        assert_eq!(after[size], 2);
        assert_eq!(&after[record..record + PARTY_LEN], newcomer.raw());

        let reloaded = SaveImage::load(&after, game).expect("failed to reload");
        assert!(reloaded.check_valid());
        let team = reloaded.active_slot().team().unwrap();
        assert_eq!(team.len(), 2);
        assert_eq!(team.get(1), Some(&newcomer));
    }
}

#[test]
fn newer_slot_is_active_after_reload() {
    let bytes = image_with_indices(Game::FireRed, 5, 7).save().unwrap();
    let image = SaveImage::load(&bytes, Game::FireRed).unwrap();
    assert_eq!(image.active(), SlotLabel::B);
    assert_eq!(image.active_slot().save_index(), 7);

    let bytes = image_with_indices(Game::RadicalRed, 7, 5).save().unwrap();
    let image = SaveImage::load(&bytes, Game::RadicalRed).unwrap();
    assert_eq!(image.active(), SlotLabel::A);
    assert_eq!(image.active_slot().save_index(), 7);
}

#[test]
fn full_team_is_reported_not_raised() {
    let mut image = image_with_team(Game::RadicalRed, 6);
    let before = image.save().unwrap();
    let outcome = image
        .add_creature(sample_creature(Game::RadicalRed, 25, 5))
        .expect("a full team is not an error");
    assert_eq!(outcome, InsertOutcome::TeamFull);
    assert_eq!(image.save().unwrap(), before);
}

#[test]
fn removing_a_member_shifts_the_rest_down() {
    let mut image = image_with_team(Game::FireRed, 3);
    let removed = image.remove_creature(0).unwrap();
    assert_eq!(removed.core().species(), 1);

    let bytes = image.save().unwrap();
    let reloaded = SaveImage::load(&bytes, Game::FireRed).unwrap();
    let team = reloaded.active_slot().team().unwrap();
    let species: Vec<u16> = team.members().iter().map(|c| c.core().species()).collect();
    assert_eq!(species, vec![2, 3]);
}

fn corrupt_first_team_member(game: Game) -> Vec<u8> {
    let mut bytes = image_with_team(game, 1).save().unwrap();
    let section1 = frame_offset(SLOT_B_OFFSET, 1);
    bytes[section1 + TEAM_OFFSET + 0x20 + 3] ^= 0x5A;

    // Keep the section itself valid so only the creature checksum is off.
    let sum = compute_checksum(&bytes[section1..section1 + FRAME_LEN], 1, game);
    bytes[section1 + CHECKSUM_OFFSET..section1 + CHECKSUM_OFFSET + 2]
        .copy_from_slice(&sum.to_le_bytes());
    bytes
}

#[test]
fn cartridge_creature_checksum_mismatch_is_an_integrity_fault() {
    let bytes = corrupt_first_team_member(Game::FireRed);
    let err = SaveImage::load(&bytes, Game::FireRed).unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Integrity);
}

#[test]
fn hack_creature_checksum_mismatch_is_tolerated() {
    let bytes = corrupt_first_team_member(Game::RadicalRed);
    let image = SaveImage::load(&bytes, Game::RadicalRed).expect("hack load tolerates creature checksums");
    let member = image.active_slot().team().unwrap().get(0).cloned().unwrap();
    assert!(!member.check());
}

#[test]
fn section_checksum_mismatch_is_an_integrity_fault() {
    for game in [Game::FireRed, Game::RadicalRed] {
        let mut bytes = image_with_team(game, 1).save().unwrap();
        bytes[frame_offset(SLOT_B_OFFSET, 1) + TEAM_OFFSET] ^= 0x01;
        let err = SaveImage::load(&bytes, game).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Integrity, "{game:?}");
    }
}

#[test]
fn ancillary_blocks_survive_edits() {
    let mut bytes = image_with_team(Game::FireRed, 1).save().unwrap();
    bytes[0x1C000] = 0xAB;
    bytes[0x1E010] = 0xCD;
    bytes[0x1FFFF] = 0xEF;

    let mut image = SaveImage::load(&bytes, Game::FireRed).unwrap();
    image.set_money(1234).unwrap();
    let out = image.save().unwrap();
    assert_eq!(out[0x1C000], 0xAB);
    assert_eq!(out[0x1E010], 0xCD);
    assert_eq!(out[0x1FFFF], 0xEF);
    assert_eq!(&out[..0xE000], &bytes[..0xE000]);
}
