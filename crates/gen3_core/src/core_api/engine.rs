use crate::creature::{BoxCreature, Creature};
use crate::image::SaveImage;
use crate::creature::PARTY_LEN;
use crate::layout::BOX_CAPACITY;

use super::error::{CoreError, CoreErrorCode};
use super::types::{BoxEntry, CreatureView, Game, InsertOutcome, Snapshot};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

#[derive(Debug)]
pub struct Session {
    game: Game,
    snapshot: Snapshot,
    image: SaveImage,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn open_bytes<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        hint: Option<Game>,
    ) -> Result<Session, CoreError> {
        let bytes = bytes.as_ref();

        match hint {
            Some(game) => SaveImage::load(bytes, game)
                .map_err(|e| {
                    CoreError::new(
                        e.code,
                        format!("failed to load as {}: {}", game.as_str(), e.message),
                    )
                })
                .and_then(Session::from_image),
            None => {
                let fire_red = SaveImage::load(bytes, Game::FireRed);
                let radical_red = SaveImage::load(bytes, Game::RadicalRed);

                match (fire_red, radical_red) {
                    (Ok(image), Err(_)) | (Err(_), Ok(image)) => Session::from_image(image),
                    (Ok(_), Ok(_)) => Err(CoreError::new(
                        CoreErrorCode::GameDetectionAmbiguous,
                        "input validated as both FireRed and Radical Red; supply a game hint",
                    )),
                    (Err(e1), Err(e2)) => Err(CoreError::new(
                        e1.code,
                        format!(
                            "failed to load input: FireRed: {}; Radical Red: {}",
                            e1.message, e2.message
                        ),
                    )),
                }
            }
        }
    }

    /// Start from an empty image with one blank slot.
    pub fn new_image(&self, game: Game) -> Result<Session, CoreError> {
        Session::from_image(SaveImage::blank(game)?)
    }
}

impl Session {
    fn from_image(image: SaveImage) -> Result<Self, CoreError> {
        let snapshot = build_snapshot(&image)?;
        Ok(Self {
            game: image.game(),
            snapshot,
            image,
        })
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn image(&self) -> &SaveImage {
        &self.image
    }

    pub fn team(&self) -> Result<Vec<CreatureView>, CoreError> {
        let team = self.image.active_slot().team()?;
        Ok(team.members().iter().map(Creature::view).collect())
    }

    pub fn team_member(&self, slot: usize) -> Result<&Creature, CoreError> {
        self.image
            .active_slot()
            .team()?
            .get(slot)
            .ok_or_else(|| CoreError::invalid_argument(format!("team slot {slot} is empty")))
    }

    pub fn box_count(&self) -> usize {
        self.game.layout().box_count
    }

    pub fn box_name(&self, box_index: usize) -> Result<String, CoreError> {
        self.image.active_slot().pc()?.box_name(box_index)
    }

    pub fn box_creatures(&self, box_index: usize) -> Result<Vec<BoxEntry>, CoreError> {
        let occupied = self.image.active_slot().pc()?.occupied(box_index)?;
        Ok(occupied
            .into_iter()
            .map(|(slot, creature)| BoxEntry {
                box_index,
                slot,
                creature: creature.view(),
            })
            .collect())
    }

    /// Every occupied PC slot across all boxes.
    pub fn all_box_creatures(&self) -> Result<Vec<BoxEntry>, CoreError> {
        let mut out = Vec::with_capacity(BOX_CAPACITY);
        for box_index in 0..self.box_count() {
            out.extend(self.box_creatures(box_index)?);
        }
        Ok(out)
    }

    pub fn box_creature(&self, box_index: usize, slot: usize) -> Result<BoxCreature, CoreError> {
        self.image.active_slot().pc()?.get(box_index, slot)
    }

    /// A team member as a standalone 100-byte record, with the sub-structure
    /// encrypted or in canonical order.
    pub fn export_team_member(
        &self,
        slot: usize,
        encrypted: bool,
    ) -> Result<[u8; PARTY_LEN], CoreError> {
        let member = self.team_member(slot)?;
        Ok(if encrypted {
            member.to_encrypted_bytes()
        } else {
            member.to_decrypted_bytes()
        })
    }

    pub fn is_seen(&self, species: u16) -> Result<bool, CoreError> {
        Ok(self.image.active_slot().pokedex()?.is_seen(species))
    }

    pub fn is_caught(&self, species: u16) -> Result<bool, CoreError> {
        Ok(self.image.active_slot().pokedex()?.is_caught(species))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        self.image.save()
    }

    pub fn set_creature(&mut self, creature: Creature, slot: usize) -> Result<usize, CoreError> {
        let written = self
            .image
            .set_creature(creature, slot)
            .map_err(|e| context(e, "failed to set team creature"))?;
        self.refresh()?;
        Ok(written)
    }

    pub fn add_creature(&mut self, creature: Creature) -> Result<InsertOutcome, CoreError> {
        let outcome = self
            .image
            .add_creature(creature)
            .map_err(|e| context(e, "failed to add team creature"))?;
        self.refresh()?;
        Ok(outcome)
    }

    /// Append a copy of the lead creature. An empty team is an error.
    pub fn clone_first_team_member(&mut self) -> Result<InsertOutcome, CoreError> {
        let lead = self
            .image
            .active_slot()
            .team()?
            .get(0)
            .cloned()
            .ok_or_else(|| CoreError::invalid_argument("team is empty; nothing to clone"))?;
        self.add_creature(lead)
    }

    pub fn remove_creature(&mut self, slot: usize) -> Result<Creature, CoreError> {
        let removed = self
            .image
            .remove_creature(slot)
            .map_err(|e| context(e, "failed to remove team creature"))?;
        self.refresh()?;
        Ok(removed)
    }

    pub fn set_box_creature(
        &mut self,
        box_index: usize,
        slot: usize,
        creature: &BoxCreature,
    ) -> Result<(), CoreError> {
        self.image
            .set_box_creature(box_index, slot, creature)
            .map_err(|e| context(e, "failed to store box creature"))?;
        self.refresh()
    }

    /// Change the species of a stored box creature in place.
    pub fn set_box_species(
        &mut self,
        box_index: usize,
        slot: usize,
        species: u16,
    ) -> Result<(), CoreError> {
        if species == 0 {
            return Err(CoreError::invalid_argument("species 0 is the empty slot"));
        }
        let mut creature = self
            .box_creature(box_index, slot)
            .map_err(|e| context(e, "failed to read box creature"))?;
        if creature.is_empty() {
            return Err(CoreError::invalid_argument(format!(
                "box {box_index} slot {slot} is empty"
            )));
        }
        creature.set_species(species);
        self.set_box_creature(box_index, slot, &creature)
    }

    pub fn set_box_name(&mut self, box_index: usize, name: &str) -> Result<(), CoreError> {
        self.image
            .active_mut()
            .pc_mut()
            .and_then(|pc| pc.set_box_name(box_index, name))
            .map_err(|e| context(e, "failed to rename box"))?;
        self.image.commit();
        self.refresh()
    }

    pub fn set_seen(&mut self, species: u16) -> Result<(), CoreError> {
        self.image
            .set_seen(species)
            .map_err(|e| context(e, "failed to mark species seen"))?;
        self.refresh()
    }

    pub fn set_caught(&mut self, species: u16) -> Result<(), CoreError> {
        self.image
            .set_caught(species)
            .map_err(|e| context(e, "failed to mark species caught"))?;
        self.refresh()
    }

    pub fn unset_seen(&mut self, species: u16) -> Result<(), CoreError> {
        self.image
            .unset_seen(species)
            .map_err(|e| context(e, "failed to clear species seen"))?;
        self.refresh()
    }

    pub fn unset_caught(&mut self, species: u16) -> Result<(), CoreError> {
        self.image
            .unset_caught(species)
            .map_err(|e| context(e, "failed to clear species caught"))?;
        self.refresh()
    }

    pub fn set_money(&mut self, money: u32) -> Result<(), CoreError> {
        self.image
            .set_money(money)
            .map_err(|e| context(e, "failed to set money"))?;

        self.snapshot.money = money;
        Ok(())
    }

    pub fn set_coins(&mut self, coins: u16) -> Result<(), CoreError> {
        self.image
            .set_coins(coins)
            .map_err(|e| context(e, "failed to set coins"))?;

        self.snapshot.coins = coins;
        Ok(())
    }

    pub fn set_trainer_name(&mut self, name: &str) -> Result<(), CoreError> {
        self.image
            .set_trainer_name(name)
            .map_err(|e| context(e, "failed to set trainer name"))?;
        self.refresh()
    }

    fn refresh(&mut self) -> Result<(), CoreError> {
        self.snapshot = build_snapshot(&self.image)?;
        Ok(())
    }
}

fn context(err: CoreError, what: &str) -> CoreError {
    CoreError::new(err.code, format!("{what}: {}", err.message))
}

fn build_snapshot(image: &SaveImage) -> Result<Snapshot, CoreError> {
    let slot = image.active_slot();
    let trainer = slot.trainer()?;
    let wallet = slot.wallet()?;
    let pokedex = slot.pokedex()?;

    Ok(Snapshot {
        game: image.game(),
        active_slot: image.active(),
        save_index: slot.save_index(),
        trainer_name: trainer.name(),
        gender: trainer.gender(),
        public_id: trainer.public_id(),
        secret_id: trainer.secret_id(),
        play_time: trainer.play_time(),
        money: wallet.money(),
        coins: wallet.coins(),
        team_size: slot.team()?.len(),
        dex_seen: pokedex.seen_count(),
        dex_caught: pokedex.caught_count(),
        current_box: slot.pc()?.current_box(),
    })
}
