use crate::core_api::{CoreError, Game, InsertOutcome};
use crate::creature::{Creature, PARTY_LEN};
use crate::layout::TEAM_CAPACITY;
use crate::reader::{put_u32, u32_at};
use crate::record::Record;

const TEAM_SIZE_OFFSET: usize = 0x34;
const TEAM_OFFSET: usize = 0x38;

/// Team members stored in section 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    game: Game,
    members: Vec<Creature>,
}

impl Team {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            members: Vec::new(),
        }
    }

    pub fn parse(section1: &[u8], game: Game) -> Result<Self, CoreError> {
        let end = TEAM_OFFSET + TEAM_CAPACITY * PARTY_LEN;
        if section1.len() < end {
            return Err(CoreError::size("team section", end, section1.len()));
        }

        let size = u32_at(section1, TEAM_SIZE_OFFSET) as usize;
        if size > TEAM_CAPACITY {
            return Err(CoreError::integrity(format!(
                "team size {size} exceeds {TEAM_CAPACITY}"
            )));
        }

        let members = (0..size)
            .map(|i| Creature::parse(&section1[record_range(i)], game))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { game, members })
    }

    /// Write the size and every member record. Records past the size are left alone.
    pub fn write(&self, section1: &mut [u8]) {
        put_u32(section1, TEAM_SIZE_OFFSET, self.members.len() as u32);
        for (i, member) in self.members.iter().enumerate() {
            section1[record_range(i)].copy_from_slice(member.raw());
        }
    }

    pub fn clear_record(section1: &mut [u8], index: usize) {
        section1[record_range(index)].fill(0);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= TEAM_CAPACITY
    }

    pub fn members(&self) -> &[Creature] {
        &self.members
    }

    pub fn get(&self, slot: usize) -> Option<&Creature> {
        self.members.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Creature> {
        self.members.get_mut(slot)
    }

    /// Overwrite `slot`, or append when `slot` is at or past the current size.
    /// Returns the slot actually written.
    pub fn set(&mut self, slot: usize, creature: Creature) -> Result<usize, CoreError> {
        if slot >= TEAM_CAPACITY {
            return Err(CoreError::invalid_argument(format!(
                "team slot {slot} outside 0..{TEAM_CAPACITY}"
            )));
        }
        self.check_game(&creature)?;

        if slot < self.members.len() {
            self.members[slot] = creature;
            Ok(slot)
        } else {
            self.members.push(creature);
            Ok(self.members.len() - 1)
        }
    }

    pub fn add(&mut self, creature: Creature) -> Result<InsertOutcome, CoreError> {
        self.check_game(&creature)?;
        if self.is_full() {
            return Ok(InsertOutcome::TeamFull);
        }
        self.members.push(creature);
        Ok(InsertOutcome::Inserted {
            slot: self.members.len() - 1,
        })
    }

    pub fn remove(&mut self, slot: usize) -> Result<Creature, CoreError> {
        if slot >= self.members.len() {
            return Err(CoreError::invalid_argument(format!(
                "team slot {slot} outside 0..{}",
                self.members.len()
            )));
        }
        Ok(self.members.remove(slot))
    }

    fn check_game(&self, creature: &Creature) -> Result<(), CoreError> {
        if creature.game() != self.game {
            return Err(CoreError::invalid_argument(format!(
                "{} creature added to a {} team",
                creature.game().as_str(),
                self.game.as_str()
            )));
        }
        Ok(())
    }
}

fn record_range(index: usize) -> std::ops::Range<usize> {
    let start = TEAM_OFFSET + index * PARTY_LEN;
    start..start + PARTY_LEN
}
