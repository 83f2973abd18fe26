mod engine;
mod error;
mod types;

pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use types::{
    AbilitySlot, BoxEntry, CreatureView, Game, InsertOutcome, PlayTime, SlotLabel, Snapshot,
    StatBlock,
};
