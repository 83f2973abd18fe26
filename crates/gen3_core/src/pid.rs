use crate::core_api::{AbilitySlot, CoreError};
use crate::stats::NATURE_COUNT;

/// Shiny values below this threshold mark a shiny creature.
pub const SHINY_THRESHOLD: u32 = 8;

pub fn nature_of(pid: u32) -> u8 {
    (pid % u32::from(NATURE_COUNT)) as u8
}

pub fn shiny_value(pid: u32, ot_id: u32) -> u32 {
    (pid >> 16) ^ (pid & 0xFFFF) ^ (ot_id >> 16) ^ (ot_id & 0xFFFF)
}

pub fn is_shiny(pid: u32, ot_id: u32) -> bool {
    shiny_value(pid, ot_id) < SHINY_THRESHOLD
}

fn satisfies(pid: u32, parity: u32, nature: u32) -> bool {
    pid % 2 == parity && pid % u32::from(NATURE_COUNT) == nature
}

/// Pick a PID with the requested ability parity and nature.
///
/// Without `shiny` the result is the smallest such value. With `shiny` the
/// search walks the eight shiny classes and every low half, returning the
/// first candidate that also meets both modular constraints.
pub fn synthesize(
    ability: AbilitySlot,
    nature: u8,
    ot_id: u32,
    shiny: bool,
) -> Result<u32, CoreError> {
    if nature >= NATURE_COUNT {
        return Err(CoreError::invalid_argument(format!(
            "nature {nature} outside 0..{NATURE_COUNT}"
        )));
    }
    let parity = ability.pid_parity();
    let nature = u32::from(nature);

    if !shiny {
        return Ok(if nature % 2 == parity {
            nature
        } else {
            nature + u32::from(NATURE_COUNT)
        });
    }

    let public = ot_id & 0xFFFF;
    let secret = ot_id >> 16;
    for class in 0..SHINY_THRESHOLD {
        for low in 0..=0xFFFFu32 {
            let high = class ^ public ^ secret ^ low;
            let pid = (high << 16) | low;
            if satisfies(pid, parity, nature) {
                return Ok(pid);
            }
        }
    }

    Err(CoreError::invalid_argument(format!(
        "no shiny PID for trainer id {ot_id:#010x} with nature {nature}"
    )))
}
