use crate::core_api::StatBlock;

pub const NATURE_COUNT: u8 = 25;

pub const NATURE_NAMES: [&str; NATURE_COUNT as usize] = [
    "Hardy", "Lonely", "Brave", "Adamant", "Naughty", "Bold", "Docile", "Relaxed", "Impish", "Lax",
    "Timid", "Hasty", "Serious", "Jolly", "Naive", "Modest", "Mild", "Quiet", "Bashful", "Rash",
    "Calm", "Gentle", "Sassy", "Careful", "Quirky",
];

/// Stat order used by the party record, EVs and IVs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatIndex {
    Hp = 0,
    Attack = 1,
    Defense = 2,
    Speed = 3,
    SpAttack = 4,
    SpDefense = 5,
}

impl StatIndex {
    pub const ALL: [StatIndex; 6] = [
        Self::Hp,
        Self::Attack,
        Self::Defense,
        Self::Speed,
        Self::SpAttack,
        Self::SpDefense,
    ];

    fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

pub fn nature_name(nature: u8) -> Option<&'static str> {
    NATURE_NAMES.get(usize::from(nature)).copied()
}

/// Case-insensitive reverse of [`nature_name`].
pub fn nature_by_name(name: &str) -> Option<u8> {
    let name = name.trim();
    NATURE_NAMES
        .iter()
        .position(|nature| nature.eq_ignore_ascii_case(name))
        .map(|i| i as u8)
}

pub fn boosted_stat(nature: u8) -> StatIndex {
    StatIndex::from_index(1 + usize::from(nature % NATURE_COUNT) / 5)
}

pub fn reduced_stat(nature: u8) -> StatIndex {
    StatIndex::from_index(1 + usize::from(nature % NATURE_COUNT) % 5)
}

/// Nature multiplier in tenths: 11, 9 or 10.
pub fn nature_multiplier(stat: StatIndex, nature: u8) -> u32 {
    let boosted = boosted_stat(nature);
    let reduced = reduced_stat(nature);
    if stat == StatIndex::Hp || boosted == reduced {
        10
    } else if stat == boosted {
        11
    } else if stat == reduced {
        9
    } else {
        10
    }
}

pub fn calculate_stats(
    base: [u16; 6],
    level: u8,
    nature: u8,
    ivs: [u8; 6],
    evs: [u8; 6],
) -> StatBlock {
    let level = u32::from(level);
    let mut out = [0u16; 6];

    for stat in StatIndex::ALL {
        let i = stat as usize;
        let core = level * (2 * u32::from(base[i]) + u32::from(ivs[i])) / 100;
        let ev = u32::from(evs[i]) / 4;
        let value = if stat == StatIndex::Hp {
            core + level + 10 + ev
        } else {
            (core + 5 + ev) * nature_multiplier(stat, nature) / 10
        };
        out[i] = value.min(u32::from(u16::MAX)) as u16;
    }

    StatBlock::from_array(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nature_table_lines_up_with_index_rule() {
        assert_eq!(nature_name(3), Some("Adamant"));
        assert_eq!(boosted_stat(3), StatIndex::Attack);
        assert_eq!(reduced_stat(3), StatIndex::SpAttack);
        assert_eq!(boosted_stat(10), StatIndex::Speed);
        assert_eq!(reduced_stat(10), StatIndex::Attack);
        assert_eq!(nature_name(25), None);
        assert_eq!(nature_by_name("  jolly "), Some(13));
        assert_eq!(nature_by_name("Grumpy"), None);
    }

    #[test]
    fn neutral_natures_leave_stats_alone() {
        for nature in [0, 6, 12, 18, 24] {
            for stat in StatIndex::ALL {
                assert_eq!(nature_multiplier(stat, nature), 10);
            }
        }
    }

    #[test]
    fn effort_is_added_after_the_level_scaling() {
        // Level 78 Adamant, hand-computed.
        let stats = calculate_stats(
            [108, 130, 95, 102, 80, 85],
            78,
            3,
            [24, 12, 30, 5, 16, 23],
            [74, 190, 91, 23, 48, 84],
        );
        assert_eq!(stats.to_array(), [293, 290, 198, 173, 138, 176]);
    }

    #[test]
    fn hp_ignores_nature() {
        let a = calculate_stats([45; 6], 50, 1, [31; 6], [0; 6]);
        let b = calculate_stats([45; 6], 50, 0, [31; 6], [0; 6]);
        assert_eq!(a.hp, b.hp);
        assert!(a.attack > b.attack);
        assert!(a.defense < b.defense);
    }
}
