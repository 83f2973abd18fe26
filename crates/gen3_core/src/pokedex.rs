use crate::core_api::CoreError;
use crate::layout::{DexLocation, VariantLayout};

/// Seen and caught bitmaps; species numbers are 1-based.
///
/// `caught(s)` implies `seen(s)` after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pokedex {
    seen: Vec<u8>,
    caught: Vec<u8>,
}

impl Pokedex {
    pub fn new(len: usize) -> Self {
        Self {
            seen: vec![0u8; len],
            caught: vec![0u8; len],
        }
    }

    pub fn from_bitmaps(seen: Vec<u8>, caught: Vec<u8>) -> Result<Self, CoreError> {
        if seen.len() != caught.len() {
            return Err(CoreError::size("caught bitmap", seen.len(), caught.len()));
        }
        Ok(Self { seen, caught })
    }

    /// Read the bitmaps from the first location of each list.
    pub fn read<'a>(
        layout: &VariantLayout,
        section_data: impl Fn(u16) -> Option<&'a [u8]>,
    ) -> Result<Self, CoreError> {
        let seen = read_bitmap(layout.dex_seen, layout.dex_len, &section_data)?;
        let caught = read_bitmap(layout.dex_caught, layout.dex_len, &section_data)?;
        Self::from_bitmaps(seen, caught)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn max_species(&self) -> u16 {
        (self.seen.len() * 8).min(usize::from(u16::MAX)) as u16
    }

    pub fn seen_bytes(&self) -> &[u8] {
        &self.seen
    }

    pub fn caught_bytes(&self) -> &[u8] {
        &self.caught
    }

    pub fn is_seen(&self, species: u16) -> bool {
        self.position(species)
            .is_ok_and(|(byte, mask)| self.seen[byte] & mask != 0)
    }

    pub fn is_caught(&self, species: u16) -> bool {
        self.position(species)
            .is_ok_and(|(byte, mask)| self.caught[byte] & mask != 0)
    }

    pub fn set_seen(&mut self, species: u16) -> Result<(), CoreError> {
        let (byte, mask) = self.position(species)?;
        self.seen[byte] |= mask;
        Ok(())
    }

    pub fn set_caught(&mut self, species: u16) -> Result<(), CoreError> {
        self.set_seen(species)?;
        let (byte, mask) = self.position(species)?;
        self.caught[byte] |= mask;
        Ok(())
    }

    pub fn unset_seen(&mut self, species: u16) -> Result<(), CoreError> {
        let (byte, mask) = self.position(species)?;
        self.seen[byte] &= !mask;
        self.caught[byte] &= !mask;
        Ok(())
    }

    pub fn unset_caught(&mut self, species: u16) -> Result<(), CoreError> {
        let (byte, mask) = self.position(species)?;
        self.caught[byte] &= !mask;
        Ok(())
    }

    pub fn seen_count(&self) -> usize {
        count_bits(&self.seen)
    }

    pub fn caught_count(&self) -> usize {
        count_bits(&self.caught)
    }

    fn position(&self, species: u16) -> Result<(usize, u8), CoreError> {
        if species == 0 || species > self.max_species() {
            return Err(CoreError::invalid_argument(format!(
                "species {species} outside 1..={}",
                self.max_species()
            )));
        }
        let index = usize::from(species - 1);
        Ok((index / 8, 1 << (index % 8)))
    }
}

fn count_bits(bytes: &[u8]) -> usize {
    bytes.iter().map(|b| b.count_ones() as usize).sum()
}

fn read_bitmap<'a>(
    locations: &[DexLocation],
    len: usize,
    section_data: &impl Fn(u16) -> Option<&'a [u8]>,
) -> Result<Vec<u8>, CoreError> {
    let Some(location) = locations.first() else {
        return Ok(vec![0u8; len]);
    };
    let data = section_data(location.section_id).ok_or_else(|| {
        CoreError::integrity(format!("section {} missing", location.section_id))
    })?;
    data.get(location.offset..location.offset + len)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| {
            CoreError::size(
                &format!("section {} pokedex range", location.section_id),
                location.offset + len,
                data.len(),
            )
        })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::core_api::CoreErrorCode;

    #[test]
    fn species_maps_to_bit_of_byte() {
        let mut dex = Pokedex::new(49);
        dex.set_seen(1).unwrap();
        dex.set_seen(9).unwrap();
        dex.set_seen(386).unwrap();
        assert_eq!(dex.seen_bytes()[0], 0b0000_0001);
        assert_eq!(dex.seen_bytes()[1], 0b0000_0001);
        assert_eq!(dex.seen_bytes()[48], 0b0000_0010);
        assert_eq!(dex.seen_count(), 3);
        assert_eq!(dex.caught_count(), 0);
    }

    #[test]
    fn caught_implies_seen() {
        let mut dex = Pokedex::new(125);
        dex.set_caught(151).unwrap();
        assert!(dex.is_seen(151));
        assert!(dex.is_caught(151));

        dex.unset_caught(151).unwrap();
        assert!(dex.is_seen(151));
        assert!(!dex.is_caught(151));

        dex.set_caught(151).unwrap();
        dex.unset_seen(151).unwrap();
        assert!(!dex.is_seen(151));
        assert!(!dex.is_caught(151));
    }

    #[test]
    fn range_is_one_to_eight_times_length() {
        let mut dex = Pokedex::new(49);
        assert_eq!(dex.set_seen(0).unwrap_err().code, CoreErrorCode::InvalidArgument);
        assert!(dex.set_seen(392).is_ok());
        assert!(dex.set_seen(393).is_err());
        assert!(!dex.is_seen(393));
    }

    #[test]
    fn mismatched_bitmaps_are_a_size_fault() {
        let err = Pokedex::from_bitmaps(vec![0; 49], vec![0; 48]).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Size);
    }

    proptest! {
        #[test]
        fn invariant_survives_any_edit_sequence(ops in proptest::collection::vec((0u8..4, 1u16..=1000), 0..64)) {
            let mut dex = Pokedex::new(125);
            for (op, species) in ops {
                match op {
                    0 => dex.set_seen(species).unwrap(),
                    1 => dex.set_caught(species).unwrap(),
                    2 => dex.unset_seen(species).unwrap(),
                    _ => dex.unset_caught(species).unwrap(),
                }
                if op == 2 {
                    prop_assert!(!dex.is_caught(species));
                }
            }
            for species in 1..=1000 {
                prop_assert!(!dex.is_caught(species) || dex.is_seen(species));
            }
        }
    }
}
