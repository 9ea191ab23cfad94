use serde::{Deserialize, Serialize};

/// Species id stored on cells that have never been assigned one.
pub const UNASSIGNED_SPECIES: u8 = 0;
/// Highest species id a living cell can carry.
pub const MAX_SPECIES: u8 = 7;
/// Number of distinct alliances produced by [`alliance_of`] for species `1..=MAX_SPECIES`.
pub const ALLIANCE_COUNT: u8 = (MAX_SPECIES - 1) / 2 + 1;

/// Alliance derived from a species id: `⌊(species − 1) / 2⌋ + 1`.
///
/// Species pair up (1–2, 3–4, 5–6); species 7 stands alone in the last
/// alliance. Unassigned cells belong to no alliance and map to `0`.
#[inline]
#[must_use]
pub fn alliance_of(species: u8) -> u8 {
    if species == UNASSIGNED_SPECIES {
        0
    } else {
        (species - 1) / 2 + 1
    }
}

/// Armament carried by a live cell while nuclear warfare is active.
///
/// The ordering is the escalation order; a cell only ever moves up the ladder
/// until it dies or detonates, which resets it to [`WeaponState::None`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum WeaponState {
    #[default]
    None = 0,
    Factory = 1,
    Weapon = 2,
    Nuke = 3,
}

impl WeaponState {
    /// Weapon or Nuke: counts toward the neighborhood needed to build a nuke.
    #[must_use]
    pub fn is_armed(self) -> bool {
        matches!(self, WeaponState::Weapon | WeaponState::Nuke)
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_alliance_pairs() {
        assert_eq!(alliance_of(0), 0);
        assert_eq!(alliance_of(1), 1);
        assert_eq!(alliance_of(2), 1);
        assert_eq!(alliance_of(3), 2);
        assert_eq!(alliance_of(6), 3);
        assert_eq!(alliance_of(7), ALLIANCE_COUNT);
    }

    #[test]
    fn test_weapon_ordering() {
        assert!(WeaponState::None < WeaponState::Factory);
        assert!(WeaponState::Factory < WeaponState::Weapon);
        assert!(WeaponState::Weapon < WeaponState::Nuke);
        assert!(!WeaponState::Factory.is_armed());
        assert!(WeaponState::Nuke.is_armed());
    }

    proptest! {
        #[test]
        fn prop_alliance_formula(species in 1u8..=MAX_SPECIES) {
            let alliance = alliance_of(species);
            prop_assert_eq!(alliance, (species - 1) / 2 + 1);
            prop_assert!((1..=ALLIANCE_COUNT).contains(&alliance));
        }
    }
}
