//! Per-cell state layers.
//!
//! Life, invader, species and weapon layers are double-buffered: a tick reads
//! the current buffer and fully writes the `*_next` buffer, then [`Layers::swap`]
//! exchanges them. Energy and age only depend on the cell's own previous value
//! and are updated in place. Alliance is derived from species after every swap.

use cosmogenesis_data::{alliance_of, WeaponState, UNASSIGNED_SPECIES};
use serde::{Deserialize, Serialize};

pub const MAX_ENERGY: f64 = 10.0;
pub const AGE_CAP: u32 = 10_000;
/// Energy given to cells placed by seeding and stamping.
pub const SEED_ENERGY: f64 = 1.0;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Layers {
    pub life: Vec<u8>,
    #[serde(skip)]
    pub life_next: Vec<u8>,
    pub invader: Vec<u8>,
    #[serde(skip)]
    pub invader_next: Vec<u8>,
    pub species: Vec<u8>,
    #[serde(skip)]
    pub species_next: Vec<u8>,
    pub alliance: Vec<u8>,
    pub weapon: Vec<WeaponState>,
    #[serde(skip)]
    pub weapon_next: Vec<WeaponState>,
    pub energy: Vec<f64>,
    pub age: Vec<u32>,
}

impl Layers {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            life: vec![0; len],
            life_next: vec![0; len],
            invader: vec![0; len],
            invader_next: vec![0; len],
            species: vec![UNASSIGNED_SPECIES; len],
            species_next: vec![UNASSIGNED_SPECIES; len],
            alliance: vec![0; len],
            weapon: vec![WeaponState::None; len],
            weapon_next: vec![WeaponState::None; len],
            energy: vec![0.0; len],
            age: vec![0; len],
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.life.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.life.is_empty()
    }

    /// Makes a cell alive in the current buffer with the given species.
    ///
    /// Used by seeding, pattern stamping and spawn effects, all of which run
    /// outside the rule pass. An already-living cell keeps its age and energy.
    pub fn stamp_cell(&mut self, idx: usize, species: u8) {
        if self.life[idx] == 0 {
            self.life[idx] = 1;
            self.age[idx] = 1;
            self.energy[idx] = self.energy[idx].max(SEED_ENERGY);
            self.weapon[idx] = WeaponState::None;
        }
        if self.species[idx] == UNASSIGNED_SPECIES {
            self.species[idx] = species;
            self.alliance[idx] = alliance_of(species);
        }
    }

    /// Kills a cell in the current buffer and clears everything it carried.
    pub fn kill_cell(&mut self, idx: usize) {
        self.life[idx] = 0;
        self.age[idx] = 0;
        self.energy[idx] = 0.0;
        self.weapon[idx] = WeaponState::None;
        self.species[idx] = UNASSIGNED_SPECIES;
        self.alliance[idx] = 0;
    }

    /// Exchanges current and next buffers and re-derives alliances.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.life, &mut self.life_next);
        std::mem::swap(&mut self.invader, &mut self.invader_next);
        std::mem::swap(&mut self.species, &mut self.species_next);
        std::mem::swap(&mut self.weapon, &mut self.weapon_next);
        self.refresh_alliances();
    }

    pub fn refresh_alliances(&mut self) {
        for (alliance, &species) in self.alliance.iter_mut().zip(&self.species) {
            *alliance = alliance_of(species);
        }
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.life.iter().filter(|&&v| v == 1).count()
    }

    #[must_use]
    pub fn total_energy(&self) -> f64 {
        self.energy.iter().sum()
    }

    /// Resets every layer to empty without reallocating.
    pub fn clear(&mut self) {
        self.life.fill(0);
        self.life_next.fill(0);
        self.invader.fill(0);
        self.invader_next.fill(0);
        self.species.fill(UNASSIGNED_SPECIES);
        self.species_next.fill(UNASSIGNED_SPECIES);
        self.alliance.fill(0);
        self.weapon.fill(WeaponState::None);
        self.weapon_next.fill(WeaponState::None);
        self.energy.fill(0.0);
        self.age.fill(0);
    }
}
