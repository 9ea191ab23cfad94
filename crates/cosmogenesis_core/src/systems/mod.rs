//! Per-cell systems layered onto the rule pass.

pub mod genetics;
pub mod invaders;
pub mod warfare;

pub use genetics::{adopt_dominant, inherit_species};
pub use invaders::propagate_invaders;
pub use warfare::{detonate, next_weapon, WeaponInput};
