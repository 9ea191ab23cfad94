//! Plain data shared by the Cosmogenesis engine, its subsystems and its observers.

pub mod data;

pub use data::cell::{alliance_of, WeaponState, ALLIANCE_COUNT, MAX_SPECIES, UNASSIGNED_SPECIES};
pub use data::event::{CosmicEvent, EventKind, EventMeta, FrontPoint, Heading, ParseEventKindError};
pub use data::stats::TickResult;
