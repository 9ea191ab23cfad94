pub mod config {
    pub use cosmogenesis_core::config::*;
}
pub mod error {
    pub use cosmogenesis_core::error::*;
}
pub mod events {
    pub use cosmogenesis_core::events::*;
    pub use cosmogenesis_data::{CosmicEvent, EventKind, EventMeta, FrontPoint, Heading};
}
pub mod history {
    pub use cosmogenesis_core::history::*;
}
pub mod archetypes {
    pub use cosmogenesis_core::archetypes::*;
}
pub mod topology {
    pub use cosmogenesis_core::topology::*;
}
pub mod state {
    pub use cosmogenesis_data::*;
}

pub mod universe;
