//! Core data structures for the Cosmogenesis simulation.

pub mod cell;
pub mod event;
pub mod stats;
