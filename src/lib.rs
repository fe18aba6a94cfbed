//! Lumina Bay library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual entry point. This library crate
//! exposes the same modules so that `tests/` integration tests can import
//! types, systems, and resources and drive the simulation headlessly.

pub mod shared;
pub mod clock;
pub mod player;
pub mod npcs;
pub mod economy;
pub mod save;
pub mod data;
pub mod feedback;
