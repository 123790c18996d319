// Tactics Battle Schema - Shared type definitions
// This crate contains the static enums shared by the engine, its demo binary
// and any presentation layer that needs to name elements, classes or effects
// without depending on the engine itself.

// Re-export the main types
pub use battle_data::*;
pub use element_types::*;

pub mod battle_data;
pub mod element_types;
