//! Data models for the pin field, semantic pages and height storage.
//!
//! This module contains the core data structures used throughout the crate.
//! Models are designed to be independent of the engine and of any renderer.

pub mod grid;
pub mod height;
pub mod page;
pub mod rgb;
pub mod tier;

// Re-export all model types
pub use grid::PinLayout;
pub use height::HeightArray;
pub use page::{Primitive, Rect, Role, SemanticPage, TextureKind};
pub use rgb::{RgbColor, PIN_COLOR};
pub use tier::{height_for_tier, HeightTier};
