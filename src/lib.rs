//! PinField Library
//!
//! This library provides the simulation core of a tactile pin display:
//! procedural patterns, a semantic page compositor, Braille text and raster
//! images are turned into per-pin heights, eased toward their targets and
//! published to a render substrate with dirty-checking.

// Module declarations
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod models;
pub mod parser;
pub mod services;
pub mod shortcuts;
#[cfg(feature = "ratatui")]
pub mod tui;

pub use config::Config;
pub use engine::{Intent, IntentOutcome, Mode, PinFieldEngine};
pub use error::ContentError;
