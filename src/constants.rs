//! Application-wide constants.
//!
//! Names, physical constants of the simulated device and timing values shared
//! by the engine and its content sources.

use std::time::Duration;

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "PinField";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "pinfield";

/// Smallest grid the engine will allocate (N×N).
pub const MIN_GRID_SIZE: usize = 2;

/// Largest grid the engine will allocate (N×N, ~14K pins).
pub const MAX_GRID_SIZE: usize = 120;

/// Height change below which a pin is not re-uploaded to the renderer.
pub const DIRTY_EPSILON: f32 = 0.001;

/// Fixed world-space Y of the pin base plane.
pub const PIN_BASE_Y: f32 = 0.0;

/// Cadence of the live raster re-sampling task, in seconds of engine time (~10 Hz).
pub const IMAGE_REFRESH_INTERVAL: f32 = 0.1;

/// Delay before the first frame of an animated raster source is sampled.
pub const FIRST_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Half-width of the focus ring band, in normalized page units.
pub const FOCUS_RING_BAND: f32 = 0.02;

/// Texture perturbation amplitude as a fraction of the height range.
pub const TEXTURE_STRENGTH: f32 = 0.08;

/// Height of a raised Braille dot as a fraction of the height range.
pub const BRAILLE_DOT_FRACTION: f32 = 0.6;
