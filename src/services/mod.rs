//! Content services that fill height arrays.
//!
//! Each service turns one kind of content (procedural pattern, semantic page,
//! Braille text, raster image) into a grid of heights. Services are pure or
//! own their inputs explicitly; the engine decides which one runs each tick.

pub mod braille;
pub mod compositor;
pub mod fetch;
pub mod navigation;
pub mod patterns;
pub mod raster;
pub mod sources;
pub mod texture;

// Re-export commonly used types and functions
pub use compositor::render_page;
pub use fetch::{acquire_with_proxy, DefaultFetcher, FileFetcher, ImageFetcher, MockFetcher};
#[cfg(feature = "fetch")]
pub use fetch::HttpFetcher;
pub use navigation::{NavMode, NavigationState};
pub use raster::{process_element, render_image_as_tactile, RasterOptions};
pub use sources::{decode_source, AnimatedImage, LiveSource, StillImage};
pub use texture::apply_texture;
