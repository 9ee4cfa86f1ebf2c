//! Shared test fixtures for integration tests.
#![allow(dead_code)] // Not every test file uses every fixture

use image::{Delay, Frame, ImageFormat, Rgba, RgbaImage};
use pinfield::config::{Config, PatternKind, PhysicsMode};
use pinfield::models::{HeightTier, Primitive, Rect, Role, SemanticPage, TextureKind};
use std::io::Cursor;

/// Config with ideal physics, a flat pattern and the given grid.
pub fn ideal_config(grid_size: usize) -> Config {
    Config {
        grid_size,
        physics_mode: PhysicsMode::Ideal,
        pattern: PatternKind::Flat,
        ..Config::new()
    }
}

/// A page with three landmarks (header, main, footer).
///
/// `main` has three blocks; the footer has none.
pub fn three_landmark_page() -> SemanticPage {
    let header = Primitive::new(Role::Header, Rect::new(0.0, 0.0, 1.0, 0.2), HeightTier::Level1)
        .with_id("header")
        .with_texture(TextureKind::FineRidges)
        .with_child(
            Primitive::new(Role::Heading, Rect::new(0.05, 0.05, 0.6, 0.1), HeightTier::Level3)
                .with_id("title")
                .with_text("hello"),
        );

    let main = Primitive::new(Role::Main, Rect::new(0.0, 0.2, 1.0, 0.6), HeightTier::Level1)
        .with_id("main")
        .with_child(
            Primitive::new(Role::Paragraph, Rect::new(0.05, 0.25, 0.9, 0.15), HeightTier::Level2)
                .with_id("intro")
                .with_text("tactile web"),
        )
        .with_child(
            Primitive::new(Role::Media, Rect::new(0.05, 0.45, 0.4, 0.3), HeightTier::Level2)
                .with_id("photo")
                .with_texture(TextureKind::Pebbled)
                .with_image("mem://photo.png")
                .interactive(),
        )
        .with_child(
            Primitive::new(Role::Button, Rect::new(0.6, 0.5, 0.3, 0.1), HeightTier::Level3)
                .with_id("go")
                .interactive(),
        );

    let footer = Primitive::new(Role::Footer, Rect::new(0.0, 0.8, 1.0, 0.2), HeightTier::Level1)
        .with_id("footer");

    let mut page = SemanticPage::new(vec![header, main, footer]);
    page.title = Some("Fixture".to_string());
    page
}

/// Encodes an image as PNG bytes.
pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Solid grey image.
pub fn solid(width: u32, height: u32, value: u8) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
}

/// Two-frame GIF (black then white), 100 ms per frame.
pub fn two_frame_gif() -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut encoder = image::codecs::gif::GifEncoder::new(&mut bytes);
        encoder
            .set_repeat(image::codecs::gif::Repeat::Infinite)
            .unwrap();
        let delay = Delay::from_numer_denom_ms(100, 1);
        encoder
            .encode_frames(vec![
                Frame::from_parts(solid(8, 8, 0), 0, 0, delay),
                Frame::from_parts(solid(8, 8, 255), 0, 0, delay),
            ])
            .unwrap();
    }
    bytes
}
