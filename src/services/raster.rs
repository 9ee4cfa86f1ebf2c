//! Raster to height conversion.
//!
//! The pipeline downsamples to grid resolution, converts to BT.601
//! luminance, applies contrast, optionally blends in Sobel edges and maps the
//! result onto the configured height range. Unrecoverable load failures
//! produce a diagnostic X instead of an error so the surface never goes blank.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::warn;

use crate::config::Config;
use crate::error::ContentResult;
use crate::models::HeightArray;
use crate::services::fetch::{acquire_with_proxy, ImageFetcher};
use crate::services::sources::{decode_source, LiveSource};

/// Weight of the Sobel magnitude when edge detection is enabled.
const EDGE_WEIGHT: f32 = 0.7;

/// Conversion knobs, usually derived from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Height for luminance 0
    pub min_height: f32,
    /// Upper clamp
    pub max_height: f32,
    /// Height multiplier
    pub amplitude: f32,
    /// Blend Sobel edges into the luminance
    pub edge_detection: bool,
    /// Contrast factor around mid-grey
    pub contrast: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for RasterOptions {
    fn from(config: &Config) -> Self {
        Self {
            min_height: config.min_height,
            max_height: config.max_height,
            amplitude: config.amplitude,
            edge_detection: config.edge_detection,
            contrast: config.contrast,
        }
    }
}

/// ITU-R BT.601 luma of an 8-bit RGB triple, normalized to `[0, 1]`.
#[must_use]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)) / 255.0
}

/// Contrast around mid-grey, clamped to `[0, 1]`.
#[must_use]
pub fn apply_contrast(gray: f32, contrast: f32) -> f32 {
    ((gray - 0.5) * contrast + 0.5).clamp(0.0, 1.0)
}

/// 3×3 Sobel edge blend over a square luminance field.
///
/// Each output is `0.7 × magnitude + 0.3 × original`, clamped. Borders sample
/// the nearest edge cell.
#[must_use]
pub fn sobel_blend(values: &[f32], size: usize) -> Vec<f32> {
    if size == 0 {
        return Vec::new();
    }

    let last = size as isize - 1;
    let at = |x: isize, y: isize| -> f32 {
        let cx = x.clamp(0, last) as usize;
        let cy = y.clamp(0, last) as usize;
        values[cy * size + cx]
    };

    let mut out = Vec::with_capacity(values.len());
    for y in 0..size as isize {
        for x in 0..size as isize {
            let gx = -at(x - 1, y - 1) - 2.0 * at(x - 1, y) - at(x - 1, y + 1)
                + at(x + 1, y - 1)
                + 2.0 * at(x + 1, y)
                + at(x + 1, y + 1);
            let gy = -at(x - 1, y - 1) - 2.0 * at(x, y - 1) - at(x + 1, y - 1)
                + at(x - 1, y + 1)
                + 2.0 * at(x, y + 1)
                + at(x + 1, y + 1);
            let magnitude = (gx * gx + gy * gy).sqrt();
            let original = at(x, y);
            out.push((EDGE_WEIGHT * magnitude + (1.0 - EDGE_WEIGHT) * original).clamp(0.0, 1.0));
        }
    }
    out
}

/// Converts an already-decoded frame into heights (synchronous).
///
/// Called on every refresh of an animated source.
#[must_use]
pub fn process_element(image: &RgbaImage, grid_size: usize, opts: &RasterOptions) -> HeightArray {
    let mut out = HeightArray::new(grid_size, opts.min_height);
    process_into(&mut out, image, opts);
    out
}

/// Like [`process_element`] but writes into an existing array.
pub fn process_into(out: &mut HeightArray, image: &RgbaImage, opts: &RasterOptions) {
    let n = out.size();
    if n == 0 {
        return;
    }
    if image.width() == 0 || image.height() == 0 {
        write_diagnostic(out, opts.min_height, opts.max_height);
        return;
    }

    let side = n as u32;
    let small = imageops::resize(image, side, side, FilterType::Triangle);

    let mut values: Vec<f32> = small
        .pixels()
        .map(|p| apply_contrast(luminance(p[0], p[1], p[2]), opts.contrast))
        .collect();

    if opts.edge_detection {
        values = sobel_blend(&values, n);
    }

    let range = opts.max_height - opts.min_height;
    for (dst, v) in out.as_mut_slice().iter_mut().zip(values) {
        let h = opts.min_height + v * range * opts.amplitude;
        *dst = if h.is_finite() {
            h.clamp(opts.min_height, opts.max_height)
        } else {
            opts.min_height
        };
    }
}

/// Samples a live source at `time` and converts the frame.
///
/// Source errors degrade to the diagnostic pattern.
pub fn process_source_into(
    out: &mut HeightArray,
    source: &dyn LiveSource,
    time: f32,
    opts: &RasterOptions,
) {
    match source.frame(time) {
        Ok(frame) => process_into(out, frame, opts),
        Err(e) => {
            warn!("Live source frame failed: {}", e);
            write_diagnostic(out, opts.min_height, opts.max_height);
        }
    }
}

/// Two diagonal bands at `max` forming an X; everything else at `min`.
#[must_use]
pub fn diagnostic_pattern(grid_size: usize, min: f32, max: f32) -> HeightArray {
    let mut out = HeightArray::new(grid_size, min);
    write_diagnostic(&mut out, min, max);
    out
}

/// Writes the diagnostic X into `out`.
pub fn write_diagnostic(out: &mut HeightArray, min: f32, max: f32) {
    let n = out.size();
    let half_width = (n as f32 * 0.05).max(0.5);
    let last = n as f32 - 1.0;

    for y in 0..n {
        for x in 0..n {
            let (fx, fy) = (x as f32, y as f32);
            let on_main = (fx - fy).abs() <= half_width;
            let on_anti = (fx + fy - last).abs() <= half_width;
            out.set(x, y, if on_main || on_anti { max } else { min });
        }
    }
}

/// Acquires and decodes a source (with the one-shot proxy retry).
pub async fn load_source<F: ImageFetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    proxy: Option<&str>,
) -> ContentResult<Box<dyn LiveSource>> {
    let bytes = acquire_with_proxy(fetcher, url, proxy).await?;
    decode_source(&bytes)
}

/// Loads `url` and converts its first frame to heights.
///
/// Never fails: any acquisition or decode error is logged and replaced by
/// the diagnostic pattern.
pub async fn render_image_as_tactile<F: ImageFetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    grid_size: usize,
    opts: &RasterOptions,
    proxy: Option<&str>,
) -> HeightArray {
    match load_source(fetcher, url, proxy).await {
        Ok(source) => {
            let mut out = HeightArray::new(grid_size, opts.min_height);
            process_source_into(&mut out, source.as_ref(), 0.0, opts);
            out
        }
        Err(e) => {
            warn!("Image {} unavailable: {}", url, e);
            diagnostic_pattern(grid_size, opts.min_height, opts.max_height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn flat_opts() -> RasterOptions {
        RasterOptions {
            edge_detection: false,
            contrast: 1.0,
            ..RasterOptions::default()
        }
    }

    #[test]
    fn test_luminance_weights() {
        assert!((luminance(255, 255, 255) - 1.0).abs() < 1e-6);
        assert!(luminance(0, 0, 0).abs() < f32::EPSILON);
        assert!((luminance(255, 0, 0) - 0.299).abs() < 1e-6);
        assert!((luminance(0, 255, 0) - 0.587).abs() < 1e-6);
    }

    #[test]
    fn test_contrast_pivots_on_mid_grey() {
        assert!((apply_contrast(0.5, 3.0) - 0.5).abs() < f32::EPSILON);
        assert!((apply_contrast(0.9, 3.0) - 1.0).abs() < f32::EPSILON);
        assert!(apply_contrast(0.1, 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_white_maps_to_max() {
        let img = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        let opts = flat_opts();
        let out = process_element(&img, 5, &opts);
        assert!(out
            .as_slice()
            .iter()
            .all(|h| (h - opts.max_height).abs() < 1e-5));
    }

    #[test]
    fn test_uniform_field_has_no_edges() {
        let values = vec![0.4; 16];
        let out = sobel_blend(&values, 4);
        // Clamped borders keep the gradient at zero everywhere
        assert!(out.iter().all(|v| (v - 0.3 * 0.4).abs() < 1e-6));
    }

    #[test]
    fn test_sobel_highlights_step() {
        let size = 6;
        let values: Vec<f32> = (0..size * size)
            .map(|i| if i % size < 3 { 0.0 } else { 1.0 })
            .collect();
        let out = sobel_blend(&values, size);
        let edge = out[2 * size + 2];
        let flat = out[2 * size];
        assert!(edge > flat);
    }

    #[test]
    fn test_diagnostic_x() {
        let out = diagnostic_pattern(10, 0.0, 2.0);
        assert!((out.get(0, 0) - 2.0).abs() < f32::EPSILON);
        assert!((out.get(9, 0) - 2.0).abs() < f32::EPSILON);
        assert!((out.get(4, 4) - 2.0).abs() < f32::EPSILON);
        assert!(out.get(5, 0).abs() < f32::EPSILON);
        assert!(out.get(0, 5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_amplitude_overdrive_clamps() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([128, 128, 128, 255]));
        let opts = RasterOptions {
            amplitude: 10.0,
            ..flat_opts()
        };
        let out = process_element(&img, 4, &opts);
        assert!(out.as_slice().iter().all(|h| *h <= opts.max_height));
    }
}
