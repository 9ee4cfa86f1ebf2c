//! Decoded raster sources the image pipeline samples from.
//!
//! A source is either a single still frame or an animated sequence whose
//! current frame is chosen from elapsed time. The engine owns exactly one
//! source at a time and samples it on the refresh cadence.

use std::io::Cursor;
use std::time::Duration;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageFormat, RgbaImage};
use tracing::debug;

use crate::error::{ContentError, ContentResult};

/// Frame delay substituted for zero-length GIF delays.
const MIN_FRAME_DELAY: Duration = Duration::from_millis(20);

/// A loaded image handle that can be sampled repeatedly.
pub trait LiveSource: std::fmt::Debug {
    /// Frame to show at `time` seconds since the source was attached.
    fn frame(&self, time: f32) -> ContentResult<&RgbaImage>;

    /// Whether sampling at different times can yield different frames.
    fn is_animated(&self) -> bool;

    /// Pixel dimensions of the source.
    fn dimensions(&self) -> (u32, u32);
}

/// A single decoded frame.
#[derive(Debug, Clone)]
pub struct StillImage {
    image: RgbaImage,
}

impl StillImage {
    /// Wraps a decoded image, rejecting zero-sized buffers.
    pub fn new(image: RgbaImage) -> ContentResult<Self> {
        check_dimensions(image.width(), image.height())?;
        Ok(Self { image })
    }
}

impl LiveSource for StillImage {
    fn frame(&self, _time: f32) -> ContentResult<&RgbaImage> {
        Ok(&self.image)
    }

    fn is_animated(&self) -> bool {
        false
    }

    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// A looping frame sequence.
#[derive(Debug, Clone)]
pub struct AnimatedImage {
    frames: Vec<(RgbaImage, Duration)>,
    total: Duration,
}

impl AnimatedImage {
    /// Builds an animation from frames and their display durations.
    pub fn new(frames: Vec<(RgbaImage, Duration)>) -> ContentResult<Self> {
        let Some((first, _)) = frames.first() else {
            return Err(ContentError::unavailable("animation has no frames"));
        };
        check_dimensions(first.width(), first.height())?;

        let frames: Vec<_> = frames
            .into_iter()
            .map(|(img, delay)| (img, delay.max(MIN_FRAME_DELAY)))
            .collect();
        let total = frames.iter().map(|(_, d)| *d).sum();

        Ok(Self { frames, total })
    }

    /// Number of frames in the loop.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Index of the frame shown at `time` seconds.
    #[must_use]
    pub fn frame_index(&self, time: f32) -> usize {
        if self.frames.len() <= 1 || !time.is_finite() || time <= 0.0 {
            return 0;
        }

        let total = self.total.as_secs_f64();
        let mut t = f64::from(time) % total;
        for (i, (_, delay)) in self.frames.iter().enumerate() {
            let d = delay.as_secs_f64();
            if t < d {
                return i;
            }
            t -= d;
        }
        self.frames.len() - 1
    }
}

impl LiveSource for AnimatedImage {
    fn frame(&self, time: f32) -> ContentResult<&RgbaImage> {
        self.frames
            .get(self.frame_index(time))
            .map(|(img, _)| img)
            .ok_or_else(|| ContentError::unavailable("animation frame out of range"))
    }

    fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    fn dimensions(&self) -> (u32, u32) {
        self.frames
            .first()
            .map_or((0, 0), |(img, _)| img.dimensions())
    }
}

fn check_dimensions(width: u32, height: u32) -> ContentResult<()> {
    if width == 0 || height == 0 {
        return Err(ContentError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Decodes raw bytes into a live source.
///
/// Multi-frame GIFs become an [`AnimatedImage`]; everything else is decoded
/// as a [`StillImage`].
pub fn decode_source(bytes: &[u8]) -> ContentResult<Box<dyn LiveSource>> {
    if bytes.is_empty() {
        return Err(ContentError::unavailable("empty image payload"));
    }

    if matches!(image::guess_format(bytes), Ok(ImageFormat::Gif)) {
        let decoder = GifDecoder::new(Cursor::new(bytes))?;
        let frames = decoder.into_frames().collect_frames()?;
        if frames.len() > 1 {
            debug!("Decoded animated GIF with {} frames", frames.len());
            let frames = frames
                .into_iter()
                .map(|f| {
                    let delay = Duration::from(f.delay());
                    (f.into_buffer(), delay)
                })
                .collect();
            return Ok(Box::new(AnimatedImage::new(frames)?));
        }
    }

    let image = image::load_from_memory(bytes)?.to_rgba8();
    debug!("Decoded still image {}x{}", image.width(), image.height());
    Ok(Box::new(StillImage::new(image)?))
}
