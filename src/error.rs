//! Error taxonomy for content acquisition.
//!
//! Only content sources produce typed errors. The engine recovers from every
//! one of them locally (diagnostic or background pattern), so none of these
//! ever reach the per-tick path.

/// Failure while acquiring or decoding tactile content.
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    /// Page or image could not be loaded (network failure, missing file, ...).
    #[error("content unavailable: {0}")]
    Unavailable(String),

    /// The source refused pixel access; recoverable once through the proxy.
    #[error("pixel read denied for {url}")]
    PixelReadDenied {
        /// URL that was denied
        url: String,
    },

    /// The bytes were fetched but are not a supported image.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// The decoded image has an unusable size.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Decoded width in pixels
        width: u32,
        /// Decoded height in pixels
        height: u32,
    },
}

impl ContentError {
    /// Convenience constructor for `Unavailable`.
    pub fn unavailable<T: ToString>(msg: T) -> Self {
        Self::Unavailable(msg.to_string())
    }

    /// Whether a proxy retry may recover this error.
    #[must_use]
    pub const fn is_pixel_read_denied(&self) -> bool {
        matches!(self, Self::PixelReadDenied { .. })
    }
}

/// Result type alias for content acquisition.
pub type ContentResult<T> = Result<T, ContentError>;
