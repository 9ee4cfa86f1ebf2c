//! RGB color handling for pin instances.

// Allow intentional type casts for color math
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Neutral pin colour used when debug colouring is off.
pub const PIN_COLOR: RgbColor = RgbColor::new(200, 200, 205);

/// RGB color value pushed to the renderer's per-instance colour buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl RgbColor {
    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts the color to a hex string in the format "#RRGGBB" (uppercase).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Converts the color to a Ratatui Color for terminal rendering.
    #[cfg(feature = "ratatui")]
    #[must_use]
    pub const fn to_ratatui_color(&self) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(self.r, self.g, self.b)
    }

    /// Creates an `RgbColor` from HSL (Hue, Saturation, Lightness).
    ///
    /// # Arguments
    ///
    /// * `h` - Hue in degrees (0.0-360.0, will be clamped)
    /// * `s` - Saturation (0.0-1.0, will be clamped)
    /// * `l` - Lightness (0.0-1.0, will be clamped)
    ///
    /// # Examples
    ///
    /// ```
    /// use pinfield::models::RgbColor;
    ///
    /// assert_eq!(RgbColor::from_hsl(0.0, 1.0, 0.5), RgbColor::new(255, 0, 0));
    /// assert_eq!(RgbColor::from_hsl(240.0, 1.0, 0.5), RgbColor::new(0, 0, 255));
    /// ```
    #[must_use]
    #[allow(clippy::many_single_char_names)] // Standard HSL color model uses single-char names
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.clamp(0.0, 360.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h_prime = h / 60.0;
        let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = if h_prime < 1.0 {
            (c, x, 0.0)
        } else if h_prime < 2.0 {
            (x, c, 0.0)
        } else if h_prime < 3.0 {
            (0.0, c, x)
        } else if h_prime < 4.0 {
            (0.0, x, c)
        } else if h_prime < 5.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        Self {
            r: ((r + m) * 255.0).round().clamp(0.0, 255.0) as u8,
            g: ((g + m) * 255.0).round().clamp(0.0, 255.0) as u8,
            b: ((b + m) * 255.0).round().clamp(0.0, 255.0) as u8,
        }
    }

    /// Debug gradient for a normalized height: 0.0 is blue, 1.0 is red.
    #[must_use]
    pub fn height_gradient(t: f32) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        Self::from_hsl(240.0 * (1.0 - t), 0.8, 0.5)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        PIN_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex() {
        assert_eq!(RgbColor::new(255, 0, 0).to_hex(), "#FF0000");
        assert_eq!(RgbColor::new(0, 128, 255).to_hex(), "#0080FF");
    }

    #[test]
    fn test_hsl_primary_colors() {
        assert_eq!(RgbColor::from_hsl(0.0, 1.0, 0.5), RgbColor::new(255, 0, 0));
        assert_eq!(RgbColor::from_hsl(120.0, 1.0, 0.5), RgbColor::new(0, 255, 0));
        assert_eq!(RgbColor::from_hsl(240.0, 1.0, 0.5), RgbColor::new(0, 0, 255));
    }

    #[test]
    fn test_hsl_grayscale() {
        assert_eq!(RgbColor::from_hsl(0.0, 0.0, 0.0), RgbColor::new(0, 0, 0));
        assert_eq!(RgbColor::from_hsl(0.0, 0.0, 1.0), RgbColor::new(255, 255, 255));
    }

    #[test]
    fn test_height_gradient_endpoints() {
        let low = RgbColor::height_gradient(0.0);
        let high = RgbColor::height_gradient(1.0);
        assert!(low.b > low.r, "low heights should be blue: {low}");
        assert!(high.r > high.b, "high heights should be red: {high}");
        assert_eq!(RgbColor::height_gradient(f32::NAN), low);
        assert_eq!(RgbColor::height_gradient(4.0), high);
    }
}
