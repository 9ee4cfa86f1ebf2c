//! Procedural patterns for `pattern` display mode.

use std::f32::consts::PI;

use crate::config::{Config, PatternKind};
use crate::models::HeightArray;

/// Normalized pattern value in `[0, 1]` for grid cell `(x, y)`.
///
/// `t` is elapsed time already multiplied by `pattern_speed`.
#[must_use]
pub fn pattern_value(kind: PatternKind, x: usize, y: usize, grid_size: usize, t: f32) -> f32 {
    let n = grid_size as f32;
    let denom = (n - 1.0).max(1.0);
    let nx = x as f32 / denom;
    let ny = y as f32 / denom;

    let centre = (n - 1.0) / 2.0;
    let dx = x as f32 - centre;
    let dy = y as f32 - centre;
    let dist = (dx * dx + dy * dy).sqrt();

    let v = match kind {
        PatternKind::Wave => ((nx + ny) * 4.0 * PI + t).sin() * 0.5 + 0.5,
        PatternKind::Ripple => (dist * 0.5 - t * 3.0).sin() * 0.5 + 0.5,
        PatternKind::Gaussian => {
            let sigma = 0.15 * n;
            (-(dist * dist) / (2.0 * sigma * sigma)).exp()
        }
        PatternKind::Noise => {
            let a = (x as f32 * 0.31 + t).sin();
            let b = (y as f32 * 0.27 - t * 0.7 + 1.7).cos();
            a * b * 0.5 + 0.5
        }
        PatternKind::Flat => 0.0,
    };

    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Fills `out` with the configured pattern at elapsed time `elapsed`.
///
/// Heights are `min + v × min(amplitude, 1) × range`, clamped.
pub fn render_pattern_into(out: &mut HeightArray, config: &Config, elapsed: f32) {
    let n = out.size();
    let t = elapsed * config.pattern_speed;
    let scale = config.amplitude.min(1.0) * config.height_range();

    for y in 0..n {
        for x in 0..n {
            let v = pattern_value(config.pattern, x, y, n, t);
            out.set(x, y, config.clamp_height(config.min_height + v * scale));
        }
    }
}
