//! Texture synthesis: small periodic perturbations that give same-tier
//! regions a distinguishable feel under the finger.

use std::f32::consts::{PI, TAU};

use crate::constants::TEXTURE_STRENGTH;
use crate::models::TextureKind;

/// Ridges per unit of normalized x for `FineRidges`.
const FINE_RIDGE_FREQUENCY: f32 = 24.0;
/// Ridges per unit of normalized x for `UltraFineRidges`.
const ULTRA_FINE_RIDGE_FREQUENCY: f32 = 48.0;
/// Dot cells per unit of normalized coordinate.
const DOT_CELLS: f32 = 16.0;
/// Dot radius as a fraction of a dot cell.
const DOT_RADIUS: f32 = 0.4;

/// Applies a texture to `base_height` at normalized surface coordinates.
///
/// The texture value `v ∈ [0, 1]` becomes a signed offset
/// `(v − 0.5) × TEXTURE_STRENGTH × range`, and the result is clamped into
/// `[min_height, max_height]`.
#[must_use]
pub fn apply_texture(
    kind: TextureKind,
    nx: f32,
    ny: f32,
    base_height: f32,
    min_height: f32,
    max_height: f32,
    time: f32,
) -> f32 {
    let range = max_height - min_height;
    let offset = match kind {
        TextureKind::Smooth => 0.0,
        _ => (texture_value(kind, nx, ny, time) - 0.5) * TEXTURE_STRENGTH * range,
    };

    let height = base_height + offset;
    if height.is_finite() {
        height.clamp(min_height, max_height)
    } else {
        min_height
    }
}

/// Raw texture value in `[0, 1]`.
#[must_use]
pub fn texture_value(kind: TextureKind, nx: f32, ny: f32, time: f32) -> f32 {
    let v = match kind {
        TextureKind::Smooth => 0.5,
        TextureKind::FineRidges => ridges(nx, FINE_RIDGE_FREQUENCY),
        TextureKind::UltraFineRidges => ridges(nx, ULTRA_FINE_RIDGE_FREQUENCY),
        TextureKind::Dots => dots(nx, ny),
        TextureKind::Pebbled => pebbled(nx, ny, time),
    };
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

fn ridges(nx: f32, frequency: f32) -> f32 {
    (nx * frequency * TAU).sin() * 0.5 + 0.5
}

/// Circular falloff inside every other cell of a checkerboard.
fn dots(nx: f32, ny: f32) -> f32 {
    let gx = nx * DOT_CELLS;
    let gy = ny * DOT_CELLS;
    let parity = (gx.floor() as i64 + gy.floor() as i64).rem_euclid(2);
    if parity != 0 {
        return 0.0;
    }

    let dx = gx.fract() - 0.5;
    let dy = gy.fract() - 0.5;
    let dist = (dx * dx + dy * dy).sqrt();
    (1.0 - dist / DOT_RADIUS).max(0.0)
}

/// Three octaves of sinusoidal pseudo-noise plus a diagonal wave that
/// travels with time, marking live image regions.
fn pebbled(nx: f32, ny: f32, time: f32) -> f32 {
    let o1 = (nx * 17.0).sin() * (ny * 13.0).cos();
    let o2 = (nx * 41.0 + 1.3).sin() * (ny * 37.0 + 0.7).cos() * 0.5;
    let o3 = (nx * 97.0 + 2.1).sin() * (ny * 89.0 + 1.7).cos() * 0.25;
    let noise = (o1 + o2 + o3) / 1.75 * 0.5 + 0.5;

    let wave = ((nx + ny) * 6.0 * PI - time * 2.0).sin() * 0.5 + 0.5;

    noise * 0.7 + wave * 0.3
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [TextureKind; 5] = [
        TextureKind::Smooth,
        TextureKind::FineRidges,
        TextureKind::UltraFineRidges,
        TextureKind::Dots,
        TextureKind::Pebbled,
    ];

    #[test]
    fn test_smooth_adds_nothing() {
        let h = apply_texture(TextureKind::Smooth, 0.3, 0.7, 1.2, 0.0, 2.0, 5.0);
        assert!((h - 1.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_output_always_in_range() {
        for kind in KINDS {
            for i in 0..=40 {
                for j in 0..=40 {
                    let nx = i as f32 / 40.0;
                    let ny = j as f32 / 40.0;
                    for (base, time) in [(0.0, 0.0), (2.0, 3.3), (1.0, 100.0)] {
                        let h = apply_texture(kind, nx, ny, base, 0.0, 2.0, time);
                        assert!((0.0..=2.0).contains(&h), "{kind:?} produced {h}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_offset_bounded_by_strength() {
        let range = 2.0;
        for kind in KINDS {
            let h = apply_texture(kind, 0.37, 0.61, 1.0, 0.0, range, 0.4);
            assert!((h - 1.0).abs() <= TEXTURE_STRENGTH * range * 0.5 + 1e-6);
        }
    }

    #[test]
    fn test_ridges_vary_along_x_only() {
        let a = texture_value(TextureKind::FineRidges, 0.1, 0.2, 0.0);
        let b = texture_value(TextureKind::FineRidges, 0.1, 0.9, 0.0);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_dots_gated_by_checkerboard() {
        // Centre of cell (0,0): raised; centre of cell (1,0): gated off
        let cell = 1.0 / DOT_CELLS;
        let on = texture_value(TextureKind::Dots, cell * 0.5, cell * 0.5, 0.0);
        let off = texture_value(TextureKind::Dots, cell * 1.5, cell * 0.5, 0.0);
        assert!(on > 0.9);
        assert!(off.abs() < f32::EPSILON);
    }

    #[test]
    fn test_pebbled_animates_with_time() {
        let a = texture_value(TextureKind::Pebbled, 0.4, 0.4, 0.0);
        let b = texture_value(TextureKind::Pebbled, 0.4, 0.4, 0.5);
        assert!((a - b).abs() > 1e-4);
    }

    #[test]
    fn test_deterministic() {
        for kind in KINDS {
            assert_eq!(
                apply_texture(kind, 0.21, 0.83, 0.9, 0.0, 2.0, 1.25),
                apply_texture(kind, 0.21, 0.83, 0.9, 0.0, 2.0, 1.25)
            );
        }
    }
}
