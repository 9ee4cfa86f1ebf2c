//! Tactile compositor: renders a semantic page into a per-pin height array.
//!
//! ## Overlap resolution
//!
//! For each cell, every primitive whose rectangle contains the cell centre is
//! a candidate. The candidate with the highest tier wins. Among candidates at
//! the same tier, the one visited last in a pre-order walk in declaration
//! order wins: a nested block beats its ancestor, and a later sibling beats an
//! earlier one.
//!
//! ## Focus ring
//!
//! If a focused primitive is given, cells within `FOCUS_RING_BAND` of its
//! edges are raised to at least the `Level4` height. The ring never lowers a
//! cell.

use crate::config::Config;
use crate::constants::FOCUS_RING_BAND;
use crate::models::{HeightArray, HeightTier, Primitive, SemanticPage};
use crate::services::texture::apply_texture;

/// Picks the primitive that determines the height at `(nx, ny)`.
#[must_use]
pub fn resolve_winner(page: &SemanticPage, nx: f32, ny: f32) -> Option<&Primitive> {
    let mut winner: Option<&Primitive> = None;
    page.walk(&mut |p| {
        if p.bounds.contains(nx, ny) && winner.map_or(true, |w| p.tier >= w.tier) {
            winner = Some(p);
        }
    });
    winner
}

/// Height of a single normalized point, before the focus ring.
#[must_use]
pub fn height_at(page: &SemanticPage, config: &Config, nx: f32, ny: f32, time: f32) -> f32 {
    match resolve_winner(page, nx, ny) {
        None => HeightTier::Level0.height(config),
        Some(p) => apply_texture(
            p.texture,
            nx,
            ny,
            p.tier.height(config),
            config.min_height,
            config.max_height,
            time,
        ),
    }
}

/// Renders the whole page at `config.grid_size` resolution.
#[must_use]
pub fn render_page(
    page: &SemanticPage,
    config: &Config,
    focused: Option<&Primitive>,
    time: f32,
) -> HeightArray {
    let mut out = HeightArray::new(config.grid_size, config.min_height);
    render_page_into(&mut out, page, config, focused, time);
    out
}

/// Renders into an existing array, reusing its allocation.
pub fn render_page_into(
    out: &mut HeightArray,
    page: &SemanticPage,
    config: &Config,
    focused: Option<&Primitive>,
    time: f32,
) {
    let n = out.size();
    let denom = n.saturating_sub(1).max(1) as f32;
    let ring_height = HeightTier::Level4.height(config);

    for y in 0..n {
        let ny = y as f32 / denom;
        for x in 0..n {
            let nx = x as f32 / denom;
            let mut h = height_at(page, config, nx, ny, time);

            if let Some(focus) = focused {
                if focus.bounds.on_ring(nx, ny, FOCUS_RING_BAND) {
                    h = h.max(ring_height);
                }
            }

            out.set(x, y, h);
        }
    }

    out.clamp(config.min_height, config.max_height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rect, Role, TextureKind};

    fn config(grid: usize) -> Config {
        Config {
            grid_size: grid,
            ..Config::new()
        }
    }

    #[test]
    fn test_empty_page_is_background() {
        let cfg = config(8);
        let out = render_page(&SemanticPage::default(), &cfg, None, 0.0);
        assert!(out.as_slice().iter().all(|&h| (h - cfg.min_height).abs() < f32::EPSILON));
    }

    #[test]
    fn test_higher_tier_wins_regardless_of_order() {
        let page = SemanticPage::new(vec![
            Primitive::new(Role::Main, Rect::full(), HeightTier::Level1).with_child(
                Primitive::new(Role::Heading, Rect::new(0.0, 0.0, 0.5, 0.5), HeightTier::Level3)
                    .with_id("tall"),
            ),
            Primitive::new(Role::Footer, Rect::new(0.0, 0.0, 0.5, 0.5), HeightTier::Level2)
                .with_id("late"),
        ]);
        assert_eq!(
            resolve_winner(&page, 0.25, 0.25).and_then(|p| p.id.as_deref()),
            Some("tall")
        );
    }

    #[test]
    fn test_nested_block_beats_landmark_at_equal_tier() {
        let page = SemanticPage::new(vec![Primitive::new(
            Role::Main,
            Rect::full(),
            HeightTier::Level2,
        )
        .with_id("main")
        .with_child(
            Primitive::new(Role::Paragraph, Rect::new(0.1, 0.1, 0.2, 0.2), HeightTier::Level2)
                .with_texture(TextureKind::Dots)
                .with_id("p"),
        )]);
        let winner = resolve_winner(&page, 0.2, 0.2).and_then(|p| p.id.as_deref());
        assert_eq!(winner, Some("p"));
        let outside = resolve_winner(&page, 0.8, 0.8).and_then(|p| p.id.as_deref());
        assert_eq!(outside, Some("main"));
    }

    #[test]
    fn test_output_in_range_with_overdrive() {
        let mut cfg = config(12);
        cfg.amplitude = 3.0;
        let page = SemanticPage::new(vec![Primitive::new(
            Role::Main,
            Rect::full(),
            HeightTier::Level4,
        )
        .with_texture(TextureKind::Pebbled)]);
        let focus = page.landmarks[0].clone();
        let out = render_page(&page, &cfg, Some(&focus), 2.5);
        assert!(out
            .as_slice()
            .iter()
            .all(|&h| h >= cfg.min_height && h <= cfg.max_height));
    }

    #[test]
    fn test_single_cell_grid_does_not_divide_by_zero() {
        let mut cfg = config(2);
        cfg.grid_size = 1;
        let page = SemanticPage::new(vec![Primitive::new(
            Role::Main,
            Rect::full(),
            HeightTier::Level2,
        )]);
        let out = render_page(&page, &cfg, None, 0.0);
        assert!(out.as_slice().iter().all(|h| h.is_finite()));
    }
}
