//! Pin field widget: draws every pin as a shaded, height-coloured cell.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::engine::PinFieldEngine;
use crate::models::height::{normalize, shade};
use crate::models::{RgbColor, PIN_COLOR};

/// Pin field widget
pub struct PinView;

impl PinView {
    /// Render the current heights into `area`.
    ///
    /// Grids larger than the area are subsampled with a fixed stride.
    pub fn render(f: &mut Frame, area: Rect, engine: &PinFieldEngine) {
        let config = engine.config();
        let heights = engine.current_heights();
        let layout = engine.layout();
        let n = heights.size();

        // Two columns per pin, minus borders
        let cols = usize::from(area.width.saturating_sub(2) / 2).max(1);
        let rows = usize::from(area.height.saturating_sub(2)).max(1);
        let stride = n.div_ceil(cols).max(n.div_ceil(rows)).max(1);

        let mut lines = Vec::with_capacity(n / stride + 1);
        for y in (0..n).step_by(stride) {
            let mut spans = Vec::with_capacity(n / stride + 1);
            for x in (0..n).step_by(stride) {
                if layout.is_corner(x, y) {
                    spans.push(Span::raw("  "));
                    continue;
                }

                let h = heights.get(x, y);
                let t = normalize(h, config.min_height, config.max_height);
                let color = if config.debug_colors {
                    RgbColor::height_gradient(t)
                } else {
                    Self::grey(t)
                };
                let glyph = shade(h, config.min_height, config.max_height);
                spans.push(Span::styled(
                    format!("{glyph}{glyph}"),
                    Style::default().fg(to_color(color)),
                ));
            }
            lines.push(Line::from(spans));
        }

        let title = format!(" Pins {}x{} ", n, n);
        let widget =
            Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(widget, area);
    }

    /// Neutral pin colour darkened toward the base plane.
    fn grey(t: f32) -> RgbColor {
        let scale = 0.35 + 0.65 * t;
        RgbColor::new(
            (f32::from(PIN_COLOR.r) * scale) as u8,
            (f32::from(PIN_COLOR.g) * scale) as u8,
            (f32::from(PIN_COLOR.b) * scale) as u8,
        )
    }
}

const fn to_color(c: RgbColor) -> Color {
    c.to_ratatui_color()
}
