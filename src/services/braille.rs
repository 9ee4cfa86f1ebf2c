//! Braille text rendering onto the pin grid.
//!
//! Each character is a 6-dot cell (2 columns × 3 rows). Bits are numbered by
//! standard dot position, most significant first:
//!
//! ```text
//! dot 1 = 0b100000   dot 4 = 0b000100
//! dot 2 = 0b010000   dot 5 = 0b000010
//! dot 3 = 0b001000   dot 6 = 0b000001
//! ```
//!
//! Cells occupy 3 grid columns (2 dot columns + 1 gap) and 3 grid rows and
//! are laid out left to right, wrapping onto new rows. Cells that do not fit
//! on the grid are dropped.

use tracing::debug;

use crate::config::Config;
use crate::constants::BRAILLE_DOT_FRACTION;
use crate::models::HeightArray;

/// Grid columns consumed per cell (2 dots + 1 gap).
pub const CELL_WIDTH: usize = 3;
/// Grid rows consumed per cell row.
pub const CELL_HEIGHT: usize = 3;

/// Pattern for a blank cell.
pub const BLANK: u8 = 0;

/// 6-bit dot pattern for `ch`; unsupported characters map to [`BLANK`].
#[must_use]
pub fn encode_char(ch: char) -> u8 {
    lookup(ch).unwrap_or(BLANK)
}

/// 6-bit dot pattern for `ch`, or `None` if the table has no entry.
#[must_use]
pub fn lookup(ch: char) -> Option<u8> {
    let pattern = match ch.to_ascii_lowercase() {
        ' ' => BLANK,
        'a' | '1' => 0b100_000,
        'b' | '2' => 0b110_000,
        'c' | '3' => 0b100_100,
        'd' | '4' => 0b100_110,
        'e' | '5' => 0b100_010,
        'f' | '6' => 0b110_100,
        'g' | '7' => 0b110_110,
        'h' | '8' => 0b110_010,
        'i' | '9' => 0b010_100,
        'j' | '0' => 0b010_110,
        'k' => 0b101_000,
        'l' => 0b111_000,
        'm' => 0b101_100,
        'n' => 0b101_110,
        'o' => 0b101_010,
        'p' => 0b111_100,
        'q' => 0b111_110,
        'r' => 0b111_010,
        's' => 0b011_100,
        't' => 0b011_110,
        'u' => 0b101_001,
        'v' => 0b111_001,
        'w' => 0b010_111,
        'x' => 0b101_101,
        'y' => 0b101_111,
        'z' => 0b101_011,
        ',' => 0b010_000,
        ';' => 0b011_000,
        ':' => 0b010_010,
        '.' => 0b010_011,
        '!' => 0b011_010,
        '?' => 0b011_001,
        '\'' => 0b001_000,
        '-' => 0b001_001,
        '(' | ')' => 0b011_011,
        _ => return None,
    };
    Some(pattern)
}

/// Whether dot `(col, row)` is raised in `pattern` (`col ∈ 0..2`, `row ∈ 0..3`).
#[must_use]
pub const fn dot_is_set(pattern: u8, col: usize, row: usize) -> bool {
    let dot = col * 3 + row; // 0-based dot number
    pattern & (0b100_000 >> dot) != 0
}

/// Number of Braille cells that fit on one grid row.
#[must_use]
pub const fn cells_per_row(grid_size: usize) -> usize {
    grid_size / CELL_WIDTH
}

/// Number of cells that fit on the whole grid.
#[must_use]
pub const fn capacity(grid_size: usize) -> usize {
    cells_per_row(grid_size) * (grid_size / CELL_HEIGHT)
}

/// Renders `text` as Braille at `grid_size` resolution.
#[must_use]
pub fn render_text(text: &str, grid_size: usize, config: &Config) -> HeightArray {
    let mut out = HeightArray::new(grid_size, config.min_height);
    render_text_into(&mut out, text, config);
    out
}

/// Renders into an existing array; every non-dot cell is set to `min_height`.
pub fn render_text_into(out: &mut HeightArray, text: &str, config: &Config) {
    let n = out.size();
    out.fill(config.min_height);

    let per_row = cells_per_row(n);
    if per_row == 0 {
        return;
    }

    let dot_height = config
        .clamp_height(config.min_height + BRAILLE_DOT_FRACTION * config.amplitude * config.height_range());

    let mut dropped = 0usize;
    for (i, ch) in text.chars().enumerate() {
        let pattern = match lookup(ch) {
            Some(p) => p,
            None => {
                debug!("No Braille glyph for {:?}, using blank cell", ch);
                BLANK
            }
        };

        let base_x = (i % per_row) * CELL_WIDTH;
        let base_y = (i / per_row) * CELL_HEIGHT;
        if base_y + CELL_HEIGHT > n {
            dropped += 1;
            continue;
        }

        for col in 0..2 {
            for row in 0..3 {
                if dot_is_set(pattern, col, row) {
                    out.set(base_x + col, base_y + row, dot_height);
                }
            }
        }
    }

    // TODO: surface overflow to the caller (paging or scrolling) instead of only logging it
    if dropped > 0 {
        debug!(
            "Braille text overflowed the grid: {} of {} cells dropped",
            dropped,
            text.chars().count()
        );
    }
}
