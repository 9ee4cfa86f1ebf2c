//! Physical pin layout: index space and world placement.
//!
//! # Coordinate Conversion (to world space)
//!
//! - World X = (x - (N - 1) / 2) * `pin_spacing`
//! - World Z = (y - (N - 1) / 2) * `pin_spacing`
//! - World Y = `PIN_BASE_Y` + max(0, height)
//!
//! The four corner cells are never actuated and have no pin index.

use glam::{Mat4, Vec3};

use crate::constants::PIN_BASE_Y;

/// Maps grid cells to the renderer's sequential pin indices.
#[derive(Debug, Clone, PartialEq)]
pub struct PinLayout {
    grid_size: usize,
    pin_spacing: f32,
    /// Row-major cell index -> pin index (None for corners)
    cell_to_pin: Vec<Option<usize>>,
    /// Pin index -> (x, y)
    pin_to_cell: Vec<(usize, usize)>,
}

impl PinLayout {
    /// Builds the layout for an `N×N` grid.
    #[must_use]
    pub fn new(grid_size: usize, pin_spacing: f32) -> Self {
        let mut cell_to_pin = Vec::with_capacity(grid_size * grid_size);
        let mut pin_to_cell = Vec::with_capacity((grid_size * grid_size).saturating_sub(4));

        for y in 0..grid_size {
            for x in 0..grid_size {
                if is_corner(grid_size, x, y) {
                    cell_to_pin.push(None);
                } else {
                    cell_to_pin.push(Some(pin_to_cell.len()));
                    pin_to_cell.push((x, y));
                }
            }
        }

        Self {
            grid_size,
            pin_spacing,
            cell_to_pin,
            pin_to_cell,
        }
    }

    /// Pins per side.
    #[must_use]
    pub const fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Number of actuated pins (`N² − 4`).
    #[must_use]
    pub fn pin_count(&self) -> usize {
        self.pin_to_cell.len()
    }

    /// Whether `(x, y)` is one of the four excluded corners.
    #[must_use]
    pub fn is_corner(&self, x: usize, y: usize) -> bool {
        is_corner(self.grid_size, x, y)
    }

    /// Sequential pin index of a cell, `None` for corners and out-of-range cells.
    #[must_use]
    pub fn pin_index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.grid_size || y >= self.grid_size {
            return None;
        }
        self.cell_to_pin[y * self.grid_size + x]
    }

    /// Grid cell of a pin index.
    #[must_use]
    pub fn cell_of(&self, pin: usize) -> Option<(usize, usize)> {
        self.pin_to_cell.get(pin).copied()
    }

    /// Iterates `(pin_index, x, y)` for every actuated pin.
    pub fn pins(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.pin_to_cell
            .iter()
            .enumerate()
            .map(|(pin, &(x, y))| (pin, x, y))
    }

    /// World transform of the pin at `(x, y)` raised to `height`.
    #[must_use]
    pub fn pin_transform(&self, x: usize, y: usize, height: f32) -> Mat4 {
        let half = (self.grid_size as f32 - 1.0) / 2.0;
        let wx = (x as f32 - half) * self.pin_spacing;
        let wz = (y as f32 - half) * self.pin_spacing;
        let wy = PIN_BASE_Y + height.max(0.0);
        Mat4::from_translation(Vec3::new(wx, wy, wz))
    }
}

fn is_corner(n: usize, x: usize, y: usize) -> bool {
    let last = n.saturating_sub(1);
    (x == 0 || x == last) && (y == 0 || y == last)
}
