//! Dense per-pin height storage.

/// Square array of pin heights, indexed by `(x, y)` with `x, y ∈ [0, size)`.
///
/// Stored row-major (`y * size + x`). Corners are stored like any other
/// cell; the pin layout decides which cells are physically actuated.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightArray {
    size: usize,
    values: Vec<f32>,
}

impl HeightArray {
    /// Creates a `size × size` array filled with `value`.
    #[must_use]
    pub fn new(size: usize, value: f32) -> Self {
        Self {
            size,
            values: vec![value; size * size],
        }
    }

    /// Builds an array by evaluating `f(x, y)` for every cell.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut values = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                values.push(f(x, y));
            }
        }
        Self { size, values }
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Flat index of a cell.
    #[must_use]
    pub const fn index(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    /// Height at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the grid.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[self.index(x, y)]
    }

    /// Sets the height at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let idx = self.index(x, y);
        self.values[idx] = value;
    }

    /// Overwrites every cell with `value`.
    pub fn fill(&mut self, value: f32) {
        self.values.fill(value);
    }

    /// Copies all values from another array of the same size.
    pub fn copy_from(&mut self, other: &Self) {
        debug_assert_eq!(self.size, other.size);
        self.values.copy_from_slice(&other.values);
    }

    /// Clamps every value into `[min, max]`, replacing non-finite values with `min`.
    pub fn clamp(&mut self, min: f32, max: f32) {
        for v in &mut self.values {
            *v = if v.is_finite() { v.clamp(min, max) } else { min };
        }
    }

    /// Raw row-major values.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Iterates `(x, y, height)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let size = self.size;
        self.values
            .iter()
            .enumerate()
            .map(move |(i, v)| (i % size, i / size, *v))
    }

    /// Smallest and largest stored value (`None` for an empty array).
    #[must_use]
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.values.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Text relief, one line per row, each cell drawn twice for aspect.
    #[must_use]
    pub fn to_relief_string(&self, min: f32, max: f32) -> String {
        let mut out = String::with_capacity(self.size * (self.size * 2 + 1));
        for y in 0..self.size {
            for x in 0..self.size {
                let glyph = shade(self.get(x, y), min, max);
                out.push(glyph);
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

/// Glyph ramp from lowest to highest.
pub const SHADE_RAMP: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// Shade glyph for `value` within `[min, max]`.
#[must_use]
pub fn shade(value: f32, min: f32, max: f32) -> char {
    let t = normalize(value, min, max);
    let idx = (t * (SHADE_RAMP.len() - 1) as f32).round() as usize;
    SHADE_RAMP[idx.min(SHADE_RAMP.len() - 1)]
}

/// Maps `value` into `[0, 1]` relative to `[min, max]` (0 for degenerate ranges).
#[must_use]
pub fn normalize(value: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    ((value - min) / range).clamp(0.0, 1.0)
}
