//! Render substrate contract and an in-memory implementation.
//!
//! The substrate is addressed by sequential pin index (corners excluded).
//! The engine only ever pushes changed indices, except right after a rebuild.

use glam::Mat4;

use crate::models::RgbColor;

/// Instanced-draw target for pin transforms and colours.
pub trait RenderSubstrate {
    /// Reallocates the instance buffer for `pin_count` pins.
    fn rebuild(&mut self, pin_count: usize);

    /// Updates the transforms of the listed pins.
    fn set_instance_transforms(&mut self, updates: &[(usize, Mat4)]);

    /// Updates the colours of the listed pins.
    fn set_instance_colors(&mut self, updates: &[(usize, RgbColor)]);
}

/// Plain in-memory instance buffer.
///
/// Used by the headless runner, the terminal preview and tests. Keeps
/// upload statistics so callers can observe dirty-checking.
#[derive(Debug, Clone, Default)]
pub struct InstanceBuffer {
    transforms: Vec<Mat4>,
    colors: Vec<RgbColor>,
    rebuilds: usize,
    last_transform_upload: usize,
    last_color_upload: usize,
    total_transform_uploads: usize,
}

impl InstanceBuffer {
    /// Creates an empty buffer (no pins until the first rebuild).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated pin instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether no pins are allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Transform of a pin.
    #[must_use]
    pub fn transform(&self, pin: usize) -> Option<&Mat4> {
        self.transforms.get(pin)
    }

    /// Colour of a pin.
    #[must_use]
    pub fn color(&self, pin: usize) -> Option<RgbColor> {
        self.colors.get(pin).copied()
    }

    /// World-space height (translation Y) of a pin.
    #[must_use]
    pub fn pin_height(&self, pin: usize) -> Option<f32> {
        self.transforms.get(pin).map(|m| m.w_axis.y)
    }

    /// Times `rebuild` has been called.
    #[must_use]
    pub const fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    /// Pins in the most recent transform upload.
    #[must_use]
    pub const fn last_transform_upload(&self) -> usize {
        self.last_transform_upload
    }

    /// Pins in the most recent colour upload.
    #[must_use]
    pub const fn last_color_upload(&self) -> usize {
        self.last_color_upload
    }

    /// Sum of all transform uploads since creation.
    #[must_use]
    pub const fn total_transform_uploads(&self) -> usize {
        self.total_transform_uploads
    }
}

impl RenderSubstrate for InstanceBuffer {
    fn rebuild(&mut self, pin_count: usize) {
        self.transforms = vec![Mat4::IDENTITY; pin_count];
        self.colors = vec![RgbColor::default(); pin_count];
        self.rebuilds += 1;
    }

    fn set_instance_transforms(&mut self, updates: &[(usize, Mat4)]) {
        for &(pin, m) in updates {
            if let Some(slot) = self.transforms.get_mut(pin) {
                *slot = m;
            }
        }
        self.last_transform_upload = updates.len();
        self.total_transform_uploads += updates.len();
    }

    fn set_instance_colors(&mut self, updates: &[(usize, RgbColor)]) {
        for &(pin, c) in updates {
            if let Some(slot) = self.colors.get_mut(pin) {
                *slot = c;
            }
        }
        self.last_color_upload = updates.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_rebuild_resets_instances() {
        let mut buf = InstanceBuffer::new();
        assert!(buf.is_empty());
        buf.rebuild(5);
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.rebuild_count(), 1);
    }

    #[test]
    fn test_updates_ignore_out_of_range() {
        let mut buf = InstanceBuffer::new();
        buf.rebuild(2);
        let m = Mat4::from_translation(Vec3::new(0.0, 1.5, 0.0));
        buf.set_instance_transforms(&[(1, m), (9, m)]);
        assert_eq!(buf.pin_height(1), Some(1.5));
        assert_eq!(buf.last_transform_upload(), 2);
        assert_eq!(buf.pin_height(9), None);
    }
}
