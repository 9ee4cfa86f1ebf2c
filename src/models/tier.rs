//! Semantic emphasis tiers and their pin heights.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Ordinal emphasis level; higher tiers stand taller.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum HeightTier {
    /// Background reference plane
    #[default]
    Level0,
    /// Subtle relief
    Level1,
    /// Body content
    Level2,
    /// Emphasised content
    Level3,
    /// Maximum emphasis (also used for the focus ring)
    Level4,
}

impl HeightTier {
    /// Fraction of the height range this tier occupies before amplitude.
    #[must_use]
    pub const fn fraction(self) -> f32 {
        match self {
            Self::Level0 => 0.0,
            Self::Level1 => 0.15,
            Self::Level2 => 0.4,
            Self::Level3 => 0.7,
            Self::Level4 => 1.0,
        }
    }

    /// Pin height for this tier under the given configuration.
    ///
    /// `Level0` is always exactly `min_height`; other tiers scale with
    /// `amplitude` and are clamped into `[min_height, max_height]`.
    #[must_use]
    pub fn height(self, config: &Config) -> f32 {
        if self == Self::Level0 {
            return config.min_height;
        }
        let raw = config.min_height + self.fraction() * config.height_range() * config.amplitude;
        config.clamp_height(raw)
    }
}

/// Free-function form of [`HeightTier::height`].
#[must_use]
pub fn height_for_tier(tier: HeightTier, config: &Config) -> f32 {
    tier.height(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [HeightTier; 5] = [
        HeightTier::Level0,
        HeightTier::Level1,
        HeightTier::Level2,
        HeightTier::Level3,
        HeightTier::Level4,
    ];

    #[test]
    fn test_level0_is_min_regardless_of_amplitude() {
        let mut config = Config::new();
        config.min_height = 0.5;
        for amplitude in [0.1, 1.0, 3.0] {
            config.amplitude = amplitude;
            assert!((height_for_tier(HeightTier::Level0, &config) - 0.5).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_tier_heights_stay_in_range() {
        let mut config = Config::new();
        for amplitude in [0.05, 0.5, 1.0, 1.7, 10.0] {
            config.amplitude = amplitude;
            for tier in ALL {
                let h = height_for_tier(tier, &config);
                assert!(h >= config.min_height && h <= config.max_height);
            }
        }
    }

    #[test]
    fn test_tier_proportions() {
        let config = Config::new(); // min 0, max 2, amplitude 1
        assert!((HeightTier::Level1.height(&config) - 0.3).abs() < 1e-6);
        assert!((HeightTier::Level2.height(&config) - 0.8).abs() < 1e-6);
        assert!((HeightTier::Level3.height(&config) - 1.4).abs() < 1e-6);
        assert!((HeightTier::Level4.height(&config) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_overdrive_clamps_at_max() {
        let mut config = Config::new();
        config.amplitude = 2.0;
        assert!((HeightTier::Level3.height(&config) - config.max_height).abs() < 1e-6);
        assert!((HeightTier::Level1.height(&config) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_tiers_are_ordered() {
        assert!(HeightTier::Level0 < HeightTier::Level1);
        assert!(HeightTier::Level3 < HeightTier::Level4);
    }
}
