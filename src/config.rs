//! Configuration management for the pin field.
//!
//! This module handles loading, validating, and saving the simulator
//! configuration in TOML format with platform-specific directory resolution.
//! Values missing from the file fall back to the hardcoded defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::constants::{MAX_GRID_SIZE, MIN_GRID_SIZE};

/// How current pin heights follow their targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsMode {
    /// Pins snap to their target on every tick
    Ideal,
    /// Exponential easing toward the target (approximates actuator lag)
    #[default]
    Plausible,
}

/// Procedural pattern shown in `pattern` display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Diagonal travelling sine wave
    #[default]
    Wave,
    /// Concentric ripple from the grid centre
    Ripple,
    /// Static gaussian bump
    Gaussian,
    /// Product of two offset sinusoids
    Noise,
    /// Everything at minimum height
    Flat,
}

impl PatternKind {
    /// All patterns in cycling order.
    pub const ALL: [Self; 5] = [
        Self::Wave,
        Self::Ripple,
        Self::Gaussian,
        Self::Noise,
        Self::Flat,
    ];

    /// Returns the pattern after this one, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Which base content source feeds the field when no overlay is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Procedural pattern
    #[default]
    Pattern,
    /// Semantic page compositor
    Web,
}

/// Simulator configuration.
///
/// # File Location
///
/// - Linux: `~/.config/PinField/config.toml`
/// - macOS: `~/Library/Application Support/PinField/config.toml`
/// - Windows: `%APPDATA%\PinField\config.toml`
///
/// # Validation
///
/// - `grid_size` must be within `[MIN_GRID_SIZE, MAX_GRID_SIZE]`
/// - `min_height` must be strictly below `max_height`
/// - `amplitude` and `pin_spacing` must be positive
/// - `response_speed` must be in `(0, 1]`
/// - `contrast` must be non-negative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pins per side of the square grid
    pub grid_size: usize,
    /// World-space distance between neighbouring pins
    pub pin_spacing: f32,
    /// Lowest pin height (background plane)
    pub min_height: f32,
    /// Highest pin height
    pub max_height: f32,
    /// Height multiplier; may exceed 1.0 to over-drive tiers
    pub amplitude: f32,
    /// Easing factor per tick in plausible mode (smaller = slower)
    pub response_speed: f32,
    /// Ideal snap or plausible easing
    pub physics_mode: PhysicsMode,
    /// Procedural pattern for pattern mode
    pub pattern: PatternKind,
    /// Time multiplier for procedural patterns
    pub pattern_speed: f32,
    /// Base content source
    pub display_mode: DisplayMode,
    /// Recolour pins by height (blue to red)
    pub debug_colors: bool,
    /// Sobel edge enhancement for raster sources
    pub edge_detection: bool,
    /// Contrast factor applied to raster luminance
    pub contrast: f32,
    /// URL prefix used for the single proxy retry when pixel reads are denied
    /// (empty disables the retry)
    pub image_proxy: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial configuration update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    /// New grid size (forces reallocation)
    pub grid_size: Option<usize>,
    /// New pin spacing
    pub pin_spacing: Option<f32>,
    /// New minimum height
    pub min_height: Option<f32>,
    /// New maximum height
    pub max_height: Option<f32>,
    /// New amplitude
    pub amplitude: Option<f32>,
    /// New response speed
    pub response_speed: Option<f32>,
    /// New physics mode
    pub physics_mode: Option<PhysicsMode>,
    /// New pattern
    pub pattern: Option<PatternKind>,
    /// New pattern speed
    pub pattern_speed: Option<f32>,
    /// New display mode
    pub display_mode: Option<DisplayMode>,
    /// Toggle debug colours
    pub debug_colors: Option<bool>,
    /// Toggle edge detection
    pub edge_detection: Option<bool>,
    /// New contrast
    pub contrast: Option<f32>,
    /// New proxy prefix (empty string disables the retry)
    pub image_proxy: Option<String>,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid_size: 40,
            pin_spacing: 0.25,
            min_height: 0.0,
            max_height: 2.0,
            amplitude: 1.0,
            response_speed: 0.15,
            physics_mode: PhysicsMode::default(),
            pattern: PatternKind::default(),
            pattern_speed: 1.0,
            display_mode: DisplayMode::default(),
            debug_colors: false,
            edge_detection: true,
            contrast: 1.5,
            image_proxy: "https://corsproxy.io/?url=".to_string(),
        }
    }

    /// Height span between the lowest and highest pin position.
    #[must_use]
    pub fn height_range(&self) -> f32 {
        self.max_height - self.min_height
    }

    /// Clamps a height into `[min_height, max_height]`.
    #[must_use]
    pub fn clamp_height(&self, height: f32) -> f32 {
        height.clamp(self.min_height, self.max_height)
    }

    /// Proxy prefix for the pixel-read retry, if one is configured.
    #[must_use]
    pub fn proxy(&self) -> Option<&str> {
        let proxy = self.image_proxy.trim();
        (!proxy.is_empty()).then_some(proxy)
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("PinField");

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Loads configuration from the platform config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Loads the platform config, falling back to defaults with a warning
    /// when the file cannot be read, parsed or validated.
    #[must_use]
    pub fn load_or_default() -> Self {
        match Self::config_file_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                warn!("Using default config: {:#}", e);
                Self::new()
            }
        }
    }

    /// Like [`Config::load_from`], but logs the error and returns defaults.
    #[must_use]
    pub fn load_or_default_from(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            warn!("Ignoring config file, using defaults: {:#}", e);
            Self::new()
        })
    }

    /// Loads configuration from an explicit path, merging it over defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .context(format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Saves configuration to the platform config file.
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit path using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, path).context(format!(
            "Failed to rename temp config file to: {}",
            path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            anyhow::bail!(
                "grid_size {} out of range ({}..={})",
                self.grid_size,
                MIN_GRID_SIZE,
                MAX_GRID_SIZE
            );
        }

        if !self.min_height.is_finite() || !self.max_height.is_finite() {
            anyhow::bail!("min_height and max_height must be finite");
        }

        if self.min_height >= self.max_height {
            anyhow::bail!(
                "min_height ({}) must be below max_height ({})",
                self.min_height,
                self.max_height
            );
        }

        if !(self.amplitude > 0.0 && self.amplitude.is_finite()) {
            anyhow::bail!("amplitude must be positive, got {}", self.amplitude);
        }

        if !(self.pin_spacing > 0.0 && self.pin_spacing.is_finite()) {
            anyhow::bail!("pin_spacing must be positive, got {}", self.pin_spacing);
        }

        if !(self.response_speed > 0.0 && self.response_speed <= 1.0) {
            anyhow::bail!(
                "response_speed must be in (0, 1], got {}",
                self.response_speed
            );
        }

        if !self.pattern_speed.is_finite() {
            anyhow::bail!("pattern_speed must be finite");
        }

        if !(self.contrast >= 0.0 && self.contrast.is_finite()) {
            anyhow::bail!("contrast must be non-negative, got {}", self.contrast);
        }

        Ok(())
    }

    /// Applies a partial update.
    ///
    /// The update is validated as a whole; on failure the configuration is
    /// left untouched.
    pub fn apply(&mut self, update: ConfigUpdate) -> Result<()> {
        let mut next = self.clone();

        if let Some(v) = update.grid_size {
            next.grid_size = v;
        }
        if let Some(v) = update.pin_spacing {
            next.pin_spacing = v;
        }
        if let Some(v) = update.min_height {
            next.min_height = v;
        }
        if let Some(v) = update.max_height {
            next.max_height = v;
        }
        if let Some(v) = update.amplitude {
            next.amplitude = v;
        }
        if let Some(v) = update.response_speed {
            next.response_speed = v;
        }
        if let Some(v) = update.physics_mode {
            next.physics_mode = v;
        }
        if let Some(v) = update.pattern {
            next.pattern = v;
        }
        if let Some(v) = update.pattern_speed {
            next.pattern_speed = v;
        }
        if let Some(v) = update.display_mode {
            next.display_mode = v;
        }
        if let Some(v) = update.debug_colors {
            next.debug_colors = v;
        }
        if let Some(v) = update.edge_detection {
            next.edge_detection = v;
        }
        if let Some(v) = update.contrast {
            next.contrast = v;
        }
        if let Some(v) = update.image_proxy {
            next.image_proxy = v;
        }

        next.validate()?;
        *self = next;
        Ok(())
    }
}
