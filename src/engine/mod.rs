//! Pin field engine.
//!
//! The engine owns three generations of heights (`target`, `current`,
//! `previous`) and exactly one active content source. Each tick it:
//!
//! 1. advances elapsed time and fires the live-image refresh if due,
//! 2. fills `target` from the active source,
//! 3. eases `current` toward `target` (snap in ideal mode),
//! 4. pushes only pins whose height moved by more than `DIRTY_EPSILON`.
//!
//! The tick never fails. Content errors are logged and masked by the
//! background or diagnostic pattern before they reach it.

pub mod intent;
pub mod refresh;
pub mod substrate;

pub use intent::{Intent, IntentOutcome};
pub use refresh::{RefreshHandle, RefreshScheduler, RefreshTask};
pub use substrate::{InstanceBuffer, RenderSubstrate};

use anyhow::Result;
use glam::Mat4;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigUpdate, DisplayMode, PhysicsMode};
use crate::constants::{DIRTY_EPSILON, FIRST_FRAME_DELAY, IMAGE_REFRESH_INTERVAL};
use crate::models::{HeightArray, HeightTier, PinLayout, RgbColor, SemanticPage, PIN_COLOR};
use crate::services::fetch::ImageFetcher;
use crate::services::navigation::NavigationState;
use crate::services::raster::{self, RasterOptions};
use crate::services::sources::LiveSource;
use crate::services::{braille, compositor, patterns};

/// Which content source currently feeds the target heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Procedural pattern
    Pattern,
    /// Semantic page compositor
    Compositor,
    /// Braille reading overlay
    Reading,
    /// Raster image overlay
    Image,
    /// Diagnostic X after a failed image load
    Diagnostic,
}

impl Mode {
    /// Lowercase name for status lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pattern => "pattern",
            Self::Compositor => "compositor",
            Self::Reading => "reading",
            Self::Image => "image",
            Self::Diagnostic => "diagnostic",
        }
    }

    /// Whether this is an overlay that `Exit` leaves.
    #[must_use]
    pub const fn is_overlay(self) -> bool {
        matches!(self, Self::Reading | Self::Image | Self::Diagnostic)
    }
}

#[derive(Debug)]
struct ImageContent {
    url: String,
    source: Box<dyn LiveSource>,
    heights: HeightArray,
    refresh: Option<RefreshTask>,
    attached_at: f64,
}

impl ImageContent {
    fn resample(&mut self, now: f64, opts: &RasterOptions) {
        raster::process_source_into(
            &mut self.heights,
            self.source.as_ref(),
            (now - self.attached_at) as f32,
            opts,
        );
    }
}

#[derive(Debug)]
enum Content {
    Pattern,
    Compositor,
    Reading { text: String },
    Image(Box<ImageContent>),
    Diagnostic { reason: String },
}

impl Content {
    const fn mode(&self) -> Mode {
        match self {
            Self::Pattern => Mode::Pattern,
            Self::Compositor => Mode::Compositor,
            Self::Reading { .. } => Mode::Reading,
            Self::Image(_) => Mode::Image,
            Self::Diagnostic { .. } => Mode::Diagnostic,
        }
    }

    const fn base(display_mode: DisplayMode) -> Self {
        match display_mode {
            DisplayMode::Pattern => Self::Pattern,
            DisplayMode::Web => Self::Compositor,
        }
    }
}

/// The simulation core driving the pin field.
#[derive(Debug)]
pub struct PinFieldEngine {
    config: Config,
    layout: PinLayout,
    target: HeightArray,
    current: HeightArray,
    previous: HeightArray,
    elapsed: f64,
    content: Content,
    navigation: NavigationState,
    scheduler: RefreshScheduler,
    needs_rebuild: bool,
    needs_full_upload: bool,
    last_dirty: usize,
    transform_updates: Vec<(usize, Mat4)>,
    color_updates: Vec<(usize, RgbColor)>,
}

impl PinFieldEngine {
    /// Creates an engine for a validated configuration.
    ///
    /// The first tick rebuilds the substrate and uploads every pin.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let n = config.grid_size;
        let min = config.min_height;
        let content = Content::base(config.display_mode);
        info!("Pin field {}x{} ({} mode)", n, n, content.mode().label());

        Ok(Self {
            layout: PinLayout::new(n, config.pin_spacing),
            target: HeightArray::new(n, min),
            current: HeightArray::new(n, min),
            previous: HeightArray::new(n, min),
            elapsed: 0.0,
            content,
            navigation: NavigationState::new(),
            scheduler: RefreshScheduler::new(),
            needs_rebuild: true,
            needs_full_upload: true,
            last_dirty: 0,
            transform_updates: Vec::new(),
            color_updates: Vec::new(),
            config,
        })
    }

    /// Active configuration snapshot.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Pin index layout for the current grid.
    #[must_use]
    pub const fn layout(&self) -> &PinLayout {
        &self.layout
    }

    /// Navigation cursor over the loaded page.
    #[must_use]
    pub const fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    /// Active content mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.content.mode()
    }

    /// Accumulated engine time in seconds.
    ///
    /// Kept in `f64` so frame-sized steps still register after days of
    /// uptime; formula inputs are narrowed to `f32` per tick.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Desired heights from the last tick.
    #[must_use]
    pub const fn target_heights(&self) -> &HeightArray {
        &self.target
    }

    /// Rendered (eased) heights.
    #[must_use]
    pub const fn current_heights(&self) -> &HeightArray {
        &self.current
    }

    /// Number of pins pushed by the last tick.
    #[must_use]
    pub const fn last_dirty_count(&self) -> usize {
        self.last_dirty
    }

    /// Handle of the running image refresh task, if any.
    #[must_use]
    pub const fn active_refresh(&self) -> Option<RefreshHandle> {
        self.scheduler.active()
    }

    /// Text being read in reading mode.
    #[must_use]
    pub fn reading_text(&self) -> Option<&str> {
        match &self.content {
            Content::Reading { text } => Some(text),
            _ => None,
        }
    }

    /// URL of the displayed image in image mode.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match &self.content {
            Content::Image(image) => Some(&image.url),
            _ => None,
        }
    }

    /// Reason for the diagnostic pattern, if shown.
    #[must_use]
    pub fn diagnostic_reason(&self) -> Option<&str> {
        match &self.content {
            Content::Diagnostic { reason } => Some(reason),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Mode transitions
    // ------------------------------------------------------------------

    fn switch(&mut self, content: Content) {
        self.scheduler.cancel();
        debug!(
            "Mode {} -> {}",
            self.content.mode().label(),
            content.mode().label()
        );
        self.content = content;
    }

    /// Shows the procedural pattern.
    pub fn enter_pattern(&mut self) {
        self.switch(Content::Pattern);
    }

    /// Shows the loaded page through the compositor.
    pub fn enter_compositor(&mut self) {
        self.switch(Content::Compositor);
    }

    /// Replaces the page, resets navigation and shows it.
    pub fn set_page(&mut self, page: SemanticPage) {
        info!(
            "Loaded page {:?} ({} primitives)",
            page.title.as_deref().unwrap_or("untitled"),
            page.primitive_count()
        );
        self.navigation.load(page);
        self.enter_compositor();
    }

    /// Drops the page; the compositor falls back to the background plane.
    pub fn clear_page(&mut self) {
        self.navigation.clear();
    }

    /// Moves focus to the landmark or block with `id`.
    pub fn focus(&mut self, id: &str) -> bool {
        self.navigation.focus_id(id)
    }

    /// Shows `text` as Braille.
    pub fn enter_reading(&mut self, text: impl Into<String>) {
        self.switch(Content::Reading { text: text.into() });
    }

    /// Shows an already-loaded raster source.
    ///
    /// Animated sources get a fresh refresh task; any previous task is
    /// cancelled first.
    pub fn enter_image(&mut self, url: impl Into<String>, source: Box<dyn LiveSource>) {
        self.scheduler.cancel();

        let mut image = ImageContent {
            url: url.into(),
            heights: HeightArray::new(self.config.grid_size, self.config.min_height),
            refresh: None,
            attached_at: self.elapsed,
            source,
        };
        image.resample(self.elapsed, &RasterOptions::from(&self.config));

        if image.source.is_animated() {
            let handle = self.scheduler.start();
            debug!("Started refresh task {:?} for {}", handle, image.url);
            image.refresh = Some(RefreshTask::new(
                handle,
                f64::from(IMAGE_REFRESH_INTERVAL),
                self.elapsed,
            ));
        }

        info!("Showing image {}", image.url);
        self.content = Content::Image(Box::new(image));
    }

    /// Shows the diagnostic X.
    pub fn show_diagnostic(&mut self, reason: impl Into<String>) {
        self.switch(Content::Diagnostic {
            reason: reason.into(),
        });
    }

    /// Leaves reading/image/diagnostic mode for the configured base mode.
    ///
    /// Returns `false` if no overlay was active.
    pub fn exit_overlay(&mut self) -> bool {
        if !self.mode().is_overlay() {
            return false;
        }
        self.switch(Content::base(self.config.display_mode));
        true
    }

    /// Fetches, decodes and shows an image.
    ///
    /// Animated sources wait `FIRST_FRAME_DELAY` before the first sample.
    /// Failures are logged and shown as the diagnostic pattern; the return
    /// value tells whether the image itself is on screen.
    pub async fn load_image<F: ImageFetcher + ?Sized>(&mut self, fetcher: &F, url: &str) -> bool {
        let proxy = self.config.proxy().map(str::to_owned);
        match raster::load_source(fetcher, url, proxy.as_deref()).await {
            Ok(source) => {
                if source.is_animated() {
                    tokio::time::sleep(FIRST_FRAME_DELAY).await;
                }
                self.enter_image(url, source);
                true
            }
            Err(e) => {
                warn!("Image {} unavailable: {}", url, e);
                self.show_diagnostic(e.to_string());
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Applies a navigation intent.
    pub fn handle_intent(&mut self, intent: Intent) -> IntentOutcome {
        match intent {
            Intent::NextLandmark => IntentOutcome::from_flag(self.navigation.next_landmark()),
            Intent::PreviousLandmark => {
                IntentOutcome::from_flag(self.navigation.previous_landmark())
            }
            Intent::NextBlock => IntentOutcome::from_flag(self.navigation.next_block()),
            Intent::PreviousBlock => IntentOutcome::from_flag(self.navigation.previous_block()),
            Intent::ToggleMode => {
                if self.navigation.page().is_none() {
                    return IntentOutcome::Ignored;
                }
                self.navigation.toggle_mode();
                IntentOutcome::Handled
            }
            Intent::Activate => self.activate(),
            Intent::Exit => IntentOutcome::from_flag(self.exit_overlay()),
        }
    }

    fn activate(&mut self) -> IntentOutcome {
        let Some(focused) = self.navigation.focused_primitive() else {
            return IntentOutcome::Ignored;
        };

        if let Some(url) = &focused.image {
            return IntentOutcome::LoadImage(url.clone());
        }

        match focused.text.clone().or_else(|| focused.id.clone()) {
            Some(text) => {
                self.enter_reading(text);
                IntentOutcome::Handled
            }
            None => IntentOutcome::Ignored,
        }
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Applies a partial configuration update.
    ///
    /// Invalid updates are rejected and leave the engine unchanged. A grid
    /// size change reallocates every height generation and rebuilds the
    /// substrate on the next tick.
    pub fn update_config(&mut self, update: ConfigUpdate) -> Result<()> {
        let old = self.config.clone();
        self.config.apply(update)?;

        let resized = self.config.grid_size != old.grid_size;
        if resized {
            self.reallocate();
        } else if (self.config.pin_spacing - old.pin_spacing).abs() > f32::EPSILON {
            self.layout = PinLayout::new(self.config.grid_size, self.config.pin_spacing);
            self.needs_full_upload = true;
        }

        if self.config.debug_colors != old.debug_colors {
            self.needs_full_upload = true;
        }

        if self.config.display_mode != old.display_mode && !self.mode().is_overlay() {
            self.switch(Content::base(self.config.display_mode));
        }

        let opts = RasterOptions::from(&self.config);
        if resized || opts != RasterOptions::from(&old) {
            let now = self.elapsed;
            if let Content::Image(image) = &mut self.content {
                image.heights = HeightArray::new(self.config.grid_size, self.config.min_height);
                image.resample(now, &opts);
            }
        }

        Ok(())
    }

    fn reallocate(&mut self) {
        let n = self.config.grid_size;
        let min = self.config.min_height;
        info!("Grid resized to {}x{}, reallocating height arrays", n, n);

        self.layout = PinLayout::new(n, self.config.pin_spacing);
        self.target = HeightArray::new(n, min);
        self.current = HeightArray::new(n, min);
        self.previous = HeightArray::new(n, min);
        self.needs_rebuild = true;
        self.needs_full_upload = true;
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advances the simulation by `dt` seconds and publishes changed pins.
    ///
    /// Returns the number of pins pushed to `substrate`.
    pub fn tick(&mut self, dt: f32, substrate: &mut dyn RenderSubstrate) -> usize {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += f64::from(dt);
        }

        self.poll_refresh();
        self.fill_target();
        self.ease();
        self.publish(substrate)
    }

    fn poll_refresh(&mut self) {
        let now = self.elapsed;
        if let Content::Image(image) = &mut self.content {
            let due = image
                .refresh
                .as_mut()
                .is_some_and(|task| task.poll(&self.scheduler, now));
            if due {
                image.resample(now, &RasterOptions::from(&self.config));
            }
        }
    }

    fn fill_target(&mut self) {
        let time = self.elapsed as f32;
        let (min, max) = (self.config.min_height, self.config.max_height);

        match &self.content {
            Content::Pattern => patterns::render_pattern_into(&mut self.target, &self.config, time),
            Content::Compositor => match self.navigation.page() {
                Some(page) => compositor::render_page_into(
                    &mut self.target,
                    page,
                    &self.config,
                    self.navigation.focused_primitive(),
                    time,
                ),
                None => self.target.fill(HeightTier::Level0.height(&self.config)),
            },
            Content::Reading { text } => {
                braille::render_text_into(&mut self.target, text, &self.config);
            }
            Content::Image(image) => self.target.copy_from(&image.heights),
            Content::Diagnostic { .. } => raster::write_diagnostic(&mut self.target, min, max),
        }

        self.target.clamp(min, max);
    }

    fn ease(&mut self) {
        match self.config.physics_mode {
            PhysicsMode::Ideal => self.current.copy_from(&self.target),
            PhysicsMode::Plausible => {
                let k = self.config.response_speed;
                for (current, target) in self
                    .current
                    .as_mut_slice()
                    .iter_mut()
                    .zip(self.target.as_slice())
                {
                    *current += (target - *current) * k;
                }
            }
        }
        self.current
            .clamp(self.config.min_height, self.config.max_height);
    }

    fn publish(&mut self, substrate: &mut dyn RenderSubstrate) -> usize {
        if self.needs_rebuild {
            debug!("Rebuilding substrate for {} pins", self.layout.pin_count());
            substrate.rebuild(self.layout.pin_count());
            self.needs_rebuild = false;
        }

        let full = std::mem::take(&mut self.needs_full_upload);
        let push_colors = full || self.config.debug_colors;
        let min = self.config.min_height;
        let range = self.config.height_range();

        self.transform_updates.clear();
        self.color_updates.clear();

        for (pin, x, y) in self.layout.pins() {
            let height = self.current.get(x, y);
            if !full && (height - self.previous.get(x, y)).abs() <= DIRTY_EPSILON {
                continue;
            }

            self.transform_updates
                .push((pin, self.layout.pin_transform(x, y, height)));
            if push_colors {
                let color = if self.config.debug_colors {
                    RgbColor::height_gradient((height - min) / range)
                } else {
                    PIN_COLOR
                };
                self.color_updates.push((pin, color));
            }
            self.previous.set(x, y, height);
        }

        if !self.transform_updates.is_empty() {
            substrate.set_instance_transforms(&self.transform_updates);
        }
        if !self.color_updates.is_empty() {
            substrate.set_instance_colors(&self.color_updates);
        }

        self.last_dirty = self.transform_updates.len();
        self.last_dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PatternKind;

    fn ideal_flat(grid: usize) -> Config {
        Config {
            grid_size: grid,
            physics_mode: PhysicsMode::Ideal,
            pattern: PatternKind::Flat,
            ..Config::new()
        }
    }

    #[test]
    fn test_first_tick_uploads_everything() {
        let mut engine = PinFieldEngine::new(ideal_flat(5)).unwrap();
        let mut buf = InstanceBuffer::new();
        let dirty = engine.tick(0.016, &mut buf);
        assert_eq!(dirty, 21);
        assert_eq!(buf.len(), 21);
        assert_eq!(buf.rebuild_count(), 1);
        assert_eq!(buf.last_color_upload(), 21);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = Config::new();
        config.grid_size = 0;
        assert!(PinFieldEngine::new(config).is_err());
    }

    #[test]
    fn test_plausible_easing_approaches_target() {
        let mut config = ideal_flat(4);
        config.physics_mode = PhysicsMode::Plausible;
        config.response_speed = 0.5;
        let mut engine = PinFieldEngine::new(config).unwrap();
        engine.enter_reading("l");
        let mut buf = InstanceBuffer::new();

        engine.tick(0.0, &mut buf);
        let target = engine.target_heights().get(0, 0);
        let first = engine.current_heights().get(0, 0);
        assert!((first - target * 0.5).abs() < 1e-6);
        engine.tick(0.0, &mut buf);
        let second = engine.current_heights().get(0, 0);
        assert!((second - target * 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_exit_restores_base_mode() {
        let mut config = ideal_flat(4);
        config.display_mode = DisplayMode::Web;
        let mut engine = PinFieldEngine::new(config).unwrap();
        assert_eq!(engine.mode(), Mode::Compositor);

        engine.enter_reading("hi");
        assert_eq!(engine.handle_intent(Intent::Exit), IntentOutcome::Handled);
        assert_eq!(engine.mode(), Mode::Compositor);
        assert_eq!(engine.handle_intent(Intent::Exit), IntentOutcome::Ignored);
    }

    #[test]
    fn test_compositor_without_page_is_background() {
        let mut config = ideal_flat(4);
        config.display_mode = DisplayMode::Web;
        let mut engine = PinFieldEngine::new(config).unwrap();
        let mut buf = InstanceBuffer::new();
        engine.tick(0.1, &mut buf);
        assert!(engine
            .current_heights()
            .as_slice()
            .iter()
            .all(|h| h.abs() < f32::EPSILON));
    }

    #[test]
    fn test_debug_toggle_forces_color_upload() {
        let mut engine = PinFieldEngine::new(ideal_flat(4)).unwrap();
        let mut buf = InstanceBuffer::new();
        engine.tick(0.0, &mut buf);
        engine.tick(0.0, &mut buf);
        assert_eq!(engine.last_dirty_count(), 0);

        engine
            .update_config(ConfigUpdate {
                debug_colors: Some(true),
                ..ConfigUpdate::default()
            })
            .unwrap();
        assert_eq!(engine.tick(0.0, &mut buf), 12);
        // Flat field at min height is blue
        assert_eq!(buf.color(0), Some(RgbColor::height_gradient(0.0)));
    }

    #[test]
    fn test_clock_advances_after_long_uptime() {
        let mut config = ideal_flat(8);
        config.pattern = PatternKind::Wave;
        let mut engine = PinFieldEngine::new(config).unwrap();
        let mut buf = InstanceBuffer::new();

        engine.tick(600_000.0, &mut buf);
        let before = engine.elapsed();
        let mut dirty = 0;
        for _ in 0..60 {
            dirty += engine.tick(1.0 / 60.0, &mut buf);
        }
        assert!((engine.elapsed() - before - 1.0).abs() < 1e-4);
        assert!(dirty > 0);
    }
}
