//! Keyboard-style navigation over a semantic page.
//!
//! Navigation is two-level: a landmark cursor that cycles through the
//! page's regions, and a block cursor over the direct children of the
//! current landmark. Cursors wrap in both directions.

use tracing::debug;

use crate::models::{Primitive, SemanticPage};

/// Which level the navigation cursor is operating on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavMode {
    /// Moving between landmarks
    #[default]
    Region,
    /// Moving between blocks inside the current landmark
    Block,
}

/// Focus cursor over the current page.
///
/// Invariants: when a page with `L > 0` landmarks is loaded,
/// `landmark < L`; in block mode with `B > 0` blocks, `block < B`.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    page: Option<SemanticPage>,
    landmark: usize,
    block: usize,
    mode: NavMode,
}

impl NavigationState {
    /// Creates an empty navigator (no page loaded).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current page and resets the cursor to the first landmark
    /// and block. The region/block mode carries over.
    pub fn load(&mut self, page: SemanticPage) {
        debug!(
            "Navigator loaded page with {} landmarks",
            page.landmarks.len()
        );
        self.page = Some(page);
        self.reset();
    }

    /// Drops the current page.
    pub fn clear(&mut self) {
        self.page = None;
        self.reset();
    }

    fn reset(&mut self) {
        self.landmark = 0;
        self.block = 0;
    }

    /// The loaded page, if any.
    #[must_use]
    pub const fn page(&self) -> Option<&SemanticPage> {
        self.page.as_ref()
    }

    /// Current navigation level.
    #[must_use]
    pub const fn mode(&self) -> NavMode {
        self.mode
    }

    /// Index of the current landmark.
    #[must_use]
    pub const fn landmark_index(&self) -> usize {
        self.landmark
    }

    /// Index of the current block within its landmark.
    #[must_use]
    pub const fn block_index(&self) -> usize {
        self.block
    }

    fn landmark_count(&self) -> usize {
        self.page.as_ref().map_or(0, |p| p.landmarks.len())
    }

    fn block_count(&self) -> usize {
        self.current_landmark().map_or(0, |l| l.children.len())
    }

    /// The landmark under the cursor.
    #[must_use]
    pub fn current_landmark(&self) -> Option<&Primitive> {
        self.page.as_ref()?.landmarks.get(self.landmark)
    }

    /// The block under the cursor (only meaningful in block mode).
    #[must_use]
    pub fn current_block(&self) -> Option<&Primitive> {
        self.current_landmark()?.children.get(self.block)
    }

    /// Moves to the next landmark (wrapping) and resets the block cursor.
    ///
    /// Returns `false` if no page or no landmarks are loaded.
    pub fn next_landmark(&mut self) -> bool {
        let count = self.landmark_count();
        if count == 0 {
            return false;
        }
        self.landmark = (self.landmark + 1) % count;
        self.block = 0;
        true
    }

    /// Moves to the previous landmark (wrapping) and resets the block cursor.
    pub fn previous_landmark(&mut self) -> bool {
        let count = self.landmark_count();
        if count == 0 {
            return false;
        }
        self.landmark = (self.landmark + count - 1) % count;
        self.block = 0;
        true
    }

    /// Moves to the next block of the current landmark (wrapping).
    ///
    /// Returns `false` in region mode or when the landmark has no blocks.
    pub fn next_block(&mut self) -> bool {
        let count = self.block_count();
        if self.mode != NavMode::Block || count == 0 {
            return false;
        }
        self.block = (self.block + 1) % count;
        true
    }

    /// Moves to the previous block of the current landmark (wrapping).
    pub fn previous_block(&mut self) -> bool {
        let count = self.block_count();
        if self.mode != NavMode::Block || count == 0 {
            return false;
        }
        self.block = (self.block + count - 1) % count;
        true
    }

    /// Switches between region and block mode.
    ///
    /// Entering block mode starts at the first block.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            NavMode::Region => NavMode::Block,
            NavMode::Block => NavMode::Region,
        };
        self.block = 0;
    }

    /// Moves the cursor onto the landmark or direct block with the given id.
    ///
    /// Focusing a block switches to block mode; focusing a landmark switches
    /// to region mode. Returns `false` (cursor unchanged) if no match exists.
    pub fn focus_id(&mut self, id: &str) -> bool {
        let Some(page) = self.page.as_ref() else {
            return false;
        };

        for (li, landmark) in page.landmarks.iter().enumerate() {
            if landmark.id.as_deref() == Some(id) {
                self.landmark = li;
                self.block = 0;
                self.mode = NavMode::Region;
                return true;
            }
            if let Some(bi) = landmark
                .children
                .iter()
                .position(|b| b.id.as_deref() == Some(id))
            {
                self.landmark = li;
                self.block = bi;
                self.mode = NavMode::Block;
                return true;
            }
        }
        false
    }

    /// The primitive that should carry the focus ring.
    ///
    /// Region mode yields the landmark; block mode yields the block, falling
    /// back to the landmark when it has no blocks.
    #[must_use]
    pub fn focused_primitive(&self) -> Option<&Primitive> {
        match self.mode {
            NavMode::Region => self.current_landmark(),
            NavMode::Block => self.current_block().or_else(|| self.current_landmark()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HeightTier, Rect, Role};

    fn landmark(id: &str, blocks: usize) -> Primitive {
        let mut p = Primitive::new(Role::Main, Rect::full(), HeightTier::Level1).with_id(id);
        for i in 0..blocks {
            p = p.with_child(
                Primitive::new(Role::Paragraph, Rect::full(), HeightTier::Level2)
                    .with_id(format!("{id}-{i}")),
            );
        }
        p
    }

    #[test]
    fn test_empty_navigator_does_nothing() {
        let mut nav = NavigationState::new();
        assert!(!nav.next_landmark());
        assert!(!nav.previous_landmark());
        assert!(nav.focused_primitive().is_none());
    }

    #[test]
    fn test_previous_landmark_wraps_to_last() {
        let mut nav = NavigationState::new();
        nav.load(SemanticPage::new(vec![
            landmark("a", 0),
            landmark("b", 0),
            landmark("c", 0),
        ]));
        assert!(nav.previous_landmark());
        assert_eq!(nav.landmark_index(), 2);
    }

    #[test]
    fn test_block_moves_ignored_in_region_mode() {
        let mut nav = NavigationState::new();
        nav.load(SemanticPage::new(vec![landmark("a", 3)]));
        assert!(!nav.next_block());
        assert_eq!(nav.block_index(), 0);
    }

    #[test]
    fn test_landmark_change_resets_block() {
        let mut nav = NavigationState::new();
        nav.load(SemanticPage::new(vec![landmark("a", 3), landmark("b", 2)]));
        nav.toggle_mode();
        assert!(nav.next_block());
        assert!(nav.next_block());
        assert_eq!(nav.block_index(), 2);
        assert!(nav.next_landmark());
        assert_eq!(nav.block_index(), 0);
        assert_eq!(
            nav.focused_primitive().and_then(|p| p.id.as_deref()),
            Some("b-0")
        );
    }

    #[test]
    fn test_block_mode_falls_back_to_landmark() {
        let mut nav = NavigationState::new();
        nav.load(SemanticPage::new(vec![landmark("solo", 0)]));
        nav.toggle_mode();
        assert_eq!(nav.mode(), NavMode::Block);
        assert_eq!(
            nav.focused_primitive().and_then(|p| p.id.as_deref()),
            Some("solo")
        );
    }

    #[test]
    fn test_focus_id_finds_blocks() {
        let mut nav = NavigationState::new();
        nav.load(SemanticPage::new(vec![landmark("a", 1), landmark("b", 3)]));
        assert!(nav.focus_id("b-2"));
        assert_eq!(nav.mode(), NavMode::Block);
        assert_eq!((nav.landmark_index(), nav.block_index()), (1, 2));
        assert!(nav.focus_id("a"));
        assert_eq!(nav.mode(), NavMode::Region);
        assert!(!nav.focus_id("missing"));
        assert_eq!(nav.landmark_index(), 0);
    }

    #[test]
    fn test_load_resets_cursor_and_keeps_mode() {
        let mut nav = NavigationState::new();
        nav.load(SemanticPage::new(vec![landmark("a", 1), landmark("b", 1)]));
        nav.next_landmark();
        nav.toggle_mode();
        nav.next_block();
        nav.load(SemanticPage::new(vec![landmark("x", 2)]));
        assert_eq!(nav.landmark_index(), 0);
        assert_eq!(nav.block_index(), 0);
        assert_eq!(nav.mode(), NavMode::Block);
        assert_eq!(
            nav.focused_primitive().and_then(|p| p.id.as_deref()),
            Some("x-0")
        );
    }
}
