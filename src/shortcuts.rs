//! Centralized shortcut and action system.
//!
//! This module maps keyboard events to actions. Navigation actions carry an
//! engine [`Intent`]; the rest are preview controls handled by the front end.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::engine::Intent;

/// All possible actions in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // === NAVIGATION ===
    /// Focus the next landmark
    NextLandmark,
    /// Focus the previous landmark
    PreviousLandmark,
    /// Focus the next block
    NextBlock,
    /// Focus the previous block
    PreviousBlock,
    /// Switch region/block navigation
    ToggleNavMode,
    /// Read or open the focused primitive
    Activate,
    /// Leave reading/image mode
    Exit,

    // === PREVIEW CONTROLS ===
    /// Cycle the procedural pattern
    CyclePattern,
    /// Toggle ideal/plausible physics
    TogglePhysics,
    /// Toggle height debug colours
    ToggleDebugColors,
    /// Toggle pattern/web base mode
    ToggleDisplayMode,

    // === GENERAL ===
    /// Quit the preview
    Quit,
}

impl Action {
    /// Stable identifier used in help text and logs.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::NextLandmark => "next_landmark",
            Self::PreviousLandmark => "previous_landmark",
            Self::NextBlock => "next_block",
            Self::PreviousBlock => "previous_block",
            Self::ToggleNavMode => "toggle_nav_mode",
            Self::Activate => "activate",
            Self::Exit => "exit",
            Self::CyclePattern => "cycle_pattern",
            Self::TogglePhysics => "toggle_physics",
            Self::ToggleDebugColors => "toggle_debug_colors",
            Self::ToggleDisplayMode => "toggle_display_mode",
            Self::Quit => "quit",
        }
    }

    /// The engine intent this action maps to, if it is a navigation action.
    #[must_use]
    pub const fn intent(&self) -> Option<Intent> {
        match self {
            Self::NextLandmark => Some(Intent::NextLandmark),
            Self::PreviousLandmark => Some(Intent::PreviousLandmark),
            Self::NextBlock => Some(Intent::NextBlock),
            Self::PreviousBlock => Some(Intent::PreviousBlock),
            Self::ToggleNavMode => Some(Intent::ToggleMode),
            Self::Activate => Some(Intent::Activate),
            Self::Exit => Some(Intent::Exit),
            _ => None,
        }
    }
}

/// A key binding (key + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    /// Key code
    pub code: KeyCode,
    /// Modifier set
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a new key binding.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a key binding from a KeyEvent.
    #[must_use]
    pub const fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Shortcut registry that maps key events to actions.
///
/// This is the central source of truth for all keyboard shortcuts in the application.
pub struct ShortcutRegistry {
    bindings: HashMap<KeyBinding, Action>,
}

impl ShortcutRegistry {
    /// Create a new shortcut registry with default bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            bindings: HashMap::new(),
        };

        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        use KeyCode as K;
        use KeyModifiers as M;

        // === NAVIGATION ===
        self.register(K::Tab, M::NONE, Action::NextLandmark);
        self.register(K::BackTab, M::SHIFT, Action::PreviousLandmark);
        self.register(K::BackTab, M::NONE, Action::PreviousLandmark);
        self.register(K::Down, M::NONE, Action::NextBlock);
        self.register(K::Char('j'), M::NONE, Action::NextBlock);
        self.register(K::Up, M::NONE, Action::PreviousBlock);
        self.register(K::Char('k'), M::NONE, Action::PreviousBlock);
        self.register(K::Char('m'), M::NONE, Action::ToggleNavMode);
        self.register(K::Enter, M::NONE, Action::Activate);
        self.register(K::Esc, M::NONE, Action::Exit);

        // === PREVIEW CONTROLS ===
        self.register(K::Char('p'), M::NONE, Action::CyclePattern);
        self.register(K::Char(' '), M::NONE, Action::TogglePhysics);
        self.register(K::Char('d'), M::NONE, Action::ToggleDebugColors);
        self.register(K::Char('w'), M::NONE, Action::ToggleDisplayMode);

        // === GENERAL ===
        self.register(K::Char('q'), M::NONE, Action::Quit);
        self.register(K::Char('c'), M::CONTROL, Action::Quit);
    }

    /// Register a shortcut binding.
    fn register(&mut self, code: KeyCode, modifiers: KeyModifiers, action: Action) {
        self.bindings
            .insert(KeyBinding::new(code, modifiers), action);
    }

    /// Look up an action for a key event.
    #[must_use]
    pub fn lookup(&self, event: KeyEvent) -> Option<Action> {
        self.bindings.get(&KeyBinding::from_event(event)).copied()
    }

    /// Check if a key event matches a specific action.
    #[must_use]
    pub fn matches(&self, event: KeyEvent, action: Action) -> bool {
        self.lookup(event) == Some(action)
    }

    /// All bindings for an action, for help text.
    #[must_use]
    pub fn keys_for(&self, action: Action) -> Vec<KeyBinding> {
        let mut keys: Vec<_> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect();
        keys.sort_by_key(|k| format!("{:?}", k.code));
        keys
    }
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_lookup() {
        let registry = ShortcutRegistry::new();

        let event = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(registry.lookup(event), Some(Action::NextLandmark));

        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(registry.lookup(event), Some(Action::Quit));

        let event = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE);
        assert_eq!(registry.lookup(event), None);
    }

    #[test]
    fn test_vim_navigation() {
        let registry = ShortcutRegistry::new();

        // Vim keys mirror the arrows for block movement
        assert!(registry.matches(
            KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE),
            Action::NextBlock
        ));
        assert!(registry.matches(
            KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE),
            Action::PreviousBlock
        ));
        assert_eq!(registry.keys_for(Action::NextBlock).len(), 2);
    }

    #[test]
    fn test_intents_only_for_navigation() {
        assert_eq!(Action::Activate.intent(), Some(Intent::Activate));
        assert_eq!(Action::Exit.intent(), Some(Intent::Exit));
        assert_eq!(Action::CyclePattern.intent(), None);
        assert_eq!(Action::Quit.intent(), None);
    }
}
