//! Discrete navigation intents dispatched by keyboard input.

/// A navigation or mode-switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Focus the next landmark
    NextLandmark,
    /// Focus the previous landmark
    PreviousLandmark,
    /// Focus the next block in the current landmark
    NextBlock,
    /// Focus the previous block in the current landmark
    PreviousBlock,
    /// Switch between region and block navigation
    ToggleMode,
    /// Read or open the focused primitive
    Activate,
    /// Leave reading or image mode
    Exit,
}

/// What the engine did with an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    /// State changed
    Handled,
    /// Nothing to do in the current state
    Ignored,
    /// The focused block is an image; the caller should run the async load
    LoadImage(String),
}

impl IntentOutcome {
    /// Converts a navigation success flag.
    #[must_use]
    pub const fn from_flag(changed: bool) -> Self {
        if changed {
            Self::Handled
        } else {
            Self::Ignored
        }
    }
}
