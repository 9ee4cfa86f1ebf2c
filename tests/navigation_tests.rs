//! Integration tests for landmark/block navigation.
//!
//! - Tab cycles forward through landmarks (0 -> 1 -> 2 -> 0)
//! - Block moves only apply in block mode and wrap within the landmark

mod fixtures;

use fixtures::{ideal_config, three_landmark_page};
use pinfield::engine::{Intent, IntentOutcome, PinFieldEngine};
use pinfield::services::navigation::{NavMode, NavigationState};

#[test]
fn test_next_landmark_cycles_through_three() {
    let mut nav = NavigationState::new();
    nav.load(three_landmark_page());

    let mut seen = vec![nav.landmark_index()];
    for _ in 0..3 {
        assert!(nav.next_landmark());
        seen.push(nav.landmark_index());
    }
    assert_eq!(seen, vec![0, 1, 2, 0]);
}

#[test]
fn test_previous_block_on_empty_landmark_is_noop() {
    let mut nav = NavigationState::new();
    nav.load(three_landmark_page());
    nav.previous_landmark(); // footer, which has no blocks
    nav.toggle_mode();

    let before = (nav.mode(), nav.landmark_index(), nav.block_index());
    assert!(!nav.previous_block());
    assert!(!nav.next_block());
    assert_eq!(before, (nav.mode(), nav.landmark_index(), nav.block_index()));
    assert_eq!(before, (NavMode::Block, 2, 0));
}

#[test]
fn test_blocks_wrap_within_landmark() {
    let mut nav = NavigationState::new();
    nav.load(three_landmark_page());
    nav.next_landmark(); // main: intro, photo, go
    nav.toggle_mode();

    assert_eq!(nav.focused_primitive().and_then(|p| p.id.as_deref()), Some("intro"));
    assert!(nav.previous_block());
    assert_eq!(nav.focused_primitive().and_then(|p| p.id.as_deref()), Some("go"));
    assert!(nav.next_block());
    assert_eq!(nav.focused_primitive().and_then(|p| p.id.as_deref()), Some("intro"));
}

#[test]
fn test_toggle_mode_resets_block() {
    let mut nav = NavigationState::new();
    nav.load(three_landmark_page());
    nav.next_landmark();
    nav.toggle_mode();
    nav.next_block();
    assert_eq!(nav.block_index(), 1);

    nav.toggle_mode();
    assert_eq!(nav.mode(), NavMode::Region);
    assert_eq!(nav.block_index(), 0);
    assert_eq!(nav.focused_primitive().and_then(|p| p.id.as_deref()), Some("main"));
}

#[test]
fn test_clear_drops_page() {
    let mut nav = NavigationState::new();
    nav.load(three_landmark_page());
    nav.clear();
    assert!(nav.page().is_none());
    assert!(!nav.next_landmark());
}

#[test]
fn test_engine_routes_intents() {
    let mut engine = PinFieldEngine::new(ideal_config(20)).unwrap();
    assert_eq!(engine.handle_intent(Intent::NextLandmark), IntentOutcome::Ignored);
    assert_eq!(engine.handle_intent(Intent::ToggleMode), IntentOutcome::Ignored);

    engine.set_page(three_landmark_page());
    assert_eq!(engine.handle_intent(Intent::NextBlock), IntentOutcome::Ignored);
    assert_eq!(engine.handle_intent(Intent::NextLandmark), IntentOutcome::Handled);
    assert_eq!(engine.handle_intent(Intent::ToggleMode), IntentOutcome::Handled);
    assert_eq!(engine.handle_intent(Intent::NextBlock), IntentOutcome::Handled);
    assert_eq!(
        engine
            .navigation()
            .focused_primitive()
            .and_then(|p| p.id.as_deref()),
        Some("photo")
    );
    assert_eq!(engine.handle_intent(Intent::PreviousLandmark), IntentOutcome::Handled);
    assert_eq!(engine.navigation().landmark_index(), 0);
}
