//! Terminal preview of the pin field.
//!
//! Ticks the engine at a fixed frame rate, draws the relief with
//! [`PinView`] and routes key presses through the [`ShortcutRegistry`].

pub mod pin_view;

pub use pin_view::PinView;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::info;

use crate::config::{ConfigUpdate, DisplayMode, PhysicsMode};
use crate::constants::APP_NAME;
use crate::engine::{InstanceBuffer, IntentOutcome, PinFieldEngine};
use crate::services::fetch::DefaultFetcher;
use crate::shortcuts::{Action, ShortcutRegistry};

/// Frame budget for the preview loop (~30 Hz).
const FRAME_TIME: Duration = Duration::from_millis(33);

/// Everything the preview loop owns.
pub struct PreviewState {
    /// Simulation core
    pub engine: PinFieldEngine,
    /// Substrate receiving pin uploads
    pub buffer: InstanceBuffer,
    /// Key bindings
    pub shortcuts: ShortcutRegistry,
    /// Image fetcher for activated media blocks
    pub fetcher: DefaultFetcher,
    /// Last status message
    pub status: String,
}

impl PreviewState {
    /// Wraps an engine for previewing.
    #[must_use]
    pub fn new(engine: PinFieldEngine) -> Self {
        Self {
            engine,
            buffer: InstanceBuffer::new(),
            shortcuts: ShortcutRegistry::new(),
            fetcher: DefaultFetcher::new(),
            status: String::from("Ready"),
        }
    }
}

/// What the loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    LoadImage(String),
    Quit,
}

/// Initialize terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub async fn run_tui(
    state: &mut PreviewState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let mut last = Instant::now();

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        state.engine.tick(dt, &mut state.buffer);
        terminal.draw(|f| render(f, state))?;

        if event::poll(FRAME_TIME)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key_event(state, key)? {
                    KeyOutcome::Quit => break,
                    KeyOutcome::LoadImage(url) => {
                        state.status = format!("Loading {url}...");
                        terminal.draw(|f| render(f, state))?;
                        let shown = state.engine.load_image(&state.fetcher, &url).await;
                        state.status = if shown {
                            format!("Showing {url}")
                        } else {
                            format!("Could not load {url}")
                        };
                    }
                    KeyOutcome::Continue => {}
                }
            }
        }
    }

    info!("Preview closed");
    Ok(())
}

fn handle_key_event(state: &mut PreviewState, key: KeyEvent) -> Result<KeyOutcome> {
    let Some(action) = state.shortcuts.lookup(key) else {
        return Ok(KeyOutcome::Continue);
    };

    if let Some(intent) = action.intent() {
        return Ok(match state.engine.handle_intent(intent) {
            IntentOutcome::LoadImage(url) => KeyOutcome::LoadImage(url),
            IntentOutcome::Handled => {
                state.status = focus_description(&state.engine);
                KeyOutcome::Continue
            }
            IntentOutcome::Ignored => KeyOutcome::Continue,
        });
    }

    let config = state.engine.config();
    let update = match action {
        Action::Quit => return Ok(KeyOutcome::Quit),
        Action::CyclePattern => ConfigUpdate {
            pattern: Some(config.pattern.next()),
            ..ConfigUpdate::default()
        },
        Action::TogglePhysics => ConfigUpdate {
            physics_mode: Some(match config.physics_mode {
                PhysicsMode::Ideal => PhysicsMode::Plausible,
                PhysicsMode::Plausible => PhysicsMode::Ideal,
            }),
            ..ConfigUpdate::default()
        },
        Action::ToggleDebugColors => ConfigUpdate {
            debug_colors: Some(!config.debug_colors),
            ..ConfigUpdate::default()
        },
        Action::ToggleDisplayMode => ConfigUpdate {
            display_mode: Some(match config.display_mode {
                DisplayMode::Pattern => DisplayMode::Web,
                DisplayMode::Web => DisplayMode::Pattern,
            }),
            ..ConfigUpdate::default()
        },
        _ => return Ok(KeyOutcome::Continue),
    };

    state.engine.update_config(update)?;
    state.status = format!("{} applied", action.id());
    Ok(KeyOutcome::Continue)
}

fn focus_description(engine: &PinFieldEngine) -> String {
    engine
        .navigation()
        .focused_primitive()
        .map_or_else(|| String::from("No focus"), |p| format!("Focus: {}", p.describe()))
}

fn render(f: &mut Frame, state: &PreviewState) {
    let chunks = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(6),    // Pin field
            Constraint::Length(4), // Status bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], state);
    PinView::render(f, chunks[1], &state.engine);
    render_status_bar(f, chunks[2], state);
}

fn render_title_bar(f: &mut Frame, area: Rect, state: &PreviewState) {
    let engine = &state.engine;
    let title = match engine.navigation().page().and_then(|p| p.title.as_deref()) {
        Some(page) => format!(" {APP_NAME} - {page} "),
        None => format!(" {APP_NAME} "),
    };

    let widget = Paragraph::new(title)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, state: &PreviewState) {
    let engine = &state.engine;
    let config = engine.config();
    let label = Style::default().fg(Color::Cyan);

    let status = Line::from(vec![
        Span::styled("Mode: ", label),
        Span::raw(format!("{}  ", engine.mode().label())),
        Span::styled("Pattern: ", label),
        Span::raw(format!("{:?}  ", config.pattern)),
        Span::styled("Physics: ", label),
        Span::raw(format!("{:?}  ", config.physics_mode)),
        Span::styled("Dirty: ", label),
        Span::raw(format!("{}  ", engine.last_dirty_count())),
        Span::raw(state.status.clone()),
    ]);
    let help = Line::from(Span::styled(
        "Tab/S-Tab landmark  j/k block  m region/block  Enter read  Esc exit  \
         p pattern  space physics  d debug  w base  q quit",
        Style::default().fg(Color::DarkGray),
    ));

    let widget = Paragraph::new(vec![status, help]).block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}
