// TUI module - terminal host for the page
//
// This module puts the page on a terminal using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard, mouse, resize, animation ticks)
// - Translating terminal input into page events
//
// Document geometry is in CSS pixels; one terminal cell counts as
// CELL_WIDTH_PX x CELL_HEIGHT_PX.

pub mod animation;
pub mod app;
pub mod scroll;
pub mod ui;

use crate::diagnostics::DiagnosticOverlay;
use crate::dom::Key;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Rows moved per mouse wheel notch
const WHEEL_ROWS: isize = 3;

/// Run the page in the terminal until the user quits
///
/// Sets up the terminal, runs the event loop and restores the terminal even
/// when the loop fails or a panic escapes it.
pub async fn run(app: &mut App) -> Result<()> {
    let mut guard = TerminalGuard::enter(app.overlay.clone())?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, app).await;

    guard.restore()?;
    if result.is_err() {
        // The overlay can't be shown anymore; keep the report visible
        let _ = app.overlay.write_pending(&mut io::stderr());
    }
    result
}

/// Raw mode + alternate screen for as long as it lives
///
/// Dropping it puts the terminal back, and during a panic also prints the
/// captured report, which the replaced panic hook never wrote anywhere.
struct TerminalGuard {
    overlay: DiagnosticOverlay,
    active: bool,
}

impl TerminalGuard {
    fn enter(overlay: DiagnosticOverlay) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = Self {
            overlay,
            active: true,
        };
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;
        Ok(guard)
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            cursor::Show
        )
        .context("Failed to restore terminal")?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.restore();
        if std::thread::panicking() {
            let _ = self.overlay.write_pending(&mut io::stderr());
        }
    }
}

/// Main event loop
///
/// Input and the animation tick race in `tokio::select!`; whichever is ready
/// first is handled, then the frame is redrawn. A panic while drawing ends
/// the loop with an error: the overlay is drawn by the same code.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    // ~30 FPS keeps slide transitions smooth
    let mut tick_interval = tokio::time::interval(Duration::from_millis(33));

    loop {
        let mut frame = Ok(());
        terminal
            .draw(|f| frame = catch_unwind(AssertUnwindSafe(|| ui::draw(f, app))))
            .context("Failed to draw terminal")?;
        if frame.is_err() {
            anyhow::bail!("Rendering the page panicked");
        }

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        // Resize is picked up by the next draw
                        _ => {}
                    }
                }
            } => {}

            _ = tick_interval.tick() => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: error overlay → global keys → page
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    // Layer 1: the error overlay captures all input while shown
    if app.overlay.is_showing() {
        match key_event.code {
            KeyCode::Esc | KeyCode::Enter => app.overlay.dismiss(),
            KeyCode::Char('q') => app.should_quit = true,
            _ => {}
        }
        return;
    }

    // Layer 2: host keys
    match key_event.code {
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('g') => app.show_logs = !app.show_logs,
        KeyCode::Char('m') => app.toggle_menu(),
        KeyCode::Char('l') => app.switch_language(),
        KeyCode::Left => app.previous_slide(),
        KeyCode::Right => app.next_slide(),
        KeyCode::Up => app.scroll_rows(-1),
        KeyCode::Down => app.scroll_rows(1),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::Home => app.scroll_to_top(),
        KeyCode::End => app.scroll_to_bottom(),

        // Layer 3: keys the page itself listens for
        KeyCode::Tab => app.key(
            Key::Tab,
            key_event.modifiers.contains(KeyModifiers::SHIFT),
        ),
        KeyCode::BackTab => app.key(Key::Tab, true),
        KeyCode::Esc => app.key(Key::Escape, false),
        KeyCode::Enter => app.key(Key::Enter, false),
        KeyCode::Char(c) => app.key(Key::Char(c), false),
        _ => {}
    }
}

/// Handle mouse input: left button acts as touch + click, wheel scrolls
pub fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    if app.overlay.is_showing() {
        return;
    }
    let (column, row) = (mouse_event.column, mouse_event.row);
    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(column, row),
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(column, row),
        MouseEventKind::ScrollUp => app.scroll_rows(-WHEEL_ROWS),
        MouseEventKind::ScrollDown => app.scroll_rows(WHEEL_ROWS),
        _ => {}
    }
}
