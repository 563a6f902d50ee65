//! Terminal setup and the async event loop.

use std::sync::Arc;
use std::time::Duration;

use arboard::Clipboard;
use crossterm::{
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event,
        EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::app::App;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::router::PanelRegistry;
use crate::ui;

/// RAII guard that restores the terminal on drop (even on panic).
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            std::io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
    }
}

/// Run the full-screen demo until the user quits.
pub async fn run_tui(config: Config, catalog: Arc<Catalog>, panels: PanelRegistry) -> anyhow::Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let _guard = TerminalGuard; // Drop restores terminal

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms.max(1));
    let anchor_poll = Duration::from_millis(config.timing.anchor_poll_ms.max(1));
    info!(layout = ?config.layout, tour = config.tour_enabled, "Demo started");

    let mut app = App::new(config, catalog, panels);
    let mut crossterm_stream = EventStream::new();

    // Animation tick (60 FPS for smooth animation)
    let mut tick_interval = tokio::time::interval(tick_rate);
    tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut anchor_interval = tokio::time::interval(anchor_poll);
    anchor_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        tokio::select! {
            // Branch 1: crossterm terminal events
            maybe_event = crossterm_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if key.code == KeyCode::Char('v') && key.modifiers.contains(KeyModifiers::CONTROL) {
                            // Ctrl+V: Get clipboard content
                            match Clipboard::new().and_then(|mut c| c.get_text()) {
                                Ok(text) => app.on_paste(&text),
                                Err(e) => debug!(error = %e, "Clipboard unavailable"),
                            }
                        } else {
                            app.on_key(key);
                        }
                    }
                    Some(Ok(Event::Paste(text))) => {
                        // Bracketed paste mode
                        app.on_paste(&text);
                    }
                    Some(Ok(Event::Mouse(mouse))) => match mouse.kind {
                        MouseEventKind::ScrollUp => app.scroll_up(),
                        MouseEventKind::ScrollDown => app.scroll_down(),
                        _ => {}
                    },
                    Some(Ok(Event::Resize(_, _))) => {
                        // Terminal will redraw on next loop iteration
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Terminal event stream failed");
                        break;
                    }
                    None => break,
                    _ => {}
                }
            }

            // Branch 2: response steps from the sequencer
            Some(event) = app.orchestrator.next_event() => {
                app.on_sequence_event(event);
            }

            _ = tick_interval.tick() => {
                app.tick();
            }

            _ = anchor_interval.tick(), if app.tour_is_open() => {
                app.poll_tour();
            }
        }

        if app.should_quit {
            break;
        }
    }

    app.shutdown();
    info!(turns = app.orchestrator.state().turns().len(), "Demo exited");
    // TerminalGuard::drop handles cleanup
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_guard_drop_path_is_safe() {
        let guard = TerminalGuard;
        drop(guard);
    }
}
