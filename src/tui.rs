use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::warn;

use crate::event::Event;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn init() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    // Leave the alternate screen before the panic message prints
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        hook(info);
    }));

    Terminal::new(CrosstermBackend::new(io::stdout())).context("Failed to create terminal")
}

pub fn restore() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    Ok(())
}

/// Merges terminal input with a steady tick so the spinner keeps moving
/// while nothing is pressed.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut stream = EventStream::new();
            let mut ticks = tokio::time::interval(Duration::from_millis(tick_ms));
            loop {
                let event = tokio::select! {
                    _ = ticks.tick() => Event::Tick,
                    next = stream.next() => match next {
                        Some(Ok(raw)) => match Event::from_crossterm(raw) {
                            Some(event) => event,
                            None => continue,
                        },
                        Some(Err(e)) => {
                            warn!("terminal input error: {e}");
                            continue;
                        }
                        None => break,
                    },
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
        Self { rx }
    }

    pub async fn next(&mut self) -> Result<Event> {
        self.rx.recv().await.context("Event stream closed")
    }
}
