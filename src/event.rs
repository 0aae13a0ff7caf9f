use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEventKind};

/// Terminal input reduced to what the app reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Mouse wheel notches; positive scrolls down.
    Scroll(i16),
    Resize(u16, u16),
    Tick,
}

impl Event {
    /// Key releases and repeats, plain mouse motion and focus changes map to
    /// nothing.
    pub fn from_crossterm(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            CrosstermEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => Some(Self::Scroll(1)),
                MouseEventKind::ScrollUp => Some(Self::Scroll(-1)),
                _ => None,
            },
            CrosstermEvent::Resize(w, h) => Some(Self::Resize(w, h)),
            _ => None,
        }
    }
}
