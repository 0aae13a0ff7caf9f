use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Message};

/// A declarative keybinding map that can be composed and extended.
#[derive(Clone)]
pub struct Keymap {
    bindings: Vec<(KeyCode, KeyModifiers, Message)>,
}

impl Keymap {
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a key binding with no modifiers.
    pub fn bind(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::NONE, message));
        self
    }

    /// Add a key binding with Ctrl modifier.
    pub fn bind_ctrl(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::CONTROL, message));
        self
    }

    /// Look up a message for a key event.
    /// Later bindings take precedence over earlier ones. Unmodified bindings
    /// ignore Shift but never match Ctrl or Alt chords.
    pub fn get(&self, event: &KeyEvent) -> Option<Message> {
        let chord = event.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT);
        self.bindings
            .iter()
            .rev()
            .find(|(code, mods, _)| *code == event.code && chord == *mods)
            .map(|(_, _, msg)| msg.clone())
    }

    /// Extend this keymap with another. The other keymap's bindings take precedence.
    pub fn extend(mut self, other: Self) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    /// Find the first key bound to a specific message.
    pub fn find_key(&self, message: &Message) -> Option<(KeyCode, KeyModifiers)> {
        self.bindings
            .iter()
            .find(|(_, _, msg)| msg == message)
            .map(|(code, mods, _)| (*code, *mods))
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a key binding for display in help text.
pub fn format_key(code: KeyCode, mods: KeyModifiers) -> String {
    let key_str = match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        _ => "?".to_string(),
    };
    if mods.contains(KeyModifiers::CONTROL) {
        format!("C-{key_str}")
    } else {
        key_str
    }
}

/// Keybindings that work everywhere.
pub fn global_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('q'), Message::Quit)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
        .bind(KeyCode::Char('`'), Message::ToggleDebug)
}

/// Keybindings while the help overlay is open; everything else is swallowed.
fn help_overlay_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Esc, Message::ToggleHelp)
        .bind(KeyCode::Char('q'), Message::ToggleHelp)
        .bind_ctrl(KeyCode::Char('c'), Message::ToggleHelp)
}

fn navigation_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('j'), Message::SelectNext)
        .bind(KeyCode::Down, Message::SelectNext)
        .bind(KeyCode::Char('k'), Message::SelectPrev)
        .bind(KeyCode::Up, Message::SelectPrev)
        .bind(KeyCode::Char('g'), Message::SelectFirst)
        .bind(KeyCode::Home, Message::SelectFirst)
        .bind(KeyCode::Char('G'), Message::SelectLast)
        .bind(KeyCode::End, Message::SelectLast)
        .bind_ctrl(KeyCode::Char('d'), Message::PageDown)
        .bind(KeyCode::PageDown, Message::PageDown)
        .bind_ctrl(KeyCode::Char('u'), Message::PageUp)
        .bind(KeyCode::PageUp, Message::PageUp)
}

/// Feed keybindings: navigation plus the story and thread actions.
pub fn feed_keymap() -> Keymap {
    global_keymap()
        .extend(navigation_keymap())
        .bind(KeyCode::Enter, Message::Activate)
        .bind(KeyCode::Char('c'), Message::ToggleComments)
        .bind(KeyCode::Char('p'), Message::ToggleParent)
        .bind(KeyCode::Char(' '), Message::ToggleReplies)
        .bind(KeyCode::Char('r'), Message::ToggleReplies)
        .bind(KeyCode::Char('x'), Message::CollapseReply)
        .bind(KeyCode::Char('o'), Message::OpenUrl)
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
}

pub fn handle_key(key: KeyEvent, app: &App) -> Option<Message> {
    // Help overlay takes priority when open
    if app.show_help {
        return help_overlay_keymap().get(&key);
    }
    feed_keymap().get(&key)
}
