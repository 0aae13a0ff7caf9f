//! Help text generated from the keymap, so the hints never drift from the
//! actual bindings.

use crate::app::Message;
use crate::keys::{Keymap, format_key};

/// One or more related actions shown under a single label.
pub struct HelpItem {
    /// Messages to look up keys for. Keys are joined with "/".
    messages: Vec<Message>,
    label: &'static str,
}

impl HelpItem {
    pub fn new(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            label,
        }
    }

    /// Paired actions, e.g. j/k for next/prev.
    pub fn pair(first: Message, second: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, second],
            label,
        }
    }

    fn keys(&self, keymap: &Keymap) -> Option<String> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| {
                keymap
                    .find_key(msg)
                    .map(|(code, mods)| format_key(code, mods))
            })
            .collect();
        if keys.is_empty() {
            None
        } else {
            Some(keys.join("/"))
        }
    }

    /// `keys:label`, or None if no keys are bound for any of the messages.
    pub fn format(&self, keymap: &Keymap) -> Option<String> {
        self.keys(keymap).map(|keys| format!("{keys}:{}", self.label))
    }

    /// (keys, label) for the overlay's two columns.
    pub fn format_for_overlay(&self, keymap: &Keymap) -> Option<(String, &'static str)> {
        self.keys(keymap).map(|keys| (keys, self.label))
    }
}

/// Compact hint line for the status bar.
pub fn status_help(keymap: &Keymap) -> String {
    use Message::{Activate, OpenUrl, Quit, SelectNext, SelectPrev, ToggleHelp};
    [
        HelpItem::pair(SelectNext, SelectPrev, "nav"),
        HelpItem::new(Activate, "toggle"),
        HelpItem::new(OpenUrl, "open"),
        HelpItem::new(ToggleHelp, "help"),
        HelpItem::new(Quit, "quit"),
    ]
    .iter()
    .filter_map(|item| item.format(keymap))
    .collect::<Vec<_>>()
    .join("  ")
}

/// Every action, for the help overlay.
pub fn overlay_items() -> Vec<HelpItem> {
    use Message::{
        Activate, CollapseReply, OpenUrl, PageDown, PageUp, Quit, SelectFirst, SelectLast,
        SelectNext, SelectPrev, ToggleComments, ToggleDebug, ToggleHelp, ToggleParent,
        ToggleReplies,
    };
    vec![
        HelpItem::pair(SelectNext, SelectPrev, "navigate"),
        HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
        HelpItem::pair(PageDown, PageUp, "page down/up"),
        HelpItem::new(Activate, "toggle selected"),
        HelpItem::new(ToggleComments, "show/hide comments"),
        HelpItem::new(ToggleParent, "show/hide parent"),
        HelpItem::new(ToggleReplies, "expand/collapse replies"),
        HelpItem::new(CollapseReply, "collapse this reply"),
        HelpItem::new(OpenUrl, "open in browser"),
        HelpItem::new(ToggleDebug, "debug"),
        HelpItem::new(Quit, "quit"),
        HelpItem::new(ToggleHelp, "close"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::feed_keymap;

    #[test]
    fn status_help_lists_compact_items() {
        let help = status_help(&feed_keymap());
        assert!(help.contains("j/k:nav"));
        assert!(help.contains("Enter:toggle"));
        assert!(help.contains("o:open"));
        assert!(help.contains("?:help"));
        assert!(help.contains("q:quit"));
    }

    #[test]
    fn overlay_items_resolve_against_feed_keymap() {
        let keymap = feed_keymap();
        let formatted: Vec<_> = overlay_items()
            .iter()
            .filter_map(|item| item.format_for_overlay(&keymap))
            .collect();
        assert_eq!(formatted.len(), overlay_items().len());
        assert!(formatted.contains(&("Space".to_string(), "expand/collapse replies")));
        assert!(formatted.contains(&("C-d/C-u".to_string(), "page down/up")));
    }

    #[test]
    fn help_item_returns_none_for_unbound_message() {
        let keymap = Keymap::new();
        let item = HelpItem::new(Message::Quit, "quit");
        assert!(item.format(&keymap).is_none());
    }
}
