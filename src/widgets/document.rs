//! Scrollable list of multi-line items with partial rendering.
//!
//! Unlike Ratatui's standard List widget, which only scrolls by whole items,
//! this widget scrolls by lines and renders the items cut at the viewport
//! edges, so the scroll offset maps directly onto document lines.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::StatefulWidget,
};

/// State for the `Document` widget.
#[derive(Debug, Default)]
pub struct DocumentState {
    selected: Option<usize>,
    offset: usize,
}

impl DocumentState {
    pub const fn new(selected: Option<usize>, offset: usize) -> Self {
        Self { selected, offset }
    }
}

/// A single item in the document, containing one or more lines.
pub struct DocumentItem<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> DocumentItem<'a> {
    pub const fn new(lines: Vec<Line<'a>>) -> Self {
        Self { lines }
    }
}

pub struct Document<'a> {
    items: Vec<DocumentItem<'a>>,
    highlight_style: Style,
    highlight_symbol: &'a str,
}

impl<'a> Document<'a> {
    pub fn new(items: Vec<DocumentItem<'a>>) -> Self {
        Self {
            items,
            highlight_style: Style::default(),
            highlight_symbol: "",
        }
    }

    pub const fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    pub const fn highlight_symbol(mut self, symbol: &'a str) -> Self {
        self.highlight_symbol = symbol;
        self
    }
}

impl StatefulWidget for Document<'_> {
    type State = DocumentState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 || self.items.is_empty() {
            return;
        }

        let symbol_width = self.highlight_symbol.chars().count() as u16;
        let mut current_line = 0;
        let mut y = area.top();

        for (item_idx, item) in self.items.iter().enumerate() {
            let is_selected = state.selected == Some(item_idx);

            for (line_idx, line) in item.lines.iter().enumerate() {
                if current_line < state.offset {
                    current_line += 1;
                    continue;
                }
                if y >= area.bottom() {
                    return;
                }
                if is_selected {
                    buf.set_style(
                        Rect {
                            x: area.left(),
                            y,
                            width: area.width,
                            height: 1,
                        },
                        self.highlight_style,
                    );
                    if line_idx == 0 {
                        buf.set_string(area.left(), y, self.highlight_symbol, Style::default());
                    }
                }
                let content_x = area.left() + symbol_width;
                let content_width = area.width.saturating_sub(symbol_width);
                buf.set_line(content_x, y, line, content_width);
                y += 1;
                current_line += 1;
            }
        }
    }
}

/// Largest useful scroll offset for a document of the given item heights.
pub fn max_offset(heights: &[usize], viewport_height: usize) -> usize {
    heights.iter().sum::<usize>().saturating_sub(viewport_height)
}

/// Smallest change to `current` that brings the selected item fully into
/// view. Items taller than the viewport are aligned to their first line.
pub fn offset_to_show(
    selected: usize,
    heights: &[usize],
    viewport_height: usize,
    current: usize,
) -> usize {
    let start: usize = heights.iter().take(selected).sum();
    let height = heights.get(selected).copied().unwrap_or(0);
    let end = start + height;

    let offset = if start < current {
        start
    } else if end > current + viewport_height {
        end.saturating_sub(viewport_height).min(start)
    } else {
        current
    };
    offset.min(max_offset(heights, viewport_height))
}
