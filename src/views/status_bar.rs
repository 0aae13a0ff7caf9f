use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::theme::ResolvedTheme;

/// One-line footer: a badge, an optional busy note and the selected story's
/// rank on the left, key hints on the right.
pub struct StatusBar<'a> {
    theme: &'a ResolvedTheme,
    label: &'a str,
    busy: Option<&'a str>,
    position: Option<(usize, usize)>,
    hints: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a ResolvedTheme) -> Self {
        Self {
            theme,
            label: "",
            busy: None,
            position: None,
            hints: "",
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn loading(mut self, text: &'a str) -> Self {
        self.busy = Some(text);
        self
    }

    /// `current` is 1-based; zero means nothing is selected.
    pub fn position(mut self, current: usize, total: usize) -> Self {
        self.position = Some((current, total));
        self
    }

    pub fn help(mut self, hints: &'a str) -> Self {
        self.hints = hints;
        self
    }

    fn left_spans(&self) -> Vec<Span<'a>> {
        let dim = self.theme.dim_style();
        let mut spans = vec![
            Span::styled(format!(" {} ", self.label), self.theme.status_bar_style()),
            Span::raw(" "),
        ];
        match self.position {
            Some((0, total)) => spans.push(Span::styled(format!("-/{total}"), dim)),
            Some((current, total)) => {
                spans.push(Span::styled(format!("{current}/{total}"), dim));
            }
            None => {}
        }
        if let Some(busy) = self.busy {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(busy, self.theme.spinner_style()));
        }
        spans
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let left = Line::from(self.left_spans());
        let hints_width = self.hints.chars().count() as u16 + 1;
        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(hints_width)]).areas(area);

        frame.render_widget(Paragraph::new(left), left_area);
        frame.render_widget(
            Paragraph::new(Span::styled(
                self.hints,
                Style::default().fg(self.theme.foreground_dim),
            ))
            .alignment(Alignment::Right),
            right_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ThemeVariant, default_for_variant};
    use crate::views::tests::render_to_string;

    #[test]
    fn shows_rank_and_hints() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let output = render_to_string(60, 1, |frame| {
            StatusBar::new(&theme)
                .label("Top")
                .position(5, 30)
                .help("j/k:nav  ?:help")
                .render(frame, frame.area());
        });

        assert!(output.contains(" Top "));
        assert!(output.contains("5/30"));
        assert!(output.trim_end().ends_with("?:help"));
    }

    #[test]
    fn busy_note_follows_position() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let output = render_to_string(60, 1, |frame| {
            StatusBar::new(&theme)
                .label("Top")
                .loading("loading batch")
                .position(1, 10)
                .help("q:quit")
                .render(frame, frame.area());
        });

        let rank = output.find("1/10").unwrap();
        let busy = output.find("loading batch").unwrap();
        assert!(rank < busy);
    }

    #[test]
    fn empty_feed_has_no_rank() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let output = render_to_string(40, 1, |frame| {
            StatusBar::new(&theme)
                .label("Top")
                .position(0, 0)
                .help("q:quit")
                .render(frame, frame.area());
        });

        assert!(output.contains("-/0"));
        assert!(output.contains("q:quit"));
    }
}
