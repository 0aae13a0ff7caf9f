mod builtin;
mod detect;

pub use builtin::{by_name, default_for_variant};
pub use detect::detect_terminal_theme;

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub name: String,
    pub variant: ThemeVariant,
    pub foreground: Color,
    pub foreground_dim: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub primary: Color,
    pub error: Color,
    pub story_title: Color,
    pub story_url: Color,
    pub story_score: Color,
    pub story_author: Color,
    pub comments_button: Color,
    pub comment_text: Color,
    pub comment_depth_colors: Vec<Color>,
    pub parent_accent: Color,
    pub replies_accent: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub spinner: Color,
}

impl ResolvedTheme {
    pub fn depth_color(&self, depth: usize) -> Color {
        if self.comment_depth_colors.is_empty() {
            return self.primary;
        }
        self.comment_depth_colors[depth % self.comment_depth_colors.len()]
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.foreground_dim)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn spinner_style(&self) -> Style {
        Style::default().fg(self.spinner)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .bg(self.status_bar_bg)
            .fg(self.status_bar_fg)
    }

    pub fn comment_text_style(&self) -> Style {
        Style::default().fg(self.comment_text)
    }
}
