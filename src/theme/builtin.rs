use ratatui::style::Color;

use super::{ResolvedTheme, ThemeVariant};

pub fn by_name(name: &str) -> Option<ResolvedTheme> {
    match name {
        "dark" => Some(dark()),
        "light" => Some(light()),
        _ => None,
    }
}

pub fn default_for_variant(variant: ThemeVariant) -> ResolvedTheme {
    match variant {
        ThemeVariant::Dark => dark(),
        ThemeVariant::Light => light(),
    }
}

fn dark() -> ResolvedTheme {
    ResolvedTheme {
        name: "dark".to_string(),
        variant: ThemeVariant::Dark,
        foreground: Color::White,
        foreground_dim: Color::Rgb(0x6A, 0x9A, 0x9A),
        border: Color::Rgb(0x6A, 0x9A, 0x9A),
        selection_bg: Color::DarkGray,
        primary: Color::LightBlue,
        error: Color::LightRed,
        story_title: Color::White,
        story_url: Color::LightBlue,
        story_score: Color::Yellow,
        story_author: Color::Cyan,
        comments_button: Color::Blue,
        comment_text: Color::Gray,
        comment_depth_colors: vec![
            Color::Cyan,
            Color::Green,
            Color::Yellow,
            Color::Magenta,
            Color::Blue,
            Color::Red,
        ],
        parent_accent: Color::LightMagenta,
        replies_accent: Color::LightGreen,
        status_bar_bg: Color::Blue,
        status_bar_fg: Color::White,
        spinner: Color::Yellow,
    }
}

fn light() -> ResolvedTheme {
    ResolvedTheme {
        name: "light".to_string(),
        variant: ThemeVariant::Light,
        foreground: Color::Black,
        foreground_dim: Color::DarkGray,
        border: Color::DarkGray,
        selection_bg: Color::Rgb(0xDD, 0xE6, 0xF5),
        primary: Color::Blue,
        error: Color::Red,
        story_title: Color::Black,
        story_url: Color::Blue,
        story_score: Color::Rgb(0xB5, 0x89, 0x00),
        story_author: Color::Blue,
        comments_button: Color::Blue,
        comment_text: Color::Black,
        comment_depth_colors: vec![
            Color::Blue,
            Color::Green,
            Color::Magenta,
            Color::Cyan,
            Color::Red,
            Color::Yellow,
        ],
        parent_accent: Color::Magenta,
        replies_accent: Color::Green,
        status_bar_bg: Color::Blue,
        status_bar_fg: Color::White,
        spinner: Color::Blue,
    }
}
