//! The single scrolling feed: header statistics, story cards with their
//! inline comment threads, and the status bar.
//!
//! The document is a flat list of `Row`s rebuilt from state on every frame.
//! Rows that carry a `Target` are selectable; the app navigates by row index
//! and resolves actions through the target.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::comment_tree::{CommentNode, NodeKey, NodeState};
use crate::feed::{Feed, FeedPhase};
use crate::help::status_help;
use crate::keys::feed_keymap;
use crate::story_card::{CommentsView, StoryCard};
use crate::theme::ResolvedTheme;
use crate::time::format_utc;
use crate::views::html::decode_html;
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::StatusBar;
use crate::widgets::document::{Document, DocumentItem, DocumentState};

pub const HIGHLIGHT_SYMBOL: &str = "▶ ";
const CARD_GUTTER: &str = "     ";
const PREVIEW_GUTTER: &str = "┃ ";
const INDENT_PER_DEPTH: usize = 2;
const MIN_TEXT_WIDTH: usize = 20;

/// What a selectable row acts on. Story indices are positions in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Story(usize),
    Comments(usize),
    Parent(usize, NodeKey),
    Comment(usize, NodeKey),
    Replies(usize, NodeKey),
}

impl Target {
    pub const fn story_index(&self) -> usize {
        match *self {
            Target::Story(i)
            | Target::Comments(i)
            | Target::Parent(i, _)
            | Target::Comment(i, _)
            | Target::Replies(i, _) => i,
        }
    }

    pub const fn node(&self) -> Option<NodeKey> {
        match *self {
            Target::Story(_) | Target::Comments(_) => None,
            Target::Parent(_, key) | Target::Comment(_, key) | Target::Replies(_, key) => {
                Some(key)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Row {
    pub lines: Vec<Line<'static>>,
    pub target: Option<Target>,
}

impl Row {
    fn new(lines: Vec<Line<'static>>, target: Target) -> Self {
        Self {
            lines,
            target: Some(target),
        }
    }

    fn plain(line: Line<'static>) -> Self {
        Self {
            lines: vec![line],
            target: None,
        }
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub const fn is_selectable(&self) -> bool {
        self.target.is_some()
    }
}

/// Lay out the whole document for a viewport `width` columns wide.
pub fn build_rows(feed: &Feed, theme: &ResolvedTheme, width: u16) -> Vec<Row> {
    let width = (width as usize).saturating_sub(HIGHLIGHT_SYMBOL.width());
    let mut rows = Vec::new();

    for (index, card) in feed.stories().iter().enumerate() {
        story_rows(&mut rows, index, card, theme, width);
    }

    let trailer = match feed.phase() {
        FeedPhase::Initializing => Some(Span::styled(
            "Loading top stories...",
            theme.spinner_style(),
        )),
        FeedPhase::LoadingBatch if feed.fetched() == 0 => {
            Some(Span::styled("Loading stories...", theme.spinner_style()))
        }
        FeedPhase::LoadingBatch => Some(Span::styled(
            "Loading more stories...",
            theme.spinner_style(),
        )),
        FeedPhase::Exhausted if feed.total() == 0 => {
            Some(Span::styled("No top stories right now.", theme.dim_style()))
        }
        FeedPhase::Exhausted => Some(Span::styled(
            "You've reached the end of the top stories.",
            theme.dim_style(),
        )),
        FeedPhase::Idle | FeedPhase::Failed(_) => None,
    };
    if let Some(span) = trailer {
        rows.push(Row::plain(Line::from(vec![Span::raw(" "), span])));
    }

    rows
}

fn story_rows(
    rows: &mut Vec<Row>,
    index: usize,
    card: &StoryCard,
    theme: &ResolvedTheme,
    width: usize,
) {
    let story = card.story();
    let mut lines = Vec::new();

    let rank = format!("{:>3}. ", index + 1);
    let title_style = Style::default()
        .fg(theme.story_title)
        .add_modifier(Modifier::BOLD);
    let title_width = width.saturating_sub(rank.width()).max(MIN_TEXT_WIDTH);
    for (i, part) in wrap(&story.title, title_width).into_iter().enumerate() {
        let lead = if i == 0 {
            Span::styled(rank.clone(), theme.dim_style())
        } else {
            Span::raw(" ".repeat(rank.width()))
        };
        lines.push(Line::from(vec![
            lead,
            Span::styled(part.into_owned(), title_style),
        ]));
    }

    if let Some(url) = &story.url {
        lines.push(Line::from(vec![
            Span::raw(CARD_GUTTER),
            Span::styled(
                url.clone(),
                Style::default()
                    .fg(theme.story_url)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }

    lines.push(Line::from(vec![
        Span::raw(CARD_GUTTER),
        Span::styled(
            format!("▲ {}", story.score),
            Style::default().fg(theme.story_score),
        ),
        Span::styled(" | by ", theme.dim_style()),
        Span::styled(story.by.clone(), Style::default().fg(theme.story_author)),
        Span::styled(
            format!(" | {} descendants", story.descendants.unwrap_or(0)),
            theme.dim_style(),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::raw(CARD_GUTTER),
        Span::styled(
            format!(
                "{} | type: {} | id: {}",
                format_utc(story.time),
                story.kind,
                story.id
            ),
            theme.dim_style(),
        ),
    ]));
    rows.push(Row::new(lines, Target::Story(index)));

    if story.has_comments() {
        let count = story.kids.len();
        let button = Style::default()
            .fg(theme.comments_button)
            .add_modifier(Modifier::BOLD);
        let label = match card.comments() {
            CommentsView::Hidden => Span::styled(format!("[ View Comments ({count}) ]"), button),
            CommentsView::Loading { .. } => Span::styled(
                format!("Loading {count} comments..."),
                theme.spinner_style(),
            ),
            CommentsView::Revealed(_) => Span::styled("[ Hide Comments ]", button),
        };
        rows.push(Row::new(
            vec![Line::from(vec![Span::raw(CARD_GUTTER), label])],
            Target::Comments(index),
        ));

        if let CommentsView::Revealed(nodes) = card.comments() {
            for node in nodes {
                node_rows(rows, index, node, CARD_GUTTER, theme, width);
            }
        }
    }

    rows.push(Row::plain(Line::default()));
}

/// Emit the rows of one comment node and, recursively, its parent preview
/// and mounted replies. `gutter` is the prefix inherited from enclosing
/// previews; depth adds indentation on top of it.
fn node_rows(
    rows: &mut Vec<Row>,
    story: usize,
    node: &CommentNode,
    gutter: &str,
    theme: &ResolvedTheme,
    width: usize,
) {
    let indent = format!("{gutter}{}", " ".repeat(node.depth() * INDENT_PER_DEPTH));
    let key = node.key();

    let comment = match node.state() {
        NodeState::Absent => return,
        NodeState::Loading => {
            rows.push(Row::new(
                vec![Line::from(vec![
                    Span::raw(indent),
                    Span::styled("Loading...", theme.dim_style()),
                ])],
                Target::Comment(story, key),
            ));
            return;
        }
        NodeState::Failed(_) => {
            rows.push(Row::new(
                vec![Line::from(vec![
                    Span::raw(indent),
                    Span::styled("Error loading comment", theme.error_style()),
                ])],
                Target::Comment(story, key),
            ));
            return;
        }
        NodeState::Ready(comment) => comment,
    };

    if let Some(parent) = comment.parent {
        let label = if node.is_parent_shown() {
            "▼ Hide parent".to_string()
        } else {
            format!("▶ Replying to parent comment (id: {parent})")
        };
        rows.push(Row::new(
            vec![Line::from(vec![
                Span::raw(indent.clone()),
                Span::styled(label, Style::default().fg(theme.parent_accent)),
            ])],
            Target::Parent(story, key),
        ));
        if let Some(preview) = node.parent_preview() {
            let preview_gutter = format!("{indent}{PREVIEW_GUTTER}");
            node_rows(rows, story, preview, &preview_gutter, theme, width);
        }
    }

    let accent = theme.depth_color(node.depth());
    let mut lines = vec![Line::from(vec![
        Span::raw(indent.clone()),
        Span::styled(
            comment.author().to_string(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" · {}", format_utc(comment.time)), theme.dim_style()),
    ])];

    if let Some(text) = &comment.text {
        let text_width = width.saturating_sub(indent.width()).max(MIN_TEXT_WIDTH);
        for paragraph in decode_html(text).lines() {
            for part in wrap(paragraph, text_width) {
                lines.push(Line::from(vec![
                    Span::raw(indent.clone()),
                    Span::styled(part.into_owned(), theme.comment_text_style()),
                ]));
            }
        }
    }

    lines.push(Line::from(vec![
        Span::raw(indent.clone()),
        Span::styled(
            format!("type: {} • id: {}", comment.kind, comment.id),
            theme.dim_style(),
        ),
    ]));
    rows.push(Row::new(lines, Target::Comment(story, key)));

    if !comment.kids.is_empty() {
        let count = comment.kids.len();
        let arrow = if node.replies_expanded() { "▼" } else { "▶" };
        let noun = if count == 1 { "reply" } else { "replies" };
        rows.push(Row::new(
            vec![Line::from(vec![
                Span::raw(indent),
                Span::styled(
                    format!("{arrow} {count} {noun}"),
                    Style::default().fg(theme.replies_accent),
                ),
            ])],
            Target::Replies(story, key),
        ));
        for child in node.children() {
            node_rows(rows, story, child, gutter, theme, width);
        }
    }
}

pub fn render(frame: &mut Frame, app: &App, header: Rect, document: Rect, status: Rect) {
    render_header(frame, app, header);
    render_document(frame, app, document);
    render_status_bar(frame, app, status);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let feed = &app.feed;

    let mut stats = vec![
        Span::styled("Total Stories: ", theme.dim_style()),
        Span::styled(feed.total().to_string(), Style::default().fg(theme.primary)),
        Span::styled("   Stories Fetched: ", theme.dim_style()),
        Span::styled(
            feed.fetched().to_string(),
            Style::default().fg(theme.primary),
        ),
        Span::styled("   Stories Remaining: ", theme.dim_style()),
        Span::styled(
            feed.remaining().to_string(),
            Style::default().fg(theme.primary),
        ),
    ];
    if feed.is_loading() || feed.phase() == FeedPhase::Initializing {
        stats.push(Span::raw("  "));
        stats.push(Span::styled(
            spinner_frame(app.started_at),
            theme.spinner_style(),
        ));
    }

    let second = match feed.phase() {
        FeedPhase::Failed(err) => Line::from(Span::styled(
            format!("Could not load top stories: {err}"),
            theme.error_style(),
        )),
        FeedPhase::Exhausted => Line::from(Span::styled("All stories loaded", theme.dim_style())),
        _ => Line::from(Span::styled(
            "Keep scrolling to load more stories",
            theme.dim_style(),
        )),
    };

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(theme.border_style())
        .title_bottom(Line::from(" Hacker News Top Stories ").right_aligned());
    frame.render_widget(
        Paragraph::new(vec![Line::from(stats), second]).block(block),
        area,
    );
}

fn render_document(frame: &mut Frame, app: &App, area: Rect) {
    let rows = build_rows(&app.feed, &app.theme, area.width);
    let items: Vec<DocumentItem> = rows
        .into_iter()
        .map(|row| DocumentItem::new(row.lines))
        .collect();

    let document = Document::new(items)
        .highlight_style(app.theme.selection_style())
        .highlight_symbol(HIGHLIGHT_SYMBOL);
    let mut state = DocumentState::new(Some(app.selected), app.scroll_top);
    frame.render_stateful_widget(document, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = status_help(&feed_keymap());
    let position = app
        .selected_target()
        .map(|t| t.story_index() + 1)
        .unwrap_or(0);

    let mut bar = StatusBar::new(&app.theme)
        .label("Top")
        .position(position, app.feed.fetched())
        .help(&help_text);
    if app.feed.is_loading() {
        bar = bar.loading("loading batch");
    }
    bar.render(frame, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::comment_tree::MountQueue;
    use crate::test_utils::{CommentBuilder, StoryBuilder};
    use crate::theme::{ThemeVariant, default_for_variant};

    fn text_of(rows: &[Row]) -> String {
        rows.iter()
            .flat_map(|r| r.lines.iter())
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn feed_with(stories: Vec<crate::api::Story>) -> Feed {
        let mut feed = Feed::new();
        let ids: Vec<u64> = stories.iter().map(|s| s.id).collect();
        let req = feed.set_ids(ids).unwrap();
        feed.complete_batch(
            req.end,
            stories.into_iter().map(|s| (s.id, Ok(Some(s)))).collect(),
        );
        feed
    }

    #[test]
    fn story_rows_show_card_fields() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let feed = feed_with(vec![
            StoryBuilder::new()
                .id(8863)
                .title("My YC app: Dropbox")
                .url("http://www.getdropbox.com/u/2/screencast.html")
                .score(111)
                .author("dhouston")
                .time(1175714200)
                .kids(vec![1, 2])
                .build(),
        ]);
        let rows = build_rows(&feed, &theme, 120);
        let text = text_of(&rows);

        assert!(text.contains("1. My YC app: Dropbox"));
        assert!(text.contains("http://www.getdropbox.com/u/2/screencast.html"));
        assert!(text.contains("▲ 111"));
        assert!(text.contains("by dhouston"));
        assert!(text.contains("Wed, 04 Apr 2007 19:16:40 GMT"));
        assert!(text.contains("id: 8863"));
        assert!(text.contains("[ View Comments (2) ]"));
        assert!(text.contains("end of the top stories"));
        assert_eq!(rows[0].target, Some(Target::Story(0)));
        assert_eq!(rows[1].target, Some(Target::Comments(0)));
    }

    #[test]
    fn missing_descendants_show_zero() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let feed = feed_with(vec![StoryBuilder::new().id(1).no_descendants().build()]);
        assert!(text_of(&build_rows(&feed, &theme, 100)).contains("0 descendants"));
    }

    #[test]
    fn story_without_kids_has_no_comments_control() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let feed = feed_with(vec![StoryBuilder::new().id(1).kids(vec![]).build()]);
        let rows = build_rows(&feed, &theme, 100);
        assert!(!text_of(&rows).contains("View Comments"));
        assert!(rows.iter().all(|r| r.target != Some(Target::Comments(0))));
    }

    #[test]
    fn initializing_and_loading_banners() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let mut feed = Feed::new();
        assert!(text_of(&build_rows(&feed, &theme, 80)).contains("Loading top stories..."));

        feed.set_ids((1..=20).collect());
        assert!(text_of(&build_rows(&feed, &theme, 80)).contains("Loading stories..."));
    }

    fn revealed(card_kids: Vec<u64>) -> (Feed, MountQueue) {
        let mut mounts = MountQueue::new();
        let mut feed = feed_with(vec![StoryBuilder::new().id(1).kids(card_kids).build()]);
        let card = feed.story_mut(0).unwrap();
        let prefetch = card.reveal_comments(&mut mounts).unwrap();
        card.finish_reveal(prefetch.ticket, &mut mounts);
        (feed, mounts)
    }

    #[test]
    fn comment_node_rows() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let (mut feed, mut mounts) = revealed(vec![10, 11, 12]);
        let pending = mounts.take_pending();
        let card = feed.story_mut(0).unwrap();
        card.resolve(
            pending[0].key,
            Ok(Some(
                CommentBuilder::new()
                    .id(10)
                    .author("pg")
                    .text("&lt;b&gt;Hi &amp; bye&lt;/b&gt;")
                    .time(1314211127)
                    .kids(vec![20, 21])
                    .build(),
            )),
        );
        card.resolve(pending[1].key, Ok(None));
        card.resolve(pending[2].key, Err(ApiError::Network("reset".into())));

        let rows = build_rows(&feed, &theme, 100);
        let text = text_of(&rows);
        assert!(text.contains("[ Hide Comments ]"));
        assert!(text.contains("pg · Wed, 24 Aug 2011 18:38:47 GMT"));
        assert!(text.contains("Hi & bye"));
        assert!(text.contains("type: comment • id: 10"));
        assert!(text.contains("▶ Replying to parent comment (id: 1)"));
        assert!(text.contains("▶ 2 replies"));
        assert!(text.contains("Error loading comment"));
        assert!(!text.contains("id: 11"));
        assert!(
            rows.iter()
                .any(|r| r.target == Some(Target::Replies(0, pending[0].key)))
        );
    }

    #[test]
    fn deleted_author_and_single_reply() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let (mut feed, mut mounts) = revealed(vec![10]);
        let pending = mounts.take_pending();
        feed.story_mut(0).unwrap().resolve(
            pending[0].key,
            Ok(Some(
                CommentBuilder::new()
                    .id(10)
                    .deleted()
                    .no_parent()
                    .kids(vec![20])
                    .build(),
            )),
        );
        let text = text_of(&build_rows(&feed, &theme, 100));
        assert!(text.contains("[deleted]"));
        assert!(text.contains("▶ 1 reply"));
        assert!(!text.contains("Replying to parent"));
    }

    #[test]
    fn children_indent_by_depth() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let (mut feed, mut mounts) = revealed(vec![10]);
        let top = mounts.take_pending()[0].key;
        let card = feed.story_mut(0).unwrap();
        card.resolve(
            top,
            Ok(Some(CommentBuilder::new().id(10).kids(vec![20]).build())),
        );
        card.find_node_mut(top).unwrap().toggle_replies(&mut mounts);
        let child = mounts.take_pending()[0].key;
        card.resolve(
            child,
            Ok(Some(CommentBuilder::new().id(20).author("kid").build())),
        );

        let rows = build_rows(&feed, &theme, 100);
        let text = text_of(&rows);
        assert!(text.contains("▼ 1 reply"));
        assert!(text.contains(&format!("{CARD_GUTTER}  kid · ")));
    }

    #[test]
    fn parent_preview_renders_in_gutter() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let (mut feed, mut mounts) = revealed(vec![10]);
        let top = mounts.take_pending()[0].key;
        let card = feed.story_mut(0).unwrap();
        card.resolve(
            top,
            Ok(Some(CommentBuilder::new().id(10).parent(9).build())),
        );
        card.find_node_mut(top).unwrap().toggle_parent(&mut mounts);
        let preview = mounts.take_pending()[0].key;
        card.resolve(
            preview,
            Ok(Some(
                CommentBuilder::new()
                    .id(9)
                    .author("elder")
                    .no_parent()
                    .build(),
            )),
        );

        let text = text_of(&build_rows(&feed, &theme, 100));
        assert!(text.contains("▼ Hide parent"));
        assert!(text.contains(&format!("{CARD_GUTTER}{PREVIEW_GUTTER}elder · ")));
    }
}
