use std::collections::VecDeque;
use std::time::Instant;

use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Comment, HnClient, Story};
use crate::comment_tree::{FetchRequest, MountQueue, NodeKey};
use crate::feed::{BatchRequest, Feed, ScrollMetrics};
use crate::story_card::Prefetch;
use crate::theme::ResolvedTheme;
use crate::views::{
    self,
    feed::{Row, Target, build_rows},
};
use crate::widgets::document::{max_offset, offset_to_show};

/// Selectable rows moved per page step.
const PAGE_ROWS: usize = 10;
/// Lines moved per mouse-wheel notch.
const WHEEL_LINES: i64 = 3;

pub enum AsyncResult {
    TopStories {
        task_id: u64,
        result: Result<Vec<u64>, ApiError>,
    },
    Batch {
        task_id: u64,
        end: usize,
        results: Vec<(u64, Result<Option<Story>, ApiError>)>,
    },
    CommentsPrefetched {
        task_id: u64,
        story_index: usize,
        ticket: u64,
        failures: usize,
    },
    Comment {
        task_id: u64,
        key: NodeKey,
        result: Result<Option<Comment>, ApiError>,
    },
}

#[derive(Debug)]
pub struct TaskInfo {
    pub id: u64,
    pub description: String,
    pub started_at: Instant,
}

#[derive(Debug)]
pub struct LogEntry {
    pub message: String,
}

/// Debug panel state: task tracking and log messages.
#[derive(Debug, Default)]
pub struct DebugState {
    pub visible: bool,
    pub running_tasks: Vec<TaskInfo>,
    pub log: VecDeque<LogEntry>,
    next_task_id: u64,
}

impl DebugState {
    const MAX_LOG_ENTRIES: usize = 50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        let message = msg.into();
        debug!(target: "hnfeed::tasks", "{message}");
        self.log.push_back(LogEntry { message });
        if self.log.len() > Self::MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
    }

    pub fn start_task(&mut self, description: impl Into<String>) -> u64 {
        let id = self.next_task_id;
        self.next_task_id += 1;
        let desc = description.into();
        self.log(format!("Started: {desc}"));
        self.running_tasks.push(TaskInfo {
            id,
            description: desc,
            started_at: Instant::now(),
        });
        id
    }

    pub fn end_task(&mut self, id: u64, outcome: &str) {
        if let Some(pos) = self.running_tasks.iter().position(|t| t.id == id) {
            let task = self.running_tasks.remove(pos);
            let elapsed = task.started_at.elapsed();
            self.log(format!("{} {}: {:.2?}", task.description, outcome, elapsed));
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    PageDown,
    PageUp,
    /// Mouse wheel, in notches; positive scrolls down.
    Scroll(i16),
    Activate,
    ToggleComments,
    ToggleParent,
    ToggleReplies,
    CollapseReply,
    OpenUrl,
    ToggleHelp,
    ToggleDebug,
    Resize(u16, u16),
    Quit,
}

pub struct App {
    pub feed: Feed,
    pub mounts: MountQueue,
    /// Index into the rows built by `views::feed::build_rows`.
    pub selected: usize,
    /// First document line shown in the viewport.
    pub scroll_top: usize,
    /// Terminal size as (width, height).
    pub size: (u16, u16),
    pub should_quit: bool,
    pub show_help: bool,
    pub client: HnClient,
    pub theme: ResolvedTheme,
    pub started_at: Instant,
    // Async task management
    pub result_tx: mpsc::Sender<AsyncResult>,
    pub result_rx: mpsc::Receiver<AsyncResult>,
    // Debug pane
    pub debug: DebugState,
}

impl App {
    pub fn new(theme: ResolvedTheme, client: HnClient) -> Self {
        let (result_tx, result_rx) = mpsc::channel(64);
        Self {
            feed: Feed::new(),
            mounts: MountQueue::new(),
            selected: 0,
            scroll_top: 0,
            size: (80, 24),
            should_quit: false,
            show_help: false,
            client,
            theme,
            started_at: Instant::now(),
            result_tx,
            result_rx,
            debug: DebugState::new(),
        }
    }

    /// Kick off the one-time fetch of the ranked id list.
    pub fn start(&mut self) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self.debug.start_task("Load top story ids");

        tokio::spawn(async move {
            let result = client.fetch_top_ids().await;
            let _ = tx.send(AsyncResult::TopStories { task_id, result }).await;
        });
    }

    pub fn handle_async_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::TopStories { task_id, result } => match result {
                Ok(ids) => {
                    self.debug
                        .end_task(task_id, &format!("completed ({} ids)", ids.len()));
                    if let Some(request) = self.feed.set_ids(ids) {
                        self.spawn_batch(request);
                    }
                    self.reselect(None, None);
                }
                Err(e) => {
                    self.debug.end_task(task_id, "failed");
                    self.feed.fail(e.user_message());
                }
            },
            AsyncResult::Batch {
                task_id,
                end,
                results,
            } => {
                let previous = self.selected_target();
                let outcome = self.feed.complete_batch(end, results);
                self.debug.end_task(
                    task_id,
                    &format!(
                        "completed ({} appended, {} dropped)",
                        outcome.appended, outcome.dropped
                    ),
                );
                self.reselect(previous, None);
            }
            AsyncResult::CommentsPrefetched {
                task_id,
                story_index,
                ticket,
                failures,
            } => {
                if failures > 0 {
                    warn!(story_index, failures, "comment prefetch had failures");
                }
                let previous = self.selected_target();
                let revealed = self
                    .feed
                    .story_mut(story_index)
                    .is_some_and(|card| card.finish_reveal(ticket, &mut self.mounts));
                if revealed {
                    self.debug.end_task(task_id, "completed");
                    self.flush_mounts();
                    self.reselect(previous, None);
                } else {
                    self.debug.end_task(task_id, "discarded (stale reveal)");
                }
            }
            AsyncResult::Comment {
                task_id,
                key,
                result,
            } => {
                let outcome = match &result {
                    Ok(Some(_)) => "completed",
                    Ok(None) => "absent",
                    Err(e) => {
                        warn!(?key, error = %e, "comment fetch failed");
                        "failed"
                    }
                };
                let previous = self.selected_target();
                let owner = self
                    .feed
                    .stories()
                    .iter()
                    .position(|card| card.find_node(key).is_some());
                let delivered = owner
                    .and_then(|i| self.feed.story_mut(i))
                    .is_some_and(|card| card.resolve(key, result));
                if delivered {
                    self.debug.end_task(task_id, outcome);
                    self.reselect(previous, None);
                } else {
                    self.debug.end_task(task_id, "discarded (unmounted)");
                }
            }
        }
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::SelectNext => self.step(1, true),
            Message::SelectPrev => self.step(1, false),
            Message::PageDown => self.step(PAGE_ROWS, true),
            Message::PageUp => self.step(PAGE_ROWS, false),
            Message::SelectFirst => self.select_first(),
            Message::SelectLast => self.select_last(),
            Message::Scroll(notches) => self.scroll(notches),
            Message::Activate => self.activate(),
            Message::ToggleComments => {
                if let Some(target) = self.selected_target() {
                    self.toggle_comments(target.story_index());
                }
            }
            Message::ToggleParent => {
                if let Some(target) = self.selected_target()
                    && let Some(key) = target.node()
                {
                    self.toggle_parent(target.story_index(), key);
                }
            }
            Message::ToggleReplies => {
                if let Some(target) = self.selected_target()
                    && let Some(key) = target.node()
                {
                    self.toggle_replies(target.story_index(), key);
                }
            }
            Message::CollapseReply => self.collapse_reply(),
            Message::OpenUrl => self.open_url(),
            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::ToggleDebug => {
                self.debug.toggle();
                self.clamp_scroll();
            }
            Message::Resize(width, height) => {
                self.size = (width, height);
                self.clamp_scroll();
            }
            Message::Quit => self.should_quit = true,
        }
    }

    /// Area the document is drawn into, derived from the terminal size.
    pub fn document_area(&self) -> Rect {
        let (width, height) = self.size;
        views::layout(Rect::new(0, 0, width, height), self.debug.visible).document
    }

    pub fn rows(&self) -> Vec<Row> {
        build_rows(&self.feed, &self.theme, self.document_area().width)
    }

    pub fn selected_target(&self) -> Option<Target> {
        self.rows().get(self.selected).and_then(|row| row.target)
    }

    fn viewport_height(&self) -> usize {
        self.document_area().height as usize
    }

    fn step(&mut self, count: usize, forward: bool) {
        let rows = self.rows();
        let mut current = self.selected;
        for _ in 0..count {
            let next = if forward {
                (current + 1..rows.len()).find(|&i| rows[i].is_selectable())
            } else {
                (0..current).rev().find(|&i| rows[i].is_selectable())
            };
            match next {
                Some(i) => current = i,
                None => break,
            }
        }
        self.selected = current;
        self.after_move(&rows);
    }

    fn select_first(&mut self) {
        let rows = self.rows();
        self.selected = rows.iter().position(Row::is_selectable).unwrap_or(0);
        self.scroll_top = 0;
        self.after_move(&rows);
    }

    fn select_last(&mut self) {
        let rows = self.rows();
        self.selected = rows.iter().rposition(Row::is_selectable).unwrap_or(0);
        self.after_move(&rows);
    }

    fn scroll(&mut self, notches: i16) {
        let rows = self.rows();
        let heights: Vec<usize> = rows.iter().map(Row::height).collect();
        let max = max_offset(&heights, self.viewport_height()) as i64;
        let next = self.scroll_top as i64 + i64::from(notches) * WHEEL_LINES;
        self.scroll_top = next.clamp(0, max) as usize;
        self.check_scroll_trigger(&rows);
    }

    /// Bring the selection into view, then treat the move as a scroll event.
    fn after_move(&mut self, rows: &[Row]) {
        let heights: Vec<usize> = rows.iter().map(Row::height).collect();
        self.scroll_top = offset_to_show(
            self.selected,
            &heights,
            self.viewport_height(),
            self.scroll_top,
        );
        self.check_scroll_trigger(rows);
    }

    fn check_scroll_trigger(&mut self, rows: &[Row]) {
        let metrics = ScrollMetrics {
            scroll_top: self.scroll_top,
            viewport_height: self.viewport_height(),
            document_height: rows.iter().map(Row::height).sum(),
        };
        if let Some(request) = self.feed.on_scroll(metrics) {
            self.spawn_batch(request);
        }
    }

    fn clamp_scroll(&mut self) {
        let heights: Vec<usize> = self.rows().iter().map(Row::height).collect();
        self.scroll_top = self
            .scroll_top
            .min(max_offset(&heights, self.viewport_height()));
    }

    /// Restore the selection after the document changed shape: first by the
    /// previously selected target, then by `fallback`, then by the nearest
    /// selectable row at or above the old index.
    fn reselect(&mut self, previous: Option<Target>, fallback: Option<Target>) {
        let rows = self.rows();
        let position = |target: Target| rows.iter().position(|r| r.target == Some(target));
        self.selected = previous
            .and_then(position)
            .or_else(|| fallback.and_then(position))
            .unwrap_or_else(|| nearest_selectable(&rows, self.selected));
        self.clamp_scroll();
    }

    fn reselect_visible(&mut self, previous: Option<Target>, fallback: Option<Target>) {
        self.reselect(previous, fallback);
        let rows = self.rows();
        self.after_move(&rows);
    }

    fn activate(&mut self) {
        match self.selected_target() {
            Some(Target::Story(i) | Target::Comments(i)) => self.toggle_comments(i),
            Some(Target::Parent(i, key)) => self.toggle_parent(i, key),
            Some(Target::Comment(i, key) | Target::Replies(i, key)) => self.toggle_replies(i, key),
            None => {}
        }
    }

    fn toggle_comments(&mut self, story_index: usize) {
        let previous = self.selected_target();
        let Some(card) = self.feed.story_mut(story_index) else {
            return;
        };
        let story_id = card.story().id;

        if card.hide_comments() {
            info!(story_id, "comments hidden");
            self.reselect_visible(previous, Some(Target::Comments(story_index)));
            return;
        }
        if let Some(prefetch) = card.reveal_comments(&mut self.mounts) {
            self.spawn_prefetch(story_index, story_id, prefetch);
        }
    }

    fn toggle_parent(&mut self, story_index: usize, key: NodeKey) {
        let previous = self.selected_target();
        let toggled = self
            .feed
            .story_mut(story_index)
            .and_then(|card| card.find_node_mut(key))
            .is_some_and(|node| node.toggle_parent(&mut self.mounts));
        if toggled {
            self.flush_mounts();
            self.reselect_visible(previous, Some(Target::Comment(story_index, key)));
        }
    }

    fn toggle_replies(&mut self, story_index: usize, key: NodeKey) {
        let previous = self.selected_target();
        let toggled = self
            .feed
            .story_mut(story_index)
            .and_then(|card| card.find_node_mut(key))
            .is_some_and(|node| node.toggle_replies(&mut self.mounts));
        if toggled {
            self.flush_mounts();
            self.reselect_visible(previous, Some(Target::Replies(story_index, key)));
        }
    }

    /// Collapse the selected reply alone and move to its parent's replies row.
    fn collapse_reply(&mut self) {
        let Some(target) = self.selected_target() else {
            return;
        };
        let Some(key) = target.node() else {
            return;
        };
        let story_index = target.story_index();
        let parent = self
            .feed
            .story_mut(story_index)
            .and_then(|card| card.collapse_reply(key));
        if let Some(parent) = parent {
            self.reselect_visible(
                Some(Target::Replies(story_index, parent)),
                Some(Target::Comment(story_index, parent)),
            );
        }
    }

    fn open_url(&mut self) {
        let url = match self.selected_target() {
            Some(Target::Story(i) | Target::Comments(i)) => self
                .feed
                .stories()
                .get(i)
                .map(|card| card.story().content_url()),
            Some(target) => target.node().and_then(|key| {
                self.feed
                    .stories()
                    .get(target.story_index())?
                    .find_node(key)?
                    .comment()
                    .map(Comment::hn_url)
            }),
            None => None,
        };
        if let Some(url) = url
            && let Err(e) = open::that(&url)
        {
            warn!(%url, error = %e, "failed to open url");
            self.debug.log(format!("Failed to open {url}: {e}"));
        }
    }

    fn spawn_batch(&mut self, request: BatchRequest) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self
            .debug
            .start_task(format!("Load stories {}..{}", request.start, request.end));
        let BatchRequest { end, ids, .. } = request;

        tokio::spawn(async move {
            let results = client.fetch_stories(&ids).await;
            let _ = tx
                .send(AsyncResult::Batch {
                    task_id,
                    end,
                    results,
                })
                .await;
        });
    }

    fn spawn_prefetch(&mut self, story_index: usize, story_id: u64, prefetch: Prefetch) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self.debug.start_task(format!(
            "Prefetch {} comments for {}",
            prefetch.ids.len(),
            story_id
        ));
        let Prefetch { ticket, ids } = prefetch;

        tokio::spawn(async move {
            let failures = client.prefetch(&ids).await;
            let _ = tx
                .send(AsyncResult::CommentsPrefetched {
                    task_id,
                    story_index,
                    ticket,
                    failures,
                })
                .await;
        });
    }

    /// Spawn a fetch for every node mounted since the last flush.
    fn flush_mounts(&mut self) {
        for request in self.mounts.take_pending() {
            self.spawn_comment_fetch(request);
        }
    }

    fn spawn_comment_fetch(&mut self, request: FetchRequest) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self.debug.start_task(format!("Load comment {}", request.id));
        let FetchRequest { key, id } = request;

        tokio::spawn(async move {
            let result = client.fetch_comment(id).await;
            let _ = tx
                .send(AsyncResult::Comment {
                    task_id,
                    key,
                    result,
                })
                .await;
        });
    }
}

fn nearest_selectable(rows: &[Row], from: usize) -> usize {
    let from = from.min(rows.len().saturating_sub(1));
    (0..=from)
        .rev()
        .find(|&i| rows.get(i).is_some_and(Row::is_selectable))
        .or_else(|| (from..rows.len()).find(|&i| rows[i].is_selectable()))
        .unwrap_or(0)
}
