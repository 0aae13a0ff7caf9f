//! One story in the feed plus its comments-visibility state.

use crate::api::{ApiError, Comment, Story};
use crate::comment_tree::{CommentNode, MountQueue, NodeKey};

#[derive(Debug, Default)]
pub enum CommentsView {
    #[default]
    Hidden,
    /// Top-level comments are being prefetched. The ticket identifies this
    /// particular reveal so a late prefetch for an earlier one is ignored.
    Loading { ticket: u64 },
    /// One node per top-level comment, all at depth 0.
    Revealed(Vec<CommentNode>),
}

#[derive(Debug)]
pub struct StoryCard {
    story: Story,
    comments: CommentsView,
}

/// A prefetch the caller must run before the card can reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefetch {
    pub ticket: u64,
    pub ids: Vec<u64>,
}

impl StoryCard {
    pub fn new(story: Story) -> Self {
        Self {
            story,
            comments: CommentsView::Hidden,
        }
    }

    pub const fn story(&self) -> &Story {
        &self.story
    }

    pub const fn comments(&self) -> &CommentsView {
        &self.comments
    }

    pub const fn is_loading_comments(&self) -> bool {
        matches!(self.comments, CommentsView::Loading { .. })
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.comments, CommentsView::Revealed(_))
    }

    /// Start revealing comments. Returns the prefetch to run, or `None` when
    /// the story has no comments or they are not currently hidden.
    pub fn reveal_comments(&mut self, mounts: &mut MountQueue) -> Option<Prefetch> {
        if !self.story.has_comments() || !matches!(self.comments, CommentsView::Hidden) {
            return None;
        }
        let ticket = mounts.ticket();
        self.comments = CommentsView::Loading { ticket };
        Some(Prefetch {
            ticket,
            ids: self.story.kids.clone(),
        })
    }

    /// Complete a reveal once its prefetch has settled, mounting the
    /// top-level comment nodes. Returns false for a stale ticket.
    pub fn finish_reveal(&mut self, ticket: u64, mounts: &mut MountQueue) -> bool {
        match self.comments {
            CommentsView::Loading { ticket: current } if current == ticket => {
                let nodes = self
                    .story
                    .kids
                    .iter()
                    .map(|&id| mounts.mount(id, 0))
                    .collect();
                self.comments = CommentsView::Revealed(nodes);
                true
            }
            _ => false,
        }
    }

    /// Drop every mounted comment node. Returns false if nothing was shown.
    pub fn hide_comments(&mut self) -> bool {
        if self.is_revealed() {
            self.comments = CommentsView::Hidden;
            true
        } else {
            false
        }
    }

    pub fn find_node(&self, key: NodeKey) -> Option<&CommentNode> {
        match &self.comments {
            CommentsView::Revealed(nodes) => nodes.iter().find_map(|n| n.find(key)),
            _ => None,
        }
    }

    pub fn find_node_mut(&mut self, key: NodeKey) -> Option<&mut CommentNode> {
        match &mut self.comments {
            CommentsView::Revealed(nodes) => nodes.iter_mut().find_map(|n| n.find_mut(key)),
            _ => None,
        }
    }

    /// Route a comment fetch result to its node. Returns false when the node
    /// is no longer mounted under this card.
    pub fn resolve(&mut self, key: NodeKey, result: Result<Option<Comment>, ApiError>) -> bool {
        let CommentsView::Revealed(nodes) = &mut self.comments else {
            return false;
        };
        let Some(pos) = nodes.iter().position(|n| n.find(key).is_some()) else {
            return false;
        };
        nodes[pos].resolve(key, result)
    }

    pub fn collapse_reply(&mut self, key: NodeKey) -> Option<NodeKey> {
        match &mut self.comments {
            CommentsView::Revealed(nodes) => nodes.iter_mut().find_map(|n| n.collapse_reply(key)),
            _ => None,
        }
    }
}
