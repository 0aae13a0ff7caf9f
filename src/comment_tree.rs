//! Recursive comment nodes for lazily fetched HN threads.
//!
//! Each `CommentNode` owns its fetch lifecycle, its reply-expansion flags,
//! its mounted children and an optional parent preview. Dropping a node
//! drops all of that. Fetch results are routed back by `NodeKey`, which is
//! unique per mount, so a result for a node that has since been dropped
//! finds nothing and is discarded.
//!
//! Parent previews follow `parent` links without cycle detection; the item
//! graph served by the API is acyclic and every level needs an explicit
//! toggle.

use std::collections::HashMap;

use crate::api::{ApiError, Comment};

/// Identity of one mounted node instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(u64);

/// A node that needs its item fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub key: NodeKey,
    pub id: u64,
}

/// Hands out node keys and reveal tickets, and collects the fetches that
/// newly mounted nodes need. The app drains `take_pending` after every
/// operation that can mount.
#[derive(Debug, Default)]
pub struct MountQueue {
    next: u64,
    pending: Vec<FetchRequest>,
}

impl MountQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, id: u64, depth: usize) -> CommentNode {
        let key = NodeKey(self.bump());
        self.pending.push(FetchRequest { key, id });
        CommentNode::new(key, id, depth)
    }

    pub fn ticket(&mut self) -> u64 {
        self.bump()
    }

    pub fn take_pending(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.pending)
    }

    fn bump(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    Loading,
    Ready(Comment),
    /// The API answered `null`; the node renders nothing.
    Absent,
    /// Terminal for this instance; remounting is the only way to retry.
    Failed(String),
}

#[derive(Debug)]
pub struct CommentNode {
    key: NodeKey,
    id: u64,
    depth: usize,
    state: NodeState,
    expanded: HashMap<u64, bool>,
    children: Vec<CommentNode>,
    parent_preview: Option<Box<CommentNode>>,
}

impl CommentNode {
    fn new(key: NodeKey, id: u64, depth: usize) -> Self {
        Self {
            key,
            id,
            depth,
            state: NodeState::Loading,
            expanded: HashMap::new(),
            children: Vec::new(),
            parent_preview: None,
        }
    }

    pub const fn key(&self) -> NodeKey {
        self.key
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    pub const fn depth(&self) -> usize {
        self.depth
    }

    pub const fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn comment(&self) -> Option<&Comment> {
        match &self.state {
            NodeState::Ready(comment) => Some(comment),
            _ => None,
        }
    }

    /// Mounted children, in `kids` order.
    pub fn children(&self) -> &[CommentNode] {
        &self.children
    }

    pub fn parent_preview(&self) -> Option<&CommentNode> {
        self.parent_preview.as_deref()
    }

    pub const fn is_parent_shown(&self) -> bool {
        self.parent_preview.is_some()
    }

    pub fn is_reply_expanded(&self, kid: u64) -> bool {
        self.expanded.get(&kid).copied().unwrap_or(false)
    }

    /// True when any direct reply is flagged expanded.
    pub fn replies_expanded(&self) -> bool {
        self.expanded.values().any(|&v| v)
    }

    /// Deliver a fetch result to the node mounted under `key`, wherever it
    /// sits in this subtree. Returns false when no such node is mounted.
    pub fn resolve(&mut self, key: NodeKey, result: Result<Option<Comment>, ApiError>) -> bool {
        let Some(node) = self.find_mut(key) else {
            return false;
        };
        if node.state != NodeState::Loading {
            return false;
        }
        node.state = match result {
            Ok(Some(comment)) => NodeState::Ready(comment),
            Ok(None) => NodeState::Absent,
            Err(e) => NodeState::Failed(e.user_message()),
        };
        true
    }

    pub fn find(&self, key: NodeKey) -> Option<&CommentNode> {
        if self.key == key {
            return Some(self);
        }
        self.parent_preview
            .as_deref()
            .and_then(|p| p.find(key))
            .or_else(|| self.children.iter().find_map(|c| c.find(key)))
    }

    pub fn find_mut(&mut self, key: NodeKey) -> Option<&mut CommentNode> {
        if self.key == key {
            return Some(self);
        }
        let Self {
            parent_preview,
            children,
            ..
        } = self;
        parent_preview
            .as_deref_mut()
            .and_then(|p| p.find_mut(key))
            .or_else(|| children.iter_mut().find_map(|c| c.find_mut(key)))
    }

    /// Show or hide the parent preview. The preview is a fresh node for the
    /// parent id at depth 0. Returns false when there is no parent to show.
    pub fn toggle_parent(&mut self, mounts: &mut MountQueue) -> bool {
        if self.parent_preview.take().is_some() {
            return true;
        }
        let Some(parent) = self.comment().and_then(|c| c.parent) else {
            return false;
        };
        self.parent_preview = Some(Box::new(mounts.mount(parent, 0)));
        true
    }

    /// Flip every direct reply's expanded flag. Since every flag flips, the
    /// replies that end up expanded are exactly the ones that were not, and
    /// each is mounted fresh at `depth + 1`. Returns false when the comment
    /// has no replies.
    pub fn toggle_replies(&mut self, mounts: &mut MountQueue) -> bool {
        let Some(kids) = self
            .comment()
            .map(|c| c.kids.clone())
            .filter(|kids| !kids.is_empty())
        else {
            return false;
        };

        let flags: HashMap<u64, bool> = kids
            .iter()
            .map(|&kid| (kid, !self.is_reply_expanded(kid)))
            .collect();

        self.children = kids
            .iter()
            .filter(|kid| flags.get(kid).copied().unwrap_or(false))
            .map(|&kid| mounts.mount(kid, self.depth + 1))
            .collect();
        self.expanded = flags;
        true
    }

    /// Collapse the single reply mounted under `child`, searching the whole
    /// subtree. Returns the key of the node that owned it.
    pub fn collapse_reply(&mut self, child: NodeKey) -> Option<NodeKey> {
        if let Some(pos) = self.children.iter().position(|c| c.key == child) {
            let removed = self.children.remove(pos);
            self.expanded.insert(removed.id, false);
            return Some(self.key);
        }
        let Self {
            parent_preview,
            children,
            ..
        } = self;
        parent_preview
            .as_deref_mut()
            .and_then(|p| p.collapse_reply(child))
            .or_else(|| children.iter_mut().find_map(|c| c.collapse_reply(child)))
    }
}
