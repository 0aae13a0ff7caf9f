use serde::Deserialize;

use super::ApiError;

/// Raw item document as served by `/item/{id}.json`.
///
/// Every field except `id` is optional on the wire; the typed views below
/// decide what a story or a comment requires.
#[derive(Debug, Clone, Deserialize)]
pub struct HnItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub by: Option<String>,
    pub time: Option<u64>,
    pub text: Option<String>,
    pub url: Option<String>,
    pub score: Option<u32>,
    pub title: Option<String>,
    pub descendants: Option<u32>,
    #[serde(default)]
    pub kids: Vec<u64>,
    pub parent: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub id: u64,
    pub title: String,
    pub url: Option<String>,
    pub score: u32,
    pub by: String,
    pub time: u64,
    pub kind: String,
    pub descendants: Option<u32>,
    pub kids: Vec<u64>,
}

impl Story {
    /// Read an item in story context. A document without a title is not a
    /// story and is reported as a parse failure.
    pub fn from_item(item: HnItem) -> Result<Self, ApiError> {
        let Some(title) = item.title else {
            return Err(ApiError::Parse(format!(
                "item {} is not a story (no title)",
                item.id
            )));
        };
        Ok(Story {
            id: item.id,
            title,
            url: item.url,
            score: item.score.unwrap_or(0),
            by: item.by.unwrap_or_else(|| "[deleted]".to_string()),
            time: item.time.unwrap_or(0),
            kind: item.kind.unwrap_or_else(|| "story".to_string()),
            descendants: item.descendants,
            kids: item.kids,
        })
    }

    pub fn has_comments(&self) -> bool {
        !self.kids.is_empty()
    }

    /// URL to the HN discussion page for this story.
    pub fn hn_url(&self) -> String {
        format!("https://news.ycombinator.com/item?id={}", self.id)
    }

    /// URL to the story content (article URL, or HN page for self-posts).
    pub fn content_url(&self) -> String {
        self.url.clone().unwrap_or_else(|| self.hn_url())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: u64,
    /// Absent for deleted comments.
    pub by: Option<String>,
    pub time: u64,
    /// Raw HTML fragment; absent for removed comments.
    pub text: Option<String>,
    pub kind: String,
    pub parent: Option<u64>,
    pub kids: Vec<u64>,
}

impl Comment {
    /// Read any item in comment context. Parent previews may land on a
    /// story, which reads fine here: it simply has no text and no parent.
    pub fn from_item(item: HnItem) -> Self {
        Comment {
            id: item.id,
            by: item.by,
            time: item.time.unwrap_or(0),
            text: item.text,
            kind: item.kind.unwrap_or_else(|| "comment".to_string()),
            parent: item.parent,
            kids: item.kids,
        }
    }

    pub fn author(&self) -> &str {
        self.by.as_deref().unwrap_or("[deleted]")
    }

    /// URL to the HN permalink for this comment.
    pub fn hn_url(&self) -> String {
        format!("https://news.ycombinator.com/item?id={}", self.id)
    }
}
