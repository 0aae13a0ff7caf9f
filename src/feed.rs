//! Batch pagination over the ranked top-story id list.
//!
//! The id list is fetched once and never re-polled. Stories are fetched in
//! fixed batches of `BATCH_SIZE`, appended in ranking order, and at most one
//! batch is in flight at any time.

use tracing::{debug, info, warn};

use crate::api::{ApiError, Story};
use crate::story_card::StoryCard;

pub const BATCH_SIZE: usize = 10;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedPhase {
    Initializing,
    LoadingBatch,
    Idle,
    Exhausted,
    /// The id list could not be fetched; the feed never proceeds.
    Failed(String),
}

/// A batch the caller must fetch and hand back to `complete_batch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub start: usize,
    pub end: usize,
    pub ids: Vec<u64>,
}

/// Scroll geometry of the document, in lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub scroll_top: usize,
    pub viewport_height: usize,
    pub document_height: usize,
}

impl ScrollMetrics {
    /// True once the bottom of the viewport reaches 80% of the document.
    pub const fn near_bottom(&self) -> bool {
        (self.scroll_top + self.viewport_height) * 5 >= self.document_height * 4
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub appended: usize,
    pub dropped: usize,
}

#[derive(Debug, Default)]
pub struct Feed {
    ids: Option<Vec<u64>>,
    stories: Vec<StoryCard>,
    cursor: usize,
    in_flight: bool,
    error: Option<String>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FeedPhase {
        match (&self.ids, &self.error) {
            (None, Some(err)) => FeedPhase::Failed(err.clone()),
            (None, None) => FeedPhase::Initializing,
            (Some(_), _) if self.in_flight => FeedPhase::LoadingBatch,
            (Some(ids), _) if self.cursor >= ids.len() => FeedPhase::Exhausted,
            (Some(_), _) => FeedPhase::Idle,
        }
    }

    pub fn stories(&self) -> &[StoryCard] {
        &self.stories
    }

    pub fn story_mut(&mut self, index: usize) -> Option<&mut StoryCard> {
        self.stories.get_mut(index)
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Number of ranked ids, zero until the list arrives.
    pub fn total(&self) -> usize {
        self.ids.as_ref().map_or(0, Vec::len)
    }

    pub fn fetched(&self) -> usize {
        self.stories.len()
    }

    pub fn remaining(&self) -> usize {
        self.total().saturating_sub(self.cursor)
    }

    /// Store the ranked id list and start the first batch.
    pub fn set_ids(&mut self, ids: Vec<u64>) -> Option<BatchRequest> {
        info!(count = ids.len(), "top story ids loaded");
        self.ids = Some(ids);
        self.error = None;
        self.begin_batch()
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(%message, "top story ids failed; feed cannot proceed");
        self.error = Some(message);
    }

    /// Claim the next batch. Returns `None` while a batch is in flight,
    /// before the id list arrives, or once every id has been requested.
    pub fn begin_batch(&mut self) -> Option<BatchRequest> {
        if self.in_flight {
            return None;
        }
        let ids = self.ids.as_ref()?;
        if self.cursor >= ids.len() {
            return None;
        }
        let start = self.cursor;
        let end = start + BATCH_SIZE;
        let batch = ids[start..end.min(ids.len())].to_vec();
        self.in_flight = true;
        debug!(start, end, "batch started");
        Some(BatchRequest {
            start,
            end,
            ids: batch,
        })
    }

    /// Scroll handler: start a batch if the viewport is near the bottom and
    /// nothing is in flight.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<BatchRequest> {
        if metrics.near_bottom() {
            self.begin_batch()
        } else {
            None
        }
    }

    /// Settle a batch: keep the stories that arrived, in slice order, and move
    /// the cursor to `end` whether or not every member succeeded. Failed and
    /// absent members are not backfilled.
    pub fn complete_batch(
        &mut self,
        end: usize,
        results: Vec<(u64, Result<Option<Story>, ApiError>)>,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for (id, result) in results {
            match result {
                Ok(Some(story)) => {
                    self.stories.push(StoryCard::new(story));
                    outcome.appended += 1;
                }
                Ok(None) => {
                    debug!(id, "story absent; skipped");
                    outcome.dropped += 1;
                }
                Err(e) => {
                    warn!(id, error = %e, "story fetch failed; dropped");
                    outcome.dropped += 1;
                }
            }
        }
        self.cursor = end;
        self.in_flight = false;
        debug!(
            cursor = self.cursor,
            appended = outcome.appended,
            dropped = outcome.dropped,
            "batch settled"
        );
        outcome
    }
}
