//! Debounced story-update detection.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use newsroom_ipc::Story;

/// Decides whether and when a raw "new item observed" signal becomes an
/// accepted story transition.
///
/// A candidate arriving at least `debounce` after the last accepted
/// transition is accepted immediately. A candidate inside the window is
/// parked in a single pending slot; a newer candidate replaces it
/// (latest-wins), it never queues behind it. The scheduler re-evaluates the
/// slot via [`poll_pending`](Self::poll_pending).
///
/// All methods take `now` explicitly so callers drive time from one
/// monotonic clock.
pub struct UpdateDetector {
    debounce: Duration,
    last_transition: Option<Instant>,
    pending: Option<Arc<Story>>,
}

impl UpdateDetector {
    /// Create a detector. A zero `debounce` accepts every distinct
    /// candidate immediately.
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            last_transition: None,
            pending: None,
        }
    }

    /// Report a candidate story whose identity differs from the one on
    /// air. Returns the candidate if it is accepted now.
    pub fn observe(&mut self, candidate: Arc<Story>, now: Instant) -> Option<Arc<Story>> {
        if candidate.id.is_empty() {
            warn!("Dropping candidate without a stable identity");
            return None;
        }

        if self.window_clear(now) {
            debug!(story_id = %candidate.id, "Candidate accepted immediately");
            // Immediate acceptance supersedes anything still parked.
            self.pending = None;
            self.last_transition = Some(now);
            return Some(candidate);
        }

        if let Some(previous) = &self.pending {
            debug!(
                superseded = %previous.id,
                by = %candidate.id,
                "Pending candidate replaced"
            );
        } else {
            debug!(story_id = %candidate.id, "Candidate parked for debounce");
        }
        self.pending = Some(candidate);
        None
    }

    /// Re-evaluate the pending slot. Returns the pending candidate once
    /// the debounce window has cleared.
    pub fn poll_pending(&mut self, now: Instant) -> Option<Arc<Story>> {
        if self.pending.is_none() || !self.window_clear(now) {
            return None;
        }
        self.last_transition = Some(now);
        let accepted = self.pending.take();
        if let Some(story) = &accepted {
            debug!(story_id = %story.id, "Pending candidate accepted after debounce");
        }
        accepted
    }

    /// Whether a candidate is parked awaiting clearance.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn window_clear(&self, now: Instant) -> bool {
        match self.last_transition {
            None => true,
            Some(last) => now.duration_since(last) >= self.debounce,
        }
    }
}
