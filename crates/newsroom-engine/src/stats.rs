//! Broadcast counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Monotonically increasing broadcast counters.
///
/// Shared read-only with observers; only the orchestrator thread records
/// into it.
pub struct BroadcastStats {
    started_at: Instant,
    frames_emitted: AtomicU64,
    stories_covered: AtomicU64,
    rotations_performed: AtomicU64,
}

impl BroadcastStats {
    /// Create zeroed counters anchored at the process start time.
    pub fn new(started_at: Instant) -> Self {
        Self {
            started_at,
            frames_emitted: AtomicU64::new(0),
            stories_covered: AtomicU64::new(0),
            rotations_performed: AtomicU64::new(0),
        }
    }

    /// Record a frame emitted.
    pub fn record_frame(&self) {
        self.frames_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an accepted story transition.
    pub fn record_story(&self) {
        self.stories_covered.fetch_add(1, Ordering::Relaxed);
    }

    /// Record `count` anchor rotations.
    pub fn record_rotations(&self, count: u64) {
        self.rotations_performed.fetch_add(count, Ordering::Relaxed);
    }

    /// Frames emitted since startup.
    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted.load(Ordering::Relaxed)
    }

    /// Stories covered since startup.
    pub fn stories_covered(&self) -> u64 {
        self.stories_covered.load(Ordering::Relaxed)
    }

    /// Anchor rotations performed since startup.
    pub fn rotations_performed(&self) -> u64 {
        self.rotations_performed.load(Ordering::Relaxed)
    }

    /// Seconds since the broadcast started.
    pub fn uptime_secs(&self, now: Instant) -> f64 {
        now.duration_since(self.started_at).as_secs_f64()
    }

    /// Average emitted frames per second over the whole run.
    pub fn average_fps(&self, now: Instant) -> f64 {
        let uptime = self.uptime_secs(now);
        if uptime > 0.0 {
            self.frames_emitted() as f64 / uptime
        } else {
            0.0
        }
    }
}
