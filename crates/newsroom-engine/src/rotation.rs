//! Anchor rotation on a fixed cadence.

use std::time::Duration;

use tracing::debug;

/// Number of personas in the rotation cycle. Fixed by design.
pub const PERSONA_COUNT: usize = 3;

/// Advances the active persona index on a fixed interval.
///
/// Time is accumulated from explicit tick deltas; when the accumulator
/// crosses the interval the index advances by one (mod 3) and the
/// remainder is carried over, so coarse tick granularity does not stretch
/// the effective rotation duration. A single tick can cross several
/// boundaries; each one is reported.
pub struct RotationEngine {
    interval: Duration,
    index: usize,
    accumulated: Duration,
    rotations_for_story: u64,
}

impl RotationEngine {
    /// Create a rotation engine. `interval` must be non-zero; config
    /// validation enforces this before the engine is built.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            index: 0,
            accumulated: Duration::ZERO,
            rotations_for_story: 0,
        }
    }

    /// Start coverage of a new story: back to persona 0, fresh clock.
    ///
    /// Called exactly once per accepted story transition, before any frame
    /// is produced for the new story.
    pub fn reset(&mut self) {
        self.index = 0;
        self.accumulated = Duration::ZERO;
        self.rotations_for_story = 0;
    }

    /// Accumulate elapsed time, advancing the persona once per interval
    /// boundary crossed. Returns the number of rotations performed this
    /// tick; rotation is an edge-triggered event, not sampled state.
    pub fn tick(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;

        let mut rotations = 0u32;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            self.index = (self.index + 1) % PERSONA_COUNT;
            self.rotations_for_story += 1;
            rotations += 1;
            debug!(
                index = self.index,
                rotation = self.rotations_for_story,
                "Anchor rotated"
            );
        }
        rotations
    }

    /// Index of the active persona, always in `0..3`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Time accumulated on the current persona.
    pub fn time_on_persona(&self) -> Duration {
        self.accumulated
    }

    /// Rotations performed since the last story transition.
    pub fn rotations_for_story(&self) -> u64 {
        self.rotations_for_story
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_k_intervals_give_index_k_mod_3() {
        // Scenario: interval 30s. t=30 -> 1, t=60 -> 2, t=90 -> 0 (count 3).
        let mut rotation = RotationEngine::new(Duration::from_secs(30));
        assert_eq!(rotation.index(), 0);

        assert_eq!(rotation.tick(Duration::from_secs(30)), 1);
        assert_eq!(rotation.index(), 1);
        assert_eq!(rotation.tick(Duration::from_secs(30)), 1);
        assert_eq!(rotation.index(), 2);
        assert_eq!(rotation.tick(Duration::from_secs(30)), 1);
        assert_eq!(rotation.index(), 0);
        assert_eq!(rotation.rotations_for_story(), 3);
    }

    #[test]
    fn test_sub_interval_ticks_accumulate() {
        let mut rotation = RotationEngine::new(Duration::from_secs(30));
        for _ in 0..29 {
            assert_eq!(rotation.tick(Duration::from_secs(1)), 0);
        }
        assert_eq!(rotation.tick(Duration::from_secs(1)), 1);
        assert_eq!(rotation.index(), 1);
    }

    #[test]
    fn test_remainder_is_carried_not_discarded() {
        let mut rotation = RotationEngine::new(Duration::from_secs(30));
        assert_eq!(rotation.tick(Duration::from_secs(45)), 1);
        assert_eq!(rotation.time_on_persona(), Duration::from_secs(15));
        // 15 carried + 15 elapsed reaches the next boundary exactly.
        assert_eq!(rotation.tick(Duration::from_secs(15)), 1);
        assert_eq!(rotation.index(), 2);
    }

    #[test]
    fn test_one_tick_spanning_many_intervals() {
        let mut rotation = RotationEngine::new(Duration::from_secs(30));
        // 100s = 3 full intervals + 10s remainder.
        assert_eq!(rotation.tick(Duration::from_secs(100)), 3);
        assert_eq!(rotation.index(), 0);
        assert_eq!(rotation.rotations_for_story(), 3);
        assert_eq!(rotation.time_on_persona(), Duration::from_secs(10));
    }

    #[test]
    fn test_reset_returns_to_persona_zero() {
        let mut rotation = RotationEngine::new(Duration::from_secs(30));
        rotation.tick(Duration::from_secs(70));
        assert_eq!(rotation.index(), 2);
        rotation.reset();
        assert_eq!(rotation.index(), 0);
        assert_eq!(rotation.time_on_persona(), Duration::ZERO);
        assert_eq!(rotation.rotations_for_story(), 0);
    }

    #[test]
    fn test_index_never_skips() {
        let mut rotation = RotationEngine::new(Duration::from_millis(10));
        let mut previous = rotation.index();
        for _ in 0..50 {
            let steps = rotation.tick(Duration::from_millis(7));
            if steps > 0 {
                assert_eq!(steps, 1);
                assert_eq!(rotation.index(), (previous + 1) % PERSONA_COUNT);
            } else {
                assert_eq!(rotation.index(), previous);
            }
            previous = rotation.index();
        }
    }
}
