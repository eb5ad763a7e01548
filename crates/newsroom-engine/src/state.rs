//! The single source of truth for what is on air.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use newsroom_ipc::{BroadcastPhase, Story};

/// Owns the current story and the top-level broadcast phase.
///
/// Every mutation goes through the transition methods below, and all of
/// them are called from the orchestrator's single control path. During a
/// breaking-news window the outgoing story stays installed; the incoming
/// one waits in `pending_install` until the window's deadline, so frame
/// producers never see a half-updated story.
pub struct BroadcastState {
    phase: BroadcastPhase,
    story: Option<Arc<Story>>,
    pending_install: Option<Arc<Story>>,
    transition_deadline: Option<Instant>,
    episode_id: String,
    started_at: Instant,
}

impl BroadcastState {
    /// Create an idle broadcast with a process-lifetime episode id.
    pub fn new(episode_id: String, started_at: Instant) -> Self {
        Self {
            phase: BroadcastPhase::Idle,
            story: None,
            pending_install: None,
            transition_deadline: None,
            episode_id,
            started_at,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> BroadcastPhase {
        self.phase
    }

    /// The story on air. `None` only while idle.
    pub fn story(&self) -> Option<&Arc<Story>> {
        self.story.as_ref()
    }

    /// Episode identifier, stable for the process lifetime.
    pub fn episode_id(&self) -> &str {
        &self.episode_id
    }

    /// Time since the broadcast started.
    pub fn uptime(&self, now: Instant) -> Duration {
        now.duration_since(self.started_at)
    }

    /// First accepted story: `Idle -> OnAir`, no breaking window.
    ///
    /// Contract: only callable from `Idle`.
    pub fn go_on_air(&mut self, story: Arc<Story>) -> BroadcastPhase {
        assert!(
            self.phase.is_idle(),
            "go_on_air from {:?}, expected Idle",
            self.phase
        );
        debug!(story_id = %story.id, "First story on air");
        self.story = Some(story);
        self.replace_phase(BroadcastPhase::OnAir)
    }

    /// Accepted transition while on air: open a breaking window. The old
    /// story stays visible until the deadline. If a window is already
    /// open, the incoming story is replaced (latest-wins) and the deadline
    /// is left untouched, so the window stays bounded.
    ///
    /// Contract: not callable from `Idle`.
    pub fn begin_transition(
        &mut self,
        story: Arc<Story>,
        now: Instant,
        duration: Duration,
    ) -> BroadcastPhase {
        assert!(
            !self.phase.is_idle(),
            "begin_transition from Idle; use go_on_air"
        );

        if self.phase.is_transitioning() {
            debug!(story_id = %story.id, "Incoming story replaced during open window");
            self.pending_install = Some(story);
            return self.phase;
        }

        debug!(story_id = %story.id, "Breaking-news window opened");
        self.pending_install = Some(story);
        self.transition_deadline = Some(now + duration);
        self.replace_phase(BroadcastPhase::Transitioning)
    }

    /// Close the breaking window once its deadline has passed: atomically
    /// install the incoming story and return it. Returns `None` while the
    /// window is still open or no window exists.
    pub fn try_complete_transition(&mut self, now: Instant) -> Option<Arc<Story>> {
        if !self.phase.is_transitioning() {
            return None;
        }
        let deadline = self.transition_deadline?;
        if now < deadline {
            return None;
        }
        Some(self.install_pending())
    }

    /// Shutdown path: a window that was entered is completed, never left
    /// half-swapped. Returns the installed story, if a window was open.
    pub fn complete_transition_for_shutdown(&mut self) -> Option<Arc<Story>> {
        if !self.phase.is_transitioning() {
            return None;
        }
        debug!("Completing open breaking window before teardown");
        Some(self.install_pending())
    }

    fn install_pending(&mut self) -> Arc<Story> {
        // A Transitioning phase always has a pending install; this is the
        // torn-transition invariant.
        let story = self
            .pending_install
            .take()
            .expect("Transitioning without a pending story");
        self.story = Some(Arc::clone(&story));
        self.transition_deadline = None;
        self.replace_phase(BroadcastPhase::OnAir);
        story
    }

    fn replace_phase(&mut self, next: BroadcastPhase) -> BroadcastPhase {
        let previous = self.phase;
        self.phase = next;
        debug!(previous = previous.name(), current = next.name(), "State transition");
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str) -> Arc<Story> {
        Arc::new(Story {
            id: id.to_string(),
            title: format!("Story {id}"),
            summary: String::new(),
            link: String::new(),
            image_url: None,
            first_seen_unix: 0,
        })
    }

    fn state() -> BroadcastState {
        BroadcastState::new("ep-test".to_string(), Instant::now())
    }

    #[test]
    fn test_idle_to_on_air() {
        let mut state = state();
        assert!(state.phase().is_idle());
        assert!(state.story().is_none());

        let previous = state.go_on_air(story("a"));
        assert!(previous.is_idle());
        assert!(state.phase().is_on_air());
        assert_eq!(state.story().unwrap().id, "a");
    }

    #[test]
    fn test_window_keeps_old_story_until_deadline() {
        let base = Instant::now();
        let mut state = state();
        state.go_on_air(story("a"));

        state.begin_transition(story("b"), base, Duration::from_secs(2));
        assert!(state.phase().is_transitioning());
        // Old story still visible for frame production.
        assert_eq!(state.story().unwrap().id, "a");

        assert!(state
            .try_complete_transition(base + Duration::from_millis(1999))
            .is_none());
        let installed = state
            .try_complete_transition(base + Duration::from_secs(2))
            .unwrap();
        assert_eq!(installed.id, "b");
        assert!(state.phase().is_on_air());
        assert_eq!(state.story().unwrap().id, "b");
    }

    #[test]
    fn test_latest_wins_inside_open_window() {
        let base = Instant::now();
        let mut state = state();
        state.go_on_air(story("a"));

        state.begin_transition(story("b"), base, Duration::from_secs(2));
        // "c" arrives while the window is open: replaces "b", same deadline.
        state.begin_transition(story("c"), base + Duration::from_secs(1), Duration::from_secs(2));

        assert!(state
            .try_complete_transition(base + Duration::from_millis(1500))
            .is_none());
        let installed = state
            .try_complete_transition(base + Duration::from_secs(2))
            .unwrap();
        assert_eq!(installed.id, "c");
    }

    #[test]
    fn test_zero_duration_window_completes_at_once() {
        let base = Instant::now();
        let mut state = state();
        state.go_on_air(story("a"));
        state.begin_transition(story("b"), base, Duration::ZERO);
        assert_eq!(state.try_complete_transition(base).unwrap().id, "b");
    }

    #[test]
    fn test_shutdown_completes_open_window() {
        let base = Instant::now();
        let mut state = state();
        state.go_on_air(story("a"));
        state.begin_transition(story("b"), base, Duration::from_secs(30));

        let installed = state.complete_transition_for_shutdown().unwrap();
        assert_eq!(installed.id, "b");
        assert!(state.phase().is_on_air());
    }

    #[test]
    fn test_shutdown_without_window_is_a_no_op() {
        let mut state = state();
        assert!(state.complete_transition_for_shutdown().is_none());
        state.go_on_air(story("a"));
        assert!(state.complete_transition_for_shutdown().is_none());
    }

    #[test]
    #[should_panic(expected = "go_on_air")]
    fn test_go_on_air_twice_is_a_contract_failure() {
        let mut state = state();
        state.go_on_air(story("a"));
        state.go_on_air(story("b"));
    }
}
