//! Main broadcast orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use newsroom_ipc::{
    BroadcastConfig, ConfigError, EngineCommand, EngineEvent, PollResult, StatusSnapshot, Story,
};

use crate::assembler::FrameAssembler;
use crate::detector::UpdateDetector;
use crate::rotation::{RotationEngine, PERSONA_COUNT};
use crate::state::BroadcastState;
use crate::stats::BroadcastStats;

/// The broadcast engine: one thread, one tick clock, one owner of all
/// mutable broadcast state.
///
/// Poll results, debounce clearances, breaking-window deadlines, anchor
/// rotation, and frame assembly are all advanced from the single control
/// path in [`run`](Self::run); the poller and the host only talk to it
/// through channels.
pub struct Engine {
    command_rx: Receiver<EngineCommand>,
    poll_rx: Receiver<PollResult>,
    event_tx: Sender<EngineEvent>,
    config: BroadcastConfig,
    state: BroadcastState,
    detector: UpdateDetector,
    rotation: RotationEngine,
    assembler: FrameAssembler,
    stats: Arc<BroadcastStats>,
    status: Arc<RwLock<StatusSnapshot>>,
    running: bool,
}

impl Engine {
    /// Create a new engine. Fails fast on an invalid configuration.
    pub fn new(
        config: BroadcastConfig,
        command_rx: Receiver<EngineCommand>,
        poll_rx: Receiver<PollResult>,
        event_tx: Sender<EngineEvent>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let started_at = Instant::now();
        let episode_id = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();

        let engine = Self {
            command_rx,
            poll_rx,
            event_tx,
            detector: UpdateDetector::new(config.debounce_timeout()),
            rotation: RotationEngine::new(config.rotation_interval()),
            assembler: FrameAssembler::new(),
            state: BroadcastState::new(episode_id, started_at),
            stats: Arc::new(BroadcastStats::new(started_at)),
            status: Arc::new(RwLock::new(StatusSnapshot {
                episode_id: String::new(),
                phase: String::new(),
                story_title: None,
                persona: None,
                frames_emitted: 0,
                stories_covered: 0,
                rotations_performed: 0,
                uptime_secs: 0.0,
                average_fps: 0.0,
            })),
            config,
            running: false,
        };
        engine.refresh_status(started_at);
        Ok(engine)
    }

    /// Shared handle to the broadcast counters.
    pub fn stats(&self) -> Arc<BroadcastStats> {
        Arc::clone(&self.stats)
    }

    /// Shared read-only handle to the latest status snapshot. Updated once
    /// per tick; observers never touch the engine's own state.
    pub fn status_handle(&self) -> Arc<RwLock<StatusSnapshot>> {
        Arc::clone(&self.status)
    }

    /// Run the engine (blocking).
    ///
    /// The command channel doubles as the tick clock: `recv_timeout` with
    /// the remaining frame interval either handles a command or fires the
    /// next scheduler tick. Returns after a `Shutdown` command or when the
    /// command channel disconnects; teardown always happens between
    /// ticks, completing any open breaking window first.
    #[instrument(name = "engine_run", skip(self))]
    pub fn run(&mut self) {
        info!(episode_id = %self.state.episode_id(), "Engine starting");
        self.send_event(EngineEvent::Ready);

        let frame_interval = self.config.frame_interval();
        let mut last_tick = Instant::now();

        loop {
            let timeout = frame_interval.saturating_sub(last_tick.elapsed());
            match self.command_rx.recv_timeout(timeout) {
                Ok(command) => {
                    if !self.handle_command(command) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    let now = Instant::now();
                    let elapsed = now.duration_since(last_tick);
                    last_tick = now;
                    self.tick(now, elapsed);
                }
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Command channel disconnected, shutting down");
                    break;
                }
            }
        }

        self.shutdown();
    }

    /// Handle a command. Returns false if the engine should stop.
    fn handle_command(&mut self, command: EngineCommand) -> bool {
        debug!(?command, "Handling command");

        match command {
            EngineCommand::Start => {
                // Idempotent: ignore if already broadcasting.
                if self.running {
                    debug!("Already broadcasting, ignoring start command");
                } else {
                    info!("Broadcast started, waiting for the first story");
                    self.running = true;
                }
            }
            EngineCommand::GetStatus => {
                let snapshot = self.status_snapshot(Instant::now());
                self.send_event(EngineEvent::Status(snapshot));
            }
            EngineCommand::Shutdown => return false,
        }

        true
    }

    /// One scheduler tick: poll intake, state-machine transitions,
    /// rotation, frame emission — in that order.
    fn tick(&mut self, now: Instant, elapsed: Duration) {
        if !self.running {
            return;
        }

        let mut story_changed = false;

        // Newest observation this tick; older queued results are stale.
        if let Some(result) = self.drain_poll_results() {
            story_changed |= self.consider_candidate(result, now);
        }

        // Close an expired breaking window.
        if let Some(installed) = self.state.try_complete_transition(now) {
            self.finish_swap(&installed);
            story_changed = true;
        }

        // Debounce clearance for a parked candidate.
        if !story_changed {
            if let Some(accepted) = self.detector.poll_pending(now) {
                story_changed |= self.accept_story(accepted, now);
            }
        }

        // Transition-priority: a tick that changed (or began changing) the
        // story skips the rotation tick; the transition resets rotation
        // anyway. Rotation only advances during normal coverage.
        if !story_changed && self.state.phase().is_on_air() {
            self.rotate(elapsed);
        }

        self.emit_frame(now);
        self.refresh_status(now);
    }

    /// Drain the poll channel, keeping only the latest result.
    fn drain_poll_results(&mut self) -> Option<PollResult> {
        let mut latest = None;
        while let Ok(result) = self.poll_rx.try_recv() {
            latest = Some(result);
        }
        latest
    }

    /// Run a raw observation through the identity guards and the
    /// debounced detector. Returns true if the story changed.
    fn consider_candidate(&mut self, result: PollResult, now: Instant) -> bool {
        if result.item_id.is_empty() {
            warn!("Ignoring malformed poll result without an item id");
            return false;
        }

        // Idempotence: re-observing the story already on air is not news.
        if self
            .state
            .story()
            .is_some_and(|story| story.id == result.item_id)
        {
            return false;
        }

        let candidate = Arc::new(result.into_story());
        match self.detector.observe(candidate, now) {
            Some(accepted) => self.accept_story(accepted, now),
            None => false,
        }
    }

    /// Apply an accepted story transition to the state machine.
    fn accept_story(&mut self, story: Arc<Story>, now: Instant) -> bool {
        // A parked candidate can have become the on-air story in the
        // meantime; installing it again would be a duplicate transition.
        if self
            .state
            .story()
            .is_some_and(|current| current.id == story.id)
        {
            return false;
        }

        info!(story_id = %story.id, title = %story.title, "Breaking news transition");
        self.send_event(EngineEvent::Transition {
            story_id: story.id.clone(),
            title: story.title.clone(),
            persona_index: 0,
            breaking: true,
        });

        if self.state.phase().is_idle() {
            // First story: no breaking window, straight on air.
            let previous = self.state.go_on_air(Arc::clone(&story));
            self.rotation.reset();
            self.stats.record_story();
            self.send_event(EngineEvent::StateChanged {
                previous,
                current: self.state.phase(),
            });
        } else {
            let was_transitioning = self.state.phase().is_transitioning();
            let previous =
                self.state
                    .begin_transition(story, now, self.config.transition_duration());
            if !was_transitioning {
                self.send_event(EngineEvent::StateChanged {
                    previous,
                    current: self.state.phase(),
                });
            }
        }

        true
    }

    /// Side effects of an installed story swap: rotation back to persona
    /// 0 before the next frame, counters, state-change event.
    fn finish_swap(&mut self, installed: &Arc<Story>) {
        info!(story_id = %installed.id, "Transition complete, resuming normal coverage");
        self.rotation.reset();
        self.stats.record_story();
        self.send_event(EngineEvent::StateChanged {
            previous: newsroom_ipc::BroadcastPhase::Transitioning,
            current: self.state.phase(),
        });
    }

    /// Advance the rotation engine, firing one event per boundary crossed.
    fn rotate(&mut self, elapsed: Duration) {
        let index_before = self.rotation.index();
        let steps = self.rotation.tick(elapsed);
        if steps == 0 {
            return;
        }

        self.stats.record_rotations(u64::from(steps));

        let story_id = self
            .state
            .story()
            .map(|story| story.id.clone())
            .expect("rotation while no story on air");
        let total = self.rotation.rotations_for_story();

        for step in 1..=steps {
            let persona_index = (index_before + step as usize) % PERSONA_COUNT;
            self.send_event(EngineEvent::Rotation {
                story_id: story_id.clone(),
                persona_index,
                rotation_count: total - u64::from(steps - step),
            });
        }
    }

    /// Assemble and emit a frame for the story on air, if any.
    fn emit_frame(&mut self, now: Instant) {
        if self.state.phase().is_idle() {
            return;
        }

        let story = Arc::clone(self.state.story().expect("on air without a story"));
        let persona = &self.config.personas[self.rotation.index()];
        let frame = self.assembler.assemble(
            &self.state,
            &story,
            persona,
            self.rotation.rotations_for_story(),
            now,
        );
        self.stats.record_frame();
        self.send_event(EngineEvent::Frame(frame));
    }

    /// Publish the latest status through the shared handle.
    fn refresh_status(&self, now: Instant) {
        *self.status.write() = self.status_snapshot(now);
    }

    /// Build the read-only process-level status.
    fn status_snapshot(&self, now: Instant) -> StatusSnapshot {
        let on_air = !self.state.phase().is_idle();
        StatusSnapshot {
            episode_id: self.state.episode_id().to_string(),
            phase: self.state.phase().name().to_string(),
            story_title: self.state.story().map(|story| story.title.clone()),
            persona: on_air.then(|| self.config.personas[self.rotation.index()].name.clone()),
            frames_emitted: self.stats.frames_emitted(),
            stories_covered: self.stats.stories_covered(),
            rotations_performed: self.stats.rotations_performed(),
            uptime_secs: self.stats.uptime_secs(now),
            average_fps: self.stats.average_fps(now),
        }
    }

    fn shutdown(&mut self) {
        // A breaking window that was entered is completed, never left
        // half-swapped for a future run.
        if let Some(installed) = self.state.complete_transition_for_shutdown() {
            self.finish_swap(&installed);
        }
        self.refresh_status(Instant::now());

        self.send_event(EngineEvent::Shutdown);
        info!(
            stories = self.stats.stories_covered(),
            rotations = self.stats.rotations_performed(),
            frames = self.stats.frames_emitted(),
            "Engine stopped"
        );
    }

    /// Collaborator failures are isolated: a full or closed event channel
    /// is logged and never blocks or rolls back a transition.
    fn send_event(&self, event: EngineEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            warn!("Failed to send event: {}", e);
        }
    }
}
