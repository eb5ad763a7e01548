//! Frame descriptor assembly.

use std::time::Instant;

use newsroom_ipc::{AnchorPersona, FrameDescriptor, Story};

use crate::state::BroadcastState;

/// Produces frame descriptors from committed broadcast state.
///
/// Assembly is a pure read plus a sequence increment; it never blocks and
/// never mutates broadcast state. Backpressure is handled at emission
/// (`try_send`, latest-state-wins), never by queuing here.
pub struct FrameAssembler {
    sequence: u64,
}

impl FrameAssembler {
    /// Create an assembler with the sequence at zero.
    pub fn new() -> Self {
        Self { sequence: 0 }
    }

    /// Assemble the next frame for the story currently on air.
    pub fn assemble(
        &mut self,
        state: &BroadcastState,
        story: &Story,
        persona: &AnchorPersona,
        rotation_count: u64,
        now: Instant,
    ) -> FrameDescriptor {
        self.sequence += 1;
        FrameDescriptor {
            sequence: self.sequence,
            episode_id: state.episode_id().to_string(),
            phase: state.phase(),
            story: story.clone(),
            persona: persona.clone(),
            rotation_count,
            breaking: state.phase().is_transitioning(),
            uptime_secs: state.uptime(now).as_secs_f64(),
        }
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}
