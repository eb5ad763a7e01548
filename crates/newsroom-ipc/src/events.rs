//! Events sent from the engine to its collaborators.

use serde::{Deserialize, Serialize};

use crate::state::BroadcastPhase;
use crate::types::{FrameDescriptor, StatusSnapshot};

/// Events the engine emits. Fire-and-forget: the engine never consumes a
/// return value from a collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Engine is ready and the scheduler is running.
    Ready,

    /// Broadcast phase has changed.
    StateChanged {
        /// Previous phase.
        previous: BroadcastPhase,

        /// Current phase.
        current: BroadcastPhase,
    },

    /// An accepted story transition. Fired once per accepted candidate.
    Transition {
        /// Identity of the incoming story.
        story_id: String,

        /// Title of the incoming story.
        title: String,

        /// Persona index the new story starts with (always 0).
        persona_index: usize,

        /// Always true: a transition is a breaking-news event.
        breaking: bool,
    },

    /// An anchor rotation. Fired once per rotation boundary crossed.
    Rotation {
        /// Identity of the story on air.
        story_id: String,

        /// Index of the newly active persona.
        persona_index: usize,

        /// Rotations performed since the current story started.
        rotation_count: u64,
    },

    /// A presentation frame, emitted at the frame cadence while on air.
    Frame(FrameDescriptor),

    /// Process-level status, answered to a `GetStatus` command.
    Status(StatusSnapshot),

    /// Engine has shut down.
    Shutdown,
}
