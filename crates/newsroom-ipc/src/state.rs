//! Broadcast state machine types.

use serde::{Deserialize, Serialize};

/// The top-level state of the broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BroadcastPhase {
    /// No story has been accepted yet.
    #[default]
    Idle,

    /// Normal coverage: a story is on air and anchors rotate.
    OnAir,

    /// Bounded breaking-news window: the outgoing story is still shown,
    /// flagged as about to change.
    Transitioning,
}

impl BroadcastPhase {
    /// Returns true if no story is on air yet.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true during normal coverage.
    pub fn is_on_air(&self) -> bool {
        matches!(self, Self::OnAir)
    }

    /// Returns true during a breaking-news window.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Transitioning)
    }

    /// Returns a simple string representation of the phase.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::OnAir => "OnAir",
            Self::Transitioning => "Transitioning",
        }
    }
}
