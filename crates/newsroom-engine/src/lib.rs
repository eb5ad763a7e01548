//! Core orchestrator for the newsroom broadcast.
//!
//! This crate coordinates the debounced update detector, the anchor
//! rotation engine, and the broadcast state machine into a single
//! tick-driven scheduler that emits presentation frames.

mod assembler;
mod detector;
mod orchestrator;
mod rotation;
mod state;
mod stats;

pub use assembler::FrameAssembler;
pub use detector::UpdateDetector;
pub use orchestrator::Engine;
pub use rotation::RotationEngine;
pub use state::BroadcastState;
pub use stats::BroadcastStats;

use crossbeam_channel::{Receiver, Sender};
use newsroom_ipc::{BroadcastConfig, ConfigError, EngineCommand, EngineEvent, PollResult};

/// Create an engine instance with its channels. Fails fast on an invalid
/// configuration.
pub fn create_engine(
    config: BroadcastConfig,
    command_rx: Receiver<EngineCommand>,
    poll_rx: Receiver<PollResult>,
    event_tx: Sender<EngineEvent>,
) -> Result<Engine, ConfigError> {
    Engine::new(config, command_rx, poll_rx, event_tx)
}
