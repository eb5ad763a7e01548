//! Typed engine<->collaborator messages for the newsroom broadcast.
//!
//! This crate defines all the message types exchanged between the host
//! binary, the feed poller, the broadcast engine, and the render/narration
//! collaborators.

mod commands;
mod config;
mod events;
mod state;
mod types;

pub use commands::EngineCommand;
pub use config::{BroadcastConfig, ConfigError};
pub use events::EngineEvent;
pub use state::BroadcastPhase;
pub use types::{
    AnchorPersona, FrameDescriptor, PersonaKind, PollResult, StatusSnapshot, Story,
};

use crossbeam_channel::{Receiver, Sender};

/// Channel capacity for commands (host → engine).
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Channel capacity for events (engine → collaborators).
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Channel capacity for poll results (poller → engine).
pub const POLL_CHANNEL_CAPACITY: usize = 16;

/// Creates a bounded command channel.
pub fn command_channel() -> (Sender<EngineCommand>, Receiver<EngineCommand>) {
    crossbeam_channel::bounded(COMMAND_CHANNEL_CAPACITY)
}

/// Creates a bounded event channel.
pub fn event_channel() -> (Sender<EngineEvent>, Receiver<EngineEvent>) {
    crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY)
}

/// Creates a bounded poll-result channel.
pub fn poll_channel() -> (Sender<PollResult>, Receiver<PollResult>) {
    crossbeam_channel::bounded(POLL_CHANNEL_CAPACITY)
}
