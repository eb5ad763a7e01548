//! Commands sent from the host to the engine.

use serde::{Deserialize, Serialize};

/// Commands that the host binary can send to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineCommand {
    /// Start the broadcast.
    Start,

    /// Request a process-level status snapshot.
    GetStatus,

    /// Shut down the engine completely.
    Shutdown,
}
