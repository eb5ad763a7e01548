//! Rendering and narration collaborators.
//!
//! Everything here sits downstream of the engine's event channel and is
//! fire-and-forget: a sink failure is logged and the broadcast continues
//! with that side effect absent for the tick.

mod console;
mod narration;
mod sink;

pub use console::ConsoleRenderer;
pub use narration::NarrationLog;
pub use sink::{dispatch, FrameSink};
