//! The collaborator seam: event consumers with isolated failures.

use tracing::warn;

use newsroom_ipc::EngineEvent;

/// A consumer of engine events.
///
/// The engine never sees a sink's return value; errors stop at the
/// dispatch boundary.
pub trait FrameSink {
    /// Short name used when logging a sink failure.
    fn name(&self) -> &'static str;

    /// Consume one event.
    fn on_event(&mut self, event: &EngineEvent) -> anyhow::Result<()>;
}

/// Fan an event out to every sink, isolating failures per sink.
pub fn dispatch(sinks: &mut [Box<dyn FrameSink>], event: &EngineEvent) {
    for sink in sinks.iter_mut() {
        if let Err(e) = sink.on_event(event) {
            warn!(sink = sink.name(), "Sink failed, continuing without it this tick: {e:#}");
        }
    }
}
