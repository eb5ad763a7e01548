//! Text rendition of the visual stack: lower thirds, ticker, status.

use std::io::Write;
use std::time::{Duration, Instant};

use newsroom_ipc::{EngineEvent, FrameDescriptor};

use crate::sink::FrameSink;

/// How often the rolling status line is printed.
const STATUS_INTERVAL: Duration = Duration::from_secs(10);

/// Prints the broadcast as text: a breaking banner on transitions, a
/// lower-third line on rotations, and a periodic status block.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    last_status: Instant,
}

impl ConsoleRenderer<std::io::Stdout> {
    /// Renderer writing to stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    /// Renderer writing to an arbitrary writer.
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_status: Instant::now(),
        }
    }

    fn print_frame(&mut self, frame: &FrameDescriptor) -> std::io::Result<()> {
        if self.last_status.elapsed() < STATUS_INTERVAL {
            return Ok(());
        }
        self.last_status = Instant::now();

        writeln!(self.out, "[STATUS] Episode: {}", frame.episode_id)?;
        writeln!(self.out, "  State: {}", frame.phase.name())?;
        writeln!(self.out, "  Story: {}", frame.story.title)?;
        writeln!(
            self.out,
            "  Anchor: {}",
            frame.persona.lower_third(&frame.story.title)
        )?;
        writeln!(self.out, "  Frame: #{}", frame.sequence)?;
        writeln!(self.out, "  Uptime: {:.1}s", frame.uptime_secs)?;
        self.out.flush()
    }
}

impl<W: Write + Send> FrameSink for ConsoleRenderer<W> {
    fn name(&self) -> &'static str {
        "console"
    }

    fn on_event(&mut self, event: &EngineEvent) -> anyhow::Result<()> {
        match event {
            EngineEvent::Transition { title, .. } => {
                writeln!(self.out, "{}", "=".repeat(60))?;
                writeln!(self.out, "BREAKING NEWS: {title}")?;
                writeln!(self.out, "TICKER: BREAKING: {title} \u{2022} Stay tuned for details")?;
                writeln!(self.out, "{}", "=".repeat(60))?;
            }
            EngineEvent::Rotation {
                persona_index,
                rotation_count,
                ..
            } => {
                writeln!(
                    self.out,
                    "Now speaking: anchor {} (rotation #{rotation_count})",
                    ["A", "B", "C"][*persona_index]
                )?;
            }
            EngineEvent::Frame(frame) => self.print_frame(frame)?,
            EngineEvent::Status(status) => {
                writeln!(
                    self.out,
                    "[STATUS] {} | {} | stories={} rotations={} frames={} fps={:.1} uptime={:.1}s",
                    status.episode_id,
                    status.phase,
                    status.stories_covered,
                    status.rotations_performed,
                    status.frames_emitted,
                    status.average_fps,
                    status.uptime_secs,
                )?;
            }
            _ => {}
        }
        Ok(())
    }
}
