//! Narration log: one JSON line per spoken segment.
//!
//! The narration seam regenerates whenever the (story, persona) pair
//! changes, which is exactly on transitions and rotations. Downstream
//! speech synthesis reads this log; the engine never waits for it.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use newsroom_ipc::{EngineEvent, FrameDescriptor};

use crate::sink::FrameSink;

/// One narration segment.
#[derive(Debug, Serialize)]
struct NarrationEntry<'a> {
    timestamp: String,
    episode_id: &'a str,
    story_id: &'a str,
    title: &'a str,
    anchor: &'a str,
    focus: &'a str,
    text: String,
}

/// Appends narration segments to a JSON-lines file.
pub struct NarrationLog {
    file: File,
    last_segment: Option<(String, usize)>,
}

impl NarrationLog {
    /// Open (or create) the narration log at `path`.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file,
            last_segment: None,
        })
    }

    fn write_segment(&mut self, frame: &FrameDescriptor) -> anyhow::Result<()> {
        let key = (frame.story.id.clone(), frame.persona.kind.index());
        if self.last_segment.as_ref() == Some(&key) {
            return Ok(());
        }

        let entry = NarrationEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            episode_id: &frame.episode_id,
            story_id: &frame.story.id,
            title: &frame.story.title,
            anchor: &frame.persona.name,
            focus: &frame.persona.focus,
            text: frame.persona.perspective_line(&frame.story),
        };
        serde_json::to_writer(&mut self.file, &entry)?;
        self.file.write_all(b"\n")?;
        self.file.flush()?;

        self.last_segment = Some(key);
        Ok(())
    }
}

impl FrameSink for NarrationLog {
    fn name(&self) -> &'static str {
        "narration"
    }

    fn on_event(&mut self, event: &EngineEvent) -> anyhow::Result<()> {
        if let EngineEvent::Frame(frame) = event {
            self.write_segment(frame)?;
        }
        Ok(())
    }
}
