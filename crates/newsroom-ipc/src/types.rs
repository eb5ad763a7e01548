//! Common types used across engine messages.

use serde::{Deserialize, Serialize};

use crate::state::BroadcastPhase;

/// A discrete news item, as observed from the upstream feed.
///
/// Stories are immutable once created. The engine supersedes the current
/// story with the next accepted one; it never mutates it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Stable unique key from the source feed (guid, falling back to link).
    pub id: String,

    /// Headline text.
    pub title: String,

    /// Summary / body text.
    pub summary: String,

    /// Link back to the full item.
    pub link: String,

    /// Optional image reference for the visual stack.
    pub image_url: Option<String>,

    /// Unix timestamp of when this item was first observed.
    pub first_seen_unix: i64,
}

/// The newest item reported by one poll cycle of the upstream feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResult {
    /// Stable item identity; compared to decide whether this is a new story.
    pub item_id: String,

    /// Item title.
    pub title: String,

    /// Item summary text.
    pub summary: String,

    /// Link back to the full item.
    pub link: String,

    /// Optional image reference.
    pub image_url: Option<String>,

    /// Unix timestamp of the observation.
    pub observed_unix: i64,
}

impl PollResult {
    /// Convert this observation into a [`Story`].
    pub fn into_story(self) -> Story {
        Story {
            id: self.item_id,
            title: self.title,
            summary: self.summary,
            link: self.link,
            image_url: self.image_url,
            first_seen_unix: self.observed_unix,
        }
    }
}

/// The three fixed commentary perspectives, in rotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonaKind {
    /// What happened: headline and facts.
    Headline,

    /// Why it matters: implications and what comes next.
    Implication,

    /// How we got here: background and context.
    Context,
}

impl PersonaKind {
    /// All kinds, in rotation order.
    pub const ALL: [PersonaKind; 3] = [Self::Headline, Self::Implication, Self::Context];

    /// Position of this kind in the rotation cycle.
    pub fn index(self) -> usize {
        match self {
            Self::Headline => 0,
            Self::Implication => 1,
            Self::Context => 2,
        }
    }

    /// Kind at a rotation index. Panics if `index` is not in `0..3`;
    /// callers uphold the rotation invariant.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index]
    }
}

/// A single anchor with their unique perspective.
///
/// Loaded from configuration at startup, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorPersona {
    /// Which perspective slot this anchor fills.
    pub kind: PersonaKind,

    /// Anchor display name (e.g. "Anchor A").
    pub name: String,

    /// Short focus line for the lower third (e.g. "Headlines & Facts").
    pub focus: String,

    /// Longer description of the viewpoint, used in narration.
    pub perspective: String,

    /// Color code for visual representation (e.g. "#CC0000").
    pub color: String,
}

impl AnchorPersona {
    /// Lower-third display line for this anchor.
    pub fn lower_third(&self, story_title: &str) -> String {
        format!("{} - {} | {}", self.name, self.focus, story_title)
    }

    /// Perspective-specific narration text for a story.
    pub fn perspective_line(&self, story: &Story) -> String {
        match self.kind {
            PersonaKind::Headline => {
                let mut summary = story.summary.as_str();
                if let Some((cut, _)) = summary.char_indices().nth(200) {
                    summary = &summary[..cut];
                }
                format!("Here's what happened: {}. {}", story.title, summary)
            }
            PersonaKind::Implication => format!(
                "Why this matters: {} could have significant impacts. \
                 Looking at what comes next...",
                story.title
            ),
            PersonaKind::Context => format!(
                "For context on {}: this story builds on recent developments...",
                story.title
            ),
        }
    }
}

/// Structured snapshot of broadcast state handed to rendering/narration
/// collaborators on every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameDescriptor {
    /// Monotonically increasing frame sequence number.
    pub sequence: u64,

    /// Episode identifier, stable for the process lifetime.
    pub episode_id: String,

    /// Current broadcast phase.
    pub phase: BroadcastPhase,

    /// Snapshot of the story currently on air.
    pub story: Story,

    /// The active anchor persona.
    pub persona: AnchorPersona,

    /// Rotations performed since the current story started.
    pub rotation_count: u64,

    /// True while a breaking-news transition is in progress.
    pub breaking: bool,

    /// Seconds since the broadcast started.
    pub uptime_secs: f64,
}

/// Read-only process-level status, answered on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Episode identifier.
    pub episode_id: String,

    /// Current phase name.
    pub phase: String,

    /// Title of the story on air, if any.
    pub story_title: Option<String>,

    /// Name of the active anchor, if on air.
    pub persona: Option<String>,

    /// Frames emitted since startup.
    pub frames_emitted: u64,

    /// Stories covered since startup.
    pub stories_covered: u64,

    /// Anchor rotations performed since startup.
    pub rotations_performed: u64,

    /// Seconds since the broadcast started.
    pub uptime_secs: f64,

    /// Average emitted frames per second over the whole run.
    pub average_fps: f64,
}
