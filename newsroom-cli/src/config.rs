//! TOML configuration for the host binary.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use newsroom_ipc::{AnchorPersona, BroadcastConfig, PersonaKind};

/// Top-level configuration file.
///
/// ```toml
/// feed_url = "https://example.com/feed.json"
/// narration_log = "narration.jsonl"
///
/// [broadcast]
/// polling_interval_secs = 60.0
/// debounce_timeout_secs = 5.0
/// rotation_interval_secs = 30.0
/// transition_duration_secs = 2.0
/// frame_interval_secs = 0.0333
///
/// [[broadcast.personas]]
/// kind = "Headline"
/// name = "Anchor A"
/// focus = "Headlines & Facts"
/// perspective = "What happened, plainly stated"
/// color = "#CC0000"
/// # ... exactly three persona blocks
/// ```
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// JSON Feed to monitor.
    pub feed_url: Option<String>,

    /// Where to append the narration log. Absent disables the sink.
    pub narration_log: Option<PathBuf>,

    /// Timing and persona configuration handed to the engine.
    pub broadcast: BroadcastConfig,
}

impl AppConfig {
    /// Load and validate a configuration file. Any error here is fatal at
    /// startup.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config
            .broadcast
            .validate()
            .context("invalid broadcast configuration")?;
        Ok(config)
    }

    /// Built-in configuration for `--demo` runs: fast cadences, canned
    /// roster, no feed.
    pub fn demo() -> Self {
        Self {
            feed_url: None,
            narration_log: None,
            broadcast: BroadcastConfig {
                polling_interval_secs: 2.0,
                debounce_timeout_secs: 3.0,
                rotation_interval_secs: 8.0,
                transition_duration_secs: 2.0,
                frame_interval_secs: 1.0 / 30.0,
                personas: default_personas(),
            },
        }
    }
}

/// The canonical three-anchor roster, used by demo mode.
pub fn default_personas() -> Vec<AnchorPersona> {
    vec![
        AnchorPersona {
            kind: PersonaKind::Headline,
            name: "Anchor A".to_string(),
            focus: "Headlines & Facts".to_string(),
            perspective: "What happened, plainly stated".to_string(),
            color: "#CC0000".to_string(),
        },
        AnchorPersona {
            kind: PersonaKind::Implication,
            name: "Anchor B".to_string(),
            focus: "Implications & What's Next".to_string(),
            perspective: "Why it matters and what follows".to_string(),
            color: "#0044CC".to_string(),
        },
        AnchorPersona {
            kind: PersonaKind::Context,
            name: "Anchor C".to_string(),
            focus: "Background & Context".to_string(),
            perspective: "How we got here".to_string(),
            color: "#008844".to_string(),
        },
    ]
}
