//! Host binary for the newsroom broadcast.
//!
//! Wires the feed poller, the engine thread, and the render/narration
//! sinks together, then pumps engine events on the main thread until the
//! run ends.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::Parser;
use crossbeam_channel::RecvTimeoutError;
use tracing::info;
use tracing_subscriber::EnvFilter;

use newsroom_engine::create_engine;
use newsroom_ipc::{EngineCommand, EngineEvent, PollResult};
use newsroom_render::{dispatch, ConsoleRenderer, FrameSink, NarrationLog};
use newsroom_source::{FeedSource, JsonFeedSource, Poller, ScriptedSource};

mod config;

use config::AppConfig;

/// 24/7 news broadcast orchestrator.
#[derive(Debug, Parser)]
#[command(name = "newsroom", version)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, env = "NEWSROOM_CONFIG")]
    config: Option<PathBuf>,

    /// Override the feed URL from the configuration.
    #[arg(long)]
    feed_url: Option<String>,

    /// Override the narration log path from the configuration.
    #[arg(long)]
    narration_log: Option<PathBuf>,

    /// Stop the broadcast after this many seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Run against a canned story script instead of a live feed.
    #[arg(long)]
    demo: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut app = match (&args.config, args.demo) {
        (Some(path), _) => AppConfig::load(path)?,
        (None, true) => AppConfig::demo(),
        (None, false) => bail!("either --config or --demo is required"),
    };
    if args.feed_url.is_some() {
        app.feed_url = args.feed_url.clone();
    }
    if args.narration_log.is_some() {
        app.narration_log = args.narration_log.clone();
    }

    let source: Box<dyn FeedSource> = if args.demo {
        Box::new(demo_source())
    } else {
        let feed_url = app
            .feed_url
            .as_deref()
            .context("feed_url is required unless --demo is given")?;
        Box::new(JsonFeedSource::new(feed_url)?)
    };

    let mut sinks: Vec<Box<dyn FrameSink>> = vec![Box::new(ConsoleRenderer::stdout())];
    if let Some(path) = &app.narration_log {
        let log = NarrationLog::open(path)
            .with_context(|| format!("opening narration log {}", path.display()))?;
        sinks.push(Box::new(log));
    }

    let (command_tx, command_rx) = newsroom_ipc::command_channel();
    let (poll_tx, poll_rx) = newsroom_ipc::poll_channel();
    let (event_tx, event_rx) = newsroom_ipc::event_channel();

    let polling_interval = app.broadcast.polling_interval();
    let mut engine = create_engine(app.broadcast, command_rx, poll_rx, event_tx)
        .context("invalid broadcast configuration")?;
    let status = engine.status_handle();
    let engine_thread = thread::spawn(move || engine.run());

    command_tx
        .send(EngineCommand::Start)
        .context("engine unavailable at startup")?;
    let mut poller = Poller::start(source, poll_tx, polling_interval);

    info!("Broadcast is live; press Ctrl+C to stop");

    let deadline = args
        .duration
        .map(|secs| Instant::now() + Duration::from_secs_f64(secs));
    let mut shutdown_sent = false;

    loop {
        if let Some(deadline) = deadline {
            if !shutdown_sent && Instant::now() >= deadline {
                info!("Run duration reached, shutting down");
                // Final status before teardown; both best-effort.
                let _ = command_tx.send(EngineCommand::GetStatus);
                let _ = command_tx.send(EngineCommand::Shutdown);
                shutdown_sent = true;
            }
        }

        match event_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(EngineEvent::Shutdown) => break,
            Ok(event) => dispatch(&mut sinks, &event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    poller.stop();
    drop(command_tx);
    if engine_thread.join().is_err() {
        bail!("engine thread panicked");
    }

    let final_status = status.read().clone();
    info!(
        episode_id = %final_status.episode_id,
        stories = final_status.stories_covered,
        rotations = final_status.rotations_performed,
        frames = final_status.frames_emitted,
        average_fps = format!("{:.1}", final_status.average_fps),
        uptime_secs = format!("{:.1}", final_status.uptime_secs),
        "Broadcast statistics"
    );

    Ok(())
}

/// Canned three-story script for `--demo` runs.
fn demo_source() -> ScriptedSource {
    let story = |id: &str, title: &str, summary: &str| {
        Some(PollResult {
            item_id: format!("demo-{id}"),
            title: title.to_string(),
            summary: summary.to_string(),
            link: format!("https://example.com/{id}"),
            image_url: None,
            observed_unix: 0,
        })
    };

    ScriptedSource::new(vec![
        story(
            "1",
            "Morning Markets Open Higher",
            "Futures point to a strong open as earnings season begins.",
        ),
        None,
        None,
        None,
        story(
            "2",
            "Storm System Moves Up the Coast",
            "Forecasters track heavy rain reaching the metro area by evening.",
        ),
        None,
        None,
        None,
        story(
            "3",
            "City Council Approves Transit Plan",
            "The expansion adds two lines and a decade of construction.",
        ),
    ])
}
