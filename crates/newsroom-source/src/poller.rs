//! Background poll loop feeding the engine's poll channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use tracing::{debug, info, warn};

use newsroom_ipc::PollResult;

use crate::feed::FeedSource;

/// Granularity of the stop check inside the inter-poll sleep.
const STOP_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Runs a [`FeedSource`] on its own thread at a fixed polling interval.
///
/// Results are handed into the engine's serialized poll channel with
/// `try_send`; a full channel drops the result (the next cycle will report
/// the same newest item again). Source errors are logged and treated as
/// "no update this cycle".
pub struct Poller {
    handle: Option<JoinHandle<()>>,
    should_stop: Arc<AtomicBool>,
}

impl Poller {
    /// Spawn the poll loop.
    pub fn start(
        mut source: Box<dyn FeedSource>,
        poll_tx: Sender<PollResult>,
        polling_interval: Duration,
    ) -> Self {
        let should_stop = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&should_stop);

        let handle = thread::spawn(move || {
            info!(interval_secs = polling_interval.as_secs_f64(), "Poller starting");
            let mut last_sent_id: Option<String> = None;

            while !stop.load(Ordering::SeqCst) {
                match source.poll() {
                    Ok(Some(result)) => {
                        // At most one delivery per poll cycle, and only for
                        // a genuinely new identity.
                        if last_sent_id.as_deref() != Some(result.item_id.as_str()) {
                            debug!(item_id = %result.item_id, title = %result.title,
                                "New feed item observed");
                            last_sent_id = Some(result.item_id.clone());
                            if let Err(e) = poll_tx.try_send(result) {
                                warn!("Failed to hand off poll result: {}", e);
                            }
                        }
                    }
                    Ok(None) => {
                        debug!("No update this cycle");
                    }
                    Err(e) => {
                        warn!("Feed poll failed, will retry next cycle: {}", e);
                    }
                }

                sleep_until_stop(&stop, polling_interval);
            }

            info!("Poller stopped");
        });

        Self {
            handle: Some(handle),
            should_stop,
        }
    }

    /// Stop the poll loop and join the thread.
    pub fn stop(&mut self) {
        self.should_stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sleep for `interval`, waking early when the stop flag is raised.
fn sleep_until_stop(stop: &AtomicBool, interval: Duration) {
    let deadline = Instant::now() + interval;
    while !stop.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(STOP_CHECK_INTERVAL.min(deadline - now));
    }
}
