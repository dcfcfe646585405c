//! Elapsed-time feed from a background ticker to the population.
//!
//! The ticker thread never touches campaigns. It posts measured durations on
//! a channel and the owner of the [`Population`](crate::Population) drains
//! them with [`Population::drain_time`](crate::Population::drain_time).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// Sending half of a time feed.
#[derive(Debug, Clone)]
pub struct TimeSender(Sender<Duration>);

impl TimeSender {
    /// Post an elapsed duration. Returns `false` once the feed is gone.
    pub fn post(&self, elapsed: Duration) -> bool {
        self.0.send(elapsed).is_ok()
    }
}

/// Receiving half of a time feed.
#[derive(Debug)]
pub struct TimeFeed(Receiver<Duration>);

impl TimeFeed {
    /// Create a connected sender and feed.
    pub fn channel() -> (TimeSender, TimeFeed) {
        let (tx, rx) = mpsc::channel();
        (TimeSender(tx), TimeFeed(rx))
    }

    /// Sum of every duration posted since the last drain. Never blocks.
    pub fn drain(&self) -> Duration {
        self.0
            .try_iter()
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// Background thread posting wall-clock time at a fixed interval.
#[derive(Debug)]
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Start ticking every `interval`, posting the time actually elapsed
    /// since the previous tick.
    pub fn spawn(interval: Duration, sender: TimeSender) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            let mut last = Instant::now();
            while !flag.load(Ordering::Relaxed) {
                thread::sleep(interval);
                let now = Instant::now();
                let elapsed = now.duration_since(last);
                last = now;
                trace!(?elapsed, "tick");
                if !sender.post(elapsed) {
                    break;
                }
            }
            debug!("ticker stopped");
        });
        debug!(?interval, "ticker started");
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
