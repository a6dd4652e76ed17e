//! Idle-shutdown timer.
//!
//! The server arms this timer whenever the connected-client count is (or
//! drops back to) zero and disarms it on every accept. A fired timer calls
//! the thread-safe stop entry point; nothing else.

use log::info;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// One-shot timer with cancel-and-rearm semantics. Each arm bumps a shared
/// generation counter; the sleeping thread only acts if its generation is
/// still the current one, so both disarm() and a later arm() silently retire
/// an older pending timer.
pub(crate) struct IdleTimer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl IdleTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `on_expire` to run after the delay, unless disarmed or
    /// re-armed first.
    pub fn arm(&self, on_expire: impl FnOnce() + Send + 'static) {
        let armed_at = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let delay = self.delay;
        thread::spawn(move || {
            thread::sleep(delay);
            if generation.load(Ordering::SeqCst) == armed_at {
                info!("idle for {:?} with no clients, shutting down", delay);
                on_expire();
            }
        });
    }

    /// Cancel any pending expiry.
    pub fn disarm(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
