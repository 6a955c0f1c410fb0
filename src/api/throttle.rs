use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

/// Minimum spacing between outbound calls.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last: Cell<Option<Instant>>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: Cell::new(None),
        }
    }

    /// Time still to wait at `now` before the next call may go out.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last.get() {
            Some(last) => self
                .min_interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Sleeps until the interval has passed, then records the call.
    pub fn wait(&self) {
        let pause = self.remaining(Instant::now());
        if !pause.is_zero() {
            debug!(ms = pause.as_millis() as u64, "throttling stats request");
            thread::sleep(pause);
        }
        self.last.set(Some(Instant::now()));
    }
}
