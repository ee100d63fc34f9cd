use std::time::{Duration, Instant};

/// Leading + trailing rate limiter driven by explicit timestamps.
///
/// The first request of a quiet period fires immediately. Requests arriving
/// within `window` of the last firing are folded into one trailing firing,
/// released by the next request or [`Throttle::poll`] once the window elapsed.
#[derive(Clone, Debug)]
pub struct Throttle {
    window: Duration,
    last_fire: Option<Instant>,
    pending: bool,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fire: None,
            pending: false,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns true when the caller should run the throttled work now.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.is_open(now) {
            self.fire(now);
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// Releases the trailing call if one is pending and the window elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.pending && self.is_open(now) {
            self.fire(now);
            true
        } else {
            false
        }
    }

    fn is_open(&self, now: Instant) -> bool {
        match self.last_fire {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.window,
        }
    }

    fn fire(&mut self, now: Instant) {
        self.last_fire = Some(now);
        self.pending = false;
    }
}
