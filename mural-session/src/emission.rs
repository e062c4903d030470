//! Fixed-interval emission for brushes that keep painting while held still.
//!
//! The task owns no thread or timer. The host polls [`EmissionTask::due`]
//! from its frame or tick loop and draws once per returned emission.

use std::time::{Duration, Instant};

use mural_core::Point;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct EmissionTask {
    interval: Duration,
    max_per_tick: u32,
    running: Option<Running>,
}

#[derive(Debug, Clone, Copy)]
struct Running {
    last: Instant,
    position: Point,
}

impl EmissionTask {
    /// A zero interval is raised to one millisecond.
    pub fn new(interval: Duration, max_per_tick: u32) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            max_per_tick: max_per_tick.max(1),
            running: None,
        }
    }

    pub fn start(&mut self, now: Instant, position: Point) {
        debug!(interval_ms = self.interval.as_millis() as u64, "emission started");
        self.running = Some(Running {
            last: now,
            position,
        });
    }

    /// Follow the pointer. Ignored while stopped.
    pub fn move_to(&mut self, position: Point) {
        if let Some(running) = &mut self.running {
            running.position = position;
        }
    }

    /// Emissions owed since the last call, capped per call. Intervals beyond
    /// the cap are dropped rather than queued.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(running) = &mut self.running else {
            return 0;
        };
        let elapsed = now.saturating_duration_since(running.last);
        let owed = elapsed.as_nanos() / self.interval.as_nanos();
        if owed == 0 {
            return 0;
        }

        let count = owed.min(self.max_per_tick as u128) as u32;
        running.last = if owed > self.max_per_tick as u128 {
            now
        } else {
            running.last + self.interval * count
        };
        trace!(count, "emissions due");
        count
    }

    pub fn position(&self) -> Option<Point> {
        self.running.map(|r| r.position)
    }

    pub fn stop(&mut self) {
        if self.running.take().is_some() {
            debug!("emission stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
