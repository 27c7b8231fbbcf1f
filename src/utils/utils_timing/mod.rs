use std::time::Duration;
use instant::Instant;

/// Measures one timed region.  The clock starts when the timer is created.
#[derive(Clone, Debug)]
pub struct Timer {
    start: Instant
}
impl Timer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}
