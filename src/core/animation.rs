//! Frame-driven number animation

use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Linear interpolation between two values over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Fraction of the animation completed, clamped to `[0, 1]`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let progress = self.progress(elapsed);
        if progress >= 1.0 {
            self.to
        } else {
            self.from + (self.to - self.from) * progress
        }
    }
}

/// Drives `tween` one frame at a time, handing each interpolated value to
/// `render`. Stops as soon as `render` returns `false`.
///
/// Returns `true` if the final frame (the target value) was rendered.
pub async fn run<F>(tween: Tween, frame_interval: Duration, mut render: F) -> bool
where
    F: FnMut(f64) -> bool,
{
    let started = Instant::now();
    let mut ticker = interval(frame_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let elapsed = started.elapsed();
        if !render(tween.value_at(elapsed)) {
            return false;
        }
        if tween.progress(elapsed) >= 1.0 {
            return true;
        }
    }
}
