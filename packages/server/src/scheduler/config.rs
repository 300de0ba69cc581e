//! Scheduler timing parameters.

use std::time::Duration;

use rand::Rng;

use crate::domain::TypingSpeed;

/// Half-open range `[min, max)` a delay is drawn from uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Always yields `delay`
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..self.max)
    }
}

/// Timing of the turn cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Delay between `start` and the first tick
    pub initial_delay: Duration,
    /// Re-check interval while another agent is busy or nobody is idle
    pub poll_interval: Duration,
    /// How long an agent stays `thinking` before its message is revealed
    pub thinking_delay: DelayRange,
    /// Gap between the end of one turn and the next tick
    pub pause_delay: DelayRange,
    /// Lower bound of the typing animation
    pub min_typing_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            poll_interval: Duration::from_secs(1),
            thinking_delay: DelayRange::new(Duration::from_millis(1000), Duration::from_millis(3000)),
            pause_delay: DelayRange::new(Duration::from_millis(1000), Duration::from_millis(2000)),
            min_typing_delay: Duration::from_millis(1500),
        }
    }
}

/// How long revealing `content` takes at `speed`, floored at `floor`.
pub fn typing_delay(content: &str, speed: TypingSpeed, floor: Duration) -> Duration {
    let chars = content.chars().count() as u64;
    let millis = chars * 1000 / u64::from(speed.chars_per_second());
    Duration::from_millis(millis).max(floor)
}
