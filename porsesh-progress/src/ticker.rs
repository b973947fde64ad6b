//! Simulated fill animation.
//!
//! Page load time is not observable when a navigation starts, so the ticker
//! fakes a believable fill: random steps every tick, idling at the ceiling
//! until the cycle is completed, with an optional safety timeout that
//! completes the cycle on its own.

use std::{sync::Weak, time::Duration};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};

use crate::{CycleId, ProgressConfig, provider::Shared};

/// Random-step generator for one provider.
pub struct ProgressTicker {
    rng: StdRng,
    ceiling: f32,
    min_increment: f32,
    max_increment: f32,
}

impl ProgressTicker {
    pub fn new(config: &ProgressConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            ceiling: config.ceiling,
            min_increment: config.min_increment,
            max_increment: config.max_increment,
        }
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    /// Next value after `current`, or `None` once the ceiling is reached.
    ///
    /// The result never exceeds the ceiling and never goes below `current`.
    pub fn advance(&mut self, current: f32) -> Option<f32> {
        if current >= self.ceiling {
            return None;
        }
        let step = if self.max_increment > self.min_increment {
            self.rng
                .random_range(self.min_increment..self.max_increment)
        } else {
            self.min_increment
        };
        Some((current + step).min(self.ceiling))
    }
}

/// Increment loop for `cycle`. Ends when the ceiling is reached or the cycle
/// is superseded.
pub(crate) async fn run_increments(shared: Weak<Shared>, cycle: CycleId, period: Duration) {
    let mut ticks = interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticks.tick().await;
        let Some(shared) = shared.upgrade() else {
            return;
        };
        if !shared.apply_tick(cycle) {
            return;
        }
    }
}

/// Forces `cycle` to complete after `timeout` if nothing else has.
pub(crate) async fn run_safety_timeout(shared: Weak<Shared>, cycle: CycleId, timeout: Duration) {
    sleep(timeout).await;
    if let Some(shared) = shared.upgrade() {
        shared.force_complete(cycle);
    }
}

/// Hides the bar once `cycle` has lingered at 100% for `delay`.
pub(crate) async fn run_hide(shared: Weak<Shared>, cycle: CycleId, delay: Duration) {
    sleep(delay).await;
    if let Some(shared) = shared.upgrade() {
        shared.finish_hide(cycle);
    }
}
