//! Display smoothing.
//!
//! The authoritative progress jumps in random steps. The displayed value
//! chases it on a faster, fixed cadence with a bounded step, never passes
//! it, and drops to zero the moment the bar hides.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use porsesh_progress::{ProgressHandle, ProgressState, TimerSlot};
use tokio::time::{MissedTickBehavior, interval};

use crate::ProgressBarStyle;

/// Shortest cadence the smoothing loop runs at.
pub const MIN_SMOOTHING_INTERVAL: Duration = Duration::from_millis(1);

/// Bounded-step follower of the authoritative progress value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplaySmoother {
    value: f32,
    step: f32,
    visible: bool,
}

impl DisplaySmoother {
    pub fn new(step: f32) -> Self {
        Self {
            value: 0.0,
            step: step.max(0.0),
            visible: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// What the view should render right now.
    pub fn displayed(&self) -> ProgressState {
        ProgressState {
            is_visible: self.visible,
            progress: self.value,
        }
    }

    /// Applies a state change without stepping: resets on hide and pulls the
    /// displayed value down if the target went below it.
    pub fn sync(&mut self, target: ProgressState) {
        self.visible = target.is_visible;
        if !target.is_visible {
            self.value = 0.0;
        } else if self.value > target.progress {
            self.value = target.progress.max(0.0);
        }
    }

    /// One smoothing tick toward `target`.
    pub fn advance(&mut self, target: ProgressState) -> f32 {
        self.sync(target);
        if target.is_visible && self.value < target.progress {
            self.value = (self.value + self.step).min(target.progress);
        }
        self.value
    }
}

/// A running smoothing loop over a provider's progress.
///
/// The loop stops when this value is dropped or the provider goes away.
pub struct SmoothedProgress {
    smoother: Arc<Mutex<DisplaySmoother>>,
    driver: TimerSlot,
}

impl SmoothedProgress {
    /// Starts chasing `progress` with the cadence and step from `style`.
    ///
    /// Intervals below [`MIN_SMOOTHING_INTERVAL`] are raised to it.
    pub fn spawn(progress: &ProgressHandle, style: &ProgressBarStyle) -> Self {
        let smoother = Arc::new(Mutex::new(DisplaySmoother::new(style.smoothing_step)));
        let period = if style.smoothing_interval < MIN_SMOOTHING_INTERVAL {
            tracing::warn!(
                interval = ?style.smoothing_interval,
                "smoothing interval too short, using {MIN_SMOOTHING_INTERVAL:?}"
            );
            MIN_SMOOTHING_INTERVAL
        } else {
            style.smoothing_interval
        };
        let mut driver = TimerSlot::new("display-smoothing");
        driver.arm(drive(progress.clone(), smoother.clone(), period));
        Self { smoother, driver }
    }

    /// The smoothed state to render.
    pub fn current(&self) -> ProgressState {
        self.smoother.lock().displayed()
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_pending()
    }
}

async fn drive(progress: ProgressHandle, smoother: Arc<Mutex<DisplaySmoother>>, period: Duration) {
    let mut updates = progress.subscribe();
    // The handle would keep the channel open past the provider.
    drop(progress);
    smoother.lock().sync(*updates.borrow_and_update());

    let mut ticks = interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let target = *updates.borrow_and_update();
                smoother.lock().sync(target);
            }
            _ = ticks.tick() => {
                let target = *updates.borrow();
                let shown = smoother.lock().advance(target);
                tracing::trace!(shown, target = target.progress, "smoothing tick");
            }
        }
    }
}
