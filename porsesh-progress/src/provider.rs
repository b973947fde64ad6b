//! The shared `{is_visible, progress}` value and its lifecycle operations.
//!
//! # Responsibilities
//!
//! - Own the single progress value for one page session.
//! - Expose `start` / `set_progress` / `complete` / `reset` through cheap,
//!   cloneable [`ProgressHandle`]s.
//! - Keep at most one increment loop, one safety timeout and one pending
//!   hide alive, all tagged with the [`CycleId`] that armed them.
//! - Cancel every timer when the [`ProgressProvider`] is dropped.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::{
    ProgressConfig, ProgressError,
    config::COMPLETE_VALUE,
    context,
    ticker::{self, ProgressTicker},
    timer::TimerSlot,
};

/// What the progress bar should show.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressState {
    pub is_visible: bool,
    pub progress: f32,
}

impl ProgressState {
    /// The resting state: nothing rendered.
    pub const HIDDEN: Self = Self {
        is_visible: false,
        progress: 0.0,
    };
}

/// Identifier of one start-to-hide cycle.
///
/// Ids grow monotonically per provider; a timer carrying an older id than
/// the provider's current one belongs to a superseded cycle.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CycleId(u64);

impl CycleId {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Which timer slots currently hold a live task.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PendingTimers {
    pub increment: bool,
    pub safety: bool,
    pub hide: bool,
}

impl PendingTimers {
    /// Number of live timers.
    pub fn count(&self) -> usize {
        [self.increment, self.safety, self.hide]
            .into_iter()
            .filter(|pending| *pending)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Idle,
    Ticking,
    Completing,
}

struct Core {
    state: ProgressState,
    phase: Phase,
    cycle: CycleId,
    revision: u64,
    torn_down: bool,
    ticker: ProgressTicker,
    increment: TimerSlot,
    safety: TimerSlot,
    hide: TimerSlot,
}

impl Core {
    fn cancel_timers(&mut self) {
        self.increment.cancel();
        self.safety.cancel();
        self.hide.cancel();
    }

    fn is_current(&self, cycle: CycleId) -> bool {
        !self.torn_down && self.cycle == cycle
    }
}

pub(crate) struct Shared {
    config: ProgressConfig,
    core: Mutex<Core>,
    sender: watch::Sender<ProgressState>,
}

impl Shared {
    fn new(config: ProgressConfig) -> Self {
        let (sender, _) = watch::channel(ProgressState::HIDDEN);
        let ticker = ProgressTicker::new(&config);
        Self {
            config,
            core: Mutex::new(Core {
                state: ProgressState::HIDDEN,
                phase: Phase::Idle,
                cycle: CycleId::default(),
                revision: 0,
                torn_down: false,
                ticker,
                increment: TimerSlot::new("increment"),
                safety: TimerSlot::new("safety"),
                hide: TimerSlot::new("hide"),
            }),
            sender,
        }
    }

    fn publish(&self, core: &mut Core, state: ProgressState) {
        core.state = state;
        core.revision += 1;
        self.sender.send_replace(state);
    }

    fn start(self: &Arc<Self>) -> CycleId {
        let mut core = self.core.lock();
        if core.torn_down {
            warn!("start() called on a torn down progress provider");
            return core.cycle;
        }
        core.cancel_timers();
        core.cycle = core.cycle.next();
        core.phase = Phase::Ticking;
        let cycle = core.cycle;
        debug!(?cycle, "progress cycle started");
        self.publish(
            &mut core,
            ProgressState {
                is_visible: true,
                progress: self.config.start_value,
            },
        );

        core.increment.arm(ticker::run_increments(
            Arc::downgrade(self),
            cycle,
            self.config.tick_interval,
        ));
        if let Some(timeout) = self.config.safety_timeout {
            core.safety
                .arm(ticker::run_safety_timeout(Arc::downgrade(self), cycle, timeout));
        }
        cycle
    }

    fn set_progress(&self, value: f32) {
        let mut core = self.core.lock();
        if core.torn_down || !core.state.is_visible {
            trace!(value, "ignoring set_progress while hidden");
            return;
        }
        if !(0.0..=COMPLETE_VALUE).contains(&value) {
            warn!(value, "progress set outside 0..=100");
        }
        let state = ProgressState {
            progress: value,
            ..core.state
        };
        self.publish(&mut core, state);
    }

    fn complete(self: &Arc<Self>) {
        let mut core = self.core.lock();
        if core.torn_down || !core.state.is_visible {
            trace!("ignoring complete() without a visible cycle");
            return;
        }
        self.complete_locked(&mut core);
    }

    fn complete_locked(self: &Arc<Self>, core: &mut Core) {
        core.cancel_timers();
        core.phase = Phase::Completing;
        let cycle = core.cycle;
        debug!(?cycle, "progress cycle completing");
        self.publish(
            core,
            ProgressState {
                is_visible: true,
                progress: COMPLETE_VALUE,
            },
        );
        core.hide.arm(ticker::run_hide(
            Arc::downgrade(self),
            cycle,
            self.config.hide_delay,
        ));
    }

    fn reset(&self) {
        let mut core = self.core.lock();
        if core.torn_down {
            return;
        }
        core.cancel_timers();
        core.cycle = core.cycle.next();
        core.phase = Phase::Idle;
        debug!(cycle = ?core.cycle, "progress reset");
        self.publish(&mut core, ProgressState::HIDDEN);
    }

    fn teardown(&self) {
        let mut core = self.core.lock();
        if core.torn_down {
            return;
        }
        core.cancel_timers();
        core.torn_down = true;
        core.cycle = core.cycle.next();
        core.phase = Phase::Idle;
        debug!("progress provider torn down");
        self.publish(&mut core, ProgressState::HIDDEN);
    }

    /// Applies one ticker step; returns whether the loop should keep going.
    pub(crate) fn apply_tick(&self, cycle: CycleId) -> bool {
        let mut core = self.core.lock();
        if !core.is_current(cycle) || core.phase != Phase::Ticking {
            return false;
        }
        let current = core.state.progress;
        let Some(next) = core.ticker.advance(current) else {
            return false;
        };
        trace!(?cycle, progress = next, "progress tick");
        let state = ProgressState {
            progress: next,
            ..core.state
        };
        self.publish(&mut core, state);
        next < core.ticker.ceiling()
    }

    pub(crate) fn force_complete(self: &Arc<Self>, cycle: CycleId) {
        let mut core = self.core.lock();
        if !core.is_current(cycle) || core.phase != Phase::Ticking {
            return;
        }
        debug!(?cycle, "safety timeout reached");
        self.complete_locked(&mut core);
    }

    pub(crate) fn finish_hide(&self, cycle: CycleId) {
        let mut core = self.core.lock();
        if !core.is_current(cycle) || core.phase != Phase::Completing {
            return;
        }
        core.phase = Phase::Idle;
        debug!(?cycle, "progress cycle finished");
        self.publish(&mut core, ProgressState::HIDDEN);
    }
}

/// Cloneable access to a provider's progress value.
///
/// Handles outlive nothing: once their provider is dropped every operation
/// becomes a no-op and the state stays hidden.
#[derive(Clone)]
pub struct ProgressHandle {
    shared: Arc<Shared>,
}

impl ProgressHandle {
    /// Opens a new cycle: shows the bar at the start value and (re)arms the
    /// ticker, cancelling every timer of the previous cycle first.
    pub fn start(&self) -> CycleId {
        self.shared.start()
    }

    /// Overwrites the progress value of the visible cycle.
    ///
    /// No clamping happens here; callers keep the value within `0..=100`.
    pub fn set_progress(&self, value: f32) {
        self.shared.set_progress(value);
    }

    /// Snaps to 100% and hides after the configured delay. Calling it again
    /// before the bar hides reschedules the hide.
    pub fn complete(&self) {
        self.shared.complete();
    }

    /// Hides immediately with nothing left pending.
    pub fn reset(&self) {
        self.shared.reset();
    }

    /// Current state.
    pub fn snapshot(&self) -> ProgressState {
        self.shared.core.lock().state
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.shared.sender.subscribe()
    }

    /// Id of the most recent cycle.
    pub fn cycle(&self) -> CycleId {
        self.shared.core.lock().cycle
    }

    /// Whether `cycle` is the provider's current cycle and still on screen.
    pub fn is_running(&self, cycle: CycleId) -> bool {
        let core = self.shared.core.lock();
        core.is_current(cycle) && core.state.is_visible
    }

    /// Number of state changes published so far.
    pub fn revision(&self) -> u64 {
        self.shared.core.lock().revision
    }

    pub fn pending_timers(&self) -> PendingTimers {
        let core = self.shared.core.lock();
        PendingTimers {
            increment: core.increment.is_pending(),
            safety: core.safety.is_pending(),
            hide: core.hide.is_pending(),
        }
    }

    pub fn config(&self) -> &ProgressConfig {
        &self.shared.config
    }

    /// Whether both handles talk to the same provider.
    pub fn same_provider(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl std::fmt::Debug for ProgressHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.shared.core.lock();
        f.debug_struct("ProgressHandle")
            .field("state", &core.state)
            .field("cycle", &core.cycle)
            .field("phase", &core.phase)
            .finish()
    }
}

/// Owner of the shared progress value.
///
/// Dropping the provider cancels every pending timer; handles that are still
/// around afterwards only ever see the hidden state.
pub struct ProgressProvider {
    handle: ProgressHandle,
}

impl ProgressProvider {
    /// Builds a provider after validating `config`.
    pub fn new(config: ProgressConfig) -> Result<Self, ProgressError> {
        config.validate()?;
        Ok(Self {
            handle: ProgressHandle {
                shared: Arc::new(Shared::new(config)),
            },
        })
    }

    pub fn handle(&self) -> ProgressHandle {
        self.handle.clone()
    }

    /// Runs `f` with this provider installed as the ambient progress scope,
    /// so [`use_progress`](crate::use_progress) resolves to it.
    pub fn scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        context::provide_progress(self.handle(), f)
    }
}

impl Default for ProgressProvider {
    fn default() -> Self {
        Self {
            handle: ProgressHandle {
                shared: Arc::new(Shared::new(ProgressConfig::default())),
            },
        }
    }
}

impl Drop for ProgressProvider {
    fn drop(&mut self) {
        self.handle.shared.teardown();
    }
}
