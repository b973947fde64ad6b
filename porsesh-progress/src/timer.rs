//! Owned timer handles.
//!
//! A [`TimerSlot`] holds at most one live task. Arming the slot cancels the
//! task it held before, and dropping the slot cancels whatever is still
//! pending, so a slot can never leak a timer past its owner.

use std::future::Future;

use tokio::{sync::oneshot, task::JoinHandle};

use crate::runtime;

struct LiveTimer {
    handle: JoinHandle<()>,
    cancel: oneshot::Sender<()>,
}

/// A single logical timer with cancel-on-rearm semantics.
pub struct TimerSlot {
    name: &'static str,
    live: Option<LiveTimer>,
}

impl TimerSlot {
    /// Creates an empty slot. `name` only shows up in logs.
    pub const fn new(name: &'static str) -> Self {
        Self { name, live: None }
    }

    /// Spawns `fut` in this slot, cancelling the previously armed task first.
    pub fn arm<F>(&mut self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let (tx, rx) = oneshot::channel();
        let wrapped = async move {
            tokio::select! {
                biased;
                _ = rx => {},
                _ = fut => {},
            }
        };
        let handle = runtime::handle().spawn(wrapped);
        self.live = Some(LiveTimer { handle, cancel: tx });
    }

    /// Cancels the armed task, returning whether it was still pending.
    pub fn cancel(&mut self) -> bool {
        let Some(timer) = self.live.take() else {
            return false;
        };
        let pending = !timer.handle.is_finished();
        if pending {
            tracing::trace!(slot = self.name, "cancelling timer");
        }
        // The task may already be gone; a failed send is fine.
        let _ = timer.cancel.send(());
        pending
    }

    /// Whether the armed task has not run to completion yet.
    pub fn is_pending(&self) -> bool {
        self.live
            .as_ref()
            .is_some_and(|timer| !timer.handle.is_finished())
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TimerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerSlot")
            .field("name", &self.name)
            .field("pending", &self.is_pending())
            .finish()
    }
}
