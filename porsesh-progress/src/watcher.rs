//! Binds progress cycles to navigation.
//!
//! A [`NavigationWatcher`] starts a cycle whenever the observed
//! [`RouteIdentity`] changes. Changes that arrive mid-cycle restart it, and
//! repeated notifications for the same identity are ignored.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::{
    CycleId, ProgressError, ProgressHandle, RouteFeed, RouteIdentity, timer::TimerSlot,
    use_progress,
};

/// Observable state of a watcher.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WatcherPhase {
    Idle,
    Animating,
}

/// Starts progress cycles on route identity changes.
pub struct NavigationWatcher {
    progress: ProgressHandle,
    last_route: Option<RouteIdentity>,
    cycle: Option<CycleId>,
    mounted: bool,
}

impl NavigationWatcher {
    pub fn new(progress: ProgressHandle) -> Self {
        Self {
            progress,
            last_route: None,
            cycle: None,
            mounted: false,
        }
    }

    /// Builds a watcher over the ambient progress scope.
    pub fn from_context() -> Result<Self, ProgressError> {
        use_progress().map(Self::new)
    }

    /// Feeds one route notification in. Returns whether a cycle was started.
    ///
    /// The first identity ever observed is the baseline and starts nothing:
    /// the initial page arrives fully rendered.
    pub fn observe(&mut self, route: &RouteIdentity) -> bool {
        match &self.last_route {
            Some(last) if last == route => return false,
            Some(_) => {}
            None => {
                debug!(%route, "navigation watcher baseline");
                self.last_route = Some(route.clone());
                return false;
            }
        }
        self.last_route = Some(route.clone());
        if self.phase() == WatcherPhase::Animating {
            debug!(%route, "navigation during a running cycle, restarting");
        }
        let cycle = self.progress.start();
        debug!(%route, ?cycle, "navigation started a progress cycle");
        self.cycle = Some(cycle);
        true
    }

    /// Signals that the page behind the current navigation has loaded.
    ///
    /// Only completes the cycle this watcher started; a cycle someone else
    /// started since then is left alone.
    pub fn finish(&mut self) {
        if let Some(cycle) = self.cycle
            && self.progress.is_running(cycle)
        {
            self.progress.complete();
        }
    }

    pub fn phase(&self) -> WatcherPhase {
        match self.cycle {
            Some(cycle) if self.progress.is_running(cycle) => WatcherPhase::Animating,
            _ => WatcherPhase::Idle,
        }
    }

    pub fn last_route(&self) -> Option<&RouteIdentity> {
        self.last_route.as_ref()
    }

    /// Subscribes to `feed` and keeps observing it until the returned
    /// [`MountedWatcher`] is dropped. The feed's current route becomes the
    /// baseline.
    pub fn mount(mut self, feed: &RouteFeed) -> MountedWatcher {
        let mut routes = feed.subscribe();
        let current = routes.borrow_and_update().clone();
        self.observe(&current);
        self.mounted = true;

        let watcher = Arc::new(Mutex::new(self));
        let mut listener = TimerSlot::new("route-listener");
        let task_watcher = watcher.clone();
        listener.arm(async move {
            while routes.changed().await.is_ok() {
                let route = routes.borrow_and_update().clone();
                if !task_watcher.lock().observe_mounted(&route) {
                    break;
                }
            }
        });
        MountedWatcher { watcher, listener }
    }

    /// Observes `route` unless the watcher has been unmounted. Returns whether
    /// it is still mounted.
    fn observe_mounted(&mut self, route: &RouteIdentity) -> bool {
        if self.mounted {
            self.observe(route);
        }
        self.mounted
    }

    fn unmount(&mut self) {
        self.mounted = false;
        if let Some(cycle) = self.cycle.take()
            && self.progress.is_running(cycle)
        {
            debug!(?cycle, "watcher unmounted mid-cycle, resetting progress");
            self.progress.reset();
        }
    }
}

/// A watcher subscribed to a [`RouteFeed`].
///
/// Dropping it stops the subscription and resets the indicator if the
/// watcher's own cycle is still on screen.
pub struct MountedWatcher {
    watcher: Arc<Mutex<NavigationWatcher>>,
    listener: TimerSlot,
}

impl MountedWatcher {
    pub fn phase(&self) -> WatcherPhase {
        self.watcher.lock().phase()
    }

    /// See [`NavigationWatcher::finish`].
    pub fn finish(&self) {
        self.watcher.lock().finish();
    }

    pub fn last_route(&self) -> Option<RouteIdentity> {
        self.watcher.lock().last_route().cloned()
    }

    /// Whether the feed subscription is still alive.
    pub fn is_listening(&self) -> bool {
        self.listener.is_pending()
    }
}

impl Drop for MountedWatcher {
    fn drop(&mut self) {
        self.listener.cancel();
        self.watcher.lock().unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::{NavigationWatcher, WatcherPhase};
    use crate::{ProgressConfig, ProgressProvider, ProgressState, RouteFeed, RouteIdentity};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn provider() -> ProgressProvider {
        ProgressProvider::new(ProgressConfig::default().seed(Some(5))).expect("valid config")
    }

    #[tokio::test(start_paused = true)]
    async fn baseline_route_starts_nothing() {
        let provider = provider();
        let mut watcher = NavigationWatcher::new(provider.handle());

        assert!(!watcher.observe(&RouteIdentity::parse("/")));
        assert_eq!(watcher.phase(), WatcherPhase::Idle);
        assert_eq!(provider.handle().snapshot(), ProgressState::HIDDEN);
    }

    #[tokio::test(start_paused = true)]
    async fn route_change_animates_until_completion() {
        let provider = provider();
        let progress = provider.handle();
        let mut watcher = NavigationWatcher::new(progress.clone());
        watcher.observe(&RouteIdentity::parse("/"));

        assert!(watcher.observe(&RouteIdentity::parse("/questions?page=2")));
        assert_eq!(watcher.phase(), WatcherPhase::Animating);
        assert_eq!(progress.snapshot().progress, 10.0);

        watcher.finish();
        assert_eq!(progress.snapshot().progress, 100.0);
        assert_eq!(watcher.phase(), WatcherPhase::Animating);

        sleep(ms(210)).await;
        assert_eq!(watcher.phase(), WatcherPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_notifications_start_one_cycle() {
        let provider = provider();
        let progress = provider.handle();
        let mut watcher = NavigationWatcher::new(progress.clone());
        watcher.observe(&RouteIdentity::parse("/"));

        let route = RouteIdentity::parse("/tags");
        assert!(watcher.observe(&route));
        let cycle = progress.cycle();
        let revision = progress.revision();
        assert!(!watcher.observe(&route));
        assert!(!watcher.observe(&route));
        assert_eq!(progress.cycle(), cycle);
        assert_eq!(progress.revision(), revision);
    }

    #[tokio::test(start_paused = true)]
    async fn second_navigation_supersedes_the_first_cycle() {
        let provider = provider();
        let progress = provider.handle();
        let mut watcher = NavigationWatcher::new(progress.clone());
        watcher.observe(&RouteIdentity::parse("/"));

        watcher.observe(&RouteIdentity::parse("/questions"));
        sleep(ms(50)).await;
        watcher.observe(&RouteIdentity::parse("/questions/12"));
        assert!(progress.pending_timers().increment);
        assert_eq!(progress.pending_timers().count(), 2);

        // The first cycle's safety timeout would have fired at 600ms.
        sleep(ms(575)).await;
        let state = progress.snapshot();
        assert!(state.is_visible);
        assert!(state.progress < 100.0);

        // The second one fires at 650ms.
        sleep(ms(35)).await;
        assert_eq!(progress.snapshot().progress, 100.0);

        sleep(ms(200)).await;
        assert_eq!(progress.snapshot(), ProgressState::HIDDEN);
        assert_eq!(watcher.phase(), WatcherPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn finish_ignores_cycles_started_elsewhere() {
        let provider = provider();
        let progress = provider.handle();
        let mut watcher = NavigationWatcher::new(progress.clone());
        watcher.observe(&RouteIdentity::parse("/"));
        watcher.observe(&RouteIdentity::parse("/authors"));

        progress.start();
        watcher.finish();
        assert!(progress.snapshot().progress < 100.0);
        assert_eq!(watcher.phase(), WatcherPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn mounted_watcher_follows_the_feed() {
        let provider = provider();
        let progress = provider.handle();
        let feed = RouteFeed::new("/");
        let mounted = NavigationWatcher::new(progress.clone()).mount(&feed);
        assert!(mounted.is_listening());
        assert_eq!(mounted.phase(), WatcherPhase::Idle);

        feed.push("/categories/rust");
        sleep(ms(1)).await;
        assert_eq!(mounted.phase(), WatcherPhase::Animating);
        assert_eq!(
            mounted.last_route(),
            Some(RouteIdentity::parse("/categories/rust"))
        );

        mounted.finish();
        sleep(ms(250)).await;
        assert_eq!(mounted.phase(), WatcherPhase::Idle);

        assert!(feed.back());
        sleep(ms(1)).await;
        assert_eq!(mounted.phase(), WatcherPhase::Animating);
    }

    #[tokio::test(start_paused = true)]
    async fn unmounting_mid_cycle_resets_and_stops_listening() {
        let provider = provider();
        let progress = provider.handle();
        let feed = RouteFeed::new("/");
        let mounted = NavigationWatcher::new(progress.clone()).mount(&feed);

        feed.push("/activity");
        sleep(ms(1)).await;
        assert!(progress.snapshot().is_visible);

        drop(mounted);
        assert_eq!(progress.snapshot(), ProgressState::HIDDEN);
        assert!(progress.pending_timers().is_empty());

        feed.push("/tags");
        sleep(ms(1)).await;
        assert_eq!(progress.snapshot(), ProgressState::HIDDEN);
    }

    #[tokio::test(start_paused = true)]
    async fn mounted_navigations_50ms_apart_run_one_cycle() {
        let provider = provider();
        let progress = provider.handle();
        let feed = RouteFeed::new("/");
        let mounted = NavigationWatcher::new(progress.clone()).mount(&feed);

        feed.push("/questions");
        sleep(ms(50)).await;
        let first = progress.cycle();
        feed.push("/questions/12");
        sleep(ms(1)).await;
        assert_ne!(progress.cycle(), first);
        assert!(progress.pending_timers().increment);
        assert_eq!(progress.pending_timers().count(), 2);

        // The first cycle's safety timeout would have fired at 600ms.
        sleep(ms(574)).await;
        let state = progress.snapshot();
        assert!(state.is_visible);
        assert!(state.progress < 100.0);

        // The second one fires at 650ms.
        sleep(ms(35)).await;
        assert_eq!(progress.snapshot().progress, 100.0);

        sleep(ms(200)).await;
        assert_eq!(progress.snapshot(), ProgressState::HIDDEN);
        assert_eq!(mounted.phase(), WatcherPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn unmounted_watcher_ignores_late_notifications() {
        let provider = provider();
        let progress = provider.handle();
        let feed = RouteFeed::new("/");
        let mounted = NavigationWatcher::new(progress.clone()).mount(&feed);
        let watcher = mounted.watcher.clone();

        drop(mounted);
        assert!(!watcher.lock().observe_mounted(&RouteIdentity::parse("/late")));
        assert_eq!(progress.snapshot(), ProgressState::HIDDEN);
        assert!(progress.pending_timers().is_empty());
    }

    #[test]
    fn from_context_requires_a_provider() {
        assert!(NavigationWatcher::from_context().is_err());
        let provider = ProgressProvider::default();
        provider.scope(|| {
            assert!(NavigationWatcher::from_context().is_ok());
        });
    }
}
