//! Navigation progress state for the Porsesh frontend.
//!
//! A [`ProgressProvider`] owns one `{is_visible, progress}` value per page
//! session. A [`NavigationWatcher`] starts a cycle on every route change,
//! the ticker fills the bar toward a ceiling, and completion snaps it to
//! 100% before hiding. Views subscribe through [`ProgressHandle::subscribe`].
//!
//! ```
//! use porsesh_progress::{NavigationWatcher, ProgressProvider, RouteIdentity};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let provider = ProgressProvider::default();
//! let mut watcher = NavigationWatcher::new(provider.handle());
//! watcher.observe(&RouteIdentity::parse("/"));
//! watcher.observe(&RouteIdentity::parse("/questions?tag=rust"));
//! assert!(provider.handle().snapshot().is_visible);
//! # });
//! ```

pub mod config;
mod context;
mod error;
mod provider;
pub mod route;
mod runtime;
pub mod ticker;
pub mod timer;
pub mod watcher;

pub use config::ProgressConfig;
pub use context::{provide_progress, use_progress};
pub use error::ProgressError;
pub use provider::{CycleId, PendingTimers, ProgressHandle, ProgressProvider, ProgressState};
pub use route::{RouteFeed, RouteIdentity};
pub use ticker::ProgressTicker;
pub use timer::TimerSlot;
pub use watcher::{MountedWatcher, NavigationWatcher, WatcherPhase};
