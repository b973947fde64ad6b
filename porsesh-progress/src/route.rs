//! Route identities and a minimal history that publishes them.
//!
//! The host routing layer is external to this crate; [`RouteFeed`] is the
//! seam it reports through. Each navigation replaces the published
//! [`RouteIdentity`], and watchers compare identities to detect a change.
//!
//! # Responsibilities
//!
//! - Parse `path?query#fragment` locations into comparison keys.
//! - Keep an ordered history stack with push/replace/back.
//! - Bump a monotonic version on every navigation.

use std::fmt;

use parking_lot::RwLock;
use tokio::sync::watch;

/// Comparison key for one location: the path plus its query string.
///
/// Fragments are dropped, since in-page anchors are not navigations.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct RouteIdentity {
    path: String,
    query: String,
}

impl RouteIdentity {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.is_empty() { "/".to_owned() } else { path };
        Self {
            path,
            query: query.into(),
        }
    }

    /// Parses a location such as `/questions/42?sort=votes#answer-3`.
    pub fn parse(location: &str) -> Self {
        let without_fragment = location
            .split_once('#')
            .map_or(location, |(head, _)| head);
        match without_fragment.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(without_fragment, ""),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl fmt::Display for RouteIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            f.write_str(&self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query)
        }
    }
}

impl From<&str> for RouteIdentity {
    fn from(location: &str) -> Self {
        Self::parse(location)
    }
}

struct History {
    stack: Vec<RouteIdentity>,
    version: u64,
}

/// Navigation history that notifies subscribers on every change.
pub struct RouteFeed {
    history: RwLock<History>,
    sender: watch::Sender<RouteIdentity>,
}

impl RouteFeed {
    /// Creates a feed whose history starts at `root`.
    pub fn new(root: impl Into<RouteIdentity>) -> Self {
        let root = root.into();
        let (sender, _) = watch::channel(root.clone());
        Self {
            history: RwLock::new(History {
                stack: vec![root],
                version: 0,
            }),
            sender,
        }
    }

    /// Navigates to `route`, keeping the current entry in history.
    pub fn push(&self, route: impl Into<RouteIdentity>) {
        let route = route.into();
        let mut history = self.history.write();
        history.stack.push(route.clone());
        self.publish(&mut history, route);
    }

    /// Navigates to `route`, replacing the current entry.
    pub fn replace(&self, route: impl Into<RouteIdentity>) {
        let route = route.into();
        let mut history = self.history.write();
        history.stack.pop();
        history.stack.push(route.clone());
        self.publish(&mut history, route);
    }

    /// Goes back one entry. Returns `false` when already at the root.
    pub fn back(&self) -> bool {
        let mut history = self.history.write();
        if history.stack.len() <= 1 {
            return false;
        }
        history.stack.pop();
        let Some(current) = history.stack.last().cloned() else {
            return false;
        };
        self.publish(&mut history, current);
        true
    }

    pub fn current(&self) -> RouteIdentity {
        self.sender.borrow().clone()
    }

    /// Monotonic navigation counter.
    pub fn version(&self) -> u64 {
        self.history.read().version
    }

    /// Number of entries in the history stack.
    pub fn len(&self) -> usize {
        self.history.read().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.read().stack.is_empty()
    }

    /// Receiver notified on every navigation, seeded with the current route.
    pub fn subscribe(&self) -> watch::Receiver<RouteIdentity> {
        self.sender.subscribe()
    }

    fn publish(&self, history: &mut History, route: RouteIdentity) {
        history.version = history.version.wrapping_add(1);
        self.sender.send_replace(route);
    }
}

#[cfg(test)]
mod tests {
    use super::{RouteFeed, RouteIdentity};

    #[test]
    fn parse_splits_path_and_query_and_drops_fragment() {
        let route = RouteIdentity::parse("/questions/42?sort=votes#answer-3");
        assert_eq!(route.path(), "/questions/42");
        assert_eq!(route.query(), "sort=votes");
        assert_eq!(route.to_string(), "/questions/42?sort=votes");
    }

    #[test]
    fn query_participates_in_identity() {
        assert_ne!(
            RouteIdentity::parse("/tags?page=1"),
            RouteIdentity::parse("/tags?page=2")
        );
        assert_eq!(
            RouteIdentity::parse("/tags#top"),
            RouteIdentity::parse("/tags")
        );
        assert_eq!(RouteIdentity::parse(""), RouteIdentity::parse("/"));
    }

    #[test]
    fn history_push_replace_back() {
        let feed = RouteFeed::new("/");
        feed.push("/questions");
        feed.push("/questions/7");
        feed.replace("/questions/8");
        assert_eq!(feed.len(), 3);
        assert_eq!(feed.current(), RouteIdentity::parse("/questions/8"));

        assert!(feed.back());
        assert_eq!(feed.current(), RouteIdentity::parse("/questions"));
        assert!(feed.back());
        assert!(!feed.back());
        assert_eq!(feed.current(), RouteIdentity::parse("/"));
        assert_eq!(feed.version(), 5);
    }

    #[test]
    fn subscribers_see_every_navigation_as_a_change() {
        let feed = RouteFeed::new("/");
        let mut rx = feed.subscribe();
        assert!(!rx.has_changed().expect("feed alive"));

        feed.push("/tags");
        assert!(rx.has_changed().expect("feed alive"));
        assert_eq!(*rx.borrow_and_update(), RouteIdentity::parse("/tags"));
    }
}
