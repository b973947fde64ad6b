use std::{
    io::{self, Write as _},
    time::Duration,
};

use anyhow::{Context, Result};
use porsesh_progress::{
    NavigationWatcher, ProgressConfig, ProgressProvider, RouteFeed, RouteIdentity, WatcherPhase,
};
use porsesh_progress_bar::{
    LayoutDirection, ProgressBarStyle, ProgressBarView, Px, SmoothedProgress, Viewport,
};
use tokio::time::{interval, sleep};
use tracing::info;

use crate::{Cli, terminal::render_line};

/// Longest time the replay waits for the last cycle to hide.
const SETTLE_LIMIT: Duration = Duration::from_secs(5);

/// A scripted browsing session.
#[derive(Clone, Debug)]
pub struct Script {
    pub routes: Vec<RouteIdentity>,
    pub gap: Duration,
    pub load: Duration,
    pub width: u16,
    pub direction: LayoutDirection,
}

impl Script {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            routes: cli
                .routes
                .iter()
                .map(|route| RouteIdentity::parse(route))
                .collect(),
            gap: Duration::from_millis(cli.gap_ms),
            load: Duration::from_millis(cli.load_ms),
            width: cli.width,
            direction: if cli.ltr {
                LayoutDirection::LeftToRight
            } else {
                LayoutDirection::RightToLeft
            },
        }
    }
}

/// Replays `script` against a fresh provider, drawing the smoothed bar every
/// smoothing tick until the last cycle has hidden.
pub async fn replay(config: ProgressConfig, script: Script) -> Result<()> {
    let provider = ProgressProvider::new(config)?;
    let progress = provider.handle();
    let feed = RouteFeed::new("/");
    let watcher = NavigationWatcher::new(progress.clone()).mount(&feed);

    let style = ProgressBarStyle::default().direction(script.direction);
    let view = ProgressBarView::new(style.clone());
    let smoothed = SmoothedProgress::spawn(&progress, &style);
    let viewport = Viewport::new(Px(i32::from(script.width)), 1.0);

    info!(
        hide_delay = ?progress.config().hide_delay,
        safety_timeout = ?progress.config().safety_timeout,
        "replaying {} navigations",
        script.routes.len()
    );

    let navigate = async {
        for route in &script.routes {
            info!(%route, "navigating");
            feed.push(route.clone());
            sleep(script.gap).await;
        }
        sleep(script.load).await;
        info!("page loaded");
        watcher.finish();

        let settle = async {
            while watcher.phase() == WatcherPhase::Animating {
                sleep(style.smoothing_interval).await;
            }
        };
        if tokio::time::timeout(SETTLE_LIMIT, settle).await.is_err() {
            tracing::warn!("progress bar did not settle in time");
        }
    };

    let draw = async {
        let mut stdout = io::stdout();
        let mut ticks = interval(style.smoothing_interval);
        loop {
            ticks.tick().await;
            let shown = smoothed.current();
            let frame = view.frame(shown, viewport);
            let line = render_line(frame.as_ref(), script.width);
            let drawn = write!(stdout, "\r{line} {:>5.1}%", shown.progress)
                .and_then(|()| stdout.flush());
            if let Err(err) = drawn {
                return Err::<(), _>(err).context("failed to draw progress bar");
            }
        }
    };

    tokio::select! {
        () = navigate => {}
        drawn = draw => drawn?,
    }
    println!();
    Ok(())
}
