//! Background refresh of the catalog.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use nvimsh_registry::{decode_feed, FeedSource, Plugin};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{error, info};

use crate::{
    error::{CoreError, CoreResult},
    store::{Snapshot, SnapshotStore},
    types::RefreshSummary,
};

/// Configuration for the refresh loop
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between refresh cycles (default: 1 hour)
    pub interval: Duration,
    /// Whether the loop runs at all
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60 * 60),
            enabled: true,
        }
    }
}

/// Keeps a [`SnapshotStore`] in sync with a [`FeedSource`].
///
/// The refresher is the only writer of the store. Fetching and decoding
/// happen on the blocking pool, away from the store, and only a complete
/// snapshot is ever published.
pub struct Refresher {
    store: Arc<SnapshotStore>,
    source: Arc<dyn FeedSource>,
    config: RefreshConfig,
}

impl Refresher {
    pub fn new(
        store: Arc<SnapshotStore>,
        source: Arc<dyn FeedSource>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            store,
            source,
            config,
        }
    }

    /// Runs one fetch → decode → publish cycle.
    ///
    /// On failure the store is left untouched and the error is returned.
    pub async fn refresh_once(&self) -> CoreResult<RefreshSummary> {
        info!("Fetching plugin data from {} ...", self.source.location());

        let source = Arc::clone(&self.source);
        let plugins = tokio::task::spawn_blocking(move || -> nvimsh_registry::Result<Vec<Plugin>> {
            let content = source.fetch()?;
            decode_feed(&content)
        })
        .await
        .map_err(|err| CoreError::TaskFailed(err.to_string()))??;

        let snapshot = Snapshot::new(plugins, Some(Utc::now()));
        let summary = RefreshSummary {
            plugins: snapshot.len(),
            tags: snapshot.tags().len(),
        };
        self.store.set_snapshot(Arc::new(snapshot));

        info!(
            plugins = summary.plugins,
            tags = summary.tags,
            "Fetched plugin data successfully"
        );
        Ok(summary)
    }

    async fn run_cycle(&self) {
        if let Err(err) = self.refresh_once().await {
            error!("Plugin refresh failed: {}", err);
        }
    }

    /// Starts the refresh loop on the tokio runtime.
    ///
    /// The first cycle runs immediately, later ones once per interval.
    /// Failed cycles are logged and the loop carries on at the next tick.
    /// Dropping the returned handle leaves the loop running for the rest
    /// of the process; [`RefreshHandle::stop`] ends it.
    pub fn start(self) -> RefreshHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        if !self.config.enabled {
            info!("Plugin refresh is disabled");
            return RefreshHandle {
                shutdown: shutdown_tx,
                task: tokio::spawn(async {}),
            };
        }

        let interval = self.config.interval;

        let task = tokio::spawn(async move {
            info!("Starting plugin refresh with interval {:?}", interval);

            self.run_cycle().await;

            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await; // first tick completes immediately

            let mut listening = true;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.run_cycle().await;
                    }
                    changed = shutdown_rx.changed(), if listening => {
                        match changed {
                            Ok(()) if *shutdown_rx.borrow() => {
                                info!("Plugin refresh shutting down");
                                break;
                            }
                            Ok(()) => {}
                            Err(_) => listening = false,
                        }
                    }
                }
            }
        });

        RefreshHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running refresh loop.
pub struct RefreshHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Signals the loop to stop and waits for it to finish.
    ///
    /// A cycle already in flight completes first.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            error!("Plugin refresh task ended abnormally: {}", err);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use nvimsh_registry::RegistryError;

    use super::*;

    const FEED: &[u8] = br#"{
        "plugins": {
            "nvim-telescope/telescope.nvim": {
                "id": "nvim-telescope/telescope.nvim",
                "name": "telescope.nvim",
                "tags": ["fuzzy", "finder"],
                "stars": 500
            },
            "nvim-telescope/telescope-fzf-native.nvim": {
                "id": "nvim-telescope/telescope-fzf-native.nvim",
                "name": "telescope-fzf-native.nvim",
                "tags": ["fuzzy"],
                "stars": 10
            }
        }
    }"#;

    #[derive(Default)]
    struct ScriptedFeed {
        responses: Mutex<VecDeque<nvimsh_registry::Result<Vec<u8>>>>,
        calls: AtomicUsize,
    }

    impl ScriptedFeed {
        fn new(responses: Vec<nvimsh_registry::Result<Vec<u8>>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FeedSource for ScriptedFeed {
        fn location(&self) -> &str {
            "memory://feed"
        }

        fn fetch(&self) -> nvimsh_registry::Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(RegistryError::FetchFailed("no more responses".into())))
        }
    }

    fn refresher(
        store: &Arc<SnapshotStore>,
        feed: &Arc<ScriptedFeed>,
        interval: Duration,
    ) -> Refresher {
        let source: Arc<dyn FeedSource> = feed.clone();
        Refresher::new(
            Arc::clone(store),
            source,
            RefreshConfig {
                interval,
                enabled: true,
            },
        )
    }

    async fn wait_until<F: Fn() -> bool>(condition: F) {
        for _ in 0..500 {
            if condition() {
                return;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached in time");
    }

    #[tokio::test]
    async fn test_refresh_once_publishes_snapshot() {
        let store = Arc::new(SnapshotStore::new());
        let feed = ScriptedFeed::new(vec![Ok(FEED.to_vec())]);

        let summary = refresher(&store, &feed, Duration::from_secs(3600))
            .refresh_once()
            .await
            .unwrap();

        assert_eq!(
            summary,
            RefreshSummary {
                plugins: 2,
                tags: 2,
            }
        );

        let snapshot = store.snapshot();
        assert_eq!(snapshot.plugins()[0].id, "nvim-telescope/telescope-fzf-native.nvim");
        assert_eq!(snapshot.plugins()[1].id, "nvim-telescope/telescope.nvim");
        assert!(snapshot.tags().contains("finder"));
        assert!(snapshot.refreshed_at().is_some());
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_previous_snapshot() {
        let store = Arc::new(SnapshotStore::new());
        let feed = ScriptedFeed::new(vec![Ok(FEED.to_vec()), Ok(b"{\"plugins\": 42}".to_vec())]);
        let refresher = refresher(&store, &feed, Duration::from_secs(3600));

        refresher.refresh_once().await.unwrap();
        let before = store.snapshot();

        let err = refresher.refresh_once().await.unwrap_err();
        assert!(matches!(err, CoreError::Registry(ref e) if e.is_decode()));
        assert!(Arc::ptr_eq(&store.snapshot(), &before));
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_empty_initial_snapshot() {
        let store = Arc::new(SnapshotStore::new());
        let initial = store.snapshot();
        let feed = ScriptedFeed::new(vec![Err(RegistryError::FetchFailed("timeout".into()))]);

        let err = refresher(&store, &feed, Duration::from_secs(3600))
            .refresh_once()
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Registry(RegistryError::FetchFailed(_))));
        assert!(Arc::ptr_eq(&store.snapshot(), &initial));
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_start_runs_first_cycle_immediately_and_stops() {
        let store = Arc::new(SnapshotStore::new());
        let feed = ScriptedFeed::new(vec![Ok(FEED.to_vec())]);

        let handle = refresher(&store, &feed, Duration::from_secs(3600)).start();
        wait_until(|| !store.snapshot().is_empty()).await;

        handle.stop().await;
        assert_eq!(feed.calls(), 1);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_loop_continues_after_failed_cycle() {
        let store = Arc::new(SnapshotStore::new());
        let feed = ScriptedFeed::new(vec![
            Err(RegistryError::FetchFailed("connection reset".into())),
            Ok(b"not json".to_vec()),
            Ok(FEED.to_vec()),
        ]);

        let handle = refresher(&store, &feed, Duration::from_millis(20)).start();
        wait_until(|| !store.snapshot().is_empty()).await;
        handle.stop().await;

        assert!(feed.calls() >= 3);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_disabled_refresher_never_fetches() {
        let store = Arc::new(SnapshotStore::new());
        let feed = ScriptedFeed::new(vec![Ok(FEED.to_vec())]);
        let source: Arc<dyn FeedSource> = feed.clone();

        let handle = Refresher::new(
            Arc::clone(&store),
            source,
            RefreshConfig {
                interval: Duration::from_millis(10),
                enabled: false,
            },
        )
        .start();

        handle.stop().await;
        assert_eq!(feed.calls(), 0);
        assert!(store.snapshot().is_empty());
    }
}
