//! Live snapshots of a query over the file store.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::Stream;
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use shopfront_core::Result;
use shopfront_core::catalog::{Document, LiveQuery};
use shopfront_core::error::{Error, RequestError};

use crate::catalog::FileCatalog;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

fn subscription_error(message: String) -> Error {
    Error::Request(RequestError::Subscription { message })
}

/// Snapshot stream for a file-backed query.
///
/// Emits the current result set straight away, then a fresh one every time
/// the store's change log grows. Changes are picked up by a filesystem
/// watcher, with a polling fallback for platforms where events are lost.
/// Dropping the stream stops the background task and the watcher.
pub struct FileSnapshots<D> {
    inner: Pin<Box<dyn Stream<Item = Result<Vec<D>>> + Send>>,
    task: JoinHandle<()>,
}

impl<D: Document> FileSnapshots<D> {
    pub(crate) fn watch(catalog: FileCatalog<D>, query: LiveQuery<D>) -> Result<Self> {
        let root = catalog.store().root().to_path_buf();
        std::fs::create_dir_all(&root)
            .map_err(|e| subscription_error(format!("Failed to create store directory: {}", e)))?;

        // Capacity one: a pending wakeup already covers any later change.
        let (wake_tx, mut wake_rx) = mpsc::channel::<()>(1);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let Ok(event) = res else {
                return;
            };
            if !matches!(
                event.kind,
                notify::EventKind::Modify(_) | notify::EventKind::Create(_)
            ) {
                return;
            }

            let is_change_log = event
                .paths
                .iter()
                .any(|p| p.file_name().is_some_and(|n| n == "changes.jsonl"));
            if is_change_log {
                let _ = wake_tx.try_send(());
            }
        })
        .map_err(|e| subscription_error(format!("Failed to create file watcher: {}", e)))?;

        watcher
            .watch(&root, RecursiveMode::NonRecursive)
            .map_err(|e| subscription_error(format!("Failed to watch directory: {}", e)))?;

        let (tx, mut rx) = mpsc::channel::<Result<Vec<D>>>(16);
        let store = catalog.store().clone();
        let constraints = query.constraints();
        debug!(query = %query.describe(), "watching store");

        let task = tokio::spawn(async move {
            let _watcher = watcher;
            let mut seen = store.changes_len();
            let mut interval = tokio::time::interval(POLL_INTERVAL);

            let initial = catalog.execute(&constraints).map(|page| page.items);
            if tx.send(initial).await.is_err() {
                return;
            }

            loop {
                tokio::select! {
                    _ = wake_rx.recv() => {}
                    _ = interval.tick() => {}
                }

                let len = store.changes_len();
                if len == seen {
                    continue;
                }
                seen = len;

                let snapshot = catalog.execute(&constraints).map(|page| page.items);
                if let Err(e) = &snapshot {
                    warn!(error = %e, "snapshot query failed");
                }
                if tx.send(snapshot).await.is_err() {
                    break;
                }
            }
        });

        let stream = async_stream::stream! {
            while let Some(snapshot) = rx.recv().await {
                yield snapshot;
            }
        };

        Ok(Self {
            inner: Box::pin(stream),
            task,
        })
    }
}

impl<D> Stream for FileSnapshots<D> {
    type Item = Result<Vec<D>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl<D> Drop for FileSnapshots<D> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use serde_json::json;
    use shopfront_core::catalog::{Criteria, Post};
    use shopfront_core::traits::SnapshotSource;
    use shopfront_core::types::ItemId;
    use tempfile::TempDir;
    use tokio::time::timeout;

    use crate::store::FileStore;

    fn post(catalog: &FileCatalog<Post>, id: &str, status: &str) {
        catalog
            .put(
                &ItemId::new(id).unwrap(),
                &json!({ "title": id, "status": status }),
            )
            .unwrap();
    }

    #[tokio::test]
    async fn emits_initial_and_changed_snapshots() {
        let dir = TempDir::new().unwrap();
        let catalog: FileCatalog<Post> = FileCatalog::new(FileStore::new(dir.path()));
        post(&catalog, "a", "published");

        let query = LiveQuery::new(Post::published_feed(), 10);
        let mut snapshots = catalog.subscribe(&query).unwrap();

        let first = timeout(Duration::from_secs(5), snapshots.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(first.len(), 1);

        post(&catalog, "b", "draft");
        post(&catalog, "c", "published");

        // the draft write may or may not produce its own snapshot
        let mut latest = Vec::new();
        while latest.len() < 2 {
            latest = timeout(Duration::from_secs(5), snapshots.next())
                .await
                .unwrap()
                .unwrap()
                .unwrap();
        }
        assert!(latest.iter().all(Post::is_published));
    }

    #[tokio::test]
    async fn initial_snapshot_of_empty_store() {
        let dir = TempDir::new().unwrap();
        let catalog: FileCatalog<Post> = FileCatalog::new(FileStore::new(dir.path()));
        let query = LiveQuery::new(Criteria::default(), 10);

        let mut snapshots = catalog.subscribe(&query).unwrap();
        let first = timeout(Duration::from_secs(5), snapshots.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert!(first.is_empty());
    }
}
