//! 任务列表与存储之间的同步
//!
//! 启动时读取一次 snapshot（Loading），读取完成后进入 Ready，
//! 此后每次变更都把完整列表写回同一个 key。Loading 期间不发出任何写入。

mod writer;

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::model::TodoList;
use crate::storage::KeyValueStore;

pub use writer::WriteFailure;
use writer::WriteQueue;

/// 同步状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Loading,
    Ready,
}

/// 启动读取的结果
#[derive(Debug)]
enum LoadOutcome {
    Stored(TodoList),
    Empty,
    Unreadable(String),
}

pub struct Synchronizer {
    state: SyncState,
    key: String,
    load_rx: Option<oneshot::Receiver<LoadOutcome>>,
    /// Loading 期间请求的最新 snapshot
    deferred: Option<TodoList>,
    writer: WriteQueue,
    failures: mpsc::UnboundedReceiver<WriteFailure>,
}

impl Synchronizer {
    /// 启动读取任务和写任务，需要在 tokio runtime 上下文中调用
    pub fn start(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let (load_tx, load_rx) = oneshot::channel();
        let reader_store = Arc::clone(&store);
        let reader_key = key.clone();
        tokio::spawn(async move {
            let outcome = read_snapshot(reader_store.as_ref(), &reader_key).await;
            let _ = load_tx.send(outcome);
        });

        let (writer, failures) = WriteQueue::spawn(store, key.clone());
        info!(key = %key, "loading task list");

        Self {
            state: SyncState::Loading,
            key,
            load_rx: Some(load_rx),
            deferred: None,
            writer,
            failures,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state() == SyncState::Ready
    }

    /// 非阻塞检查读取是否完成
    ///
    /// 完成时切换到 Ready 并返回应采用的列表；仍在读取或已经 Ready 时返回 `None`。
    pub fn poll_load(&mut self) -> Option<TodoList> {
        let rx = self.load_rx.as_mut()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => {
                LoadOutcome::Unreadable("reader task ended without a result".to_string())
            }
        };
        Some(self.finish_load(outcome))
    }

    /// 等待读取完成，已经 Ready 时返回 `None`
    pub async fn wait_loaded(&mut self) -> Option<TodoList> {
        let rx = self.load_rx.as_mut()?;
        let outcome = rx.await.unwrap_or_else(|_| {
            LoadOutcome::Unreadable("reader task ended without a result".to_string())
        });
        Some(self.finish_load(outcome))
    }

    fn finish_load(&mut self, outcome: LoadOutcome) -> TodoList {
        self.load_rx = None;
        self.state = SyncState::Ready;
        let deferred = self.deferred.take();

        match outcome {
            LoadOutcome::Stored(list) => {
                if deferred.is_some() {
                    warn!("discarding changes made before the stored list was loaded");
                }
                info!(key = %self.key, count = list.len(), "task list loaded");
                list
            }
            LoadOutcome::Empty => {
                info!(key = %self.key, "no stored task list, starting empty");
                self.adopt_deferred(deferred)
            }
            LoadOutcome::Unreadable(error) => {
                warn!(key = %self.key, %error, "stored task list unreadable, starting empty");
                self.adopt_deferred(deferred)
            }
        }
    }

    /// 存储中没有可用数据时，Loading 期间的变更生效并作为第一次写入
    fn adopt_deferred(&mut self, deferred: Option<TodoList>) -> TodoList {
        match deferred {
            Some(list) => {
                self.enqueue(&list);
                list
            }
            None => TodoList::new(),
        }
    }

    /// 持久化当前列表
    ///
    /// Ready 时入队完整 snapshot；Loading 时只记录，等读取完成后再决定。
    pub fn persist(&mut self, list: &TodoList) {
        match self.state {
            SyncState::Loading => {
                debug!(count = list.len(), "load in progress, deferring write");
                self.deferred = Some(list.clone());
            }
            SyncState::Ready => self.enqueue(list),
        }
    }

    fn enqueue(&mut self, list: &TodoList) {
        match list.to_snapshot() {
            Ok(payload) => {
                let seq = self.writer.enqueue(payload);
                debug!(seq, count = list.len(), "snapshot queued");
            }
            Err(e) => warn!(error = %e, "failed to serialize task list"),
        }
    }

    /// 取出一条写入失败报告
    pub fn take_write_failure(&mut self) -> Option<WriteFailure> {
        self.failures.try_recv().ok()
    }

    /// 等待已入队的写入执行完毕
    pub async fn flush(&self) {
        self.writer.flush().await;
    }
}

async fn read_snapshot(store: &dyn KeyValueStore, key: &str) -> LoadOutcome {
    match store.get(key).await {
        Ok(Some(snapshot)) => match TodoList::from_snapshot(&snapshot) {
            Ok(list) => LoadOutcome::Stored(list),
            Err(e) => LoadOutcome::Unreadable(format!("corrupt snapshot: {}", e)),
        },
        Ok(None) => LoadOutcome::Empty,
        Err(e) => LoadOutcome::Unreadable(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::{Call, MemoryStore};
    use std::time::Duration;

    const KEY: &str = "@todo_app_todos";

    fn start(store: &Arc<MemoryStore>) -> Synchronizer {
        Synchronizer::start(store.clone(), KEY)
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_empty_storage_loads_empty_list() {
        let store = Arc::new(MemoryStore::new());
        let mut sync = start(&store);
        assert_eq!(sync.state(), SyncState::Loading);

        let list = sync.wait_loaded().await.unwrap();
        assert!(list.is_empty());
        assert!(sync.is_ready());
        assert!(sync.wait_loaded().await.is_none());

        sync.flush().await;
        assert_eq!(store.calls(), vec![Call::Get(KEY.to_string())]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_stored_snapshot_is_adopted() {
        let stored = TodoList::new()
            .add_with_id("Buy milk", "a".to_string())
            .toggle("a");
        let store = Arc::new(MemoryStore::with_value(
            KEY,
            &stored.to_snapshot().unwrap(),
        ));
        let mut sync = start(&store);

        assert_eq!(sync.wait_loaded().await.unwrap(), stored);
        sync.flush().await;
        assert_eq!(store.set_count(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_poll_load_transitions_once() {
        let store = Arc::new(MemoryStore::new());
        store.hold_get();
        let mut sync = start(&store);

        tokio::task::yield_now().await;
        assert!(sync.poll_load().is_none());
        assert_eq!(sync.state(), SyncState::Loading);

        store.release_get();
        let list = loop {
            if let Some(list) = sync.poll_load() {
                break list;
            }
            tokio::task::yield_now().await;
        };
        assert!(list.is_empty());
        assert!(sync.is_ready());
        assert!(sync.poll_load().is_none());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_corrupt_snapshot_falls_back_without_writing() {
        let store = Arc::new(MemoryStore::with_value(KEY, "{not a list"));
        let mut sync = start(&store);

        assert!(sync.wait_loaded().await.unwrap().is_empty());
        assert!(sync.is_ready());
        sync.flush().await;
        assert_eq!(store.set_count(), 0);
        assert_eq!(store.value(KEY).as_deref(), Some("{not a list"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_read_failure_falls_back_to_empty() {
        let store = Arc::new(MemoryStore::new());
        store.fail_get();
        let mut sync = start(&store);

        assert!(sync.wait_loaded().await.unwrap().is_empty());
        assert!(sync.is_ready());

        let list = TodoList::new().add_with_id("after failure", "x".to_string());
        sync.persist(&list);
        sync.flush().await;
        assert_eq!(store.value(KEY), Some(list.to_snapshot().unwrap()));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_writes_wait_for_load() {
        let store = Arc::new(MemoryStore::new());
        store.hold_get();
        let mut sync = start(&store);

        let early = TodoList::new().add_with_id("early", "e".to_string());
        sync.persist(&early);
        tokio::task::yield_now().await;
        sync.flush().await;
        assert!(store.calls().is_empty());
        assert_eq!(sync.state(), SyncState::Loading);

        store.release_get();
        // 存储为空：Loading 期间的变更被采用，并在读取之后写入
        let adopted = sync.wait_loaded().await.unwrap();
        assert_eq!(adopted, early);
        sync.flush().await;
        assert_eq!(
            store.calls(),
            vec![
                Call::Get(KEY.to_string()),
                Call::Set(KEY.to_string(), early.to_snapshot().unwrap()),
            ]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_deferred_write_discarded_when_data_exists() {
        let stored = TodoList::new().add_with_id("stored", "s".to_string());
        let snapshot = stored.to_snapshot().unwrap();
        let store = Arc::new(MemoryStore::with_value(KEY, &snapshot));
        store.hold_get();
        let mut sync = start(&store);

        sync.persist(&TodoList::new());
        store.release_get();

        assert_eq!(sync.wait_loaded().await.unwrap(), stored);
        sync.flush().await;
        assert_eq!(store.set_count(), 0);
        assert_eq!(store.value(KEY), Some(snapshot));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_writes_apply_in_order() {
        let store = Arc::new(MemoryStore::new());
        store.delay_sets([Duration::from_millis(50), Duration::ZERO]);
        let mut sync = start(&store);
        let list = sync.wait_loaded().await.unwrap();

        let m1 = list.add_with_id("first", "1".to_string());
        sync.persist(&m1);
        let m2 = m1.add_with_id("second", "2".to_string());
        sync.persist(&m2);
        sync.flush().await;

        assert_eq!(store.value(KEY), Some(m2.to_snapshot().unwrap()));
        assert_eq!(store.max_concurrent_sets(), 1);
        assert_eq!(
            store.calls()[1..],
            [
                Call::Set(KEY.to_string(), m1.to_snapshot().unwrap()),
                Call::Set(KEY.to_string(), m2.to_snapshot().unwrap()),
            ]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_write_failure_is_reported_and_not_retried() {
        let store = Arc::new(MemoryStore::new());
        store.fail_next_sets(1);
        let mut sync = start(&store);
        let list = sync.wait_loaded().await.unwrap();

        let m1 = list.add_with_id("lost", "1".to_string());
        sync.persist(&m1);
        sync.flush().await;

        let failure = sync.take_write_failure().unwrap();
        assert_eq!(failure.seq, 1);
        assert!(failure.error.contains("set failed"));
        assert!(store.value(KEY).is_none());

        let m2 = m1.add_with_id("kept", "2".to_string());
        sync.persist(&m2);
        sync.flush().await;
        assert!(sync.take_write_failure().is_none());
        assert_eq!(store.value(KEY), Some(m2.to_snapshot().unwrap()));
        assert_eq!(store.set_count(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_restart_reproduces_state() {
        let store = Arc::new(MemoryStore::new());

        let mut sync = start(&store);
        let mut list = sync.wait_loaded().await.unwrap();
        for (id, text) in [("a", "Buy milk"), ("b", "Walk dog"), ("c", "Read")] {
            list = list.add_with_id(text, id.to_string());
            sync.persist(&list);
        }
        list = list.toggle("b").remove("c");
        sync.persist(&list);
        sync.flush().await;
        drop(sync);

        let mut restarted = start(&store);
        assert_eq!(restarted.wait_loaded().await.unwrap(), list);
    }
}
