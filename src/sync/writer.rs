//! 串行写队列
//!
//! 单个后台任务按入队顺序逐个执行 `set`，任意时刻最多一个写入在进行。

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::storage::KeyValueStore;

enum WriteCmd {
    Write { seq: u64, payload: String },
    Flush(oneshot::Sender<()>),
}

/// 写入失败报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub seq: u64,
    pub error: String,
}

/// 写队列句柄
pub struct WriteQueue {
    tx: mpsc::UnboundedSender<WriteCmd>,
    next_seq: u64,
}

impl WriteQueue {
    /// 启动写任务，返回队列句柄和失败报告接收端
    pub fn spawn(
        store: Arc<dyn KeyValueStore>,
        key: String,
    ) -> (Self, mpsc::UnboundedReceiver<WriteFailure>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (failure_tx, failure_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(store, key, rx, failure_tx));
        (Self { tx, next_seq: 1 }, failure_rx)
    }

    /// 入队一个完整 snapshot，返回序号
    pub fn enqueue(&mut self, payload: String) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.tx.send(WriteCmd::Write { seq, payload }).is_err() {
            warn!(seq, "writer task is gone, snapshot dropped");
        }
        seq
    }

    /// 等待此前入队的写入全部执行完毕
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteCmd::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

async fn run(
    store: Arc<dyn KeyValueStore>,
    key: String,
    mut rx: mpsc::UnboundedReceiver<WriteCmd>,
    failures: mpsc::UnboundedSender<WriteFailure>,
) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            WriteCmd::Write { seq, payload } => match store.set(&key, &payload).await {
                Ok(()) => debug!(seq, bytes = payload.len(), "snapshot written"),
                Err(e) => {
                    warn!(seq, error = %e, "snapshot write failed");
                    let _ = failures.send(WriteFailure {
                        seq,
                        error: e.to_string(),
                    });
                }
            },
            WriteCmd::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("writer task stopped");
}
