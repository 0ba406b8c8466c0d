//! 内存存储（测试用）
//!
//! 记录每次调用，支持暂停 `get`、为 `set` 注入延迟和失败。

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::KeyValueStore;
use crate::error::{Result, TodoError};

/// 已完成的存储调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(String),
    Set(String, String),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<Call>>,
    gated: AtomicBool,
    gate: Notify,
    fail_get: AtomicBool,
    failing_sets: AtomicUsize,
    set_delays: Mutex<VecDeque<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.put(key, value);
        store
    }

    /// 直接写入数据（不记录调用）
    pub fn put(&self, key: &str, value: &str) {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.data.lock().unwrap().get(key).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Set(..)))
            .count()
    }

    /// `get` 挂起直到 [`release_get`](Self::release_get)
    pub fn hold_get(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    pub fn release_get(&self) {
        self.gate.notify_one();
    }

    pub fn fail_get(&self) {
        self.fail_get.store(true, Ordering::SeqCst);
    }

    /// 接下来的 n 次 `set` 失败
    pub fn fail_next_sets(&self, n: usize) {
        self.failing_sets.store(n, Ordering::SeqCst);
    }

    /// 为接下来的 `set` 依次注入延迟
    pub fn delay_sets(&self, delays: impl IntoIterator<Item = Duration>) {
        self.set_delays.lock().unwrap().extend(delays);
    }

    /// 同时进行中的 `set` 的最大数量
    pub fn max_concurrent_sets(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.gated.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }

        self.calls.lock().unwrap().push(Call::Get(key.to_string()));
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(TodoError::storage("get failed"));
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self.set_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let failing = self.failing_sets.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_sets.store(failing - 1, Ordering::SeqCst);
            return Err(TodoError::storage("set failed"));
        }

        self.put(key, value);
        self.calls
            .lock()
            .unwrap()
            .push(Call::Set(key.to_string(), value.to_string()));
        Ok(())
    }
}
