pub mod config;
pub mod file;
#[cfg(test)]
pub mod memory;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{Result, TodoError};

pub use file::FileStore;

/// 任务列表所在的存储 key
pub const TODOS_STORAGE_KEY: &str = "@todo_app_todos";

/// 异步 key-value 存储
///
/// 只暴露 `get` / `set` 两个操作，`get` 在 key 从未写入时返回 `None`。
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// 获取默认数据目录 ~/.todo/
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".todo"))
        .ok_or_else(|| TodoError::config("cannot determine home directory"))
}

/// 确保目录存在
pub fn ensure_dir(path: PathBuf) -> Result<PathBuf> {
    std::fs::create_dir_all(&path)?;
    Ok(path)
}
