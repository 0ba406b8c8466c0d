//! 日志初始化
//!
//! TUI 占用了终端，日志统一写入数据目录下的 todo.log。

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Result;
use crate::storage::ensure_dir;

/// 日志文件名
pub const LOG_FILE: &str = "todo.log";

/// 覆盖配置中日志级别的环境变量
pub const LOG_ENV: &str = "TODO_LOG";

/// 初始化 tracing，返回日志文件路径
pub fn init(data_dir: &Path, default_level: &str) -> Result<PathBuf> {
    let dir = ensure_dir(data_dir.to_path_buf())?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // 已经初始化过（如测试中）时忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");

        let path = init(&data_dir, "info").unwrap();
        assert_eq!(path, data_dir.join(LOG_FILE));
        assert!(path.exists());
    }
}
