//! 统一错误类型定义
//!
//! 使用 `thiserror` 库提供统一的错误处理，支持错误链式传播。

use std::io;
use thiserror::Error;

/// todo 错误类型
#[derive(Debug, Error)]
pub enum TodoError {
    /// I/O 错误（文件读写、目录操作等）
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(String),

    /// TOML 解析错误
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML 序列化错误
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Snapshot (JSON) 编解码错误
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// 存储错误（通用）
    #[error("Storage error: {0}")]
    Storage(String),

    /// 资源不存在
    #[error("Not found: {0}")]
    NotFound(String),

    /// 无效数据
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, TodoError>;

impl TodoError {
    /// 创建 Config 错误
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// 创建 Storage 错误
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// 创建 NotFound 错误
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// 创建 InvalidData 错误
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }
}
