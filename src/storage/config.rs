//! 应用配置持久化

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::default_data_dir;
use crate::error::{Result, TodoError};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// 主题配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Auto".to_string(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageConfig {
    /// 数据目录（默认 ~/.todo/）
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// EnvFilter 语法，如 "info" 或 "todo=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// 实际使用的数据目录：命令行参数 > 配置文件 > ~/.todo/
    pub fn data_dir(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = cli_override {
            return Ok(dir.to_path_buf());
        }
        if let Some(ref dir) = self.storage.data_dir {
            return Ok(dir.clone());
        }
        default_data_dir()
    }
}

/// 获取配置文件路径 ~/.todo/config.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join("config.toml"))
}

/// 加载配置，无法读取或解析时返回默认值和错误，由调用方在日志就绪后报告
pub fn load_config_or_default(path: &Path) -> (Config, Option<TodoError>) {
    match load_config_from(path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    }
}

/// 从指定路径加载配置，文件不存在时返回默认值
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// 保存配置到指定路径
pub fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
