//! Todo 列表数据模型
//!
//! `TodoList` 是不可变值：每个操作返回新的列表，空操作返回共享同一分配的副本，
//! 调用方用 [`TodoList::same`] 即可判断是否需要持久化。

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::Result;

/// 单条任务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// 唯一 ID（创建后不变）
    pub id: String,
    /// 显示文本（已 trim，非空）
    pub text: String,
    /// 是否已完成
    pub completed: bool,
}

/// 有序任务列表（插入顺序）
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    items: Arc<Vec<TodoItem>>,
}

impl PartialEq for TodoList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for TodoList {}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 两个值是否共享同一份数据（未发生变更）
    pub fn same(a: &TodoList, b: &TodoList) -> bool {
        Arc::ptr_eq(&a.items, &b.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TodoItem> {
        self.items.iter()
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    /// 按 ID 或 1-based 序号查找
    pub fn resolve(&self, selector: &str) -> Option<&TodoItem> {
        let selector = selector.trim();
        if let Some(item) = self.get(selector) {
            return Some(item);
        }
        selector
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .and_then(|n| self.items.get(n - 1))
    }

    /// 添加任务，ID 由 uuid v4 生成
    pub fn add(&self, text: &str) -> TodoList {
        self.add_with_id(text, Uuid::new_v4().to_string())
    }

    /// 添加任务（指定 ID）
    ///
    /// 文本 trim 后为空，或 ID 已存在时返回未变更的列表。
    pub fn add_with_id(&self, text: &str, id: String) -> TodoList {
        let text = text.trim();
        if text.is_empty() || self.get(&id).is_some() {
            return self.clone();
        }

        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(TodoItem {
            id,
            text: text.to_string(),
            completed: false,
        });
        Self::from_vec(items)
    }

    /// 切换完成状态，未知 ID 时返回未变更的列表
    pub fn toggle(&self, id: &str) -> TodoList {
        if self.get(id).is_none() {
            return self.clone();
        }

        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == id {
                    TodoItem {
                        completed: !item.completed,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Self::from_vec(items)
    }

    /// 删除任务，未知 ID 时返回未变更的列表
    pub fn remove(&self, id: &str) -> TodoList {
        if self.get(id).is_none() {
            return self.clone();
        }

        let items = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        Self::from_vec(items)
    }

    /// 序列化为 snapshot（JSON 数组）
    pub fn to_snapshot(&self) -> Result<String> {
        Ok(serde_json::to_string(self.items.as_slice())?)
    }

    /// 从 snapshot 反序列化
    ///
    /// 重复的 ID 只保留第一条。
    pub fn from_snapshot(snapshot: &str) -> Result<TodoList> {
        let items: Vec<TodoItem> = serde_json::from_str(snapshot)?;

        let mut seen = HashSet::with_capacity(items.len());
        let total = items.len();
        let items: Vec<TodoItem> = items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        if items.len() != total {
            warn!(
                dropped = total - items.len(),
                "snapshot contained duplicate ids, keeping first occurrence"
            );
        }

        Ok(Self::from_vec(items))
    }

    fn from_vec(items: Vec<TodoItem>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }
}

impl<'a> IntoIterator for &'a TodoList {
    type Item = &'a TodoItem;
    type IntoIter = std::slice::Iter<'a, TodoItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
