use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::widgets::ListState;
use tracing::{debug, warn};

use crate::dialogs::{ConfirmType, DialogState};
use crate::model::{TodoItem, TodoList};
use crate::storage::config::{self, Config};
use crate::storage::{KeyValueStore, TODOS_STORAGE_KEY};
use crate::sync::Synchronizer;
use crate::theme::{detect_system_theme, get_theme_colors, Theme, ThemeColors};

/// Toast 消息
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            expires_at: Instant::now() + duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// 全局应用状态
pub struct App {
    /// 是否应该退出
    pub should_quit: bool,
    /// 当前任务列表
    pub todos: TodoList,
    /// 持久化同步
    pub sync: Synchronizer,
    /// 列表选择状态
    pub list_state: ListState,
    /// 对话框状态
    pub dialogs: DialogState,
    /// Toast 提示
    pub toast: Option<Toast>,
    /// 当前主题
    pub theme: Theme,
    /// 当前颜色方案
    pub colors: ThemeColors,
    /// 上次检测到的系统主题（用于 Auto 模式检测变化）
    last_system_dark: bool,
    config: Config,
    /// 配置文件路径，None 时主题变化不落盘
    config_path: Option<PathBuf>,
}

impl App {
    /// 创建应用并开始加载任务列表，需要在 tokio runtime 上下文中调用
    pub fn new(store: Arc<dyn KeyValueStore>, config: Config, config_path: Option<PathBuf>) -> Self {
        let theme = Theme::from_name(&config.theme.name);

        Self {
            should_quit: false,
            todos: TodoList::new(),
            sync: Synchronizer::start(store, TODOS_STORAGE_KEY),
            list_state: ListState::default(),
            dialogs: DialogState::new(),
            toast: None,
            theme,
            colors: get_theme_colors(theme),
            last_system_dark: detect_system_theme(),
            config,
            config_path,
        }
    }

    /// 是否仍在加载
    pub fn is_loading(&self) -> bool {
        !self.sync.is_ready()
    }

    /// 检查同步状态：采用加载结果，展示写入失败
    pub fn poll_sync(&mut self) {
        if let Some(list) = self.sync.poll_load() {
            self.adopt(list);
        }

        while let Some(failure) = self.sync.take_write_failure() {
            self.show_toast(format!("Save failed: {}", failure.error));
        }
    }

    #[cfg(test)]
    pub async fn wait_ready(&mut self) {
        if let Some(list) = self.sync.wait_loaded().await {
            self.adopt(list);
        }
    }

    fn adopt(&mut self, list: TodoList) {
        self.todos = list;
        self.list_state
            .select(if self.todos.is_empty() { None } else { Some(0) });
    }

    /// 替换列表并持久化，列表未变化时返回 false
    fn apply(&mut self, next: TodoList) -> bool {
        if TodoList::same(&self.todos, &next) {
            return false;
        }
        self.todos = next;
        self.sync.persist(&self.todos);
        self.clamp_selection();
        true
    }

    /// Loading 期间拒绝修改
    fn ensure_ready(&mut self) -> bool {
        if self.is_loading() {
            self.show_toast("Still loading tasks…");
            return false;
        }
        true
    }

    // ========== Add Input ==========

    pub fn focus_input(&mut self) {
        self.dialogs.input_focused = true;
    }

    /// 离开输入框（保留已输入内容）
    pub fn blur_input(&mut self) {
        self.dialogs.input_focused = false;
    }

    pub fn input_char(&mut self, c: char) {
        self.dialogs.input.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.dialogs.input.pop();
    }

    /// 提交输入框内容，成功后清空输入并选中新任务
    pub fn submit_input(&mut self) {
        if !self.ensure_ready() {
            return;
        }

        // 空白输入被静默忽略
        let next = self.todos.add(&self.dialogs.input);
        if self.apply(next) {
            self.dialogs.input.clear();
            self.list_state.select(Some(self.todos.len() - 1));
            debug!(count = self.todos.len(), "task added");
        }
    }

    // ========== List ==========

    /// 当前选中的任务
    pub fn selected_item(&self) -> Option<&TodoItem> {
        self.list_state
            .selected()
            .and_then(|index| self.todos.items().get(index))
    }

    pub fn select_next(&mut self) {
        let len = self.todos.len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some((current + 1) % len));
    }

    pub fn select_previous(&mut self) {
        let len = self.todos.len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let prev = if current == 0 { len - 1 } else { current - 1 };
        self.list_state.select(Some(prev));
    }

    pub fn select_first(&mut self) {
        if !self.todos.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.todos.is_empty() {
            self.list_state.select(Some(self.todos.len() - 1));
        }
    }

    /// 保证选中项在范围内
    fn clamp_selection(&mut self) {
        let len = self.todos.len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(index) => Some(index.min(len - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    /// 切换选中任务的完成状态
    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_item().map(|item| item.id.clone()) {
            self.toggle(&id);
        }
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.ensure_ready() {
            return;
        }
        let next = self.todos.toggle(id);
        self.apply(next);
    }

    // ========== Delete Confirm ==========

    /// 对选中任务发起删除，弹出确认框
    pub fn request_delete_selected(&mut self) {
        if let Some(id) = self.selected_item().map(|item| item.id.clone()) {
            self.request_delete(&id);
        }
    }

    pub fn request_delete(&mut self, id: &str) {
        if !self.ensure_ready() {
            return;
        }
        if let Some(item) = self.todos.get(id) {
            self.dialogs.confirm_dialog = Some(ConfirmType::DeleteTask {
                id: item.id.clone(),
                text: item.text.clone(),
            });
        }
    }

    /// 确认删除
    pub fn confirm_delete(&mut self) {
        let Some(ConfirmType::DeleteTask { id, .. }) = self.dialogs.confirm_dialog.take() else {
            return;
        };
        let next = self.todos.remove(&id);
        if self.apply(next) {
            debug!(count = self.todos.len(), "task deleted");
        }
    }

    /// 取消删除
    pub fn cancel_delete(&mut self) {
        self.dialogs.confirm_dialog = None;
    }

    // ========== Theme ==========

    /// 切换到下一个主题并保存到配置
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.colors = get_theme_colors(self.theme);
        self.show_toast(format!("Theme: {}", self.theme.label()));

        self.config.theme.name = self.theme.label().to_string();
        if let Some(path) = self.config_path.as_deref() {
            if let Err(e) = config::save_config_to(path, &self.config) {
                warn!(error = %e, "failed to save theme");
            }
        }
    }

    /// 检查系统主题变化（用于 Auto 模式）
    pub fn check_system_theme(&mut self) {
        if self.theme != Theme::Auto {
            return;
        }

        let current_dark = detect_system_theme();
        if current_dark != self.last_system_dark {
            self.last_system_dark = current_dark;
            self.colors = get_theme_colors(Theme::Auto);
        }
    }

    // ========== Toast ==========

    /// 显示 Toast 消息
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message, Duration::from_secs(2)));
    }

    /// 更新 Toast 状态（清理过期的 Toast）
    pub fn update_toast(&mut self) {
        if let Some(ref toast) = self.toast {
            if toast.is_expired() {
                self.toast = None;
            }
        }
    }

    /// 退出应用
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    async fn ready_app(store: &Arc<MemoryStore>) -> App {
        let mut app = App::new(store.clone(), Config::default(), None);
        app.wait_ready().await;
        app
    }

    fn add(app: &mut App, text: &str) {
        app.focus_input();
        for c in text.chars() {
            app.input_char(c);
        }
        app.submit_input();
    }

    fn id_of(app: &App, text: &str) -> String {
        app.todos
            .iter()
            .find(|item| item.text == text)
            .map(|item| item.id.clone())
            .unwrap()
    }

    fn stored(store: &MemoryStore) -> TodoList {
        TodoList::from_snapshot(&store.value(TODOS_STORAGE_KEY).unwrap()).unwrap()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_add_clears_input_and_selects_new_task() {
        let store = Arc::new(MemoryStore::new());
        let mut app = ready_app(&store).await;

        add(&mut app, "Buy milk");
        add(&mut app, "Walk dog");

        assert_eq!(app.todos.len(), 2);
        assert!(app.dialogs.input.is_empty());
        assert!(app.dialogs.input_focused);
        assert_eq!(app.selected_item().unwrap().text, "Walk dog");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_blank_input_is_rejected_without_write() {
        let store = Arc::new(MemoryStore::new());
        let mut app = ready_app(&store).await;

        add(&mut app, "   ");
        app.sync.flush().await;

        assert!(app.todos.is_empty());
        assert_eq!(app.dialogs.input, "   ");
        assert!(app.toast.is_none());
        assert_eq!(store.set_count(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_mutations_ignored_while_loading() {
        let store = Arc::new(MemoryStore::new());
        store.hold_get();
        let mut app = App::new(store.clone(), Config::default(), None);

        add(&mut app, "too early");
        assert!(app.is_loading());
        assert!(app.todos.is_empty());
        assert_eq!(app.dialogs.input, "too early");

        store.release_get();
        app.wait_ready().await;
        app.submit_input();
        app.sync.flush().await;
        assert_eq!(stored(&store).items()[0].text, "too early");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_cancel_delete_clears_pending() {
        let store = Arc::new(MemoryStore::new());
        let mut app = ready_app(&store).await;
        add(&mut app, "Keep me");

        app.request_delete_selected();
        assert_eq!(app.dialogs.pending_delete(), Some(id_of(&app, "Keep me").as_str()));

        app.cancel_delete();
        assert!(app.dialogs.pending_delete().is_none());
        assert_eq!(app.todos.len(), 1);

        // 没有待确认 ID 时确认是空操作
        app.confirm_delete();
        assert_eq!(app.todos.len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_request_delete_unknown_id_opens_nothing() {
        let store = Arc::new(MemoryStore::new());
        let mut app = ready_app(&store).await;

        app.request_delete("missing");
        assert!(app.dialogs.confirm_dialog.is_none());
        app.request_delete_selected();
        assert!(app.dialogs.confirm_dialog.is_none());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_selection_wraps_and_clamps() {
        let store = Arc::new(MemoryStore::new());
        let mut app = ready_app(&store).await;
        for text in ["a", "b", "c"] {
            add(&mut app, text);
        }

        app.select_next();
        assert_eq!(app.selected_item().unwrap().text, "a");
        app.select_previous();
        assert_eq!(app.selected_item().unwrap().text, "c");
        app.select_first();
        assert_eq!(app.list_state.selected(), Some(0));

        app.select_last();
        app.request_delete_selected();
        app.confirm_delete();
        assert_eq!(app.selected_item().unwrap().text, "b");

        for _ in 0..2 {
            app.request_delete_selected();
            app.confirm_delete();
        }
        assert!(app.todos.is_empty());
        assert!(app.list_state.selected().is_none());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_end_to_end_scenario() {
        let store = Arc::new(MemoryStore::new());
        let mut app = ready_app(&store).await;

        add(&mut app, "Buy milk");
        add(&mut app, "Walk dog");
        let milk = id_of(&app, "Buy milk");
        let dog = id_of(&app, "Walk dog");

        app.toggle(&milk);
        app.request_delete(&dog);
        app.confirm_delete();
        assert!(app.dialogs.pending_delete().is_none());

        assert_eq!(app.todos.len(), 1);
        let item = &app.todos.items()[0];
        assert_eq!(item.text, "Buy milk");
        assert!(item.completed);

        app.sync.flush().await;
        let expected = app.todos.clone();
        drop(app);

        // 重启
        let restarted = ready_app(&store).await;
        assert_eq!(restarted.todos, expected);
        assert_eq!(stored(&store), expected);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_write_failure_shows_toast() {
        let store = Arc::new(MemoryStore::new());
        store.fail_next_sets(1);
        let mut app = ready_app(&store).await;

        add(&mut app, "Buy milk");
        app.toast = None;
        app.sync.flush().await;
        app.poll_sync();

        let toast = app.toast.as_ref().unwrap();
        assert!(toast.message.starts_with("Save failed"));
        assert_eq!(app.todos.len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_cycle_theme_saves_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = Arc::new(MemoryStore::new());
        let mut config = Config::default();
        config.theme.name = "Light".to_string();
        let mut app = App::new(store.clone(), config, Some(path.clone()));

        app.cycle_theme();
        assert_eq!(app.theme, Theme::Dracula);
        let saved = config::load_config_from(&path).unwrap();
        assert_eq!(saved.theme.name, "Dracula");
    }
}
