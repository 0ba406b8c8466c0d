//! 对话框状态管理
//!
//! 管理输入框、帮助面板和删除确认弹窗的显示状态和数据。

pub use crate::ui::components::confirm_dialog::ConfirmType;

/// 对话框状态
#[derive(Debug, Default)]
pub struct DialogState {
    // === Add Input ===
    /// 输入框是否获得焦点
    pub input_focused: bool,
    /// 输入内容
    pub input: String,

    // === Help ===
    /// 是否显示帮助面板
    pub show_help: bool,

    // === Confirm Dialog ===
    /// 确认弹窗（删除任务）
    pub confirm_dialog: Option<ConfirmType>,
}

impl DialogState {
    /// 创建新的对话框状态
    pub fn new() -> Self {
        Self::default()
    }

    /// 等待删除确认的任务 ID
    pub fn pending_delete(&self) -> Option<&str> {
        match &self.confirm_dialog {
            Some(ConfirmType::DeleteTask { id, .. }) => Some(id.as_str()),
            None => None,
        }
    }

    /// 检查是否有覆盖在列表上的弹窗
    pub fn has_active_dialog(&self) -> bool {
        self.show_help || self.confirm_dialog.is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================
