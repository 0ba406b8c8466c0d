use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

/// 处理事件，返回 true 表示应该继续运行
pub fn handle_events(app: &mut App) -> io::Result<bool> {
    // 更新 Toast 状态
    app.update_toast();

    // 检查加载结果和写入失败
    app.poll_sync();

    // 检查系统主题变化（用于 Auto 模式）
    app.check_system_theme();

    // 轮询事件（100ms 超时）
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            // 只处理按下事件
            if key.kind != KeyEventKind::Press {
                return Ok(true);
            }
            handle_key(app, key);
        }
    }

    Ok(!app.should_quit)
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C 任何状态下都退出
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    // 优先处理弹窗事件

    // 帮助面板
    if app.dialogs.show_help {
        handle_help_key(app, key);
        return;
    }

    // 删除确认弹窗
    if app.dialogs.confirm_dialog.is_some() {
        handle_confirm_dialog_key(app, key);
        return;
    }

    // 输入框
    if app.dialogs.input_focused {
        handle_input_key(app, key);
        return;
    }

    handle_list_key(app, key);
}

/// 处理列表的键盘事件
fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // 退出
        KeyCode::Char('q') => app.quit(),

        // 导航 - 下移
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),

        // 导航 - 上移
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),

        // 导航 - 首尾
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),

        // 添加任务
        KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Char('n') => app.focus_input(),

        // 切换完成状态
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),

        // 删除（需确认）
        KeyCode::Char('x') | KeyCode::Char('d') | KeyCode::Delete => {
            app.request_delete_selected()
        }

        // 主题
        KeyCode::Char('t') | KeyCode::Char('T') => app.cycle_theme(),

        // 帮助
        KeyCode::Char('?') => app.dialogs.show_help = true,

        _ => {}
    }
}

/// 处理输入框的键盘事件
fn handle_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Esc => app.blur_input(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) => app.input_char(c),
        _ => {}
    }
}

/// 处理删除确认弹窗的键盘事件
fn handle_confirm_dialog_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

/// 处理帮助面板的键盘事件
fn handle_help_key(app: &mut App, key: KeyEvent) {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
    ) {
        app.dialogs.show_help = false;
    }
}
