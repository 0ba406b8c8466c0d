//! 确认弹窗组件

use ratatui::{
    layout::{Alignment, Constraint, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::dialog_utils::{center_dialog, render_dialog_frame, render_hint};
use super::truncate;
use crate::theme::ThemeColors;

/// 弹窗宽度
const POPUP_WIDTH: u16 = 46;

/// 确认弹窗类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmType {
    /// 删除任务（等待确认的任务 ID）
    DeleteTask { id: String, text: String },
}

impl ConfirmType {
    pub fn title(&self) -> &str {
        match self {
            ConfirmType::DeleteTask { .. } => " Delete ",
        }
    }

    pub fn message(&self) -> Vec<Line<'static>> {
        match self {
            ConfirmType::DeleteTask { text, .. } => {
                vec![
                    Line::from(format!("\"{}\"", truncate(text, POPUP_WIDTH as usize - 8))),
                    Line::from(""),
                    Line::from("Are you sure you want to delete this task?"),
                ]
            }
        }
    }
}

/// 渲染确认弹窗
pub fn render(frame: &mut Frame, confirm_type: &ConfirmType, colors: &ThemeColors) {
    let message_lines = confirm_type.message();
    // 边框 + 空行 + 内容 + 空行 + 提示
    let popup_height = (message_lines.len() as u16) + 5;
    let popup_area = center_dialog(frame.area(), POPUP_WIDTH, popup_height);

    let inner_area = render_dialog_frame(
        frame,
        popup_area,
        confirm_type.title(),
        colors.danger,
        colors,
    );

    let [_, content_area, _, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner_area);

    let styled_lines: Vec<Line> = message_lines
        .into_iter()
        .map(|line| {
            Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(colors.text),
            ))
        })
        .collect();

    let content = Paragraph::new(styled_lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(content, content_area);

    render_hint(
        frame,
        hint_area,
        &[("Y/Enter", "delete"), ("N/Esc", "cancel")],
        colors,
    );
}
