//! 添加任务输入框组件

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::theme::ThemeColors;

/// 输入框高度（含边框）
pub const INPUT_HEIGHT: u16 = 3;

const PLACEHOLDER: &str = "Add a new task...";

/// 渲染输入框
/// focused: 是否正在输入（显示光标、高亮边框）
pub fn render(frame: &mut Frame, area: Rect, input: &str, focused: bool, colors: &ThemeColors) {
    let mut spans = vec![Span::styled(" + ", Style::default().fg(colors.highlight))];

    if input.is_empty() && !focused {
        spans.push(Span::styled(PLACEHOLDER, Style::default().fg(colors.muted)));
    } else {
        // 只显示末尾能放下的部分
        let visible = area.width.saturating_sub(7) as usize;
        let skip = input.chars().count().saturating_sub(visible);
        let shown: String = input.chars().skip(skip).collect();
        spans.push(Span::styled(shown, Style::default().fg(colors.text)));
    }

    if focused {
        spans.push(Span::styled(
            "█",
            Style::default()
                .fg(colors.highlight)
                .add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    let border_color = if focused { colors.highlight } else { colors.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .style(Style::default().bg(colors.bg_secondary));

    frame.render_widget(paragraph, area);
}
