use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::theme::ThemeColors;

/// Header 总高度：上边框 + 标题行 + 统计行
pub const HEADER_HEIGHT: u16 = 3;

/// 标题文字
const TITLE: &str = "My Todo List";

/// 渲染顶部区域（标题 + 完成统计）
pub fn render(
    frame: &mut Frame,
    area: Rect,
    done: usize,
    total: usize,
    loading: bool,
    colors: &ThemeColors,
) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
        .border_style(Style::default().fg(colors.border));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let status = if loading {
        Span::styled("Loading…", Style::default().fg(colors.warning))
    } else {
        Span::styled(summary(done, total), Style::default().fg(colors.muted))
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("✎ {}", TITLE),
            Style::default()
                .fg(colors.title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(status),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner_area);
}

fn summary(done: usize, total: usize) -> String {
    match total {
        0 => "no tasks".to_string(),
        1 => format!("{}/1 task done", done),
        _ => format!("{}/{} tasks done", done, total),
    }
}
