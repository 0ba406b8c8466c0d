//! 快捷键帮助面板

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::dialog_utils::center_dialog;
use crate::theme::ThemeColors;

/// 帮助面板宽度
const PANEL_WIDTH: u16 = 38;

/// 渲染帮助面板
pub fn render(frame: &mut Frame, colors: &ThemeColors) {
    let lines = build_help_lines(colors);
    let panel_area = center_dialog(frame.area(), PANEL_WIDTH, lines.len() as u16 + 2);

    // 清除背景
    frame.render_widget(Clear, panel_area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(colors.highlight)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .style(Style::default().bg(colors.bg));

    frame.render_widget(Paragraph::new(lines).block(block), panel_area);
}

/// 构建帮助内容行
fn build_help_lines(colors: &ThemeColors) -> Vec<Line<'static>> {
    vec![
        section_header("Navigation", colors),
        key_line("j / ↓", "Move down", colors),
        key_line("k / ↑", "Move up", colors),
        key_line("g / G", "First / last", colors),
        Line::from(""),
        section_header("Tasks", colors),
        key_line("a / i / n", "Add task", colors),
        key_line("Space", "Toggle done", colors),
        key_line("x / Del", "Delete (confirm)", colors),
        Line::from(""),
        section_header("Other", colors),
        key_line("t", "Cycle theme", colors),
        key_line("?", "This help", colors),
        key_line("q", "Quit", colors),
        Line::from(""),
        Line::from(Span::styled(
            "  ────────────────────────────────",
            Style::default().fg(colors.muted),
        )),
        Line::from(Span::styled(
            format!("  todo v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(colors.text),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "      Press ? or Esc to close",
            Style::default().fg(colors.muted),
        )),
    ]
}

/// 分组标题
fn section_header(title: &'static str, colors: &ThemeColors) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default()
            .fg(colors.highlight)
            .add_modifier(Modifier::BOLD),
    ))
}

/// 快捷键行
fn key_line(key: &'static str, desc: &'static str, colors: &ThemeColors) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:10}", key),
            Style::default()
                .fg(colors.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(colors.muted)),
    ])
}
