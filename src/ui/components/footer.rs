use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::dialog_utils::hint_spans;
use crate::theme::ThemeColors;

/// 渲染底部快捷键提示栏
pub fn render(
    frame: &mut Frame,
    area: Rect,
    input_focused: bool,
    has_items: bool,
    colors: &ThemeColors,
) {
    let mut spans = vec![Span::raw("  ")];
    spans.extend(hint_spans(get_shortcuts(input_focused, has_items), colors));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn get_shortcuts(input_focused: bool, has_items: bool) -> &'static [(&'static str, &'static str)] {
    if input_focused {
        &[("Enter", "add"), ("Esc", "done typing")]
    } else if has_items {
        &[
            ("a", "add"),
            ("Space", "toggle"),
            ("x", "delete"),
            ("j/k", "move"),
            ("?", "help"),
            ("q", "quit"),
        ]
    } else {
        &[("a", "add"), ("t", "theme"), ("?", "help"), ("q", "quit")]
    }
}
