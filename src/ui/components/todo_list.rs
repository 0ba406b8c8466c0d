use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::model::TodoItem;
use crate::theme::ThemeColors;

/// 渲染任务列表
pub fn render(
    frame: &mut Frame,
    area: Rect,
    items: &[TodoItem],
    state: &mut ListState,
    colors: &ThemeColors,
) {
    let rows: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| ListItem::new(item_line(i, item, colors)))
        .collect();

    let list = List::new(rows)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::RIGHT)
                .border_style(Style::default().fg(colors.border)),
        )
        .highlight_symbol("❯ ")
        .highlight_style(
            Style::default()
                .bg(colors.bg_secondary)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(list, area, state);
}

fn item_line(index: usize, item: &TodoItem, colors: &ThemeColors) -> Line<'static> {
    let (marker, marker_style, text_style) = if item.completed {
        (
            "[x]",
            Style::default().fg(colors.done),
            Style::default()
                .fg(colors.muted)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        (
            "[ ]",
            Style::default().fg(colors.muted),
            Style::default().fg(colors.text),
        )
    };

    Line::from(vec![
        Span::styled(format!("{:>3}. ", index + 1), Style::default().fg(colors.muted)),
        Span::styled(marker, marker_style),
        Span::raw(" "),
        Span::styled(item.text.clone(), text_style),
    ])
}
