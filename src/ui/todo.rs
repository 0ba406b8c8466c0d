use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use super::components::{
    add_input, confirm_dialog, empty_state, footer, header, help_panel, toast, todo_list,
};
use crate::app::App;

pub fn render(frame: &mut Frame, app: &mut App) {
    let colors = app.colors;

    // 填充背景色
    let area = frame.area();
    let bg_block = Block::default().style(Style::default().bg(colors.bg));
    frame.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header::HEADER_HEIGHT),
            Constraint::Length(add_input::INPUT_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .split(area);

    let loading = app.is_loading();

    header::render(
        frame,
        chunks[0],
        app.todos.completed_count(),
        app.todos.len(),
        loading,
        &colors,
    );

    add_input::render(
        frame,
        chunks[1],
        &app.dialogs.input,
        app.dialogs.input_focused,
        &colors,
    );

    if app.todos.is_empty() {
        empty_state::render(frame, chunks[2], loading, &colors);
    } else {
        todo_list::render(
            frame,
            chunks[2],
            app.todos.items(),
            &mut app.list_state,
            &colors,
        );
    }

    footer::render(
        frame,
        chunks[3],
        app.dialogs.input_focused,
        !app.todos.is_empty(),
        &colors,
    );

    // 弹窗
    if let Some(confirm) = &app.dialogs.confirm_dialog {
        confirm_dialog::render(frame, confirm, &colors);
    }

    if app.dialogs.show_help {
        help_panel::render(frame, &colors);
    }

    if let Some(t) = &app.toast {
        toast::render(frame, &t.message, &colors);
    }
}
