use crate::app::AppState;
use crate::domain::UiMode;
use crate::persistence::KeyValueStore;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the one-line text input for adding subjects/todos and editing memos
pub fn render_input_form<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    let Some(input) = &app.input else {
        return;
    };

    let modal_area = create_modal_area(area);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let title = match app.ui_mode {
        UiMode::AddingSubject => " Add Subject ",
        UiMode::AddingTodo => " Add Todo ",
        UiMode::EditingMemo => " Edit Memo ",
        _ => " Input ",
    };

    let mut lines = Vec::new();
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("  > "),
        Span::raw(input.buffer.clone()),
        Span::styled("█", modal_title_style()),
    ]));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("  [Enter]", modal_title_style()),
        Span::raw(" Save  "),
        Span::styled("[Esc]", modal_title_style()),
        Span::raw(" Cancel"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
