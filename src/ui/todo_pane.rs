use crate::app::AppState;
use crate::domain::{ActivePane, TodoItem};
use crate::persistence::KeyValueStore;
use crate::ui::styles::{
    active_border_style, border_style, default_style, done_style, hint_style, selected_style,
    title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Create a line for one todo item
fn create_todo_line(item: &TodoItem, selected: bool) -> Line<'static> {
    let checkbox = if item.is_done { "[x] " } else { "[ ] " };
    let checkbox_style = if item.is_done { done_style() } else { default_style() };

    let text_style = if selected {
        selected_style()
    } else if item.is_done {
        done_style()
    } else {
        default_style()
    };

    let mut spans = vec![
        Span::styled(checkbox.to_string(), checkbox_style),
        Span::styled(item.title.clone(), text_style),
    ];

    if let Some(memo) = &item.memo {
        spans.push(Span::styled(format!("  — {}", memo), hint_style()));
    }

    Line::from(spans)
}

/// Render the todo pane for the selected date
pub fn render_todo_pane<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    let items_for_date = app.todos.items(app.selected_date);

    let items: Vec<ListItem> = if items_for_date.is_empty() {
        vec![ListItem::new(Line::styled(
            "Nothing here. Press 'a' to add a todo.".to_string(),
            hint_style(),
        ))]
    } else {
        items_for_date
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let selected = app.active_pane == ActivePane::Todo && idx == app.todo_index;
                ListItem::new(create_todo_line(item, selected))
            })
            .collect()
    };

    let border = if app.active_pane == ActivePane::Todo {
        active_border_style()
    } else {
        border_style()
    };

    let title = format!(" Todos — {} ({}) ", app.selected_date, items_for_date.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(title, title_style())),
    );

    f.render_widget(list, area);
}
