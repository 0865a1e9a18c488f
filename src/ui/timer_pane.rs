use crate::app::AppState;
use crate::domain::{format_hms, ActivePane, StudyMode};
use crate::persistence::KeyValueStore;
use crate::ui::styles::{
    active_border_style, border_style, default_style, focus_style, hint_style, idle_style,
    running_style, selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Create a line for one tracked subject
fn create_subject_line<S: KeyValueStore>(
    app: &AppState<S>,
    subject: &str,
    selected: bool,
) -> Line<'static> {
    let is_running = app.session.running_subject() == Some(subject);
    let mode = app.session.mode();

    let badge = if is_running { "▶ " } else { "  " };
    let badge_style = if is_running { running_style() } else { idle_style() };

    let shown = app.session.total_for(subject, mode);
    let other = app.session.total_for(subject, mode.toggled());

    let mut spans = vec![
        Span::styled(badge.to_string(), badge_style),
        Span::styled(
            format!("{:<12}", subject),
            if selected { selected_style() } else { default_style() },
        ),
        Span::styled(format!("  {}", format_hms(shown)), default_style()),
        Span::styled(
            format!("  ({} {})", mode.toggled().name().to_lowercase(), format_hms(other)),
            hint_style(),
        ),
    ];

    if is_running {
        spans.push(Span::styled("  ●".to_string(), running_style()));
    }

    Line::from(spans)
}

/// Render the timer pane: mode badge, tracked subjects and the grand total
pub fn render_timer_pane<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    let mode = app.session.mode();
    let mode_badge = match mode {
        StudyMode::Normal => Span::styled(" Normal ", title_style()),
        StudyMode::Focus => Span::styled(" Focus ", focus_style()),
    };

    let mut items: Vec<ListItem> = Vec::new();

    // Header: total across both modes, restored across restarts
    items.push(ListItem::new(Line::from(vec![
        Span::styled("Total ".to_string(), title_style()),
        Span::styled(format_hms(app.session.grand_total()), default_style()),
    ])));
    items.push(ListItem::new(Line::raw("")));

    let subjects = app.session.subjects();
    if subjects.is_empty() {
        items.push(ListItem::new(Line::styled(
            "No subjects yet. Press 'a' to add one.".to_string(),
            hint_style(),
        )));
    } else {
        for (idx, subject) in subjects.iter().enumerate() {
            let selected = app.active_pane == ActivePane::Timer && idx == app.subject_index;
            items.push(ListItem::new(create_subject_line(app, subject, selected)));
        }
    }

    let border = if app.active_pane == ActivePane::Timer {
        active_border_style()
    } else {
        border_style()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Line::from(vec![
                Span::styled(" Subjects —".to_string(), title_style()),
                mode_badge,
            ])),
    );

    f.render_widget(list, area);
}
