use crate::app::AppState;
use crate::domain::{format_hms, ActivePane};
use crate::ledger::HourlySeries;
use crate::persistence::KeyValueStore;
use crate::ui::styles::{
    active_border_style, border_style, chart_style, default_style, hint_style, share_bar_style,
    title_style,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
    Frame,
};

/// Width of the distribution bar in cells
const SHARE_BAR_WIDTH: usize = 20;

/// Render the stats pane for the selected date: time summary, per-subject
/// distribution and the hourly series
pub fn render_stats_pane<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    let border = if app.active_pane == ActivePane::Stats {
        active_border_style()
    } else {
        border_style()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(
            format!(" Stats — {} ", app.selected_date),
            title_style(),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Summary lines
            Constraint::Min(3),    // Subject distribution
            Constraint::Length(4), // Hourly sparkline
        ])
        .split(inner);

    render_summary(f, app, chunks[0]);
    render_distribution(f, app, chunks[1]);
    render_hourly(f, app, chunks[2]);
}

fn render_summary<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    let summary = app.ledger.summarize(&app.user_id, app.selected_date);

    let lines = vec![
        Line::from(vec![
            Span::styled("Total  ".to_string(), title_style()),
            Span::styled(format_hms(summary.total_seconds), default_style()),
        ]),
        Line::from(vec![
            Span::styled("Focus  ".to_string(), title_style()),
            Span::styled(format_hms(summary.focus_seconds), default_style()),
        ]),
        Line::from(vec![
            Span::styled("Normal ".to_string(), title_style()),
            Span::styled(format_hms(summary.normal_seconds), default_style()),
        ]),
    ];

    f.render_widget(Paragraph::new(lines), area);
}

fn render_distribution<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    let shares = app.ledger.subject_distribution(&app.user_id, app.selected_date);

    let mut lines = vec![Line::raw("")];
    if shares.is_empty() {
        lines.push(Line::styled("No study data.".to_string(), hint_style()));
    } else {
        for share in &shares {
            let filled = (share.fraction * SHARE_BAR_WIDTH as f64).round() as usize;
            let bar: String = "█".repeat(filled.min(SHARE_BAR_WIDTH));

            lines.push(Line::from(vec![
                Span::styled(format!("{:<12}", share.subject), default_style()),
                Span::styled(format!("{:<width$}", bar, width = SHARE_BAR_WIDTH), share_bar_style()),
                Span::styled(format!(" {:>5.1}%", share.fraction * 100.0), default_style()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_hourly<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    let hourly = app.ledger.hourly_distribution(&app.user_id, app.selected_date);
    let series = HourlySeries::from_seconds(&hourly);

    let peak = hourly.iter().copied().max().unwrap_or(0);
    let peak_text = if peak > 0 {
        let peak_hour = hourly.iter().position(|&secs| secs == peak).unwrap_or(0);
        format!(" By Hour ({}) — peak {:02}:00 ", series.unit.label(), peak_hour)
    } else {
        " By Hour ".to_string()
    };

    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(border_style())
                .title(Span::styled(peak_text, title_style())),
        )
        .data(&hourly)
        .style(chart_style());

    f.render_widget(sparkline, area);
}
