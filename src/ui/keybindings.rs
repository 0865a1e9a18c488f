use crate::app::AppState;
use crate::persistence::KeyValueStore;
use crate::ui::styles::{error_style, hint_style};
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar. A pending validation message takes the
/// bar over until the next keypress.
pub fn render_keybindings<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    if let Some(message) = &app.status_line {
        let paragraph = Paragraph::new(Line::raw(format!(" {}", message))).style(error_style());
        f.render_widget(paragraph, area);
        return;
    }

    let hints = Line::from(vec![
        Span::raw(" Tab pane   "),
        Span::raw("↑/↓ select   "),
        Span::raw("←/→ date   "),
        Span::raw("t today   "),
        Span::raw("Enter start/stop · done   "),
        Span::raw("m/f/n mode   "),
        Span::raw("a add   "),
        Span::raw("e memo   "),
        Span::raw("x delete   "),
        Span::raw("q quit"),
    ]);

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}
