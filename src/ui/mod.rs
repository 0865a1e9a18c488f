pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod modal;
pub mod stats_pane;
pub mod styles;
pub mod timer_pane;
pub mod todo_pane;

use crate::app::AppState;
use crate::persistence::KeyValueStore;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use modal::render_modal;
use ratatui::Frame;
use stats_pane::render_stats_pane;
use timer_pane::render_timer_pane;
use todo_pane::render_todo_pane;

/// Main render function - draws the entire UI
pub fn render<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>) {
    let size = f.size();
    let layout = create_layout(size);

    // Render keybindings/status bar
    render_keybindings(f, app, layout.keybindings_area);

    // Render panes
    render_timer_pane(f, app, layout.timer_area);
    render_stats_pane(f, app, layout.stats_area);
    render_todo_pane(f, app, layout.todo_area);

    // Render modal if active
    if app.modal.is_some() {
        render_modal(f, app, size);
    }

    // Render input form if active
    if app.input.is_some() {
        render_input_form(f, app, size);
    }
}
