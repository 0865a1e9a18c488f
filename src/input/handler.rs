use crate::app::{AppState, InputState};
use crate::domain::{ActivePane, StudyMode, UiMode};
use crate::persistence::KeyValueStore;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Modal => handle_modal_mode(app, key),
        UiMode::AddingSubject | UiMode::AddingTodo | UiMode::EditingMemo => {
            handle_text_input_mode(app, key)
        }
    }
}

/// Handle keys in normal mode
fn handle_normal_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    // Any keypress clears a stale validation message
    app.status_line = None;

    match key.code {
        // Pane focus
        KeyCode::Tab => {
            app.cycle_pane();
            Ok(false)
        }

        // Selection within the focused pane
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection_down();
            Ok(false)
        }

        // Date cursor for the stats/todo panes
        KeyCode::Left | KeyCode::Char('h') => {
            app.shift_date(-1);
            Ok(false)
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.shift_date(1);
            Ok(false)
        }
        KeyCode::Char('t') | KeyCode::Char('T') => {
            app.jump_to_today();
            Ok(false)
        }

        // Start/stop the selected subject, or toggle the selected todo
        KeyCode::Enter => {
            match app.active_pane {
                ActivePane::Timer => app.toggle_selected_subject(),
                ActivePane::Todo => app.toggle_selected_todo(),
                ActivePane::Stats => {}
            }
            Ok(false)
        }

        // Mode switch (kept while a subject is running)
        KeyCode::Char('m') | KeyCode::Char('M') => {
            app.toggle_mode();
            Ok(false)
        }
        KeyCode::Char('f') | KeyCode::Char('F') => {
            app.switch_mode(StudyMode::Focus);
            Ok(false)
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            app.switch_mode(StudyMode::Normal);
            Ok(false)
        }

        // Add subject / todo depending on the focused pane
        KeyCode::Char('a') | KeyCode::Char('A') => {
            match app.active_pane {
                ActivePane::Timer => {
                    app.ui_mode = UiMode::AddingSubject;
                    app.input = Some(InputState::default());
                }
                ActivePane::Todo => {
                    app.ui_mode = UiMode::AddingTodo;
                    app.input = Some(InputState::default());
                }
                ActivePane::Stats => {}
            }
            Ok(false)
        }

        // Memo editor for the selected todo
        KeyCode::Char('e') | KeyCode::Char('E') => {
            if app.active_pane == ActivePane::Todo
                && app.todo_index < app.todos.count(app.selected_date)
            {
                app.ui_mode = UiMode::EditingMemo;
                app.input = Some(InputState {
                    buffer: app.selected_memo(),
                });
            }
            Ok(false)
        }

        // Delete selected subject / todo
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => {
            match app.active_pane {
                ActivePane::Timer => app.remove_selected_subject(),
                ActivePane::Todo => app.remove_selected_todo(),
                ActivePane::Stats => {}
            }
            Ok(false)
        }

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Ok(true),

        _ => Ok(false),
    }
}

/// Handle keys while a modal is showing
fn handle_modal_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
            app.close_modal();
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys in the one-line text input modes
fn handle_text_input_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.input = None;
            app.ui_mode = UiMode::Normal;
        }
        KeyCode::Enter => {
            let buffer = app.input.take().map(|i| i.buffer).unwrap_or_default();
            let mode = app.ui_mode;
            app.ui_mode = UiMode::Normal;
            match mode {
                UiMode::AddingSubject => app.add_subject(&buffer),
                UiMode::AddingTodo => app.add_todo(&buffer),
                UiMode::EditingMemo => app.save_memo(&buffer),
                _ => {}
            }
        }
        KeyCode::Backspace => {
            if let Some(input) = app.input.as_mut() {
                input.buffer.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(input) = app.input.as_mut() {
                input.buffer.push(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::StudyLedger;
    use crate::persistence::MemoryStore;
    use crossterm::event::KeyModifiers;

    fn create_test_app() -> AppState<MemoryStore> {
        let ledger = StudyLedger::load(MemoryStore::new()).unwrap();
        let mut app = AppState::new("alice".to_string(), ledger).unwrap();
        app.add_subject("Math");
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_handle_quit() {
        let mut app = create_test_app();
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(should_quit);
    }

    #[test]
    fn test_handle_pane_cycle() {
        let mut app = create_test_app();
        assert_eq!(app.active_pane, ActivePane::Timer);
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.active_pane, ActivePane::Stats);
    }

    #[test]
    fn test_handle_add_subject() {
        let mut app = create_test_app();

        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::AddingSubject);
        assert!(app.input.is_some());

        for c in "English".chars() {
            handle_key(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input.is_none());
        assert_eq!(app.session.subject_count(), 2);
    }

    #[test]
    fn test_handle_start_stop_subject() {
        let mut app = create_test_app();

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.session.running_subject(), Some("Math"));

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(!app.session.is_running());
    }

    #[test]
    fn test_handle_mode_keys() {
        let mut app = create_test_app();

        handle_key(&mut app, key(KeyCode::Char('f'))).unwrap();
        assert_eq!(app.session.mode(), StudyMode::Focus);

        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.session.mode(), StudyMode::Normal);

        handle_key(&mut app, key(KeyCode::Char('m'))).unwrap();
        assert_eq!(app.session.mode(), StudyMode::Focus);
    }

    #[test]
    fn test_handle_todo_flow() {
        let mut app = create_test_app();
        app.active_pane = ActivePane::Todo;

        // Add a todo
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::AddingTodo);
        handle_key(&mut app, key(KeyCode::Char('X'))).unwrap();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.todos.count(app.selected_date), 1);

        // Toggle it done
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.todos.items(app.selected_date)[0].is_done);

        // Edit the memo
        handle_key(&mut app, key(KeyCode::Char('e'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::EditingMemo);
        for c in "note".chars() {
            handle_key(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(
            app.todos.items(app.selected_date)[0].memo.as_deref(),
            Some("note")
        );

        // Delete it
        handle_key(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.todos.count(app.selected_date), 0);
    }

    #[test]
    fn test_handle_date_navigation() {
        let mut app = create_test_app();
        let today = app.selected_date;

        handle_key(&mut app, key(KeyCode::Right)).unwrap();
        assert_eq!(app.selected_date, today + chrono::Duration::days(1));

        handle_key(&mut app, key(KeyCode::Char('t'))).unwrap();
        assert_eq!(app.selected_date, today);
    }

    #[test]
    fn test_handle_input_escape_cancels() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('Z'))).unwrap();
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input.is_none());
        assert_eq!(app.session.subject_count(), 1);
    }

    #[test]
    fn test_handle_modal_dismiss() {
        let mut app = create_test_app();
        app.switch_mode(StudyMode::Focus);
        app.toggle_selected_subject();
        app.focus_lost();
        assert_eq!(app.ui_mode, UiMode::Modal);

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.modal.is_none());
    }
}
