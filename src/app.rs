use crate::domain::{
    ActivePane, InterruptReason, StudyMode, TimerSession, TimerSnapshot, TodoStore, UiMode,
};
use crate::ledger::StudyLedger;
use crate::motion::{MotionSample, MotionWatch};
use crate::notifications;
use crate::persistence::{
    get_typed, set_typed, KeyValueStore, KEY_PERSISTENT_TIMERS, KEY_TODO_DATA,
};
use anyhow::Result;
use chrono::{Local, NaiveDate, Timelike};
use std::time::Instant;

/// Modal state for interruption and message popups
#[derive(Debug, Clone)]
pub struct ModalState {
    pub title: String,
    pub message: String,
}

/// One-line text input state (add subject, add todo, edit memo)
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub buffer: String,
}

/// Main application state
pub struct AppState<S: KeyValueStore> {
    pub user_id: String,
    pub session: TimerSession,
    pub ledger: StudyLedger<S>,
    pub todos: TodoStore,
    pub watch: MotionWatch,

    pub ui_mode: UiMode,
    pub active_pane: ActivePane,
    pub selected_date: NaiveDate,
    pub subject_index: usize,
    pub todo_index: usize,
    pub modal: Option<ModalState>,
    pub input: Option<InputState>,
    pub status_line: Option<String>,
    pub needs_save: bool,
    pub todos_need_save: bool,

    last_accrual: Instant,
}

impl<S: KeyValueStore> AppState<S> {
    /// Build the app over a loaded ledger, restoring the timer counters and
    /// the todo lists from their snapshots
    pub fn new(user_id: String, ledger: StudyLedger<S>) -> Result<Self> {
        let snapshot: TimerSnapshot =
            get_typed(ledger.store(), KEY_PERSISTENT_TIMERS)?.unwrap_or_default();
        let todos: TodoStore = get_typed(ledger.store(), KEY_TODO_DATA)?.unwrap_or_default();

        Ok(Self {
            user_id,
            session: TimerSession::from_snapshot(snapshot),
            ledger,
            todos,
            watch: MotionWatch::new(),
            ui_mode: UiMode::Normal,
            active_pane: ActivePane::Timer,
            selected_date: Local::now().date_naive(),
            subject_index: 0,
            todo_index: 0,
            modal: None,
            input: None,
            status_line: None,
            needs_save: false,
            todos_need_save: false,
            last_accrual: Instant::now(),
        })
    }

    /// Credit whole seconds elapsed since the last accrual. Called from the
    /// event loop on every poll timeout; a 250ms poll cadence therefore
    /// never credits fractional seconds.
    pub fn tick(&mut self) -> Result<()> {
        // The accrual clock only runs while a subject runs; otherwise the
        // gap since the last poll would be credited on the next start
        if !self.session.is_running() {
            self.last_accrual = Instant::now();
            return Ok(());
        }

        let elapsed_secs = self.last_accrual.elapsed().as_secs();
        if elapsed_secs > 0 {
            // Advance by whole seconds, keeping the sub-second remainder
            self.last_accrual += std::time::Duration::from_secs(elapsed_secs);
            self.accrue(elapsed_secs)?;
        }
        Ok(())
    }

    /// Credit `seconds` one tick at a time: session counters first, then
    /// the dated ledger, stamped with the date and hour current at the tick
    pub fn accrue(&mut self, seconds: u64) -> Result<()> {
        for _ in 0..seconds {
            let Some((subject, mode)) = self.session.tick() else {
                break;
            };
            let now = Local::now();
            self.ledger.record_tick(
                &self.user_id,
                mode,
                &subject,
                now.date_naive(),
                now.hour(),
                1,
            )?;
            self.needs_save = true;
        }
        Ok(())
    }

    /// Sync the motion watch with the session invariant: armed exactly
    /// while a subject runs in Focus mode
    fn sync_watch(&mut self) {
        if self.session.watch_armed() {
            self.watch.arm();
        } else {
            self.watch.disarm();
        }
    }

    /// Feed one motion sample; a breach while armed interrupts the session
    pub fn observe_motion(&mut self, sample: MotionSample) {
        self.sync_watch();
        if let Some(reason) = self.watch.observe(sample) {
            self.interrupt_focus(reason);
        }
    }

    /// The host surface lost foreground/active status
    pub fn focus_lost(&mut self) {
        self.interrupt_focus(InterruptReason::LostForeground);
    }

    /// Stop a Focus-mode session and surface the reason. Seconds already
    /// ticked stay counted.
    pub fn interrupt_focus(&mut self, reason: InterruptReason) {
        if let Some(reason) = self.session.interrupt(reason) {
            self.sync_watch();
            notifications::notify_focus_interrupted(reason.message());
            self.modal = Some(ModalState {
                title: "Focus interrupted".to_string(),
                message: format!("{}\nThe timer has been stopped.", reason.message()),
            });
            self.ui_mode = UiMode::Modal;
        }
    }

    /// Dismiss the active modal
    pub fn close_modal(&mut self) {
        self.modal = None;
        self.ui_mode = UiMode::Normal;
    }

    // --- Timer pane commands ---

    /// The subject the selection cursor points at
    pub fn selected_subject(&self) -> Option<String> {
        self.session.subjects().get(self.subject_index).cloned()
    }

    /// Start/stop the selected subject (play-button semantics)
    pub fn toggle_selected_subject(&mut self) {
        if let Some(subject) = self.selected_subject() {
            if let Err(e) = self.session.toggle(&subject) {
                self.status_line = Some(e.to_string());
                return;
            }
            self.sync_watch();
            self.needs_save = true;
        }
    }

    pub fn add_subject(&mut self, name: &str) {
        match self.session.add_subject(name) {
            Ok(()) => {
                self.needs_save = true;
                self.clamp_selection();
            }
            Err(e) => self.status_line = Some(e.to_string()),
        }
    }

    /// Remove the selected subject; forces a stop when it was running
    pub fn remove_selected_subject(&mut self) {
        if let Some(subject) = self.selected_subject() {
            self.session.remove_subject(&subject);
            self.sync_watch();
            self.needs_save = true;
            self.clamp_selection();
        }
    }

    /// Switch mode without stopping the running subject
    pub fn switch_mode(&mut self, mode: StudyMode) {
        self.session.switch_mode(mode);
        self.sync_watch();
    }

    pub fn toggle_mode(&mut self) {
        self.switch_mode(self.session.mode().toggled());
    }

    // --- Todo pane commands ---

    pub fn add_todo(&mut self, title: &str) {
        match self.todos.add(self.selected_date, title) {
            Ok(()) => {
                self.todos_need_save = true;
                self.clamp_selection();
            }
            Err(e) => self.status_line = Some(e.to_string()),
        }
    }

    pub fn toggle_selected_todo(&mut self) {
        self.todos.toggle_done(self.selected_date, self.todo_index);
        self.todos_need_save = true;
    }

    pub fn remove_selected_todo(&mut self) {
        self.todos.remove(self.selected_date, self.todo_index);
        self.todos_need_save = true;
        self.clamp_selection();
    }

    /// Memo text of the selected todo (for seeding the editor)
    pub fn selected_memo(&self) -> String {
        self.todos
            .items(self.selected_date)
            .get(self.todo_index)
            .and_then(|item| item.memo.clone())
            .unwrap_or_default()
    }

    pub fn save_memo(&mut self, memo: &str) {
        self.todos.set_memo(self.selected_date, self.todo_index, memo);
        self.todos_need_save = true;
    }

    // --- Navigation ---

    pub fn cycle_pane(&mut self) {
        self.active_pane = self.active_pane.next();
    }

    pub fn move_selection_up(&mut self) {
        match self.active_pane {
            ActivePane::Timer => self.subject_index = self.subject_index.saturating_sub(1),
            ActivePane::Todo => self.todo_index = self.todo_index.saturating_sub(1),
            ActivePane::Stats => {}
        }
    }

    pub fn move_selection_down(&mut self) {
        match self.active_pane {
            ActivePane::Timer => {
                if self.subject_index + 1 < self.session.subject_count() {
                    self.subject_index += 1;
                }
            }
            ActivePane::Todo => {
                if self.todo_index + 1 < self.todos.count(self.selected_date) {
                    self.todo_index += 1;
                }
            }
            ActivePane::Stats => {}
        }
    }

    /// Keep selection cursors inside their lists after adds/removes
    fn clamp_selection(&mut self) {
        let subjects = self.session.subject_count();
        if self.subject_index >= subjects {
            self.subject_index = subjects.saturating_sub(1);
        }
        let todos = self.todos.count(self.selected_date);
        if self.todo_index >= todos {
            self.todo_index = todos.saturating_sub(1);
        }
    }

    /// Move the stats/todo date cursor by whole days
    pub fn shift_date(&mut self, days: i64) {
        if let Some(date) = self
            .selected_date
            .checked_add_signed(chrono::Duration::days(days))
        {
            self.selected_date = date;
            self.todo_index = 0;
        }
    }

    pub fn jump_to_today(&mut self) {
        self.selected_date = Local::now().date_naive();
        self.todo_index = 0;
    }

    // --- Persistence ---

    /// Write the persistentTimers snapshot and, when dirty, the todoData
    /// document. The dated ledger persists itself on every recorded tick.
    pub fn save(&mut self) -> Result<()> {
        let snapshot = self.session.snapshot();
        set_typed(self.ledger.store_mut(), KEY_PERSISTENT_TIMERS, &snapshot)?;
        self.needs_save = false;

        if self.todos_need_save {
            self.save_todos()?;
        }
        Ok(())
    }

    pub fn save_todos(&mut self) -> Result<()> {
        set_typed(self.ledger.store_mut(), KEY_TODO_DATA, &self.todos)?;
        self.todos_need_save = false;
        Ok(())
    }
}
