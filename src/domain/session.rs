use super::enums::{InterruptReason, StudyMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Validation failures for subject management
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Subject name must not be empty.")]
    EmptySubject,
    #[error("Subject \"{0}\" already exists.")]
    DuplicateSubject(String),
    #[error("Unknown subject \"{0}\".")]
    UnknownSubject(String),
}

/// Flat per-subject totals persisted under the `persistentTimers` key.
/// Independent of the dated ledger; only used to restore the on-screen
/// counters across restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    #[serde(default)]
    pub normal: BTreeMap<String, u64>,
    #[serde(default)]
    pub focus: BTreeMap<String, u64>,
}

/// The timer session state machine.
///
/// At most one subject runs at a time, in at most one mode at a time.
/// Starting a subject while another is running stops the previous one.
/// The motion watch is armed exactly while a subject runs in Focus mode.
#[derive(Debug, Clone)]
pub struct TimerSession {
    mode: StudyMode,
    running: Option<String>,
    normal_totals: BTreeMap<String, u64>,
    focus_totals: BTreeMap<String, u64>,
    watch_armed: bool,
}

impl TimerSession {
    pub fn new() -> Self {
        Self {
            mode: StudyMode::Normal,
            running: None,
            normal_totals: BTreeMap::new(),
            focus_totals: BTreeMap::new(),
            watch_armed: false,
        }
    }

    /// Rebuild a session from a persisted snapshot
    pub fn from_snapshot(snapshot: TimerSnapshot) -> Self {
        let mut session = Self::new();
        session.restore(snapshot);
        session
    }

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    pub fn running_subject(&self) -> Option<&str> {
        self.running.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Whether a subject is running in Focus mode (interruptible state)
    pub fn is_focus_running(&self) -> bool {
        self.running.is_some() && self.mode == StudyMode::Focus
    }

    /// Whether the motion watch should be consuming samples
    pub fn watch_armed(&self) -> bool {
        self.watch_armed
    }

    /// Tracked subjects in display order
    pub fn subjects(&self) -> Vec<String> {
        self.normal_totals.keys().cloned().collect()
    }

    pub fn subject_count(&self) -> usize {
        self.normal_totals.len()
    }

    /// Register a new subject with zeroed totals in both modes
    pub fn add_subject(&mut self, name: &str) -> Result<(), SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptySubject);
        }
        if self.normal_totals.contains_key(name) {
            return Err(SessionError::DuplicateSubject(name.to_string()));
        }
        self.normal_totals.insert(name.to_string(), 0);
        self.focus_totals.insert(name.to_string(), 0);
        Ok(())
    }

    /// Delete a subject and its totals. Forces a stop if it was running.
    /// Returns false when the subject was not tracked.
    pub fn remove_subject(&mut self, name: &str) -> bool {
        if self.normal_totals.remove(name).is_none() && self.focus_totals.remove(name).is_none() {
            return false;
        }
        self.focus_totals.remove(name);
        if self.running.as_deref() == Some(name) {
            self.stop();
        }
        true
    }

    /// Start a subject. Any other running subject is stopped first.
    pub fn start(&mut self, subject: &str) -> Result<(), SessionError> {
        if !self.normal_totals.contains_key(subject) {
            return Err(SessionError::UnknownSubject(subject.to_string()));
        }
        self.running = Some(subject.to_string());
        self.watch_armed = self.mode == StudyMode::Focus;
        Ok(())
    }

    /// Play-button semantics: starting the already-running subject stops it
    pub fn toggle(&mut self, subject: &str) -> Result<(), SessionError> {
        if self.running.as_deref() == Some(subject) {
            self.stop();
            Ok(())
        } else {
            self.start(subject)
        }
    }

    /// Stop the running subject and disarm the motion watch
    pub fn stop(&mut self) {
        self.running = None;
        self.watch_armed = false;
    }

    /// Switch mode without stopping the running subject. Arms the watch
    /// when switching into Focus with a subject running, disarms otherwise.
    pub fn switch_mode(&mut self, mode: StudyMode) {
        self.mode = mode;
        self.watch_armed = self.running.is_some() && mode == StudyMode::Focus;
    }

    /// One-second accrual. Returns the (subject, mode) pair that was
    /// credited so the caller can forward the tick to the ledger.
    pub fn tick(&mut self) -> Option<(String, StudyMode)> {
        let subject = self.running.clone()?;
        let totals = match self.mode {
            StudyMode::Normal => &mut self.normal_totals,
            StudyMode::Focus => &mut self.focus_totals,
        };
        *totals.entry(subject.clone()).or_insert(0) += 1;
        Some((subject, self.mode))
    }

    /// Focus-interruption entry point. Only a Focus-mode running session is
    /// interruptible; already-accrued seconds are kept.
    pub fn interrupt(&mut self, reason: InterruptReason) -> Option<InterruptReason> {
        if !self.is_focus_running() {
            return None;
        }
        self.stop();
        Some(reason)
    }

    /// Accumulated seconds for a subject in one mode (0 when untracked)
    pub fn total_for(&self, subject: &str, mode: StudyMode) -> u64 {
        let totals = match mode {
            StudyMode::Normal => &self.normal_totals,
            StudyMode::Focus => &self.focus_totals,
        };
        totals.get(subject).copied().unwrap_or(0)
    }

    /// Accumulated seconds for a subject across both modes
    pub fn subject_total(&self, subject: &str) -> u64 {
        self.total_for(subject, StudyMode::Normal) + self.total_for(subject, StudyMode::Focus)
    }

    /// Sum of every counter in both modes (the header total)
    pub fn grand_total(&self) -> u64 {
        self.normal_totals.values().sum::<u64>() + self.focus_totals.values().sum::<u64>()
    }

    /// Flat snapshot for the `persistentTimers` document
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            normal: self.normal_totals.clone(),
            focus: self.focus_totals.clone(),
        }
    }

    /// Restore counters from a snapshot. Subjects present in only one of
    /// the two maps get a zero entry in the other so both stay aligned.
    pub fn restore(&mut self, snapshot: TimerSnapshot) {
        self.normal_totals = snapshot.normal;
        self.focus_totals = snapshot.focus;

        let subjects: Vec<String> = self
            .normal_totals
            .keys()
            .chain(self.focus_totals.keys())
            .cloned()
            .collect();
        for subject in subjects {
            self.normal_totals.entry(subject.clone()).or_insert(0);
            self.focus_totals.entry(subject).or_insert(0);
        }
    }
}

impl Default for TimerSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Format seconds as "HH:MM:SS"
pub fn format_hms(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(subjects: &[&str]) -> TimerSession {
        let mut session = TimerSession::new();
        for s in subjects {
            session.add_subject(s).unwrap();
        }
        session
    }

    #[test]
    fn test_add_subject_validation() {
        let mut session = TimerSession::new();
        assert_eq!(session.add_subject("   "), Err(SessionError::EmptySubject));
        session.add_subject("Math").unwrap();
        assert_eq!(
            session.add_subject("Math"),
            Err(SessionError::DuplicateSubject("Math".to_string()))
        );
        assert_eq!(session.total_for("Math", StudyMode::Normal), 0);
        assert_eq!(session.total_for("Math", StudyMode::Focus), 0);
    }

    #[test]
    fn test_start_unknown_subject() {
        let mut session = TimerSession::new();
        assert_eq!(
            session.start("Math"),
            Err(SessionError::UnknownSubject("Math".to_string()))
        );
    }

    #[test]
    fn test_start_stops_previous_subject() {
        let mut session = session_with(&["Math", "English"]);
        session.start("Math").unwrap();
        session.tick();
        session.start("English").unwrap();
        session.tick();
        session.tick();

        // Only English advanced after the implicit stop
        assert_eq!(session.total_for("Math", StudyMode::Normal), 1);
        assert_eq!(session.total_for("English", StudyMode::Normal), 2);
        assert_eq!(session.running_subject(), Some("English"));
    }

    #[test]
    fn test_toggle_stops_running_subject() {
        let mut session = session_with(&["Math"]);
        session.toggle("Math").unwrap();
        assert!(session.is_running());
        session.toggle("Math").unwrap();
        assert!(!session.is_running());
    }

    #[test]
    fn test_tick_credits_current_mode() {
        let mut session = session_with(&["Math"]);
        session.start("Math").unwrap();
        assert_eq!(session.tick(), Some(("Math".to_string(), StudyMode::Normal)));

        session.switch_mode(StudyMode::Focus);
        assert_eq!(session.tick(), Some(("Math".to_string(), StudyMode::Focus)));

        assert_eq!(session.total_for("Math", StudyMode::Normal), 1);
        assert_eq!(session.total_for("Math", StudyMode::Focus), 1);
        assert_eq!(session.subject_total("Math"), 2);
        assert_eq!(session.grand_total(), 2);
    }

    #[test]
    fn test_tick_idle_is_noop() {
        let mut session = session_with(&["Math"]);
        assert_eq!(session.tick(), None);
        assert_eq!(session.grand_total(), 0);
    }

    #[test]
    fn test_switch_mode_keeps_subject_running() {
        let mut session = session_with(&["Math"]);
        session.start("Math").unwrap();
        assert!(!session.watch_armed());

        session.switch_mode(StudyMode::Focus);
        assert_eq!(session.running_subject(), Some("Math"));
        assert!(session.watch_armed());

        session.switch_mode(StudyMode::Normal);
        assert_eq!(session.running_subject(), Some("Math"));
        assert!(!session.watch_armed());
    }

    #[test]
    fn test_watch_armed_only_while_focus_running() {
        let mut session = session_with(&["Math"]);
        session.switch_mode(StudyMode::Focus);
        assert!(!session.watch_armed()); // Nothing running yet

        session.start("Math").unwrap();
        assert!(session.watch_armed());

        session.stop();
        assert!(!session.watch_armed());
    }

    #[test]
    fn test_interrupt_halts_accrual_and_keeps_seconds() {
        let mut session = session_with(&["Math"]);
        session.switch_mode(StudyMode::Focus);
        session.start("Math").unwrap();
        for _ in 0..5 {
            session.tick();
        }

        let reason = session.interrupt(InterruptReason::DeviceMoved);
        assert_eq!(reason, Some(InterruptReason::DeviceMoved));
        assert!(!session.is_running());
        assert!(!session.watch_armed());

        // No further accrual, prior seconds retained
        assert_eq!(session.tick(), None);
        assert_eq!(session.total_for("Math", StudyMode::Focus), 5);
    }

    #[test]
    fn test_interrupt_ignored_outside_focus_running() {
        let mut session = session_with(&["Math"]);
        session.start("Math").unwrap();
        assert_eq!(session.interrupt(InterruptReason::LostForeground), None);
        assert!(session.is_running()); // Normal mode keeps going
    }

    #[test]
    fn test_remove_running_subject_forces_idle() {
        let mut session = session_with(&["Math"]);
        session.start("Math").unwrap();
        session.tick();

        assert!(session.remove_subject("Math"));
        assert!(!session.is_running());
        assert!(session.subjects().is_empty());
        assert_eq!(session.total_for("Math", StudyMode::Normal), 0);
    }

    #[test]
    fn test_remove_unknown_subject() {
        let mut session = session_with(&["Math"]);
        assert!(!session.remove_subject("English"));
        assert_eq!(session.subject_count(), 1);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut session = session_with(&["Math", "English"]);
        session.start("Math").unwrap();
        session.tick();
        session.switch_mode(StudyMode::Focus);
        session.tick();

        let restored = TimerSession::from_snapshot(session.snapshot());
        assert_eq!(restored.total_for("Math", StudyMode::Normal), 1);
        assert_eq!(restored.total_for("Math", StudyMode::Focus), 1);
        assert_eq!(restored.subjects(), vec!["English".to_string(), "Math".to_string()]);
        // Run state is process-local and never persisted
        assert!(!restored.is_running());
    }

    #[test]
    fn test_restore_aligns_lopsided_snapshot() {
        let mut snapshot = TimerSnapshot::default();
        snapshot.focus.insert("Math".to_string(), 30);

        let session = TimerSession::from_snapshot(snapshot);
        assert_eq!(session.subjects(), vec!["Math".to_string()]);
        assert_eq!(session.total_for("Math", StudyMode::Normal), 0);
        assert_eq!(session.total_for("Math", StudyMode::Focus), 30);
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(360000), "100:00:00");
    }
}
