use serde::{Deserialize, Serialize};

/// Study mode for a timer session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyMode {
    Normal,
    Focus,
}

impl StudyMode {
    /// Parse mode from its storage key ("normal"/"focus")
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "focus" => Some(Self::Focus),
            _ => None,
        }
    }

    /// Storage key used in the studyData/persistentTimers documents
    pub fn key(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Focus => "focus",
        }
    }

    /// Display name for the mode selector
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Focus => "Focus",
        }
    }

    /// The other mode (for toggling)
    pub fn toggled(&self) -> Self {
        match self {
            Self::Normal => Self::Focus,
            Self::Focus => Self::Normal,
        }
    }
}

/// Why a focus session was cut short
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptReason {
    /// The host surface lost foreground/active status
    LostForeground,
    /// A motion sample breached the stillness thresholds
    DeviceMoved,
}

impl InterruptReason {
    /// User-facing message shown in the interruption modal
    pub fn message(&self) -> &'static str {
        match self {
            Self::LostForeground => "The app lost focus.",
            Self::DeviceMoved => "The device moved.",
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingSubject,
    AddingTodo,
    EditingMemo,
    Modal, // Interruption or message modal
}

/// Which pane currently receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Timer,
    Stats,
    Todo,
}

impl ActivePane {
    /// Cycle to the next pane (Tab order)
    pub fn next(&self) -> Self {
        match self {
            Self::Timer => Self::Stats,
            Self::Stats => Self::Todo,
            Self::Todo => Self::Timer,
        }
    }
}
