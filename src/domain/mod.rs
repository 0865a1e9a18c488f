pub mod enums;
pub mod session;
pub mod todo;

pub use enums::{ActivePane, InterruptReason, StudyMode, UiMode};
pub use session::{format_hms, SessionError, TimerSession, TimerSnapshot};
pub use todo::{TodoError, TodoItem, TodoStore};
