pub mod accounts;
pub mod files;
pub mod store;

pub use accounts::{login, register, registered_user, AccountError};
pub use files::{atomic_write, ensure_data_dir, get_data_dir, init_local_dir, read_file, report_file};
pub use store::{
    get_typed, set_typed, JsonFileStore, KeyValueStore, MemoryStore, KEY_PERSISTENT_TIMERS,
    KEY_STUDY_DATA, KEY_TODO_DATA, KEY_USER_ID, KEY_USER_PW,
};
