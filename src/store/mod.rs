pub mod storage;
pub mod types;

pub use storage::{get_storage_path, load_gradebook, save_gradebook, STORAGE_KEY};
pub use types::{GradeUpdate, Gradebook};
