pub mod task;
pub mod user;

pub use task::{DeletedTask, Task, TaskInput, TaskPatch, TaskStatus};
pub use user::{User, UserProfile};
