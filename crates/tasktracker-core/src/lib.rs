pub mod calendar;
pub mod form;
pub mod summary;
pub mod task;

pub use calendar::{MonthRange, TimeZoneSetting};
pub use form::{FormErrors, TaskFields, TaskForm};
pub use summary::{MonthlySummary, TaskBoard};
pub use task::{Task, TaskState};
