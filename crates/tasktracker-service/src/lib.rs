mod clock;
mod local;
mod traits;

pub use clock::FixedClock;
pub use local::LocalService;
pub use traits::{ServiceError, TaskService};
